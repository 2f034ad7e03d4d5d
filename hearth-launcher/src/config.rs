//! # Launcher configuration
//!
//! Settings come from three layers, later ones winning:
//!
//! 1. built-in defaults,
//! 2. an optional `hearth.json` in the server directory,
//! 3. `HEARTH_*` environment variables (a `.env` file is loaded first).
//!
//! ```json
//! {
//!   "java_path": "/usr/lib/jvm/java-21/bin/java",
//!   "jvm_args": ["-Xmx6G"],
//!   "loaders": ["neoforge"],
//!   "debug_logging": false
//! }
//! ```

use anyhow::{Context, Result};
use hearth_lib::launcher::{default_roots, InterpreterInvocation, LoaderKind, LoaderRoot};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "hearth.json";

pub const ENV_WORK_DIR: &str = "HEARTH_WORK_DIR";
pub const ENV_JAVA: &str = "HEARTH_JAVA";
pub const ENV_JVM_ARGS: &str = "HEARTH_JVM_ARGS";
pub const ENV_STATUS_FILE: &str = "HEARTH_STATUS_FILE";
pub const ENV_DEBUG: &str = "HEARTH_DEBUG";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Server directory; defaults to the directory holding the launcher binary
    pub work_dir: Option<PathBuf>,

    /// Java executable; defaults to `JAVA_HOME`, then `java` on the PATH
    pub java_path: Option<PathBuf>,

    /// Extra JVM options placed right after the Java executable
    pub jvm_args: Vec<String>,

    /// Where the resolved manifest path is written; relative to `work_dir`
    pub status_file: Option<PathBuf>,

    /// Loaders to consider; empty means both
    pub loaders: Vec<LoaderKind>,

    pub debug_logging: bool,
}

impl LauncherConfig {
    /// Load defaults, then `hearth.json`, then the process environment
    pub fn load() -> Result<Self> {
        let lookup = |key: &str| std::env::var(key).ok();

        let work_dir = match lookup(ENV_WORK_DIR) {
            Some(dir) => PathBuf::from(dir),
            None => default_work_dir()?,
        };

        let mut config = Self::from_file(&work_dir.join(CONFIG_FILE_NAME))?.unwrap_or_default();
        if config.work_dir.is_none() {
            config.work_dir = Some(work_dir);
        }
        config.apply_env(lookup)?;
        Ok(config)
    }

    /// Read a config file; `Ok(None)` when it does not exist
    pub fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.is_file() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {:?}", path))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("Invalid config file {:?}", path))?;
        Ok(Some(config))
    }

    /// Override fields from `HEARTH_*` variables provided by `lookup`
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_WORK_DIR) {
            self.work_dir = Some(PathBuf::from(dir));
        }
        if let Some(java) = lookup(ENV_JAVA) {
            self.java_path = Some(PathBuf::from(java));
        }
        if let Some(args) = lookup(ENV_JVM_ARGS) {
            self.jvm_args = InterpreterInvocation::default()
                .with_flag_string(&args)
                .map(|invocation| invocation.flags)
                .with_context(|| format!("{} has unbalanced quotes: {}", ENV_JVM_ARGS, args))?;
        }
        if let Some(file) = lookup(ENV_STATUS_FILE) {
            self.status_file = Some(PathBuf::from(file));
        }
        if let Some(debug) = lookup(ENV_DEBUG) {
            self.debug_logging = matches!(debug.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        Ok(())
    }

    pub fn work_dir(&self) -> Result<PathBuf> {
        match &self.work_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_work_dir(),
        }
    }

    pub fn status_file(&self, work_dir: &Path) -> PathBuf {
        match &self.status_file {
            Some(file) => work_dir.join(file),
            None => work_dir.join("libraries").join("version.txt"),
        }
    }

    /// Loader roots to scan, restricted to `loaders` when set
    pub fn roots(&self, work_dir: &Path) -> Vec<LoaderRoot> {
        default_roots(&work_dir.join("libraries"))
            .into_iter()
            .filter(|root| self.loaders.is_empty() || self.loaders.contains(&root.kind))
            .collect()
    }

    pub fn log_level(&self) -> log::LevelFilter {
        if self.debug_logging {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        }
    }
}

/// Directory containing the running launcher binary
fn default_work_dir() -> Result<PathBuf> {
    let exe = std::env::current_exe().context("Failed to locate the launcher binary")?;
    exe.parent()
        .map(Path::to_path_buf)
        .context("Launcher binary has no parent directory")
}
