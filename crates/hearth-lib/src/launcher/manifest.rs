/// Argument manifest (`unix_args.txt` / `win_args.txt`) parsing
use crate::launcher::error::{LaunchError, LaunchResult};
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// A quoted run (quotes dropped, contents literal) or a run of
/// non-whitespace, non-quote characters.
static TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""([^"]*)"|([^\s"]+)"#).expect("token pattern is valid"));

/// Default manifest name for Unix-like hosts
pub const UNIX_ARGS_FILE: &str = "unix_args.txt";
/// Default manifest name for Windows hosts
pub const WINDOWS_ARGS_FILE: &str = "win_args.txt";

/// Split one manifest line into tokens, left to right.
///
/// Lines starting with `#` are comments, as in JVM argument files.
pub fn tokenize_line(line: &str) -> Vec<String> {
    if line.trim_start().starts_with('#') {
        return Vec::new();
    }

    TOKEN
        .captures_iter(line)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str().to_string())
        .collect()
}

/// Reads manifests and expands `@file` includes in place.
///
/// Relative include paths are looked up against `base_dir` (the server
/// directory the JVM would run in) and then against the including file's
/// directory.
#[derive(Debug, Clone)]
pub struct ManifestParser {
    base_dir: PathBuf,
}

impl ManifestParser {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Parse `path` into a flat list of tokens.
    ///
    /// A missing top-level file is fatal; a missing include only logs a warning
    /// and contributes nothing. A file that includes itself, directly or through
    /// other files, fails with [`LaunchError::CyclicInclude`].
    pub fn parse(&self, path: &Path) -> LaunchResult<Vec<String>> {
        if !path.is_file() {
            log::error!("Argument manifest not found: {:?}", path);
            return Err(LaunchError::ManifestNotFound(path.to_path_buf()));
        }

        log::debug!("Parsing argument manifest {:?}", path);
        let mut chain = HashSet::new();
        let mut tokens = Vec::new();
        self.parse_into(path, &mut chain, &mut tokens)?;
        log::debug!("Manifest {:?} produced {} tokens", path, tokens.len());
        Ok(tokens)
    }

    fn parse_into(
        &self,
        path: &Path,
        chain: &mut HashSet<PathBuf>,
        out: &mut Vec<String>,
    ) -> LaunchResult<()> {
        let key = dunce::canonicalize(path).unwrap_or_else(|_| path.to_path_buf());
        if chain.contains(&key) {
            log::error!("Argument manifest {:?} includes itself", path);
            return Err(LaunchError::CyclicInclude(key));
        }

        let content = std::fs::read_to_string(path).map_err(|source| LaunchError::ManifestRead {
            path: path.to_path_buf(),
            source,
        })?;
        chain.insert(key.clone());

        for line in content.lines() {
            for token in tokenize_line(line) {
                match token.strip_prefix('@') {
                    Some(include) => self.include(path, include, chain, out)?,
                    None => out.push(token),
                }
            }
        }

        chain.remove(&key);
        Ok(())
    }

    fn include(
        &self,
        parent: &Path,
        include: &str,
        chain: &mut HashSet<PathBuf>,
        out: &mut Vec<String>,
    ) -> LaunchResult<()> {
        let Some(resolved) = self.resolve_include(parent, include) else {
            log::warn!(
                "Included argument file @{} not found (referenced from {:?}), skipping",
                include,
                parent
            );
            return Ok(());
        };

        log::debug!("Expanding @{} from {:?}", include, resolved);
        match self.parse_into(&resolved, chain, out) {
            Err(LaunchError::ManifestRead { path, source }) => {
                log::warn!("Failed to read included argument file {:?}: {}", path, source);
                Ok(())
            }
            other => other,
        }
    }

    fn resolve_include(&self, parent: &Path, include: &str) -> Option<PathBuf> {
        let candidate = Path::new(include);
        if candidate.is_absolute() {
            return candidate.is_file().then(|| candidate.to_path_buf());
        }

        let from_base = self.base_dir.join(candidate);
        if from_base.is_file() {
            return Some(from_base);
        }

        parent
            .parent()
            .map(|dir| dir.join(candidate))
            .filter(|p| p.is_file())
    }
}
