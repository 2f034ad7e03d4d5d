/// Core types for server launching
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Which naming convention a version directory follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoaderKind {
    Forge,
    NeoForge,
}

impl LoaderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LoaderKind::Forge => "forge",
            LoaderKind::NeoForge => "neoforge",
        }
    }

    /// Map a library directory name (`forge`, `neoforge`) to its loader kind
    pub fn from_dir_name(name: &str) -> Option<Self> {
        match name {
            "forge" => Some(LoaderKind::Forge),
            "neoforge" => Some(LoaderKind::NeoForge),
            _ => None,
        }
    }

    /// Path of this loader's version directories below a `libraries` folder
    pub fn library_path(&self) -> PathBuf {
        match self {
            LoaderKind::Forge => ["net", "minecraftforge", "forge"].iter().collect(),
            LoaderKind::NeoForge => ["net", "neoforged", "neoforge"].iter().collect(),
        }
    }
}

impl std::fmt::Display for LoaderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for LoaderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_dir_name(&s.to_lowercase()).ok_or_else(|| format!("Unknown loader: {}", s))
    }
}

/// A directory expected to hold version subdirectories of one loader
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderRoot {
    pub path: PathBuf,
    pub kind: LoaderKind,
}

impl LoaderRoot {
    pub fn new(path: impl Into<PathBuf>, kind: LoaderKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }

    /// The standard root for `kind` inside a server's `libraries` directory
    pub fn under_libraries(libraries_dir: &Path, kind: LoaderKind) -> Self {
        Self::new(libraries_dir.join(kind.library_path()), kind)
    }
}

/// An installed version directory that passed the naming grammar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionCandidate {
    pub path: PathBuf,
    pub kind: LoaderKind,
    pub name: String,
}

impl VersionCandidate {
    /// Path of the argument manifest inside this version directory
    pub fn manifest_path(&self, file_name: &str) -> PathBuf {
        self.path.join(file_name)
    }
}

/// The fully reconciled command line and where to run it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchPlan {
    pub working_directory: PathBuf,

    /// Program first, then its arguments
    pub arguments: Vec<String>,
}

impl LaunchPlan {
    pub fn program(&self) -> Option<&str> {
        self.arguments.first().map(String::as_str)
    }

    pub fn args(&self) -> &[String] {
        self.arguments.get(1..).unwrap_or(&[])
    }
}

/// Outcome of a supervised child process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessResult {
    pub exit_code: i32,
}

impl ProcessResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loader_kind_names() {
        assert_eq!(LoaderKind::from_dir_name("forge"), Some(LoaderKind::Forge));
        assert_eq!(LoaderKind::from_dir_name("neoforge"), Some(LoaderKind::NeoForge));
        assert_eq!(LoaderKind::from_dir_name("fabric"), None);
        assert_eq!("NeoForge".parse::<LoaderKind>(), Ok(LoaderKind::NeoForge));
        assert!("quilt".parse::<LoaderKind>().is_err());

        let json = serde_json::to_string(&LoaderKind::NeoForge).unwrap();
        assert_eq!(json, "\"neoforge\"");
    }

    #[test]
    fn standard_roots() {
        let root = LoaderRoot::under_libraries(Path::new("libraries"), LoaderKind::Forge);
        assert_eq!(root.path, Path::new("libraries/net/minecraftforge/forge"));
        assert_eq!(root.path.file_name().unwrap(), "forge");
    }

    #[test]
    fn plan_splits_program_and_args() {
        let plan = LaunchPlan {
            working_directory: PathBuf::from("."),
            arguments: vec!["java".into(), "-Xmx2G".into(), "nogui".into()],
        };
        assert_eq!(plan.program(), Some("java"));
        assert_eq!(plan.args(), &["-Xmx2G".to_string(), "nogui".to_string()]);

        let empty = LaunchPlan {
            working_directory: PathBuf::from("."),
            arguments: vec![],
        };
        assert_eq!(empty.program(), None);
        assert!(empty.args().is_empty());
    }
}
