use std::path::PathBuf;

/// Fatal launch failures. Recoverable conditions (unreadable roots, missing
/// includes, broken stream pumps) are logged where they occur instead.
#[derive(Debug, thiserror::Error)]
pub enum LaunchError {
    #[error("No valid Forge or NeoForge version directories found under {roots:?}")]
    NoCandidates { roots: Vec<PathBuf> },

    #[error("Argument manifest not found: {0:?}")]
    ManifestNotFound(PathBuf),

    #[error("Failed to read argument manifest {path:?}: {source}")]
    ManifestRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Argument manifest includes itself: {0:?}")]
    CyclicInclude(PathBuf),

    #[error("Working directory does not exist or is not a directory: {0:?}")]
    InvalidWorkingDirectory(PathBuf),

    #[error("Launch plan has no program to run")]
    EmptyCommand,

    #[error("Failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to wait for child process: {0}")]
    Wait(#[source] std::io::Error),
}

pub type LaunchResult<T> = Result<T, LaunchError>;
