use hearth_lib::launcher::{UNIX_ARGS_FILE, WINDOWS_ARGS_FILE};

#[derive(Debug, thiserror::Error)]
#[error("Unsupported operating system: {0}")]
pub struct UnsupportedPlatform(pub String);

/// Host family, picked once at startup. Only decides which manifest to read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LauncherVariant {
    Unix,
    Windows,
}

impl LauncherVariant {
    /// Map an `std::env::consts::OS` value to a variant
    pub fn from_os(os: &str) -> Result<Self, UnsupportedPlatform> {
        match os {
            "windows" => Ok(LauncherVariant::Windows),
            "linux" | "macos" | "freebsd" | "netbsd" | "openbsd" | "dragonfly" | "solaris"
            | "illumos" | "android" => Ok(LauncherVariant::Unix),
            other => Err(UnsupportedPlatform(other.to_string())),
        }
    }

    pub fn current() -> Result<Self, UnsupportedPlatform> {
        Self::from_os(std::env::consts::OS)
    }

    pub fn manifest_name(&self) -> &'static str {
        match self {
            LauncherVariant::Unix => UNIX_ARGS_FILE,
            LauncherVariant::Windows => WINDOWS_ARGS_FILE,
        }
    }
}
