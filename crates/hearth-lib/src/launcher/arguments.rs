/// Argument reconciliation: interpreter flags + caller arguments + manifest
use std::path::{Path, PathBuf};

/// Program used when no interpreter could be resolved
pub const FALLBACK_INTERPRETER: &str = "java";

/// The interpreter to run and the options it should start with
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InterpreterInvocation {
    pub executable: String,
    pub flags: Vec<String>,
}

impl InterpreterInvocation {
    pub fn new(executable: impl Into<String>) -> Self {
        Self {
            executable: executable.into(),
            flags: Vec::new(),
        }
    }

    pub fn with_flags(mut self, flags: impl IntoIterator<Item = String>) -> Self {
        self.flags.extend(flags);
        self
    }

    /// Append options written as one shell-style string, e.g. `-Xmx4G "-Dname=a b"`.
    ///
    /// Returns `None` when the string cannot be split (unbalanced quotes).
    pub fn with_flag_string(self, flags: &str) -> Option<Self> {
        let parsed = shlex::split(flags)?;
        Some(self.with_flags(parsed))
    }

    /// Take the interpreter half of a full command line.
    ///
    /// `argv[0]` is the executable; the options are the dash-prefixed tokens
    /// that follow it, stopping at `-jar` or the first token that is not an
    /// option (the program entry point).
    pub fn from_command_line<S: AsRef<str>>(argv: &[S]) -> Option<Self> {
        let (executable, rest) = argv.split_first()?;
        let flags = rest
            .iter()
            .map(|arg| arg.as_ref())
            .take_while(|arg: &&str| arg.starts_with('-') && *arg != "-jar")
            .map(str::to_string)
            .collect();

        Some(Self {
            executable: executable.as_ref().to_string(),
            flags,
        })
    }
}

/// Whether `arg` asks the server to run without its console UI
pub fn is_headless_flag(arg: &str) -> bool {
    let lower = arg.to_ascii_lowercase();
    matches!(lower.as_str(), "nogui" | "-nogui" | "--nogui")
}

/// Merge every argument source into the final command line.
///
/// Order: interpreter and its flags, then caller arguments with the
/// `-jar <path>` pair removed, then the manifest, then any headless flags the
/// caller passed. The manifest already carries the loader's own entry point,
/// so the caller's jar would be redundant.
pub fn reconcile_arguments(
    manifest: &[String],
    caller: &[String],
    interpreter: Option<&InterpreterInvocation>,
) -> Vec<String> {
    let mut args = Vec::with_capacity(1 + manifest.len() + caller.len());

    match interpreter {
        Some(invocation) => {
            args.push(invocation.executable.clone());
            args.extend(invocation.flags.iter().cloned());
        }
        None => args.push(FALLBACK_INTERPRETER.to_string()),
    }

    let mut headless = Vec::new();
    let mut caller_args = caller.iter();
    while let Some(arg) = caller_args.next() {
        if arg == "-jar" {
            match caller_args.next() {
                Some(jar) => log::debug!("Dropping caller jar {}", jar),
                None => log::debug!("Dropping trailing -jar"),
            }
            continue;
        }
        if is_headless_flag(arg) {
            headless.push(arg.clone());
            continue;
        }
        args.push(arg.clone());
    }

    args.extend(manifest.iter().cloned());
    args.extend(headless);
    args
}

/// Find the Java executable to launch with.
///
/// An explicitly configured path wins, then `$JAVA_HOME/bin/java`, then `java`
/// on the `PATH`.
pub fn resolve_interpreter(configured: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = configured {
        log::debug!("Using configured Java: {:?}", path);
        return Some(path.to_path_buf());
    }

    let executable_name = if cfg!(windows) { "java.exe" } else { "java" };

    if let Some(home) = std::env::var_os("JAVA_HOME") {
        let candidate = Path::new(&home).join("bin").join(executable_name);
        if candidate.is_file() {
            log::debug!("Using Java from JAVA_HOME: {:?}", candidate);
            return Some(candidate);
        }
        log::warn!("JAVA_HOME is set but {:?} does not exist", candidate);
    }

    match which::which("java") {
        Ok(path) => {
            log::debug!("Using Java from PATH: {:?}", path);
            Some(path)
        }
        Err(e) => {
            log::warn!("Could not find java on PATH: {}", e);
            None
        }
    }
}
