pub mod arguments;
pub mod discovery;
pub mod error;
pub mod manifest;
/// Server launcher: finds the newest Forge / NeoForge install and runs it
pub mod plan;
pub mod process;
pub mod status;
pub mod types;

// Re-export commonly used types
pub use arguments::{reconcile_arguments, resolve_interpreter, InterpreterInvocation};
pub use discovery::{find_latest, pick_latest, scan, scan_all};
pub use error::{LaunchError, LaunchResult};
pub use manifest::{ManifestParser, UNIX_ARGS_FILE, WINDOWS_ARGS_FILE};
pub use plan::{build_launch_plan, default_roots, launch_latest, LaunchRequest};
pub use process::{launch, launch_with, StdioBridge};
pub use status::{FileStatusSink, NoopStatusSink, StatusSink};
pub use types::{LaunchPlan, LoaderKind, LoaderRoot, ProcessResult, VersionCandidate};
