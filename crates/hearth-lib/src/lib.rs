pub mod launcher;
pub mod utils;

// Re-export commonly used types
pub use launcher::{
    build_launch_plan, launch, launch_latest, LaunchError, LaunchPlan, LaunchRequest,
    LaunchResult, LoaderKind, ProcessResult,
};
pub use utils::version::VersionKey;
