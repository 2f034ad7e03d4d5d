/// Launch orchestration: discovery -> manifest -> reconciled command line
use crate::launcher::{
    arguments::{reconcile_arguments, InterpreterInvocation},
    discovery::find_latest,
    error::{LaunchError, LaunchResult},
    manifest::{ManifestParser, UNIX_ARGS_FILE},
    process::{launch_with, StdioBridge},
    status::StatusSink,
    types::{LaunchPlan, LoaderKind, LoaderRoot, ProcessResult},
};
use std::path::{Path, PathBuf};

/// Everything needed to turn an installed server directory into a command line
#[derive(Debug, Clone)]
pub struct LaunchRequest {
    /// Server directory; the child runs here and relative includes resolve here
    pub work_dir: PathBuf,

    /// Loader directories to search, in priority order for equal versions
    pub roots: Vec<LoaderRoot>,

    /// Manifest file name inside the winning version directory
    pub manifest_name: String,

    /// Arguments this launcher was invoked with
    pub caller_args: Vec<String>,

    /// Java to run; `None` falls back to `java`
    pub interpreter: Option<InterpreterInvocation>,
}

impl LaunchRequest {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        let work_dir = work_dir.into();
        let roots = default_roots(&work_dir.join("libraries"));
        Self {
            work_dir,
            roots,
            manifest_name: UNIX_ARGS_FILE.to_string(),
            caller_args: Vec::new(),
            interpreter: None,
        }
    }

    pub fn libraries_dir(&self) -> PathBuf {
        self.work_dir.join("libraries")
    }

    pub fn with_roots(mut self, roots: Vec<LoaderRoot>) -> Self {
        self.roots = roots;
        self
    }

    pub fn with_manifest_name(mut self, name: impl Into<String>) -> Self {
        self.manifest_name = name.into();
        self
    }

    pub fn with_caller_args(mut self, args: Vec<String>) -> Self {
        self.caller_args = args;
        self
    }

    pub fn with_interpreter(mut self, interpreter: Option<InterpreterInvocation>) -> Self {
        self.interpreter = interpreter;
        self
    }
}

/// NeoForge and Forge roots below `libraries_dir`
pub fn default_roots(libraries_dir: &Path) -> Vec<LoaderRoot> {
    [LoaderKind::NeoForge, LoaderKind::Forge]
        .into_iter()
        .map(|kind| LoaderRoot::under_libraries(libraries_dir, kind))
        .collect()
}

/// Resolve the newest installed version and build its command line.
///
/// The absolute manifest path is handed to `status` before parsing.
pub fn build_launch_plan(
    request: &LaunchRequest,
    status: &dyn StatusSink,
) -> LaunchResult<LaunchPlan> {
    let latest = find_latest(&request.roots)?;

    let manifest_path = latest.manifest_path(&request.manifest_name);
    if !manifest_path.is_file() {
        log::error!(
            "{} not found in the latest version directory {:?}",
            request.manifest_name,
            latest.path
        );
        return Err(LaunchError::ManifestNotFound(manifest_path));
    }

    let manifest_path = dunce::canonicalize(&manifest_path).unwrap_or(manifest_path);
    status.publish(&manifest_path);

    let tokens = ManifestParser::new(&request.work_dir).parse(&manifest_path)?;
    let arguments = reconcile_arguments(
        &tokens,
        &request.caller_args,
        request.interpreter.as_ref(),
    );
    log::debug!("Reconciled {} arguments", arguments.len());

    Ok(LaunchPlan {
        working_directory: request.work_dir.clone(),
        arguments,
    })
}

/// Build the plan for `request` and run it to completion
pub async fn launch_latest(
    request: &LaunchRequest,
    status: &dyn StatusSink,
    stdio: StdioBridge,
) -> LaunchResult<ProcessResult> {
    let plan = build_launch_plan(request, status)?;
    launch_with(&plan, stdio).await
}
