mod config;
mod platform;

use anyhow::{Context, Result};
use config::LauncherConfig;
use hearth_lib::launcher::{
    arguments::FALLBACK_INTERPRETER, launch_latest, resolve_interpreter, FileStatusSink,
    InterpreterInvocation, LaunchError, LaunchRequest, StdioBridge,
};
use platform::LauncherVariant;

/// Exit code when the launcher fails before the server could be started
const LAUNCHER_FAILURE_EXIT_CODE: i32 = 125;
/// Program exists but could not be executed
const NOT_EXECUTABLE_EXIT_CODE: i32 = 126;
/// Program not found
const NOT_FOUND_EXIT_CODE: i32 = 127;

fn main() {
    std::panic::set_hook(Box::new(|e| {
        eprintln!("Hearth launcher closed unexpectedly: {e:?}");
    }));

    let _ = dotenvy::dotenv();

    let config = match LauncherConfig::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load launcher configuration: {:#}", e);
            std::process::exit(LAUNCHER_FAILURE_EXIT_CODE);
        }
    };

    // Logs go to stderr so the relayed server output on stdout stays clean
    env_logger::Builder::new()
        .filter_level(config.log_level())
        .parse_default_env()
        .target(env_logger::Target::Stderr)
        .init();

    let code = match run(&config) {
        Ok(code) => code,
        Err(e) => {
            log::error!("{:#}", e);
            failure_exit_code(&e)
        }
    };

    std::process::exit(code);
}

fn run(config: &LauncherConfig) -> Result<i32> {
    let variant = LauncherVariant::current()?;
    log::debug!("Launcher variant: {:?}", variant);

    let work_dir = config.work_dir()?;
    log::info!("Server directory: {:?}", work_dir);

    let executable = resolve_interpreter(config.java_path.as_deref())
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| FALLBACK_INTERPRETER.to_string());
    let interpreter = InterpreterInvocation::new(executable).with_flags(config.jvm_args.clone());

    let caller_args: Vec<String> = std::env::args_os()
        .skip(1)
        .map(|a| a.to_string_lossy().to_string())
        .collect();

    let request = LaunchRequest::new(&work_dir)
        .with_roots(config.roots(&work_dir))
        .with_manifest_name(variant.manifest_name())
        .with_caller_args(caller_args)
        .with_interpreter(Some(interpreter));
    let status = FileStatusSink::new(config.status_file(&work_dir));

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    let result = runtime.block_on(launch_latest(&request, &status, StdioBridge::inherit()));

    // The stdin relay may still be parked on a terminal read; don't wait for it
    runtime.shutdown_background();

    Ok(result?.exit_code)
}

fn failure_exit_code(error: &anyhow::Error) -> i32 {
    match error.downcast_ref::<LaunchError>() {
        Some(LaunchError::Spawn { source, .. }) => match source.kind() {
            std::io::ErrorKind::NotFound => NOT_FOUND_EXIT_CODE,
            std::io::ErrorKind::PermissionDenied => NOT_EXECUTABLE_EXIT_CODE,
            _ => LAUNCHER_FAILURE_EXIT_CODE,
        },
        _ => LAUNCHER_FAILURE_EXIT_CODE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes_for_launcher_failures() {
        let not_found = anyhow::Error::new(LaunchError::Spawn {
            program: "java".into(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        });
        assert_eq!(failure_exit_code(&not_found), NOT_FOUND_EXIT_CODE);

        let denied = anyhow::Error::new(LaunchError::Spawn {
            program: "java".into(),
            source: std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        });
        assert_eq!(failure_exit_code(&denied), NOT_EXECUTABLE_EXIT_CODE);

        let none = anyhow::Error::new(LaunchError::NoCandidates { roots: vec![] });
        assert_eq!(failure_exit_code(&none), LAUNCHER_FAILURE_EXIT_CODE);

        let other = anyhow::anyhow!("config broke");
        assert_eq!(failure_exit_code(&other), LAUNCHER_FAILURE_EXIT_CODE);
    }
}
