/// Child process launch and standard stream supervision
use crate::launcher::error::{LaunchError, LaunchResult};
use crate::launcher::types::{LaunchPlan, ProcessResult};
use std::process::{ExitStatus, Stdio};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio::process::ChildStdin;

/// Marks lines relayed from the child's stderr
pub const ERROR_LINE_PREFIX: &str = "ERROR: ";

/// How long output pumps may keep draining after the child has exited
const OUTPUT_DRAIN_GRACE: Duration = Duration::from_secs(2);

pub type BoxedReader = Box<dyn AsyncRead + Send + Unpin>;
pub type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Where the child's streams are relayed to and from
pub struct StdioBridge {
    pub input: BoxedReader,
    pub output: BoxedWriter,
    pub error: BoxedWriter,
}

impl StdioBridge {
    pub fn new(input: BoxedReader, output: BoxedWriter, error: BoxedWriter) -> Self {
        Self {
            input,
            output,
            error,
        }
    }

    /// Relay through this process's own stdin / stdout / stderr.
    ///
    /// Reading our stdin can block forever, so a caller using this bridge
    /// should exit the process once [`launch`] returns rather than waiting for
    /// the runtime to wind down.
    pub fn inherit() -> Self {
        Self::new(
            Box::new(tokio::io::stdin()),
            Box::new(tokio::io::stdout()),
            Box::new(tokio::io::stderr()),
        )
    }
}

/// Launch `plan` relaying this process's own standard streams
pub async fn launch(plan: &LaunchPlan) -> LaunchResult<ProcessResult> {
    launch_with(plan, StdioBridge::inherit()).await
}

/// Spawn the child described by `plan` and supervise it until it exits.
///
/// stdout is copied line by line to `stdio.output`, stderr line by line to
/// `stdio.error` with [`ERROR_LINE_PREFIX`], and `stdio.input` is copied to
/// the child's stdin by a detached task that is never awaited. A failing pump
/// is logged and stops on its own without touching the child.
pub async fn launch_with(plan: &LaunchPlan, stdio: StdioBridge) -> LaunchResult<ProcessResult> {
    let program = plan.program().ok_or(LaunchError::EmptyCommand)?;

    if !plan.working_directory.is_dir() {
        log::error!(
            "Working directory is missing or not a directory: {:?}",
            plan.working_directory
        );
        return Err(LaunchError::InvalidWorkingDirectory(
            plan.working_directory.clone(),
        ));
    }

    let full_cmd_str = plan
        .arguments
        .iter()
        .map(|a| quote_arg_internal(a))
        .collect::<Vec<_>>()
        .join(" ");
    log::info!("Exec command: {}", full_cmd_str);
    log::debug!("Working directory: {:?}", plan.working_directory);

    let mut command = tokio::process::Command::new(program);
    command
        .args(plan.args())
        .current_dir(&plan.working_directory)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    let mut child = command.spawn().map_err(|source| {
        log::error!("Failed to start {}: {}", program, source);
        LaunchError::Spawn {
            program: program.to_string(),
            source,
        }
    })?;

    match child.id() {
        Some(pid) => log::info!("Server process started with PID: {}", pid),
        None => log::info!("Server process started"),
    }

    let StdioBridge {
        input,
        output,
        error,
    } = stdio;

    let stdout_pump = child
        .stdout
        .take()
        .map(|stdout| tokio::spawn(pump_lines(stdout, output, "", "stdout")));
    let stderr_pump = child
        .stderr
        .take()
        .map(|stderr| tokio::spawn(pump_lines(stderr, error, ERROR_LINE_PREFIX, "stderr")));
    if let Some(stdin) = child.stdin.take() {
        // Detached
        tokio::spawn(pump_input(input, stdin));
    }

    let status = child.wait().await.map_err(|e| {
        log::error!("Failed to wait for server process: {}", e);
        LaunchError::Wait(e)
    })?;

    for pump in [stdout_pump, stderr_pump].into_iter().flatten() {
        match tokio::time::timeout(OUTPUT_DRAIN_GRACE, pump).await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => log::warn!("Output relay task failed: {}", e),
            Err(_) => log::warn!("Output relay still busy after the process exited, abandoning it"),
        }
    }

    let exit_code = exit_code(status);
    if exit_code == 0 {
        log::info!("Process exited with code: {}", exit_code);
    } else {
        log::error!("Process exited with code: {}", exit_code);
    }

    Ok(ProcessResult { exit_code })
}

/// Copy `source` to `sink` one line at a time, prepending `prefix`.
///
/// If `sink` fails, relaying stops but the child's stream keeps being drained
/// so the child never writes into a closed pipe.
async fn pump_lines<R>(source: R, sink: BoxedWriter, prefix: &'static str, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    let mut segments = tokio::io::BufReader::new(source).split(b'\n');
    let mut sink = Some(sink);

    loop {
        let line = match segments.next_segment().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::warn!("Failed to read child {}: {}", stream, e);
                break;
            }
        };

        let Some(writer) = sink.as_mut() else {
            continue;
        };

        let mut buf = Vec::with_capacity(prefix.len() + line.len() + 1);
        buf.extend_from_slice(prefix.as_bytes());
        buf.extend_from_slice(&line);
        buf.push(b'\n');

        if let Err(e) = write_flushed(writer, &buf).await {
            log::warn!(
                "Failed to relay child {}: {}; discarding the rest of it",
                stream,
                e
            );
            sink = None;
        }
    }

    log::debug!("Child {} relay finished", stream);
}

async fn write_flushed(sink: &mut BoxedWriter, buf: &[u8]) -> std::io::Result<()> {
    sink.write_all(buf).await?;
    sink.flush().await
}

/// Copy our input to the child's stdin until end of input, then close it
async fn pump_input(mut input: BoxedReader, mut stdin: ChildStdin) {
    match tokio::io::copy(&mut input, &mut stdin).await {
        Ok(bytes) => log::debug!("Input relay finished after {} bytes", bytes),
        Err(e) => log::warn!("Failed to relay input to child: {}", e),
    }
}

fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            log::warn!("Process terminated by signal {}", signal);
            return 128 + signal;
        }
    }

    1
}

/// Internal quoting helper used for logs / shell-copy; kept separate so it can be
/// unit-tested where needed.
pub(crate) fn quote_arg_internal(s: &str) -> String {
    if s.is_empty() {
        return "\"\"".to_string();
    }
    // Add quotes if whitespace or double-quote present; escape backslashes and double quotes
    if s.chars().any(|c| c.is_whitespace() || c == '"') {
        let esc = s.replace('\\', "\\\\").replace('"', "\\\"");
        return format!("\"{}\"", esc);
    }
    s.to_string()
}
