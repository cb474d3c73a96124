//! Helpers for running child processes with live, captured stdout.

use std::io::{Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;

use anyhow::{Context, Result, anyhow};
use tracing::{debug, error, instrument, warn};

/// Captured child process output.
#[derive(Debug)]
pub struct TeeOutput {
    pub status: ExitStatus,
    /// Every byte the child wrote to stdout, in order.
    pub stdout: Vec<u8>,
}

/// Run a command with stdin/stderr inherited and stdout tee'd.
///
/// Stdout is read on a helper thread that forwards each chunk to the parent's
/// stdout as it arrives and also keeps it. The thread is joined after the child
/// exits. There is no timeout: a child that never exits blocks the caller.
#[instrument(skip_all)]
pub fn run_command_tee(mut cmd: Command) -> Result<TeeOutput> {
    cmd.stdin(Stdio::inherit())
        .stdout(Stdio::piped())
        .stderr(Stdio::inherit());

    let program = cmd.get_program().to_string_lossy().into_owned();
    debug!(%program, "spawning child process");
    let mut child = match cmd.spawn() {
        Ok(c) => c,
        Err(e) => {
            error!(err = %e, %program, "failed to spawn command");
            return Err(e).context(format!("Failed to start {program}"));
        }
    };

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| anyhow!("stdout was not piped"))?;

    let stdout_handle = thread::spawn(move || tee_stream(stdout, std::io::stdout()));

    let status = child
        .wait()
        .with_context(|| format!("wait for {program}"))?;
    let stdout = match stdout_handle.join() {
        Ok(result) => result.context("join stdout")?,
        Err(_) => return Err(anyhow!("output reader thread panicked")),
    };

    debug!(exit_code = ?status.code(), bytes = stdout.len(), "command finished");
    Ok(TeeOutput { status, stdout })
}

/// Copy `reader` into `sink` chunk by chunk, returning everything copied.
///
/// Sink write failures (e.g. a closed terminal) are logged and ignored so the
/// child's pipe keeps draining and the capture stays complete.
pub fn tee_stream<R: Read, W: Write>(mut reader: R, mut sink: W) -> Result<Vec<u8>> {
    let mut collected = Vec::new();
    let mut chunk = [0u8; 8192];
    let mut sink_ok = true;

    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e).context("read output"),
        };
        collected.extend_from_slice(&chunk[..n]);

        if sink_ok {
            // Flush per chunk so a human watching sees output live.
            if let Err(e) = sink.write_all(&chunk[..n]).and_then(|()| sink.flush()) {
                warn!(err = %e, "failed to mirror child output");
                sink_ok = false;
            }
        }
    }

    Ok(collected)
}
