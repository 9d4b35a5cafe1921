use std::ffi::OsStr;
use std::io::{Read, Write};
use std::process::{Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use crate::error::AlignmentError;

const POLL_INTERVAL: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub struct ToolOutput {
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

/// Runs `command` with `input` on stdin and waits at most `timeout` for it.
///
/// The child is killed on timeout. A missing binary is reported as `NotFound`;
/// the exit status is returned as-is so callers decide what a failure means.
pub fn run_tool<I, S>(
    command: &str,
    args: I,
    input: &str,
    timeout: Duration,
) -> Result<ToolOutput, AlignmentError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    let mut child = Command::new(command)
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AlignmentError::not_found("tool binary", command)
            } else {
                AlignmentError::tool_failure(command, e)
            }
        })?;

    let mut stdin = child
        .stdin
        .take()
        .ok_or_else(|| AlignmentError::tool_failure(command, "stdin was not captured"))?;
    let mut stdout = child
        .stdout
        .take()
        .ok_or_else(|| AlignmentError::tool_failure(command, "stdout was not captured"))?;
    let mut stderr = child
        .stderr
        .take()
        .ok_or_else(|| AlignmentError::tool_failure(command, "stderr was not captured"))?;

    // Feed stdin and drain the pipes on helper threads so a chatty child cannot block.
    let payload = input.as_bytes().to_vec();
    let writer = thread::spawn(move || stdin.write_all(&payload));
    let stdout_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        stdout.read_to_end(&mut buf).map(|_| buf)
    });
    let stderr_reader = thread::spawn(move || {
        let mut buf = Vec::new();
        stderr.read_to_end(&mut buf).map(|_| buf)
    });

    let deadline = Instant::now() + timeout;
    let status = loop {
        match child.try_wait() {
            Ok(Some(status)) => break status,
            Ok(None) if Instant::now() >= deadline => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(AlignmentError::tool_failure(
                    command,
                    format!("timed out after {:.1}s", timeout.as_secs_f64()),
                ));
            }
            Ok(None) => thread::sleep(POLL_INTERVAL),
            Err(e) => return Err(AlignmentError::tool_failure(command, e)),
        }
    };

    if let Ok(Err(e)) = writer.join() {
        // A child that exits without reading all of stdin closes the pipe early.
        if e.kind() != std::io::ErrorKind::BrokenPipe {
            return Err(AlignmentError::tool_failure(command, e));
        }
    }
    let stdout = join_reader(command, stdout_reader)?;
    let stderr = join_reader(command, stderr_reader)?;

    Ok(ToolOutput {
        status,
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
    })
}

fn join_reader(
    command: &str,
    handle: thread::JoinHandle<std::io::Result<Vec<u8>>>,
) -> Result<Vec<u8>, AlignmentError> {
    handle
        .join()
        .map_err(|_| AlignmentError::tool_failure(command, "output reader panicked"))?
        .map_err(|e| AlignmentError::tool_failure(command, e))
}
