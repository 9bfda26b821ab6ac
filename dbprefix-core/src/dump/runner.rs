//! Execution of a built [`DumpCommand`].

use super::DumpCommand;
use crate::{Result, error::DbPrefixError};
use std::process::Stdio;
use tokio::process::Command;

/// Runs the dump tool and waits for it to exit.
///
/// Stdout is inherited so a dump to stdout streams through unbuffered.
/// Stderr is captured and drained while waiting; on failure it is returned
/// verbatim in the error, on success it is forwarded as warnings.
///
/// # Errors
/// Returns an I/O error if the tool cannot be started and an export error
/// carrying the exit code and stderr if it exits unsuccessfully.
pub async fn run(command: &DumpCommand) -> Result<()> {
    let program = command.program().display().to_string();
    tracing::debug!(?command, "Running dump tool");

    let mut process = Command::new(command.program());
    process
        .args(command.args())
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    for (name, value) in command.env() {
        process.env(name, value);
    }

    let child = process
        .spawn()
        .map_err(|e| DbPrefixError::io(format!("Failed to start {}", program), e))?;
    let output = child
        .wait_with_output()
        .await
        .map_err(|e| DbPrefixError::io(format!("Failed to wait for {}", program), e))?;

    let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
    if !output.status.success() {
        tracing::error!(code = ?output.status.code(), "{} failed", program);
        return Err(DbPrefixError::Export {
            code: output.status.code(),
            stderr,
        });
    }

    for line in stderr.lines().filter(|line| !line.trim().is_empty()) {
        tracing::warn!("{}: {}", program, line);
    }
    Ok(())
}
