//! Subprocess execution of the external tool
//!
//! Runs an [`Invocation`] to completion and classifies what came back.
//! No timeout is applied; the tool is expected to terminate on its own.

use std::future::Future;
use std::process::Stdio;

use tokio::process::Command;
use tracing::debug;

use super::{CitError, Invocation, Outcome};

/// Captured result of a finished subprocess
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    /// A zero exit with the given output streams
    pub fn ok(stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(0),
            success: true,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    /// A non-zero exit with the given output streams
    pub fn failed(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(code),
            success: false,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }
}

/// Something that can run the external tool
pub trait ToolRunner: Send + Sync {
    fn run(
        &self,
        invocation: &Invocation,
    ) -> impl Future<Output = Result<ToolOutput, CitError>> + Send;
}

/// Runs invocations as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ToolRunner for ProcessRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ToolOutput, CitError> {
        debug!(command = %invocation.command_line(), cwd = %invocation.cwd.display(), "spawning");

        let output = Command::new(&invocation.program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|source| CitError::Launch {
                command: invocation.command_line(),
                source,
            })?;

        Ok(ToolOutput {
            exit_code: output.status.code(),
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Map a finished subprocess to its terminal outcome
///
/// A non-empty error stream is a failure even when the exit code is zero.
pub fn classify(invocation: &Invocation, output: ToolOutput) -> Outcome {
    if !output.success {
        let status = match output.exit_code {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        };
        let mut message = format!("Command failed: {} ({status})", invocation.command_line());
        if !output.stderr.is_empty() {
            message.push('\n');
            message.push_str(&output.stderr);
        }
        return Outcome::Failed(message);
    }

    if !output.stderr.is_empty() {
        return Outcome::Failed(output.stderr);
    }

    Outcome::Succeeded(output.stdout)
}
