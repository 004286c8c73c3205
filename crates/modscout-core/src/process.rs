//! Bounded execution of ecosystem toolchains (`node`, `python3`, `go`).

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use crate::error::{Result, ScoutError};

/// Default upper bound on a single external tool invocation.
pub const DEFAULT_PROCESS_TIMEOUT: Duration = Duration::from_secs(10);

/// Runs `program` with `args` in `cwd` and returns its trimmed stdout.
///
/// The child is killed when the timeout elapses. A non-zero exit status, a
/// spawn failure and a timeout all map to [`ScoutError::ExternalTool`].
pub async fn run_tool(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Result<String> {
    tracing::debug!(program, ?args, "running external tool");

    let mut command = tokio::process::Command::new(program);
    command
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        command.current_dir(dir);
    }

    let child = command
        .spawn()
        .map_err(|e| ScoutError::external_tool(program, format!("failed to spawn: {e}")))?;

    let output = match tokio::time::timeout(timeout, child.wait_with_output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            return Err(ScoutError::external_tool(program, format!("wait failed: {e}")));
        }
        Err(_) => {
            return Err(ScoutError::external_tool(
                program,
                format!("timed out after {}s", timeout.as_secs_f32()),
            ));
        }
    };

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ScoutError::external_tool(
            program,
            format!(
                "exited with {}: {}",
                output.status.code().unwrap_or(-1),
                stderr.trim()
            ),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Like [`run_tool`] but logs the failure and yields `None`.
pub async fn run_tool_lenient(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    timeout: Duration,
) -> Option<String> {
    match run_tool(program, args, cwd, timeout).await {
        Ok(stdout) if !stdout.is_empty() => Some(stdout),
        Ok(_) => None,
        Err(e) => {
            tracing::debug!("{e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_program_is_external_tool_error() {
        let result = run_tool(
            "modscout-definitely-missing-binary",
            &[],
            None,
            Duration::from_secs(1),
        )
        .await;
        assert!(matches!(result, Err(ScoutError::ExternalTool { .. })));
    }

    #[tokio::test]
    async fn test_lenient_swallows_failure() {
        let out = run_tool_lenient(
            "modscout-definitely-missing-binary",
            &["--version"],
            None,
            Duration::from_secs(1),
        )
        .await;
        assert!(out.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout() {
        let out = run_tool("sh", &["-c", "echo hello"], None, Duration::from_secs(5))
            .await
            .unwrap();
        assert_eq!(out, "hello");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_non_zero_exit() {
        let result = run_tool("sh", &["-c", "exit 3"], None, Duration::from_secs(5)).await;
        let err = result.unwrap_err();
        assert!(err.to_string().contains("exited with 3"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout() {
        let result = run_tool("sh", &["-c", "sleep 5"], None, Duration::from_millis(100)).await;
        assert!(result.unwrap_err().to_string().contains("timed out"));
    }
}
