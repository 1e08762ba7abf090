use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

/// Runs an external command and returns its trimmed stdout.
///
/// Any failure (missing binary, non-zero exit, timeout) yields `None`. A
/// command that overruns `limit` is killed.
pub async fn run_command(
    program: &str,
    args: &[&str],
    cwd: Option<&Path>,
    limit: Duration,
) -> Option<String> {
    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }

    let output = match timeout(limit, cmd.output()).await {
        Ok(Ok(output)) => output,
        Ok(Err(e)) => {
            debug!("{} {:?} could not run: {}", program, args, e);
            return None;
        }
        Err(_) => {
            debug!("{} {:?} timed out after {:?}", program, args, limit);
            return None;
        }
    };

    if !output.status.success() {
        debug!("{} {:?} exited with {}", program, args, output.status);
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
}
