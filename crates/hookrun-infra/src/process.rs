//! Tokio-backed command runner.
//!
//! Spawns the script file directly (it must be executable) with both
//! output streams piped. Each stream is pumped by its own task into one
//! channel, so the handle yields stdout and stderr lines interleaved the
//! way they were produced.

use std::io;
use std::path::Path;
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;

use hookrun_core::runner::{CommandRunner, ProcessHandle};

/// [`CommandRunner`] backed by `tokio::process::Command`.
#[derive(Debug, Clone, Default)]
pub struct TokioCommandRunner;

impl TokioCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for TokioCommandRunner {
    type Handle = TokioProcessHandle;

    async fn spawn(
        &self,
        script: &Path,
        args: &[String],
        cwd: &Path,
    ) -> io::Result<TokioProcessHandle> {
        let mut child = Command::new(script)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(stdout) = child.stdout.take() {
            forward_lines(stdout, tx.clone());
        }
        if let Some(stderr) = child.stderr.take() {
            forward_lines(stderr, tx.clone());
        }
        // Drop the original sender so the channel closes once both pump
        // tasks finish.
        drop(tx);

        Ok(TokioProcessHandle { child, lines: rx })
    }
}

/// Pump one output stream into the merged line channel from its own task.
fn forward_lines<R>(stream: R, tx: mpsc::UnboundedSender<io::Result<String>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        let mut lines = BufReader::new(stream).lines();
        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    if tx.send(Ok(line)).is_err() {
                        break;
                    }
                }
                Ok(None) => break,
                Err(err) => {
                    let _ = tx.send(Err(err));
                    break;
                }
            }
        }
    });
}

/// Handle to a spawned script with its merged output line stream.
pub struct TokioProcessHandle {
    child: Child,
    lines: mpsc::UnboundedReceiver<io::Result<String>>,
}

impl ProcessHandle for TokioProcessHandle {
    async fn next_line(&mut self) -> io::Result<Option<String>> {
        match self.lines.recv().await {
            Some(Ok(line)) => Ok(Some(line)),
            Some(Err(err)) => Err(err),
            None => Ok(None),
        }
    }

    async fn wait(&mut self) -> io::Result<Option<i32>> {
        let status = self.child.wait().await?;
        Ok(status.code())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
#[cfg(unix)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::PathBuf;

    fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, body).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    async fn collect_lines(handle: &mut TokioProcessHandle) -> Vec<String> {
        let mut lines = Vec::new();
        while let Some(line) = handle.next_line().await.unwrap() {
            lines.push(line);
        }
        lines
    }

    #[tokio::test]
    async fn streams_stdout_and_stderr_lines() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(
            dir.path(),
            "demo.sh",
            "#!/bin/sh\necho out-line\necho err-line >&2\n",
        );

        let runner = TokioCommandRunner::new();
        let mut handle = runner.spawn(&script, &[], dir.path()).await.unwrap();

        let lines = collect_lines(&mut handle).await;
        assert!(lines.contains(&"out-line".to_string()), "got {lines:?}");
        assert!(lines.contains(&"err-line".to_string()), "got {lines:?}");

        assert_eq!(handle.wait().await.unwrap(), Some(0));
    }

    #[tokio::test]
    async fn passes_project_name_as_first_argument() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "demo.sh", "#!/bin/sh\necho \"arg:$1\"\n");

        let runner = TokioCommandRunner::new();
        let args = ["demo".to_string()];
        let mut handle = runner.spawn(&script, &args, dir.path()).await.unwrap();

        assert_eq!(collect_lines(&mut handle).await, vec!["arg:demo"]);
    }

    #[tokio::test]
    async fn runs_with_requested_working_directory() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "demo.sh", "#!/bin/sh\npwd\n");

        let runner = TokioCommandRunner::new();
        let mut handle = runner.spawn(&script, &[], dir.path()).await.unwrap();

        let lines = collect_lines(&mut handle).await;
        let expected = std::fs::canonicalize(dir.path()).unwrap();
        assert_eq!(lines, vec![expected.to_string_lossy().to_string()]);
    }

    #[tokio::test]
    async fn propagates_nonzero_exit_code() {
        let dir = tempfile::tempdir().unwrap();
        let script = write_script(dir.path(), "demo.sh", "#!/bin/sh\nexit 3\n");

        let runner = TokioCommandRunner::new();
        let mut handle = runner.spawn(&script, &[], dir.path()).await.unwrap();

        assert!(collect_lines(&mut handle).await.is_empty());
        assert_eq!(handle.wait().await.unwrap(), Some(3));
    }

    #[tokio::test]
    async fn spawning_a_missing_script_errors() {
        let dir = tempfile::tempdir().unwrap();
        let runner = TokioCommandRunner::new();

        let result = runner
            .spawn(&dir.path().join("missing.sh"), &[], dir.path())
            .await;
        assert!(result.is_err());
    }
}
