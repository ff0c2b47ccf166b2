//! Script dispatch and background execution logging.
//!
//! [`ScriptDispatcher`] resolves a project name to `{project}.sh` under the
//! scripts directory and launches it as a detached tokio task. Dispatch is
//! fire-and-forget: the caller gets `Ok` as soon as the task is spawned,
//! and everything that happens afterwards -- output lines, the exit code,
//! spawn failures -- is reported through the injected [`OutputSink`].

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use hookrun_types::error::DispatchError;

use crate::runner::{CommandRunner, ProcessHandle};

// ---------------------------------------------------------------------------
// Output sink
// ---------------------------------------------------------------------------

/// Observer for the lifecycle of one script invocation.
///
/// The production implementation forwards to `tracing`; tests substitute a
/// recording sink.
pub trait OutputSink: Send + Sync + 'static {
    /// The script process is about to be spawned.
    fn started(&self, project: &str, script: &Path);

    /// One line of merged stdout/stderr.
    fn line(&self, project: &str, line: &str);

    /// The process exited; `code` is `None` when killed by a signal.
    fn exited(&self, project: &str, code: Option<i32>);

    /// Spawning or reading the process failed.
    fn failed(&self, project: &str, error: &io::Error);
}

/// [`OutputSink`] that forwards every event to the tracing log, tagged
/// with the project name.
#[derive(Debug, Clone, Default)]
pub struct TracingSink;

impl OutputSink for TracingSink {
    fn started(&self, project: &str, script: &Path) {
        tracing::info!(project = %project, script = %script.display(), "starting script");
    }

    fn line(&self, project: &str, line: &str) {
        tracing::info!(project = %project, "{line}");
    }

    fn exited(&self, project: &str, code: Option<i32>) {
        match code {
            Some(0) => {
                tracing::info!(project = %project, "script completed successfully (exit code: 0)");
            }
            Some(code) => {
                tracing::error!(project = %project, "script failed with exit code: {code}");
            }
            None => {
                tracing::error!(project = %project, "script terminated by signal");
            }
        }
    }

    fn failed(&self, project: &str, error: &io::Error) {
        tracing::error!(project = %project, error = %error, "error running script");
    }
}

// ---------------------------------------------------------------------------
// Dispatcher
// ---------------------------------------------------------------------------

/// Resolves project names to scripts and launches them as detached tasks.
///
/// Concurrent dispatches -- including for the same project -- run
/// independently; nothing is deduplicated or serialized, and there is no
/// handle for cancelling a script once it has started.
pub struct ScriptDispatcher<R> {
    scripts_dir: PathBuf,
    runner: Arc<R>,
    sink: Arc<dyn OutputSink>,
}

impl<R: CommandRunner> ScriptDispatcher<R> {
    pub fn new(
        scripts_dir: impl Into<PathBuf>,
        runner: Arc<R>,
        sink: Arc<dyn OutputSink>,
    ) -> Self {
        Self {
            scripts_dir: scripts_dir.into(),
            runner,
            sink,
        }
    }

    /// The directory scripts are resolved in (also the child's cwd).
    pub fn scripts_dir(&self) -> &Path {
        &self.scripts_dir
    }

    /// Launch `{project}.sh` as a detached background task.
    ///
    /// Returns as soon as the task is spawned; the HTTP response never
    /// waits for the script. The existence check races with the spawn (no
    /// locking); a script removed in between is reported through the sink,
    /// not the caller.
    pub fn dispatch(&self, project: &str) -> Result<(), DispatchError> {
        let file_name = format!("{project}.sh");
        let script = self.scripts_dir.join(&file_name);
        if !script.exists() {
            return Err(DispatchError::ScriptNotFound(file_name));
        }

        let runner = Arc::clone(&self.runner);
        let sink = Arc::clone(&self.sink);
        let cwd = self.scripts_dir.clone();
        let project = project.to_owned();
        tokio::spawn(async move {
            run_logged(runner.as_ref(), sink.as_ref(), &script, &project, &cwd).await;
        });

        Ok(())
    }
}

/// Run one script to completion, forwarding its output to the sink.
///
/// Never returns an error: every failure mode ends up in the sink so the
/// host process keeps serving.
async fn run_logged<R: CommandRunner>(
    runner: &R,
    sink: &dyn OutputSink,
    script: &Path,
    project: &str,
    cwd: &Path,
) {
    sink.started(project, script);

    let args = [project.to_owned()];
    let mut handle = match runner.spawn(script, &args, cwd).await {
        Ok(handle) => handle,
        Err(err) => {
            sink.failed(project, &err);
            return;
        }
    };

    loop {
        match handle.next_line().await {
            Ok(Some(line)) => sink.line(project, &line),
            Ok(None) => break,
            Err(err) => {
                sink.failed(project, &err);
                break;
            }
        }
    }

    match handle.wait().await {
        Ok(code) => sink.exited(project, code),
        Err(err) => sink.failed(project, &err),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
