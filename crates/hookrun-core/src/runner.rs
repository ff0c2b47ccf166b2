//! Command runner port for launching project scripts.
//!
//! Uses native async fn in traits (RPITIT, Rust 2024 edition) -- no
//! `async_trait` macro. The tokio-backed implementation lives in
//! `hookrun-infra`; tests substitute fakes that yield canned output
//! without touching the filesystem or an OS process.

use std::future::Future;
use std::io;
use std::path::Path;

/// A running child process whose merged stdout/stderr is consumed line by
/// line.
pub trait ProcessHandle: Send + 'static {
    /// Next line of the merged output stream.
    ///
    /// Returns `Ok(None)` once both streams reach end-of-file. The
    /// sequence is finite and not restartable.
    fn next_line(&mut self) -> impl Future<Output = io::Result<Option<String>>> + Send;

    /// Wait for the process to exit.
    ///
    /// Returns the exit code, or `None` when the process was terminated by
    /// a signal.
    fn wait(&mut self) -> impl Future<Output = io::Result<Option<i32>>> + Send;
}

/// Port for spawning scripts as child processes.
pub trait CommandRunner: Send + Sync + 'static {
    type Handle: ProcessHandle;

    /// Spawn `script` with `args` and working directory `cwd`, with both
    /// output streams piped for line consumption.
    fn spawn(
        &self,
        script: &Path,
        args: &[String],
        cwd: &Path,
    ) -> impl Future<Output = io::Result<Self::Handle>> + Send;
}
