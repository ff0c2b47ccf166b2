//! Application state wiring the dispatcher to its concrete runner.
//!
//! The dispatcher is generic over the `CommandRunner` port; `AppState`
//! pins it to the tokio-backed implementation from hookrun-infra.

use std::sync::Arc;

use hookrun_core::dispatch::{OutputSink, ScriptDispatcher, TracingSink};
use hookrun_infra::process::TokioCommandRunner;
use hookrun_types::config::ServerConfig;

/// Concrete dispatcher type pinned to the infra runner.
pub type ConcreteDispatcher = ScriptDispatcher<TokioCommandRunner>;

/// Shared application state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub dispatcher: Arc<ConcreteDispatcher>,
}

impl AppState {
    /// Build the state from a loaded configuration.
    pub fn new(config: ServerConfig) -> Self {
        let runner = Arc::new(TokioCommandRunner::new());
        let sink: Arc<dyn OutputSink> = Arc::new(TracingSink);
        let dispatcher = ScriptDispatcher::new(config.scripts_dir.clone(), runner, sink);

        Self {
            config: Arc::new(config),
            dispatcher: Arc::new(dispatcher),
        }
    }
}
