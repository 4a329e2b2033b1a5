//! Unified error types surfaced by the runtime API.
//!
//! Gameplay refusals (resisted, immune, blocked) are not errors; they come
//! back as [`status_core::ApplyOutcome`]. Errors here mean the request never
//! reached the engine, or named an entity the engine does not host.
use status_core::{EngineError, ErrorSeverity, StatusError};
use thiserror::Error;
use tokio::sync::oneshot;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error("simulation worker command channel closed")]
    CommandChannelClosed,

    #[error("simulation worker reply channel closed")]
    ReplyChannelClosed(#[source] oneshot::error::RecvError),

    #[error("simulation worker join failed")]
    WorkerJoin(#[source] tokio::task::JoinError),

    #[error(transparent)]
    Engine(#[from] EngineError),
}

impl StatusError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Engine(err) => err.severity(),
            _ => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::CommandChannelClosed => "runtime_command_channel_closed",
            Self::ReplyChannelClosed(_) => "runtime_reply_channel_closed",
            Self::WorkerJoin(_) => "runtime_worker_join",
            Self::Engine(err) => err.error_code(),
        }
    }
}
