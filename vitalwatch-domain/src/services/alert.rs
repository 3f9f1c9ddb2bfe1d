use async_trait::async_trait;
use thiserror::Error;
use tracing::warn;

/// Alert delivery errors
#[derive(Debug, Error)]
pub enum AlertError {
    /// The delivery channel could not be reached
    #[error("Alert channel unavailable: {0}")]
    ChannelUnavailable(String),

    /// The channel rejected the message
    #[error("Alert delivery failed: {0}")]
    Delivery(String),
}

/// Trait for outbound alert delivery.
/// Implementations decide the channel (log, pager, email); callers rely only
/// on the message being handed to the channel once per send.
#[async_trait]
pub trait AlertSinkTrait {
    /// Deliver a single alert message
    async fn send(&self, message: &str) -> Result<(), AlertError>;
}

/// Alert sink that delivers messages to the application log
#[derive(Debug, Clone, Default)]
pub struct LogAlertSink;

impl LogAlertSink {
    /// Create a new log-backed alert sink
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl AlertSinkTrait for LogAlertSink {
    async fn send(&self, message: &str) -> Result<(), AlertError> {
        warn!("{}", message);
        Ok(())
    }
}
