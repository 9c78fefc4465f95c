//! # Notifier
//!
//! Email notification client. Fire-and-forget from the engine's point of
//! view: delivery failures are logged by the notification service and
//! never influence attempt or run status.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailRequest {
    pub sender_name: String,
    pub sender_address: String,
    pub recipient: String,
    pub subject: String,
    pub html_message: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageReceipt {
    pub message_id: Option<String>,
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum NotifierError {
    #[error("message delivery failed: {0}")]
    Delivery(String),
}

#[async_trait]
pub trait Notifier: Send + Sync {
    async fn send_email(&self, request: EmailRequest) -> Result<MessageReceipt, NotifierError>;
}
