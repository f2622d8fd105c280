use async_trait::async_trait;
use derive_more::Display;
#[cfg(test)]
use mockall::automock;

use crate::entities::contact::ContactMessageInsert;

pub mod smtp;

#[derive(Debug, Display)]
pub enum MailError {
    #[display("Email notifications are disabled")]
    Disabled,

    #[display("Invalid email address: {_0}")]
    InvalidAddress(String),

    #[display("Failed to build email: {_0}")]
    Build(String),

    #[display("SMTP delivery failed: {_0}")]
    Transport(String),
}

/// Tells the site owner about a new contact message.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait ContactNotifier: Send + Sync {
    async fn notify(&self, message: &ContactMessageInsert) -> Result<(), MailError>;
}

/// Used when no SMTP server is configured. Every notification reports [`MailError::Disabled`].
pub struct DisabledNotifier;

#[async_trait]
impl ContactNotifier for DisabledNotifier {
    async fn notify(&self, _message: &ContactMessageInsert) -> Result<(), MailError> {
        Err(MailError::Disabled)
    }
}
