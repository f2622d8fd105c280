use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

pub const INVALID_FORM_MESSAGE: &str = "Please fill in all fields with valid values.";
pub const INVALID_REQUEST_MESSAGE: &str = "Invalid request.";
pub const RATE_LIMITED_MESSAGE: &str = "Too many messages. Please try again later.";

/// Form-encoded body posted by the contact page.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ContactForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,

    #[serde(default)]
    #[validate(email(message = "A valid email is required"))]
    pub email: String,

    #[serde(default)]
    #[validate(length(min = 1, max = 5000, message = "Message is required"))]
    pub message: String,
}

impl ContactForm {
    pub fn trimmed(self) -> Self {
        Self {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            message: self.message.trim().to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ContactMessageInsert {
    pub name: String,
    pub email: String,
    pub message: String,
}

impl From<ContactForm> for ContactMessageInsert {
    fn from(form: ContactForm) -> Self {
        Self {
            name: form.name,
            email: form.email,
            message: form.message,
        }
    }
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct ContactMessage {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

/// What happened to a submitted message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactOutcome {
    Delivered { name: String },
    SavedWithoutEmail,
    StorageFailed,
}

impl ContactOutcome {
    pub fn message(&self) -> String {
        match self {
            ContactOutcome::Delivered { name } => {
                format!("Thank you for contacting me, {name}. I will get back to you soon!")
            }
            ContactOutcome::SavedWithoutEmail => {
                "Message saved, but email could not be sent.".to_string()
            }
            ContactOutcome::StorageFailed => {
                "Sorry, there was an error saving your message. Please try again later.".to_string()
            }
        }
    }
}
