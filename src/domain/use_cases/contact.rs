use std::sync::Arc;

use tracing::{error, info, warn};
use validator::Validate;

use crate::{
    entities::contact::{ContactForm, ContactMessageInsert, ContactOutcome},
    errors::AppError,
    infrastructure::mail::ContactNotifier,
    repositories::contact::ContactRepository,
};

pub struct ContactHandler<R: ?Sized = dyn ContactRepository> {
    pub contact_repo: Arc<R>,
    pub notifier: Arc<dyn ContactNotifier>,
}

impl<R> ContactHandler<R>
where
    R: ContactRepository + ?Sized,
{
    pub fn new(contact_repo: Arc<R>, notifier: Arc<dyn ContactNotifier>) -> Self {
        ContactHandler {
            contact_repo,
            notifier,
        }
    }

    /// Stores the message, then tries to notify the site owner.
    ///
    /// Only validation failures are returned as errors. Storage and mail
    /// failures are folded into the outcome so the visitor always gets a
    /// plain-text answer.
    pub async fn submit(&self, form: ContactForm) -> Result<ContactOutcome, AppError> {
        let form = form.trimmed();
        form.validate()?;

        let message = ContactMessageInsert::from(form);

        let stored = match self.contact_repo.create_contact_message(&message).await {
            Ok(id) => {
                info!(contact_id = id, "Contact message stored");
                true
            }
            Err(e) => {
                error!(error = %e, "Failed to store contact message");
                false
            }
        };

        // The owner is notified even when storage failed.
        let mailed = match self.notifier.notify(&message).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Contact notification not sent");
                false
            }
        };

        Ok(match (stored, mailed) {
            (true, true) => ContactOutcome::Delivered { name: message.name },
            (true, false) => ContactOutcome::SavedWithoutEmail,
            (false, _) => ContactOutcome::StorageFailed,
        })
    }
}
