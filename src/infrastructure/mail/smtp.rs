use async_trait::async_trait;
use lettre::{
    message::{Mailbox, MultiPart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{
    entities::contact::ContactMessageInsert,
    infrastructure::mail::{ContactNotifier, MailError},
    settings::SmtpConfig,
    site::html::escape_html,
};

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Message) -> Result<(), MailError>;
}

#[async_trait]
impl Mailer for AsyncSmtpTransport<Tokio1Executor> {
    async fn send(&self, email: Message) -> Result<(), MailError> {
        AsyncTransport::send(self, email)
            .await
            .map(|_resp| ())
            .map_err(|e| MailError::Transport(e.to_string()))
    }
}

pub struct SmtpContactNotifier {
    mailer: Box<dyn Mailer>,
    from: Mailbox,
    to: Mailbox,
}

impl SmtpContactNotifier {
    /// STARTTLS relay with username/password authentication.
    pub fn new(config: &SmtpConfig) -> Result<Self, MailError> {
        let creds = Credentials::new(config.username.clone(), config.password.as_str().to_string());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(config.port)
            .credentials(creds)
            .build();

        Self::new_with_mailer(Box::new(transport), &config.from, &config.to)
    }

    pub fn new_with_mailer(mailer: Box<dyn Mailer>, from: &str, to: &str) -> Result<Self, MailError> {
        let from = from
            .parse::<Mailbox>()
            .map_err(|e| MailError::InvalidAddress(format!("{from}: {e}")))?;
        let to = to
            .parse::<Mailbox>()
            .map_err(|e| MailError::InvalidAddress(format!("{to}: {e}")))?;

        Ok(Self { mailer, from, to })
    }

    fn build_message(&self, message: &ContactMessageInsert) -> Result<Message, MailError> {
        let plain = format!(
            "You have received a new message from your portfolio contact form:\n\n\
             Name: {}\nEmail: {}\nMessage:\n{}",
            message.name, message.email, message.message
        );
        let html = format!(
            "<p>You have received a new message from your portfolio contact form:</p>\n\
             <p>Name: {}<br>\nEmail: {}</p>\n<p>Message:<br>\n{}</p>\n",
            escape_html(&message.name),
            escape_html(&message.email),
            escape_html(&message.message).replace('\n', "<br>")
        );

        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(format!("New Contact Message from {}", message.name));

        // A malformed visitor address only costs us the Reply-To header.
        if let Ok(reply_to) = message.email.parse::<Mailbox>() {
            builder = builder.reply_to(reply_to);
        }

        builder
            .multipart(MultiPart::alternative_plain_html(plain, html))
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

#[async_trait]
impl ContactNotifier for SmtpContactNotifier {
    async fn notify(&self, message: &ContactMessageInsert) -> Result<(), MailError> {
        let email = self.build_message(message)?;
        self.mailer.send(email).await
    }
}
