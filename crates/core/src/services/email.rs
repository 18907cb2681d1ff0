//! Outcome notification mailer.
//!
//! Notifications are fire-and-forget: the review transaction has already
//! committed by the time a message is dispatched, so delivery failures are
//! logged and never surfaced to the caller.

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor, message::Mailbox,
    transport::smtp::authentication::Credentials,
};
use serde::Serialize;

use regportal_common::{AppError, AppResult, config::EmailConfig};

/// Payload for an approval email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalNotification {
    /// Recipient address.
    pub to: String,
    /// Recipient display name.
    pub to_name: String,
    /// One-time credential to be changed on first login.
    pub temporary_password: String,
    /// Where the new user can sign in.
    pub login_url: String,
}

/// Payload for a rejection email.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RejectionNotification {
    /// Recipient address.
    pub to: String,
    /// Recipient display name.
    pub to_name: String,
    /// Reason communicated to the applicant.
    pub reason: String,
}

/// Sends outcome notifications over SMTP.
///
/// When constructed without SMTP configuration the mailer is a no-op that
/// logs dropped messages at debug level.
#[derive(Clone)]
pub struct Mailer {
    inner: Option<SmtpMailer>,
}

#[derive(Clone)]
struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl Mailer {
    /// Build a mailer from optional SMTP configuration.
    pub fn from_config(config: Option<&EmailConfig>) -> AppResult<Self> {
        let Some(config) = config else {
            return Ok(Self::disabled());
        };

        let from: Mailbox = format!("{} <{}>", config.from_name, config.from_address)
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid from address: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)
            .map_err(|e| AppError::Config(format!("Invalid SMTP host: {e}")))?
            .port(config.smtp_port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            inner: Some(SmtpMailer {
                transport: builder.build(),
                from,
            }),
        })
    }

    /// A mailer that drops all messages.
    #[must_use]
    pub const fn disabled() -> Self {
        Self { inner: None }
    }

    /// Dispatch an approval email. Never blocks, never fails the caller.
    pub fn dispatch_approval(&self, notification: &ApprovalNotification) {
        let subject = "Your registration has been approved".to_string();
        let body = format!(
            "Hello {},\n\n\
             Your registration request has been approved. You can now sign in at {} \
             using this temporary password:\n\n    {}\n\n\
             Please change it after your first login.\n",
            notification.to_name, notification.login_url, notification.temporary_password
        );

        self.dispatch(&notification.to, subject, body);
    }

    /// Dispatch a rejection email. Never blocks, never fails the caller.
    pub fn dispatch_rejection(&self, notification: &RejectionNotification) {
        let subject = "Your registration request was not approved".to_string();
        let body = format!(
            "Hello {},\n\n\
             Unfortunately your registration request was not approved.\n\n\
             Reason: {}\n",
            notification.to_name, notification.reason
        );

        self.dispatch(&notification.to, subject, body);
    }

    fn dispatch(&self, to: &str, subject: String, body: String) {
        let Some(mailer) = self.inner.clone() else {
            tracing::debug!(to = %to, subject = %subject, "Mailer disabled, dropping notification");
            return;
        };

        let recipient: Mailbox = match to.parse() {
            Ok(mailbox) => mailbox,
            Err(e) => {
                tracing::warn!(to = %to, error = %e, "Invalid recipient address, dropping notification");
                return;
            }
        };

        let to = to.to_string();
        tokio::spawn(async move {
            let message = Message::builder()
                .from(mailer.from)
                .to(recipient)
                .subject(subject)
                .body(body);

            let message = match message {
                Ok(message) => message,
                Err(e) => {
                    tracing::warn!(to = %to, error = %e, "Failed to build notification email");
                    return;
                }
            };

            if let Err(e) = mailer.transport.send(message).await {
                tracing::warn!(to = %to, error = %e, "Failed to send notification email");
            } else {
                tracing::debug!(to = %to, "Notification email sent");
            }
        });
    }
}
