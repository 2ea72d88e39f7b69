/// Outgoing email
///
/// Only one email is sent: the password recovery link. [`SmtpMailer`]
/// delivers over SMTP with STARTTLS; [`LogMailer`] logs the message instead
/// and is used when SMTP is not configured and in tests.

use async_trait::async_trait;
use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

/// Subject line of the recovery email
pub const RECOVERY_SUBJECT: &str = "Восстановление пароля в системе TENDER-COMMUNITY";

/// Mail errors
#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

/// An HTML email ready to send
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

/// Link the recovery email points to
pub fn recovery_link(base_url: &str, user_id: i64) -> String {
    format!(
        "{}/password/recovery/mail?user_id={}",
        base_url.trim_end_matches('/'),
        user_id
    )
}

/// Composes the password recovery email for a user
pub fn recovery_email(base_url: &str, to: &str, user_id: i64) -> Email {
    let link = recovery_link(base_url, user_id);
    let html = format!(
        r#"<html>
<body>
    <p>Здравствуйте,</p>
    <p>Для восстановления пароля, пожалуйста, перейдите по следующей ссылке:</p>
    <p><a href="{link}">Восстановить пароль</a></p>
    <p>Если вы не запрашивали восстановление пароля, просто игнорируйте это письмо.</p>
</body>
</html>"#
    );

    Email {
        to: to.to_string(),
        subject: RECOVERY_SUBJECT.to_string(),
        html,
    }
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &Email) -> Result<(), MailError>;
}

/// SMTP settings
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

/// Delivers mail through an SMTP relay using STARTTLS
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(settings: SmtpSettings) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .build();

        Ok(Self {
            transport,
            from: settings.from.parse()?,
        })
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html.clone())?;

        self.transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "Email sent");
        Ok(())
    }
}

/// Mailer that logs instead of sending
#[derive(Debug, Clone, Copy, Default)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: &Email) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, "SMTP not configured, email logged");
        tracing::debug!(html = %email.html, "Email body");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recovery_link() {
        assert_eq!(
            recovery_link("http://localhost:4000/", 12),
            "http://localhost:4000/password/recovery/mail?user_id=12"
        );
    }

    #[test]
    fn test_recovery_email() {
        let email = recovery_email("https://api.tender.kg", "user@example.com", 7);

        assert_eq!(email.to, "user@example.com");
        assert_eq!(email.subject, RECOVERY_SUBJECT);
        assert!(email
            .html
            .contains(r#"<a href="https://api.tender.kg/password/recovery/mail?user_id=7">"#));
    }

    #[tokio::test]
    async fn test_smtp_mailer_rejects_bad_sender() {
        let result = SmtpMailer::new(SmtpSettings {
            host: "smtp.example.com".to_string(),
            port: 587,
            username: "u".to_string(),
            password: "p".to_string(),
            from: "not an address".to_string(),
        });
        assert!(matches!(result, Err(MailError::Address(_))));
    }

    #[tokio::test]
    async fn test_log_mailer_succeeds() {
        let email = recovery_email("http://localhost:4000", "a@b.kg", 1);
        assert!(LogMailer.send(&email).await.is_ok());
    }
}
