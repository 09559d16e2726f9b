//! Password reset email delivery over SMTP (lettre).
//!
//! Credentials are optional: when SMTP_* is not configured the server
//! still runs, and forgot-password requests succeed without a mail
//! being sent (the reset token is persisted either way).

use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::header::ContentType,
    transport::smtp::{Error as SmtpError, authentication::Credentials},
};
use thiserror::Error;

/// SMTP credentials and sender identity, loaded from the environment.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_password: String,
    pub from_address: String,
}

impl MailConfig {
    pub fn from_env() -> Option<Self> {
        let smtp_host = std::env::var("SMTP_HOST").ok()?;
        let smtp_username = std::env::var("SMTP_USERNAME").ok()?;
        let smtp_password = std::env::var("SMTP_PASSWORD").ok()?;
        let smtp_port = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);
        let from_address = std::env::var("SMTP_FROM")
            .unwrap_or_else(|_| format!("SwiftMeals <{smtp_username}>"));
        Some(Self {
            smtp_host,
            smtp_port,
            smtp_username,
            smtp_password,
            from_address,
        })
    }
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("SMTP error: {0}")]
    Smtp(#[from] SmtpError),

    #[error("Failed to build message: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Invalid email address: {0}")]
    InvalidAddress(String),
}

/// Transactional mail sender.
#[derive(Clone)]
pub struct Mailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl Mailer {
    pub fn new(config: &MailConfig) -> Result<Self, SmtpError> {
        let credentials =
            Credentials::new(config.smtp_username.clone(), config.smtp_password.clone());

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        Ok(Self {
            transport,
            from_address: config.from_address.clone(),
        })
    }

    /// Send the reset link to a user. The link embeds the one-hour token.
    pub async fn send_reset_email(
        &self,
        to: &str,
        name: &str,
        reset_link: &str,
    ) -> Result<(), MailError> {
        let body = format!(
            "Hi {name},\n\n\
             We received a request to reset your SwiftMeals password.\n\
             Open the link below within one hour to choose a new one:\n\n\
             {reset_link}\n\n\
             If you did not request this, you can ignore this email.\n"
        );

        let message = Message::builder()
            .from(
                self.from_address
                    .parse()
                    .map_err(|_| MailError::InvalidAddress(self.from_address.clone()))?,
            )
            .to(to
                .parse()
                .map_err(|_| MailError::InvalidAddress(to.to_string()))?)
            .subject("Reset your SwiftMeals password")
            .header(ContentType::TEXT_PLAIN)
            .body(body)?;

        self.transport.send(message).await?;
        tracing::info!(to, "Reset email sent");
        Ok(())
    }
}
