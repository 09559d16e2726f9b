//! Background/side-effect services.

pub mod mailer;

pub use mailer::{MailConfig, MailError, Mailer};
