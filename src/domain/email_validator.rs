use super::Email;
use color_eyre::eyre::Report;
use thiserror::Error;

/// Deliverability check for an address, backed by a third-party service.
#[async_trait::async_trait]
pub trait EmailValidator {
    async fn validate(&self, email: &Email) -> Result<bool, EmailValidatorError>;
}

#[derive(Debug, Error)]
pub enum EmailValidatorError {
    #[error("Email validation service unavailable")]
    Unavailable(#[source] Report),
}
