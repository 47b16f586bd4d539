use std::{collections::BTreeMap, fmt};

use color_eyre::eyre::Report;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{DispatchError, EmailValidatorError};

#[derive(Debug, Error)]
pub enum AccountCreationError {
    #[error("Role must be integer like")]
    InvalidRole,
    #[error("No role with such id({0})")]
    UnknownRole(i64),
    #[error("Validation error: {0}")]
    ValidationError(FieldErrors),
    #[error("Can't create account")]
    AccountCreationFailed,
    #[error("Your email is not valid.")]
    EmailNotValid,
    #[error("Email validation service unavailable")]
    ValidatorUnavailable(#[source] EmailValidatorError),
    #[error("Failed to dispatch verification email")]
    DispatchFailed(#[source] DispatchError),
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl From<FieldErrors> for AccountCreationError {
    fn from(errors: FieldErrors) -> Self {
        Self::ValidationError(errors)
    }
}

#[derive(Debug, Error)]
pub enum ChatAPIError {
    #[error("Account not found: {0}")]
    AccountNotFound(uuid::Uuid),
    #[error("Message already exists")]
    MessageAlreadyExists,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
    #[error("Validation error")]
    ValidationError(#[from] ValidationError),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("Validation error: {0}")]
pub struct ValidationError(String);

impl ValidationError {
    pub fn new(message: String) -> Self {
        Self(message)
    }
}

impl AsRef<str> for ValidationError {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validation messages keyed by the name of the submitted field.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.add(field, message);
        errors
    }

    pub fn add(&mut self, field: &str, message: impl Into<String>) {
        self.0
            .entry(field.to_owned())
            .or_default()
            .push(message.into());
    }

    pub fn record(&mut self, field: &str, error: Option<ValidationError>) {
        if let Some(error) = error {
            self.add(field, error.0);
        }
    }

    pub fn merge(&mut self, other: FieldErrors) {
        for (field, messages) in other.0 {
            self.0.entry(field).or_default().extend(messages);
        }
    }

    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.0 {
            for message in messages {
                if !first {
                    write!(f, "; ")?;
                }
                write!(f, "{field}: {message}")?;
                first = false;
            }
        }
        Ok(())
    }
}
