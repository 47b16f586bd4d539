use secrecy::{ExposeSecret, Secret};

use std::hash::Hash;

use super::ValidationError;

const INVALID_EMAIL_MESSAGE: &str = "Enter a valid email address.";

#[derive(Debug, Clone)]
pub struct Email(Secret<String>);

impl PartialEq for Email {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Hash for Email {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.0.expose_secret().hash(state);
    }
}

impl Eq for Email {}

impl Email {
    pub fn parse(s: Secret<String>) -> Result<Self, ValidationError> {
        if !validator::validate_email(s.expose_secret()) {
            return Err(ValidationError::new(INVALID_EMAIL_MESSAGE.to_owned()));
        }

        Ok(Self(s))
    }
}

impl AsRef<Secret<String>> for Email {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
