use super::ValidationError;
use secrecy::{ExposeSecret, Secret};

const MAX_CHARACTERS: usize = 128;

#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl PartialEq for Password {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl Password {
    pub fn parse(s: Secret<String>) -> Result<Password, ValidationError> {
        validate_password(&s)?;
        Ok(Self(s))
    }
}

// Strength rules belong to the client; only presence and the column limit
// are enforced here.
fn validate_password(s: &Secret<String>) -> Result<(), ValidationError> {
    let char_count = s.expose_secret().chars().count();

    if char_count == 0 {
        return Err(ValidationError::new(
            "This field may not be blank.".to_owned(),
        ));
    }

    if char_count > MAX_CHARACTERS {
        return Err(ValidationError::new(format!(
            "Ensure this field has no more than {} characters.",
            MAX_CHARACTERS
        )));
    }

    Ok(())
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
