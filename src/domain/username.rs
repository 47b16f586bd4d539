use serde::{Deserialize, Serialize};

use super::ValidationError;

const MAX_USERNAME_LENGTH: usize = 150;

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn parse(username: String) -> Result<Self, ValidationError> {
        let regex = regex::Regex::new(r"^[\w.@+-]+$")
            .expect("Regex for Username parser is invalid");

        match username.chars().count() {
            0 => Err(ValidationError::new(
                "This field may not be blank.".to_owned(),
            )),
            x if x > MAX_USERNAME_LENGTH => Err(ValidationError::new(format!(
                "Ensure this field has no more than {MAX_USERNAME_LENGTH} characters."
            ))),
            _ if !regex.is_match(&username) => Err(ValidationError::new(
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters.".to_owned(),
            )),
            _ => Ok(Self(username)),
        }
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
