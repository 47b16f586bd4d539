use serde::{Deserialize, Serialize};

use super::ValidationError;

const MAX_NAME_LENGTH: usize = 150;

/// First or last name. Both are optional on an account, so empty is allowed.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PersonName(String);

impl PersonName {
    pub fn parse(name: String) -> Result<Self, ValidationError> {
        let name = name.trim();
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::new(format!(
                "Ensure this field has no more than {MAX_NAME_LENGTH} characters."
            )));
        }
        Ok(Self(name.to_owned()))
    }
}

impl AsRef<str> for PersonName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[test]
fn test_valid_person_names() {
    let valid_names = ["".to_owned(), "A".to_owned(), "a".repeat(150)];
    for valid_name in valid_names.iter() {
        let parsed = PersonName::parse(valid_name.clone())
            .expect("Failed to parse valid name");
        assert_eq!(parsed.as_ref(), valid_name);
    }
}

#[test]
fn test_person_names_are_trimmed() {
    let parsed = PersonName::parse("  Lovelace ".to_owned()).unwrap();
    assert_eq!(parsed.as_ref(), "Lovelace");
}

#[test]
fn test_padding_does_not_count_towards_length() {
    let padded = format!("  {}\t", "a".repeat(150));
    let parsed =
        PersonName::parse(padded).expect("Padding should be trimmed first");
    assert_eq!(parsed.as_ref().chars().count(), 150);
}

#[test]
fn test_long_person_names() {
    let result = PersonName::parse("a".repeat(151));
    assert_eq!(
        result.unwrap_err().as_ref(),
        "Ensure this field has no more than 150 characters."
    );
}
