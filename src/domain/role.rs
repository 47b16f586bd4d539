use serde::{Serialize, Serializer};
use serde_json::Value;

use super::AccountCreationError;

/// Kind of account. Decoded once from the submitted payload; nothing past the
/// boundary deals with raw role ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Performer,
    Employer,
}

impl Role {
    pub const PERFORMER_ID: i16 = 1;
    pub const EMPLOYER_ID: i16 = 2;

    /// Accepts anything that reads as a whole number: `1`, `2.0`, `" 2 "`,
    /// `"+1"`. Integers too large for `i64` saturate and end up unknown.
    pub fn parse(value: &Value) -> Result<Self, AccountCreationError> {
        let id = match value {
            Value::Number(number) => number_to_id(number),
            Value::String(s) => string_to_id(s),
            _ => None,
        }
        .ok_or(AccountCreationError::InvalidRole)?;
        Self::try_from(id)
    }

    pub fn id(&self) -> i16 {
        match self {
            Role::Performer => Self::PERFORMER_ID,
            Role::Employer => Self::EMPLOYER_ID,
        }
    }
}

impl TryFrom<i64> for Role {
    type Error = AccountCreationError;

    fn try_from(id: i64) -> Result<Self, Self::Error> {
        match id {
            x if x == i64::from(Self::PERFORMER_ID) => Ok(Role::Performer),
            x if x == i64::from(Self::EMPLOYER_ID) => Ok(Role::Employer),
            x => Err(AccountCreationError::UnknownRole(x)),
        }
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i16(self.id())
    }
}

fn number_to_id(number: &serde_json::Number) -> Option<i64> {
    if let Some(id) = number.as_i64() {
        return Some(id);
    }
    if number.as_u64().is_some() {
        return Some(i64::MAX);
    }
    // Float to int casts saturate.
    number
        .as_f64()
        .filter(|f| f.is_finite() && f.fract() == 0.0)
        .map(|f| f as i64)
}

fn string_to_id(s: &str) -> Option<i64> {
    let s = s.trim();
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let id = match digits.parse::<i64>() {
        Ok(id) => id,
        Err(_) => i64::MAX,
    };
    Some(if negative { id.saturating_neg() } else { id })
}
