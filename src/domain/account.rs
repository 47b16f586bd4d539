use secrecy::Secret;
use serde::Deserialize;
use serde_json::{Map, Value};

use super::{
    AccountId, AccountPasswordHash, Email, PersonName, Role, Username,
    VerificationCode,
};

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub id: AccountId,
    pub username: Username,
    pub email: Email,
    pub password_hash: AccountPasswordHash,
    pub first_name: PersonName,
    pub last_name: PersonName,
    pub role: Role,
    pub email_verification_code: VerificationCode,
    pub email_verified: bool,
    pub extra: Map<String, Value>,
}

impl Account {
    /// A freshly registered account: new id, new verification code, unverified.
    pub fn new(
        username: Username,
        email: Email,
        password_hash: AccountPasswordHash,
        first_name: PersonName,
        last_name: PersonName,
        role: Role,
        extra: Map<String, Value>,
    ) -> Self {
        Self {
            id: AccountId::default(),
            username,
            email,
            password_hash,
            first_name,
            last_name,
            role,
            email_verification_code: VerificationCode::default(),
            email_verified: false,
            extra,
        }
    }
}

#[cfg(test)]
impl Account {
    pub fn fixture(username: &str, email: &str, role: Role) -> Self {
        const HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$OEx/rcq+3ts//WUDzGNl2g$Am8UFBA4w5NJEmAtquGvBmAlu92q/VQcaoL5AyJPfc8";
        Self::new(
            Username::parse(username.to_owned()).unwrap(),
            Email::parse(Secret::new(email.to_owned())).unwrap(),
            AccountPasswordHash::parse(Secret::new(HASH.to_owned())).unwrap(),
            PersonName::default(),
            PersonName::default(),
            role,
            Map::new(),
        )
    }
}

/// Raw field set submitted for registration. Fields other than the named ones
/// land in `extra` and are stored verbatim.
#[derive(Debug, Deserialize)]
pub struct AccountSubmission {
    pub username: String,
    pub email: String,
    pub password: Secret<String>,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub role: Value,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
