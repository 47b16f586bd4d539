use color_eyre::eyre::{Context, Result};
use secrecy::{ExposeSecret, Secret};

/// Opaque token embedded in the verification link sent to a new account.
#[derive(Debug, Clone)]
pub struct VerificationCode(Secret<String>);

impl PartialEq for VerificationCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl VerificationCode {
    pub fn parse(code: Secret<String>) -> Result<Self> {
        let parsed = uuid::Uuid::try_parse(code.expose_secret())
            .wrap_err("Invalid verification code")?;
        Ok(Self(Secret::new(parsed.to_string())))
    }
}

impl Default for VerificationCode {
    fn default() -> Self {
        let code = uuid::Uuid::new_v4().to_string();
        VerificationCode(Secret::new(code))
    }
}

impl AsRef<Secret<String>> for VerificationCode {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
