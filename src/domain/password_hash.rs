use argon2::{
    password_hash::SaltString, Algorithm, Argon2, Params, PasswordHash,
    PasswordHasher, Version,
};
use color_eyre::eyre::{Result, WrapErr};
use secrecy::{ExposeSecret, Secret};

use super::Password;

// m=15000 KiB, t=2, p=1
const MEMORY_COST: u32 = 15000;
const TIME_COST: u32 = 2;
const PARALLELISM: u32 = 1;

/// Argon2id hash of an account password, stored as a PHC string.
#[derive(Debug, Clone)]
pub struct AccountPasswordHash(Secret<String>);

impl AccountPasswordHash {
    /// Wraps a stored hash after checking it is well-formed PHC.
    pub fn parse(phc: Secret<String>) -> Result<Self> {
        PasswordHash::new(phc.expose_secret())
            .wrap_err("Stored password hash is not a PHC string")?;
        Ok(Self(phc))
    }

    /// Hashing is CPU bound, so it runs on the blocking pool.
    #[tracing::instrument(name = "Hashing account password", skip_all)]
    pub async fn from_password(password: Password) -> Result<Self> {
        let span = tracing::Span::current();
        let plain = password.as_ref().clone();

        let phc = tokio::task::spawn_blocking(move || {
            span.in_scope(|| hash_argon2id(&plain))
        })
        .await
        .wrap_err("Password hashing task panicked")??;

        Ok(Self(phc))
    }
}

fn hash_argon2id(plain: &Secret<String>) -> Result<Secret<String>> {
    let params = Params::new(MEMORY_COST, TIME_COST, PARALLELISM, None)
        .wrap_err("Invalid argon2 parameters")?;
    let hasher = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let salt = SaltString::generate(&mut rand::thread_rng());

    let phc = hasher
        .hash_password(plain.expose_secret().as_bytes(), &salt)
        .wrap_err("Failed to hash password")?
        .to_string();
    Ok(Secret::new(phc))
}

impl PartialEq for AccountPasswordHash {
    fn eq(&self, other: &Self) -> bool {
        self.0.expose_secret() == other.0.expose_secret()
    }
}

impl AsRef<Secret<String>> for AccountPasswordHash {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
