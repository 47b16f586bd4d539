use color_eyre::eyre::{eyre, Result, WrapErr};
use dotenvy::dotenv;
use secrecy::Secret;

use super::constants::{
    env, prod, DEFAULT_EMAIL_SENDER_ADDRESS, DEFAULT_MAILBOXLAYER_BASE_URL,
    DEFAULT_POSTMARK_BASE_URL, DEFAULT_VERIFICATION_BASE_URL,
    DEFAULT_VERIFICATION_QUEUE_CAPACITY,
};
use crate::domain::{Email, RunMode, VerificationSettings};

/// Process configuration, read once at start-up and handed to whatever needs
/// it.
#[derive(Debug, Clone)]
pub struct Settings {
    pub app_address: String,
    pub database_url: Option<Secret<String>>,
    pub verification: VerificationSettings,
    pub verification_queue_capacity: usize,
    pub mailboxlayer: MailboxlayerSettings,
    pub postmark: PostmarkSettings,
}

#[derive(Debug, Clone)]
pub struct MailboxlayerSettings {
    pub base_url: String,
    pub api_key: Secret<String>,
}

#[derive(Debug, Clone)]
pub struct PostmarkSettings {
    pub base_url: String,
    /// Without a token, emails are logged instead of sent.
    pub auth_token: Option<Secret<String>>,
    pub sender: Email,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Empty variables count as unset.
        let get = |key: &str| lookup(key).filter(|value| !value.is_empty());
        let get_or = |key: &str, default: &str| {
            get(key).unwrap_or_else(|| default.to_owned())
        };

        let run_mode = match get(env::DEBUG_ENV_VAR) {
            Some(value) if is_truthy(&value) => RunMode::Debug,
            _ => RunMode::Production,
        };

        let verification_queue_capacity =
            match get(env::VERIFICATION_QUEUE_CAPACITY_ENV_VAR) {
                Some(value) => value.parse::<usize>().wrap_err_with(|| {
                    format!(
                        "{} must be a positive integer",
                        env::VERIFICATION_QUEUE_CAPACITY_ENV_VAR
                    )
                })?,
                None => DEFAULT_VERIFICATION_QUEUE_CAPACITY,
            };
        if verification_queue_capacity == 0 {
            return Err(eyre!(
                "{} must be a positive integer",
                env::VERIFICATION_QUEUE_CAPACITY_ENV_VAR
            ));
        }

        let api_key = get(env::MAILBOXLAYER_API_KEY_ENV_VAR);
        let auth_token = get(env::POSTMARK_AUTH_TOKEN_ENV_VAR);
        if run_mode == RunMode::Production {
            if api_key.is_none() {
                return Err(eyre!(
                    "{} must be set in production",
                    env::MAILBOXLAYER_API_KEY_ENV_VAR
                ));
            }
            if auth_token.is_none() {
                return Err(eyre!(
                    "{} must be set in production",
                    env::POSTMARK_AUTH_TOKEN_ENV_VAR
                ));
            }
        }

        let sender = Email::parse(Secret::new(get_or(
            env::POSTMARK_EMAIL_SENDER_ADDRESS_ENV_VAR,
            DEFAULT_EMAIL_SENDER_ADDRESS,
        )))
        .wrap_err_with(|| {
            format!(
                "{} is not a valid email address",
                env::POSTMARK_EMAIL_SENDER_ADDRESS_ENV_VAR
            )
        })?;

        Ok(Self {
            app_address: get_or(env::APP_ADDRESS_ENV_VAR, prod::APP_ADDRESS),
            database_url: get(env::DATABASE_URL_ENV_VAR).map(Secret::new),
            verification: VerificationSettings {
                base_url: get_or(
                    env::VERIFICATION_BASE_URL_ENV_VAR,
                    DEFAULT_VERIFICATION_BASE_URL,
                ),
                run_mode,
            },
            verification_queue_capacity,
            mailboxlayer: MailboxlayerSettings {
                base_url: get_or(
                    env::MAILBOXLAYER_BASE_URL_ENV_VAR,
                    DEFAULT_MAILBOXLAYER_BASE_URL,
                ),
                api_key: Secret::new(api_key.unwrap_or_default()),
            },
            postmark: PostmarkSettings {
                base_url: get_or(
                    env::POSTMARK_BASE_URL_ENV_VAR,
                    DEFAULT_POSTMARK_BASE_URL,
                ),
                auth_token: auth_token.map(Secret::new),
                sender,
            },
        })
    }
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
