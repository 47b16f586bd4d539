use color_eyre::eyre::{eyre, Result};
use reqwest::{Client, StatusCode, Url};
use secrecy::{ExposeSecret, Secret};
use serde_json::Value;

use super::RetryPolicy;
use crate::domain::{Email, EmailValidator, EmailValidatorError};

const CHECK_PATH: &str = "/api/check";

/// Client for a mailboxlayer-compatible deliverability API.
pub struct MailboxlayerEmailValidator {
    http_client: Client,
    base_url: String,
    access_key: Secret<String>,
    retry_policy: RetryPolicy,
}

impl MailboxlayerEmailValidator {
    pub fn new(
        base_url: String,
        access_key: Secret<String>,
        http_client: Client,
        retry_policy: RetryPolicy,
    ) -> Self {
        Self {
            http_client,
            base_url,
            access_key,
            retry_policy,
        }
    }

    async fn check(
        &self,
        url: &Url,
        email: &Email,
    ) -> Result<String, reqwest::Error> {
        self.http_client
            .get(url.clone())
            .query(&[
                ("access_key", self.access_key.expose_secret()),
                ("email", email.as_ref().expose_secret()),
            ])
            .send()
            .await?
            .error_for_status()?
            .text()
            .await
    }
}

#[async_trait::async_trait]
impl EmailValidator for MailboxlayerEmailValidator {
    #[tracing::instrument(name = "Checking email deliverability", skip_all)]
    async fn validate(&self, email: &Email) -> Result<bool, EmailValidatorError> {
        let url = Url::parse(&self.base_url)
            .and_then(|base| base.join(CHECK_PATH))
            .map_err(|e| EmailValidatorError::Unavailable(eyre!(e)))?;

        let body = self
            .retry_policy
            .retry(|| self.check(&url, email), is_retryable)
            .await
            .map_err(|e| EmailValidatorError::Unavailable(eyre!(e)))?;

        Ok(is_deliverable(&body))
    }
}

fn is_retryable(error: &reqwest::Error) -> bool {
    match error.status() {
        Some(status) => {
            status.is_server_error() || status == StatusCode::TOO_MANY_REQUESTS
        }
        None => true,
    }
}

// Anything other than an explicit `true` for both checks, including a body
// that is not the expected JSON, counts as undeliverable.
fn is_deliverable(body: &str) -> bool {
    let Ok(data) = serde_json::from_str::<Value>(body) else {
        tracing::warn!("validation service returned a non-JSON body");
        return false;
    };

    let smtp_check = data.get("smtp_check").and_then(Value::as_bool);
    let mx_found = data.get("mx_found").and_then(Value::as_bool);

    match (smtp_check, mx_found) {
        (Some(smtp_check), Some(mx_found)) => smtp_check && mx_found,
        _ => {
            tracing::warn!(
                "validation service response is missing smtp_check or mx_found"
            );
            false
        }
    }
}
