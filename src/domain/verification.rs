use std::{fmt, time::Duration};

use color_eyre::eyre::Report;
use secrecy::{ExposeSecret, Secret};
use thiserror::Error;
use tokio::sync::oneshot;

use super::{Email, VerificationCode};

/// Whether deliverability of new addresses is enforced before verification
/// mail goes out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Debug,
    Production,
}

#[derive(Debug, Clone)]
pub struct VerificationSettings {
    pub base_url: String,
    pub run_mode: RunMode,
}

/// Everything the verification worker needs to send one email.
#[derive(Debug, Clone)]
pub struct VerificationRequest {
    pub email: Email,
    pub link: Secret<String>,
    pub code: VerificationCode,
}

impl VerificationRequest {
    pub fn new(email: Email, base_url: &str, code: VerificationCode) -> Self {
        let separator = if base_url.ends_with('/') { "" } else { "/" };
        let link = Secret::new(format!(
            "{}{}{}",
            base_url,
            separator,
            code.as_ref().expose_secret()
        ));
        Self { email, link, code }
    }
}

pub trait VerificationDispatcher {
    /// Hands the request to the background worker without waiting for it.
    fn enqueue(
        &self,
        request: VerificationRequest,
    ) -> Result<JobHandle, DispatchError>;
}

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("Verification queue is full")]
    QueueFull,
    #[error("Verification queue is closed")]
    QueueClosed,
    #[error("Verification email could not be delivered")]
    DeliveryFailed(#[source] Report),
    #[error("Timed out waiting for verification job")]
    TimedOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct JobId(uuid::Uuid);

impl Default for JobId {
    fn default() -> Self {
        Self(uuid::Uuid::new_v4())
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Receipt for an enqueued verification job. Dropping it does not cancel the
/// job.
#[derive(Debug)]
pub struct JobHandle {
    id: JobId,
    outcome: oneshot::Receiver<Result<(), DispatchError>>,
}

impl JobHandle {
    pub fn new(
        id: JobId,
        outcome: oneshot::Receiver<Result<(), DispatchError>>,
    ) -> Self {
        Self { id, outcome }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub async fn wait(self, timeout: Duration) -> Result<(), DispatchError> {
        match tokio::time::timeout(timeout, self.outcome).await {
            Ok(Ok(outcome)) => outcome,
            Ok(Err(_)) => Err(DispatchError::QueueClosed),
            Err(_) => Err(DispatchError::TimedOut),
        }
    }
}
