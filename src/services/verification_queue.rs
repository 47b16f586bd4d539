use askama::Template;
use color_eyre::eyre::{eyre, Result, WrapErr};
use secrecy::ExposeSecret;
use std::time::Duration;
use tokio::{
    sync::{
        mpsc::{self, error::TrySendError},
        oneshot,
    },
    task::JoinHandle,
};

use super::RetryPolicy;
use crate::{
    app_state::EmailClientType,
    domain::{
        DispatchError, JobHandle, JobId, VerificationDispatcher,
        VerificationRequest,
    },
    utils::constants::VERIFICATION_EMAIL_SUBJECT,
};

#[derive(Template)]
#[template(path = "verification_email.txt")]
struct VerificationEmail<'a> {
    link: &'a str,
    code: &'a str,
}

struct VerificationJob {
    id: JobId,
    request: VerificationRequest,
    outcome: oneshot::Sender<Result<(), DispatchError>>,
}

/// Bounded in-process queue feeding a single worker task that sends
/// verification emails.
#[derive(Clone)]
pub struct VerificationQueue {
    sender: mpsc::Sender<VerificationJob>,
}

impl VerificationQueue {
    /// Spawns the worker. It stops once every clone of the queue is dropped
    /// and the remaining jobs are drained.
    pub fn start(
        email_client: EmailClientType,
        capacity: usize,
        retry_policy: RetryPolicy,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity);
        let worker =
            tokio::spawn(run_worker(receiver, email_client, retry_policy));
        (Self { sender }, worker)
    }
}

/// Waits for a worker whose queue has been dropped to finish the jobs it
/// already accepted. A worker still busy after `grace` is aborted.
pub async fn drain_worker(
    mut worker: JoinHandle<()>,
    grace: Duration,
) -> Result<()> {
    match tokio::time::timeout(grace, &mut worker).await {
        Ok(joined) => joined.wrap_err("Verification worker panicked"),
        Err(_) => {
            worker.abort();
            Err(eyre!(
                "Verification worker did not finish within {grace:?}"
            ))
        }
    }
}

impl VerificationDispatcher for VerificationQueue {
    #[tracing::instrument(name = "Enqueueing verification email", skip_all)]
    fn enqueue(
        &self,
        request: VerificationRequest,
    ) -> Result<JobHandle, DispatchError> {
        let id = JobId::default();
        let (outcome, receiver) = oneshot::channel();

        self.sender
            .try_send(VerificationJob {
                id,
                request,
                outcome,
            })
            .map_err(|e| match e {
                TrySendError::Full(_) => DispatchError::QueueFull,
                TrySendError::Closed(_) => DispatchError::QueueClosed,
            })?;

        tracing::debug!(job_id = %id, "verification email queued");
        Ok(JobHandle::new(id, receiver))
    }
}

async fn run_worker(
    mut receiver: mpsc::Receiver<VerificationJob>,
    email_client: EmailClientType,
    retry_policy: RetryPolicy,
) {
    while let Some(job) = receiver.recv().await {
        let result = deliver(&job, &email_client, &retry_policy).await;
        if let Err(e) = &result {
            tracing::error!(job_id = %job.id, error = ?e, "verification job failed");
        }
        // Callers are free to drop their handle.
        let _ = job.outcome.send(result);
    }
    tracing::info!("verification queue closed, worker exiting");
}

#[tracing::instrument(
    name = "Delivering verification email",
    skip_all,
    fields(job_id = %job.id)
)]
async fn deliver(
    job: &VerificationJob,
    email_client: &EmailClientType,
    retry_policy: &RetryPolicy,
) -> Result<(), DispatchError> {
    let request = &job.request;
    let content = VerificationEmail {
        link: request.link.expose_secret(),
        code: request.code.as_ref().expose_secret(),
    }
    .render()
    .map_err(|e| DispatchError::DeliveryFailed(eyre!(e)))?;

    retry_policy
        .retry(
            || {
                email_client.send_email(
                    &request.email,
                    VERIFICATION_EMAIL_SUBJECT,
                    &content,
                )
            },
            |_| true,
        )
        .await
        .map_err(DispatchError::DeliveryFailed)
}
