use color_eyre::eyre::Result;
use secrecy::ExposeSecret;

use crate::domain::{Email, EmailClient};

/// Logs emails instead of sending them. Used when no email provider token is
/// configured.
pub struct MockEmailClient;

#[async_trait::async_trait]
impl EmailClient for MockEmailClient {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<()> {
        // Content carries the verification link, keep it out of the logs.
        tracing::debug!(
            recipient = %recipient.as_ref().expose_secret(),
            subject,
            content_length = content.len(),
            "Sending email"
        );

        Ok(())
    }
}
