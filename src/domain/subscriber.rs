use super::Account;
use color_eyre::eyre::Result;

/// Hook run after a verification email has been queued for an account.
#[async_trait::async_trait]
pub trait AccountSubscriber {
    async fn subscribe(&self, account: &Account) -> Result<()>;
}
