use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{
    AccountStore, AccountSubscriber, ChatStore, EmailClient, EmailValidator,
    VerificationDispatcher, VerificationSettings,
};
pub type AccountStoreType = Arc<RwLock<dyn AccountStore + Send + Sync>>;
pub type ChatStoreType = Arc<RwLock<dyn ChatStore + Send + Sync>>;
pub type EmailValidatorType = Arc<dyn EmailValidator + Send + Sync>;
pub type EmailClientType = Arc<dyn EmailClient + Send + Sync>;
pub type VerificationDispatcherType =
    Arc<dyn VerificationDispatcher + Send + Sync>;
pub type AccountSubscriberType = Arc<dyn AccountSubscriber + Send + Sync>;

#[derive(Clone)]
pub struct AppState {
    pub account_store: AccountStoreType,
    pub chat_store: ChatStoreType,
    pub email_validator: EmailValidatorType,
    pub verification_dispatcher: VerificationDispatcherType,
    pub account_subscriber: AccountSubscriberType,
    pub verification: VerificationSettings,
}

impl AppState {
    pub fn new(
        account_store: AccountStoreType,
        chat_store: ChatStoreType,
        email_validator: EmailValidatorType,
        verification_dispatcher: VerificationDispatcherType,
        account_subscriber: AccountSubscriberType,
        verification: VerificationSettings,
    ) -> Self {
        Self {
            account_store,
            chat_store,
            email_validator,
            verification_dispatcher,
            account_subscriber,
            verification,
        }
    }
}
