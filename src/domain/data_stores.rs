use super::{Account, AccountId, Email, Message, Room};
use color_eyre::eyre::Report;
use thiserror::Error;

#[async_trait::async_trait]
pub trait AccountStore {
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountStoreError>;

    /// Inserts `account` unless an account with the same email exists, in
    /// which case the existing one is returned. Both happen atomically with
    /// respect to other writers. `None` means the row could not be read back.
    async fn insert_or_fetch(
        &mut self,
        account: Account,
    ) -> Result<Option<Account>, AccountStoreError>;

    async fn get_account(
        &self,
        id: &AccountId,
    ) -> Result<Account, AccountStoreError>;
}

#[derive(Debug, Error)]
pub enum AccountStoreError {
    #[error("Account not found")]
    AccountNotFound,
    #[error("Username already taken")]
    UsernameTaken,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for AccountStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::AccountNotFound, Self::AccountNotFound)
                | (Self::UsernameTaken, Self::UsernameTaken)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}

#[async_trait::async_trait]
pub trait ChatStore {
    async fn add_room(&mut self, room: &Room) -> Result<(), ChatStoreError>;
    async fn add_message(
        &mut self,
        message: &Message,
    ) -> Result<(), ChatStoreError>;
    async fn get_messages(
        &self,
        sender: &AccountId,
        receiver: &AccountId,
    ) -> Result<Vec<Message>, ChatStoreError>;
}

#[derive(Debug, Error)]
pub enum ChatStoreError {
    #[error("Message already exists")]
    MessageAlreadyExists,
    #[error("Unexpected error")]
    UnexpectedError(#[source] Report),
}

impl PartialEq for ChatStoreError {
    fn eq(&self, other: &Self) -> bool {
        matches!(
            (self, other),
            (Self::MessageAlreadyExists, Self::MessageAlreadyExists)
                | (Self::UnexpectedError(_), Self::UnexpectedError(_))
        )
    }
}
