use crate::domain::{
    Account, AccountId, AccountStore, AccountStoreError, Email,
};
use std::collections::HashMap;

#[derive(Default)]
pub struct HashmapAccountStore {
    accounts: HashMap<Email, Account>,
}

#[async_trait::async_trait]
impl AccountStore for HashmapAccountStore {
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountStoreError> {
        Ok(self.accounts.get(email).cloned())
    }

    // `&mut self` means the caller holds the store's write lock, so the
    // check and the insert cannot interleave with another writer.
    async fn insert_or_fetch(
        &mut self,
        account: Account,
    ) -> Result<Option<Account>, AccountStoreError> {
        if let Some(existing) = self.accounts.get(&account.email) {
            return Ok(Some(existing.clone()));
        }

        if self
            .accounts
            .values()
            .any(|existing| existing.username == account.username)
        {
            return Err(AccountStoreError::UsernameTaken);
        }

        self.accounts.insert(account.email.clone(), account.clone());
        Ok(Some(account))
    }

    async fn get_account(
        &self,
        id: &AccountId,
    ) -> Result<Account, AccountStoreError> {
        self.accounts
            .values()
            .find(|account| &account.id == id)
            .cloned()
            .ok_or(AccountStoreError::AccountNotFound)
    }
}
