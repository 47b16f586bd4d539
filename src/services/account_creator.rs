use color_eyre::eyre::{eyre, Result};
use secrecy::{ExposeSecret, Secret};
use serde_json::{Map, Value};

use crate::{
    app_state::{
        AccountStoreType, AccountSubscriberType, AppState, EmailValidatorType,
        VerificationDispatcherType,
    },
    domain::{
        Account, AccountCreationError, AccountPasswordHash, AccountStoreError,
        AccountSubmission, AccountSubscriber, Email, FieldErrors, Password,
        PersonName, Role, RunMode, Username, VerificationRequest,
        VerificationSettings,
    },
};

const USERNAME_TAKEN_MESSAGE: &str =
    "A user with that username already exists.";

/// Turns a submitted field set into a persisted account with a verification
/// email on its way.
pub struct AccountCreator {
    account_store: AccountStoreType,
    email_validator: EmailValidatorType,
    dispatcher: VerificationDispatcherType,
    subscriber: AccountSubscriberType,
    verification: VerificationSettings,
}

impl AccountCreator {
    pub fn new(
        account_store: AccountStoreType,
        email_validator: EmailValidatorType,
        dispatcher: VerificationDispatcherType,
        subscriber: AccountSubscriberType,
        verification: VerificationSettings,
    ) -> Self {
        Self {
            account_store,
            email_validator,
            dispatcher,
            subscriber,
            verification,
        }
    }

    pub fn from_state(state: &AppState) -> Self {
        Self::new(
            state.account_store.clone(),
            state.email_validator.clone(),
            state.verification_dispatcher.clone(),
            state.account_subscriber.clone(),
            state.verification.clone(),
        )
    }

    /// Creating an account for an email that is already registered returns
    /// the registered account. Unverified accounts get their verification
    /// re-sent, so a failed attempt can be retried by submitting again.
    #[tracing::instrument(name = "Creating account", skip_all)]
    pub async fn create(
        &self,
        submission: AccountSubmission,
    ) -> Result<Account, AccountCreationError> {
        let role = Role::parse(&submission.role)?;
        let email = match Email::parse(Secret::new(submission.email.clone())) {
            Ok(email) => email,
            Err(e) => {
                // Nothing to look up, so report every field at once.
                let mut errors = FieldErrors::single("email", e.as_ref());
                if let Err(others) = NewAccountFields::parse(submission) {
                    errors.merge(others);
                }
                return Err(errors.into());
            }
        };

        let existing = self
            .account_store
            .read()
            .await
            .find_by_email(&email)
            .await
            .map_err(|e| AccountCreationError::UnexpectedError(eyre!(e)))?;

        let account = match existing {
            Some(account) => {
                tracing::debug!("account already registered, reusing it");
                account
            }
            None => self.insert(role, email, submission).await?,
        };

        if account.email_verified {
            return Ok(account);
        }

        self.check_deliverability(&account).await?;
        self.send_verification(&account)?;
        self.subscriber
            .subscribe(&account)
            .await
            .map_err(AccountCreationError::UnexpectedError)?;

        Ok(account)
    }

    async fn insert(
        &self,
        role: Role,
        email: Email,
        submission: AccountSubmission,
    ) -> Result<Account, AccountCreationError> {
        let fields = NewAccountFields::parse(submission)?;

        let password_hash = AccountPasswordHash::from_password(fields.password)
            .await
            .map_err(AccountCreationError::UnexpectedError)?;

        let account = Account::new(
            fields.username,
            email,
            password_hash,
            fields.first_name,
            fields.last_name,
            role,
            fields.extra,
        );

        self.account_store
            .write()
            .await
            .insert_or_fetch(account)
            .await
            .map_err(|e| match e {
                AccountStoreError::UsernameTaken => {
                    FieldErrors::single("username", USERNAME_TAKEN_MESSAGE)
                        .into()
                }
                e => AccountCreationError::UnexpectedError(eyre!(e)),
            })?
            .ok_or(AccountCreationError::AccountCreationFailed)
    }

    async fn check_deliverability(
        &self,
        account: &Account,
    ) -> Result<(), AccountCreationError> {
        match self.verification.run_mode {
            RunMode::Debug => {
                tracing::debug!("debug mode, skipping deliverability check");
                Ok(())
            }
            RunMode::Production => {
                let deliverable = self
                    .email_validator
                    .validate(&account.email)
                    .await
                    .map_err(AccountCreationError::ValidatorUnavailable)?;
                if deliverable {
                    Ok(())
                } else {
                    Err(AccountCreationError::EmailNotValid)
                }
            }
        }
    }

    fn send_verification(
        &self,
        account: &Account,
    ) -> Result<(), AccountCreationError> {
        let request = VerificationRequest::new(
            account.email.clone(),
            &self.verification.base_url,
            account.email_verification_code.clone(),
        );

        // The handle is dropped: delivery happens in the background.
        let handle = self
            .dispatcher
            .enqueue(request)
            .map_err(AccountCreationError::DispatchFailed)?;
        tracing::debug!(job_id = %handle.id(), "verification email dispatched");

        Ok(())
    }
}

struct NewAccountFields {
    username: Username,
    password: Password,
    first_name: PersonName,
    last_name: PersonName,
    extra: Map<String, Value>,
}

impl NewAccountFields {
    fn parse(submission: AccountSubmission) -> Result<Self, FieldErrors> {
        match (
            Username::parse(submission.username),
            Password::parse(submission.password),
            PersonName::parse(submission.first_name),
            PersonName::parse(submission.last_name),
        ) {
            (Ok(username), Ok(password), Ok(first_name), Ok(last_name)) => {
                Ok(Self {
                    username,
                    password,
                    first_name,
                    last_name,
                    extra: submission.extra,
                })
            }
            (username, password, first_name, last_name) => {
                let mut errors = FieldErrors::default();
                errors.record("username", username.err());
                errors.record("password", password.err());
                errors.record("first_name", first_name.err());
                errors.record("last_name", last_name.err());
                Err(errors)
            }
        }
    }
}

/// Subscriber used until a mailing-list integration exists.
pub struct NoSubscription;

#[async_trait::async_trait]
impl AccountSubscriber for NoSubscription {
    async fn subscribe(&self, account: &Account) -> Result<()> {
        tracing::debug!(
            email = %account.email.as_ref().expose_secret(),
            "no subscription configured"
        );
        Ok(())
    }
}
