use color_eyre::eyre::{eyre, Result};
use secrecy::{ExposeSecret, Secret};
use serde_json::{Map, Value};
use sqlx::{types::Json, PgPool};

use crate::domain::{
    Account, AccountId, AccountPasswordHash, AccountStore, AccountStoreError,
    Email, PersonName, Role, Username, VerificationCode,
};

const ACCOUNT_COLUMNS: &str = "id, username, email, password_hash, first_name, last_name, role_id, email_verification_code, email_verified, extra";

pub struct PostgresAccountStore {
    pool: PgPool,
}

impl PostgresAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: uuid::Uuid,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    role_id: i16,
    email_verification_code: uuid::Uuid,
    email_verified: bool,
    extra: Json<Map<String, Value>>,
}

fn unexpected<E>(e: E) -> AccountStoreError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AccountStoreError::UnexpectedError(eyre!(e))
}

impl TryFrom<AccountRow> for Account {
    type Error = AccountStoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        Ok(Account {
            id: AccountId::new(row.id),
            username: Username::parse(row.username)
                .map_err(unexpected)?,
            email: Email::parse(Secret::new(row.email))
                .map_err(unexpected)?,
            password_hash: AccountPasswordHash::parse(Secret::new(
                row.password_hash,
            ))
            .map_err(AccountStoreError::UnexpectedError)?,
            first_name: PersonName::parse(row.first_name)
                .map_err(unexpected)?,
            last_name: PersonName::parse(row.last_name)
                .map_err(unexpected)?,
            role: Role::try_from(i64::from(row.role_id))
                .map_err(unexpected)?,
            email_verification_code: VerificationCode::parse(Secret::new(
                row.email_verification_code.to_string(),
            ))
            .map_err(AccountStoreError::UnexpectedError)?,
            email_verified: row.email_verified,
            extra: row.extra.0,
        })
    }
}

#[async_trait::async_trait]
impl AccountStore for PostgresAccountStore {
    #[tracing::instrument(name = "Retrieving account by email from PostgreSQL", skip_all)]
    async fn find_by_email(
        &self,
        email: &Email,
    ) -> Result<Option<Account>, AccountStoreError> {
        sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE email = $1"
        ))
        .bind(email.as_ref().expose_secret())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AccountStoreError::UnexpectedError(eyre!(e)))?
        .map(Account::try_from)
        .transpose()
    }

    // ON CONFLICT on email makes the existence check and the insert one
    // statement; a username conflict still raises a unique violation.
    #[tracing::instrument(name = "Inserting account into PostgreSQL", skip_all)]
    async fn insert_or_fetch(
        &mut self,
        account: Account,
    ) -> Result<Option<Account>, AccountStoreError> {
        let inserted = sqlx::query_as::<_, AccountRow>(&format!(
            r#"
            INSERT INTO accounts ({ACCOUNT_COLUMNS})
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            ON CONFLICT (email) DO NOTHING
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(account.id.as_ref())
        .bind(account.username.as_ref())
        .bind(account.email.as_ref().expose_secret())
        .bind(account.password_hash.as_ref().expose_secret())
        .bind(account.first_name.as_ref())
        .bind(account.last_name.as_ref())
        .bind(account.role.id())
        .bind(
            uuid::Uuid::try_parse(
                account.email_verification_code.as_ref().expose_secret(),
            )
            .map_err(unexpected)?,
        )
        .bind(account.email_verified)
        .bind(Json(&account.extra))
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                AccountStoreError::UsernameTaken
            }
            err => AccountStoreError::UnexpectedError(eyre!(err)),
        })?;

        match inserted {
            Some(row) => Account::try_from(row).map(Some),
            None => self.find_by_email(&account.email).await,
        }
    }

    #[tracing::instrument(name = "Retrieving account by id from PostgreSQL", skip_all)]
    async fn get_account(
        &self,
        id: &AccountId,
    ) -> Result<Account, AccountStoreError> {
        sqlx::query_as::<_, AccountRow>(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE id = $1"
        ))
        .bind(id.as_ref())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => AccountStoreError::AccountNotFound,
            err => AccountStoreError::UnexpectedError(eyre!(err)),
        })
        .and_then(Account::try_from)
    }
}
