use crate::helpers::{get_random_email, get_random_username};
use job_market::{
    domain::{
        Account, AccountPasswordHash, AccountStore, AccountStoreError,
        AccountSubmission, ChatStore, ChatStoreError, Email, Message,
        MessageBody, Password, PersonName, Role, RunMode, Username,
        VerificationSettings,
    },
    services::{
        data_stores::{PostgresAccountStore, PostgresChatStore},
        mailboxlayer_email_validator::MailboxlayerEmailValidator,
        mock_email_client::MockEmailClient,
        verification_queue::VerificationQueue,
        AccountCreator, NoSubscription,
    },
    utils::constants::test,
};
use secrecy::Secret;
use serde_json::json;
use sqlx::{
    postgres::{PgConnectOptions, PgPoolOptions},
    Connection, Executor, PgConnection, PgPool,
};
use std::{str::FromStr, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";

/// Throwaway database with migrations applied. Tests using it are skipped
/// when `DATABASE_URL` is not set.
struct TempDatabase {
    server: PgConnectOptions,
    name: String,
    pool: PgPool,
}

impl TempDatabase {
    async fn create() -> Option<Self> {
        let Ok(url) = std::env::var(DATABASE_URL_ENV_VAR) else {
            eprintln!("{DATABASE_URL_ENV_VAR} not set, skipping Postgres test");
            return None;
        };
        let server = PgConnectOptions::from_str(&url)
            .expect("Failed to parse PostgreSQL connection string");
        let name = format!("job_market_{}", Uuid::new_v4().simple());

        let mut connection = PgConnection::connect_with(&server)
            .await
            .expect("Failed to connect to Postgres");
        connection
            .execute(format!(r#"CREATE DATABASE "{name}";"#).as_str())
            .await
            .expect("Failed to create database.");

        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect_with(server.clone().database(&name))
            .await
            .expect("Failed to create Postgres connection pool.");
        sqlx::migrate!()
            .run(&pool)
            .await
            .expect("Failed to migrate the database");

        Some(Self { server, name, pool })
    }

    async fn delete(self) {
        self.pool.close().await;

        let mut connection = PgConnection::connect_with(&self.server)
            .await
            .expect("Failed to connect to Postgres");
        connection
            .execute(
                format!(r#"DROP DATABASE "{}" WITH (FORCE);"#, self.name)
                    .as_str(),
            )
            .await
            .expect("Failed to drop the database.");
    }
}

async fn new_account(email: &str, username: &str) -> Account {
    let password = Password::parse(Secret::new("x".to_owned())).unwrap();
    Account::new(
        Username::parse(username.to_owned()).unwrap(),
        Email::parse(Secret::new(email.to_owned())).unwrap(),
        AccountPasswordHash::from_password(password).await.unwrap(),
        PersonName::parse("A".to_owned()).unwrap(),
        PersonName::parse("L".to_owned()).unwrap(),
        Role::Performer,
        serde_json::Map::new(),
    )
}

#[tokio::test]
async fn insert_or_fetch_returns_first_row_for_repeated_email() {
    let Some(db) = TempDatabase::create().await else {
        return;
    };
    let mut store = PostgresAccountStore::new(db.pool.clone());
    let email = get_random_email();

    let first = new_account(&email, &get_random_username()).await;
    let stored = store
        .insert_or_fetch(first.clone())
        .await
        .expect("First insert should succeed")
        .expect("First insert should return the row");
    assert_eq!(stored, first);

    let second = new_account(&email, &get_random_username()).await;
    let fetched = store
        .insert_or_fetch(second)
        .await
        .expect("Repeated email should not fail")
        .expect("Repeated email should return the stored row");
    assert_eq!(fetched, first);

    assert_eq!(store.get_account(&first.id).await.unwrap(), first);

    db.delete().await;
}

#[tokio::test]
async fn insert_or_fetch_rejects_taken_username() {
    let Some(db) = TempDatabase::create().await else {
        return;
    };
    let mut store = PostgresAccountStore::new(db.pool.clone());
    let username = get_random_username();

    store
        .insert_or_fetch(new_account(&get_random_email(), &username).await)
        .await
        .unwrap();
    let result = store
        .insert_or_fetch(new_account(&get_random_email(), &username).await)
        .await;

    assert_eq!(result, Err(AccountStoreError::UsernameTaken));

    db.delete().await;
}

#[tokio::test]
async fn add_message_rejects_second_message_for_same_pair() {
    let Some(db) = TempDatabase::create().await else {
        return;
    };
    let mut accounts = PostgresAccountStore::new(db.pool.clone());
    let mut chat = PostgresChatStore::new(db.pool.clone());

    let sender = new_account(&get_random_email(), &get_random_username()).await;
    let receiver =
        new_account(&get_random_email(), &get_random_username()).await;
    accounts.insert_or_fetch(sender.clone()).await.unwrap();
    accounts.insert_or_fetch(receiver.clone()).await.unwrap();

    let body = MessageBody::parse("Hello".to_owned()).unwrap();
    let first = Message::new(sender.id, receiver.id, body.clone());
    chat.add_message(&first).await.expect("First message should be stored");

    let second = Message::new(sender.id, receiver.id, body.clone());
    assert_eq!(
        chat.add_message(&second).await,
        Err(ChatStoreError::MessageAlreadyExists)
    );

    let reply = Message::new(receiver.id, sender.id, body);
    chat.add_message(&reply).await.expect("Reply should be stored");

    let messages = chat.get_messages(&sender.id, &receiver.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].id, first.id);

    db.delete().await;
}

fn creator(pool: PgPool) -> (AccountCreator, tokio::task::JoinHandle<()>) {
    let (queue, worker) =
        VerificationQueue::start(Arc::new(MockEmailClient), 16, test::retry::POLICY);
    let email_validator = Arc::new(MailboxlayerEmailValidator::new(
        "http://127.0.0.1:9".to_owned(),
        Secret::new("unused".to_owned()),
        reqwest::Client::new(),
        test::retry::POLICY,
    ));
    let creator = AccountCreator::new(
        Arc::new(RwLock::new(PostgresAccountStore::new(pool))),
        email_validator,
        Arc::new(queue),
        Arc::new(NoSubscription),
        VerificationSettings {
            base_url: "http://localhost:8080/verify/".to_owned(),
            run_mode: RunMode::Debug,
        },
    );
    (creator, worker)
}

fn submission(email: &str) -> AccountSubmission {
    serde_json::from_value(json!({
        "username": get_random_username(),
        "email": email,
        "password": "x",
        "role": 1
    }))
    .expect("submission should deserialise")
}

#[tokio::test]
async fn concurrent_signups_for_one_email_create_one_account() {
    let Some(db) = TempDatabase::create().await else {
        return;
    };
    // Separate creators and stores, as two server instances would have.
    let (first_creator, first_worker) = creator(db.pool.clone());
    let (second_creator, second_worker) = creator(db.pool.clone());
    let email = get_random_email();

    let (first, second) = tokio::join!(
        first_creator.create(submission(&email)),
        second_creator.create(submission(&email)),
    );
    let first = first.expect("First signup should succeed");
    let second = second.expect("Second signup should succeed");
    assert_eq!(first.id, second.id);

    let count: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM accounts WHERE email = $1")
            .bind(&email)
            .fetch_one(&db.pool)
            .await
            .unwrap();
    assert_eq!(count, 1);

    first_worker.abort();
    second_worker.abort();
    db.delete().await;
}
