use color_eyre::eyre::{Result, WrapErr};
use job_market::{
    app_state::{AccountStoreType, AppState, ChatStoreType, EmailClientType},
    get_postgres_pool,
    services::{
        data_stores::{
            HashmapAccountStore, HashmapChatStore, PostgresAccountStore,
            PostgresChatStore,
        },
        mailboxlayer_email_validator::MailboxlayerEmailValidator,
        mock_email_client::MockEmailClient,
        postmark_email_client::PostmarkEmailClient,
        verification_queue::{drain_worker, VerificationQueue},
        NoSubscription,
    },
    utils::{constants::prod, settings::Settings, tracing::init_tracing},
    Application,
};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::RwLock;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = Settings::from_env()?;
    tracing::info!(run_mode = ?settings.verification.run_mode, "starting");

    let (account_store, chat_store) = configure_stores(&settings).await?;

    let http_client = Client::builder()
        .timeout(prod::http_client::TIMEOUT)
        .build()
        .wrap_err("Failed to build HTTP client")?;

    let email_validator = Arc::new(MailboxlayerEmailValidator::new(
        settings.mailboxlayer.base_url.clone(),
        settings.mailboxlayer.api_key.clone(),
        http_client.clone(),
        prod::retry::EMAIL_VALIDATION,
    ));

    let email_client: EmailClientType = match &settings.postmark.auth_token {
        Some(token) => Arc::new(PostmarkEmailClient::new(
            settings.postmark.base_url.clone(),
            settings.postmark.sender.clone(),
            token.clone(),
            http_client,
        )),
        None => {
            tracing::warn!("no email provider token configured, emails will only be logged");
            Arc::new(MockEmailClient)
        }
    };

    let (verification_queue, worker) = VerificationQueue::start(
        email_client,
        settings.verification_queue_capacity,
        prod::retry::EMAIL_DELIVERY,
    );

    let app_state = AppState::new(
        account_store,
        chat_store,
        email_validator,
        Arc::new(verification_queue),
        Arc::new(NoSubscription),
        settings.verification.clone(),
    );

    let app = Application::build(app_state, &settings.app_address)
        .await
        .wrap_err("Failed to build app")?;

    // The server owns the last queue handle, so the worker sees the queue
    // close once it returns.
    app.run().await.wrap_err("Failed to run app")?;

    match drain_worker(worker, prod::WORKER_DRAIN_TIMEOUT).await {
        Ok(()) => tracing::info!("verification worker drained"),
        Err(e) => tracing::warn!(error = ?e, "verification worker not drained"),
    }

    Ok(())
}

async fn configure_stores(
    settings: &Settings,
) -> Result<(AccountStoreType, ChatStoreType)> {
    match &settings.database_url {
        Some(url) => {
            let pg_pool = get_postgres_pool(url)
                .await
                .wrap_err("Failed to create Postgres connection pool")?;

            sqlx::migrate!()
                .run(&pg_pool)
                .await
                .wrap_err("Failed to run migrations")?;

            Ok((
                Arc::new(RwLock::new(PostgresAccountStore::new(pg_pool.clone()))),
                Arc::new(RwLock::new(PostgresChatStore::new(pg_pool))),
            ))
        }
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory stores");
            Ok((
                Arc::new(RwLock::new(HashmapAccountStore::default())),
                Arc::new(RwLock::new(HashmapChatStore::default())),
            ))
        }
    }
}
