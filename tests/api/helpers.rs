use job_market::{
    app_state::{AccountStoreType, AppState, ChatStoreType},
    domain::{Account, AccountStore, Email, RunMode, VerificationSettings},
    routes::auth::SignupResponse,
    services::{
        data_stores::{HashmapAccountStore, HashmapChatStore},
        mailboxlayer_email_validator::MailboxlayerEmailValidator,
        postmark_email_client::PostmarkEmailClient,
        verification_queue::VerificationQueue,
        NoSubscription,
    },
    utils::constants::test,
    Application,
};
use reqwest::Client;
use secrecy::Secret;
use std::{sync::Arc, time::Duration};
use test_context::AsyncTestContext;
use tokio::{sync::RwLock, task::JoinHandle};
use uuid::Uuid;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, Request, ResponseTemplate,
};

pub const VERIFICATION_BASE_URL: &str = "http://localhost:8080/verify/";
const EMAIL_WAIT: Duration = Duration::from_secs(2);

pub struct TestApp {
    pub address: String,
    pub account_store: AccountStoreType,
    pub email_server: MockServer,
    pub validator_server: MockServer,
    pub http_client: reqwest::Client,
    worker: JoinHandle<()>,
}

impl TestApp {
    pub async fn new(run_mode: RunMode) -> Self {
        let account_store: AccountStoreType =
            Arc::new(RwLock::new(HashmapAccountStore::default()));
        let chat_store: ChatStoreType =
            Arc::new(RwLock::new(HashmapChatStore::default()));

        let validator_server = MockServer::start().await;
        let email_validator = Arc::new(MailboxlayerEmailValidator::new(
            validator_server.uri(),
            Secret::new("test-key".to_owned()),
            configure_http_client(),
            test::retry::POLICY,
        ));

        let email_server = MockServer::start().await;
        Mock::given(path("/email"))
            .and(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&email_server)
            .await;
        let email_client =
            Arc::new(configure_postmark_email_client(email_server.uri()));

        let (verification_queue, worker) =
            VerificationQueue::start(email_client, 16, test::retry::POLICY);

        let app_state = AppState::new(
            account_store.clone(),
            chat_store,
            email_validator,
            Arc::new(verification_queue),
            Arc::new(NoSubscription),
            VerificationSettings {
                base_url: VERIFICATION_BASE_URL.to_owned(),
                run_mode,
            },
        );

        let app = Application::build(app_state, test::APP_ADDRESS)
            .await
            .expect("Failed to build app");
        let address = format!("http://{}", app.address.clone());

        #[allow(clippy::let_underscore_future)]
        let _ = tokio::spawn(app.run());

        let http_client = reqwest::Client::new();

        Self {
            address,
            account_store,
            email_server,
            validator_server,
            http_client,
            worker,
        }
    }

    pub async fn post_signup<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/auth/signup", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_chat_room<Body>(&self, body: &Body) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/chat/rooms", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn post_chat_message<Body>(
        &self,
        body: &Body,
    ) -> reqwest::Response
    where
        Body: serde::Serialize,
    {
        self.http_client
            .post(format!("{}/chat/messages", &self.address))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn get_chat_messages(
        &self,
        sender: &str,
        receiver: &str,
    ) -> reqwest::Response {
        self.http_client
            .get(format!("{}/chat/messages", &self.address))
            .query(&[("sender", sender), ("receiver", receiver)])
            .send()
            .await
            .expect("Failed to execute request")
    }

    pub async fn find_account(&self, email: &str) -> Option<Account> {
        let email = Email::parse(Secret::new(email.to_owned()))
            .expect("Test email should be valid");
        self.account_store
            .read()
            .await
            .find_by_email(&email)
            .await
            .expect("Account store lookup failed")
    }

    /// Polls the email server until at least `count` emails arrived.
    pub async fn wait_for_emails(&self, count: usize) -> Vec<Request> {
        let deadline = tokio::time::Instant::now() + EMAIL_WAIT;
        loop {
            let received = self
                .email_server
                .received_requests()
                .await
                .expect("Request recording is enabled");
            if received.len() >= count {
                return received;
            }
            if tokio::time::Instant::now() >= deadline {
                panic!(
                    "Expected {count} emails, got {} within {EMAIL_WAIT:?}",
                    received.len()
                );
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }

    /// Gives the verification worker a moment, then returns what it sent.
    pub async fn settled_emails(&self) -> Vec<Request> {
        tokio::time::sleep(Duration::from_millis(100)).await;
        self.email_server
            .received_requests()
            .await
            .expect("Request recording is enabled")
    }
}

impl AsyncTestContext for TestApp {
    async fn setup() -> TestApp {
        TestApp::new(RunMode::Debug).await
    }

    async fn teardown(self) {
        self.worker.abort();
    }
}

pub fn get_random_email() -> String {
    format!("{}@example.com", Uuid::new_v4())
}

pub fn get_random_username() -> String {
    format!("user_{}", Uuid::new_v4().simple())
}

pub fn signup_body(email: &str, username: &str, role: i16) -> serde_json::Value {
    serde_json::json!({
        "username": username,
        "email": email,
        "password": "x",
        "first_name": "A",
        "last_name": "L",
        "role": role
    })
}

pub async fn signup(app: &TestApp, role: i16) -> SignupResponse {
    let response = app
        .post_signup(&signup_body(
            &get_random_email(),
            &get_random_username(),
            role,
        ))
        .await;
    assert_eq!(response.status().as_u16(), 201);
    response
        .json::<SignupResponse>()
        .await
        .expect("Could not deserialise response body to SignupResponse")
}

fn configure_http_client() -> Client {
    Client::builder()
        .timeout(test::http_client::TIMEOUT)
        .build()
        .expect("Failed to build HTTP client")
}

fn configure_postmark_email_client(base_url: String) -> PostmarkEmailClient {
    let postmark_auth_token = Secret::new("auth_token".to_owned());

    let sender =
        Email::parse(Secret::new("no-reply@example.com".to_owned())).unwrap();

    PostmarkEmailClient::new(
        base_url,
        sender,
        postmark_auth_token,
        configure_http_client(),
    )
}
