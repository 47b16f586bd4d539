pub mod env {
    pub const APP_ADDRESS_ENV_VAR: &str = "APP_ADDRESS";
    pub const DATABASE_URL_ENV_VAR: &str = "DATABASE_URL";
    pub const DEBUG_ENV_VAR: &str = "DEBUG";
    pub const VERIFICATION_BASE_URL_ENV_VAR: &str = "VERIFICATION_BASE_URL";
    pub const VERIFICATION_QUEUE_CAPACITY_ENV_VAR: &str =
        "VERIFICATION_QUEUE_CAPACITY";
    pub const MAILBOXLAYER_BASE_URL_ENV_VAR: &str = "MAILBOXLAYER_BASE_URL";
    pub const MAILBOXLAYER_API_KEY_ENV_VAR: &str = "MAILBOXLAYER_API_KEY";
    pub const POSTMARK_BASE_URL_ENV_VAR: &str = "POSTMARK_BASE_URL";
    pub const POSTMARK_AUTH_TOKEN_ENV_VAR: &str = "POSTMARK_AUTH_TOKEN";
    pub const POSTMARK_EMAIL_SENDER_ADDRESS_ENV_VAR: &str =
        "POSTMARK_EMAIL_SENDER_ADDRESS";
}

pub const DEFAULT_LOG_FILTER: &str = "job_market=debug,tower_http=debug";
pub const DEFAULT_VERIFICATION_BASE_URL: &str = "http://localhost:8080/verify/";
pub const DEFAULT_VERIFICATION_QUEUE_CAPACITY: usize = 1024;
pub const DEFAULT_MAILBOXLAYER_BASE_URL: &str = "http://apilayer.net";
pub const DEFAULT_POSTMARK_BASE_URL: &str = "https://api.postmarkapp.com";
pub const DEFAULT_EMAIL_SENDER_ADDRESS: &str = "no-reply@localhost";
pub const VERIFICATION_EMAIL_SUBJECT: &str = "Confirm your email address";

pub mod prod {
    use std::time::Duration;

    pub const APP_ADDRESS: &str = "0.0.0.0:3000";
    pub const WORKER_DRAIN_TIMEOUT: Duration = Duration::from_secs(10);

    pub mod http_client {
        use std::time::Duration;

        pub const TIMEOUT: Duration = std::time::Duration::from_secs(10);
    }

    pub mod retry {
        use crate::services::RetryPolicy;
        use std::time::Duration;

        pub const EMAIL_VALIDATION: RetryPolicy = RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(200),
            max_backoff: Duration::from_secs(2),
        };

        pub const EMAIL_DELIVERY: RetryPolicy = RetryPolicy {
            max_attempts: 5,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(10),
        };
    }
}

pub mod test {
    pub const APP_ADDRESS: &str = "127.0.0.1:0";

    pub mod http_client {
        use std::time::Duration;

        pub const TIMEOUT: Duration = std::time::Duration::from_millis(200);
    }

    pub mod retry {
        use crate::services::RetryPolicy;
        use std::time::Duration;

        pub const POLICY: RetryPolicy = RetryPolicy {
            max_attempts: 3,
            initial_backoff: Duration::from_millis(5),
            max_backoff: Duration::from_millis(20),
        };
    }
}
