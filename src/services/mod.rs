pub mod account_creator;
pub mod data_stores;
pub mod mailboxlayer_email_validator;
pub mod mock_email_client;
pub mod postmark_email_client;
pub mod retry;
pub mod verification_queue;

pub use account_creator::*;
pub use retry::*;
