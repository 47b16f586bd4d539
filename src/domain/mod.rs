mod account;
mod chat;
mod data_stores;
mod email;
mod email_client;
mod email_validator;
mod error;
mod ids;
mod password;
mod password_hash;
mod person_name;
mod role;
mod subscriber;
mod username;
mod verification;
mod verification_code;

pub use account::*;
pub use chat::*;
pub use data_stores::*;
pub use email::*;
pub use email_client::*;
pub use email_validator::*;
pub use error::*;
pub use ids::*;
pub use password::*;
pub use password_hash::*;
pub use person_name::*;
pub use role::*;
pub use subscriber::*;
pub use username::*;
pub use verification::*;
pub use verification_code::*;
