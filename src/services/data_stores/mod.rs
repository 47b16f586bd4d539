mod hashmap_account_store;
mod hashmap_chat_store;
mod postgres_account_store;
mod postgres_chat_store;

pub use hashmap_account_store::*;
pub use hashmap_chat_store::*;
pub use postgres_account_store::*;
pub use postgres_chat_store::*;
