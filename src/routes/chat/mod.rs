mod get_messages;
mod new_room;
mod send_message;

pub use get_messages::get_messages;
pub use new_room::*;
pub use send_message::*;
