use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{AccountId, MessageId, RoomId, ValidationError};

const MAX_ROOM_NAME_LENGTH: usize = 256;
const MAX_MESSAGE_BODY_LENGTH: usize = 4096;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomName(String);

impl RoomName {
    pub fn parse(name: String) -> Result<Self, ValidationError> {
        match name.trim().chars().count() {
            0 => Err(ValidationError::new(
                "Room name cannot be empty".to_owned(),
            )),
            x if x > MAX_ROOM_NAME_LENGTH => Err(ValidationError::new(format!(
                "Max room name length is {MAX_ROOM_NAME_LENGTH} characters"
            ))),
            _ => Ok(Self(name.trim().to_owned())),
        }
    }
}

impl AsRef<str> for RoomName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageBody(String);

impl MessageBody {
    pub fn parse(body: String) -> Result<Self, ValidationError> {
        if body.trim().is_empty() {
            return Err(ValidationError::new(
                "Message body cannot be empty".to_owned(),
            ));
        }
        if body.chars().count() > MAX_MESSAGE_BODY_LENGTH {
            return Err(ValidationError::new(format!(
                "Max message body length is {MAX_MESSAGE_BODY_LENGTH} characters"
            )));
        }
        Ok(Self(body))
    }
}

impl AsRef<str> for MessageBody {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: RoomName,
    pub created: DateTime<Utc>,
    pub modified: Option<DateTime<Utc>>,
}

impl Room {
    pub fn new(name: RoomName) -> Self {
        Self {
            id: RoomId::default(),
            name,
            created: Utc::now(),
            modified: None,
        }
    }
}

/// Direct message from one account to another. Only one message may exist per
/// ordered (sender, receiver) pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub id: MessageId,
    pub sender: AccountId,
    pub receiver: AccountId,
    pub body: MessageBody,
    pub created: DateTime<Utc>,
    pub modified: Option<DateTime<Utc>>,
}

impl Message {
    pub fn new(sender: AccountId, receiver: AccountId, body: MessageBody) -> Self {
        Self {
            id: MessageId::default(),
            sender,
            receiver,
            body,
            created: Utc::now(),
            modified: None,
        }
    }
}
