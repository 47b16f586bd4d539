use std::collections::HashMap;

use crate::domain::{
    AccountId, ChatStore, ChatStoreError, Message, Room, RoomId,
};

#[derive(Default)]
pub struct HashmapChatStore {
    rooms: HashMap<RoomId, Room>,
    messages: HashMap<(AccountId, AccountId), Message>,
}

#[async_trait::async_trait]
impl ChatStore for HashmapChatStore {
    async fn add_room(&mut self, room: &Room) -> Result<(), ChatStoreError> {
        self.rooms.insert(room.id, room.clone());
        Ok(())
    }

    async fn add_message(
        &mut self,
        message: &Message,
    ) -> Result<(), ChatStoreError> {
        let key = (message.sender, message.receiver);
        if self.messages.contains_key(&key) {
            return Err(ChatStoreError::MessageAlreadyExists);
        }
        self.messages.insert(key, message.clone());
        Ok(())
    }

    async fn get_messages(
        &self,
        sender: &AccountId,
        receiver: &AccountId,
    ) -> Result<Vec<Message>, ChatStoreError> {
        Ok(self
            .messages
            .get(&(*sender, *receiver))
            .cloned()
            .into_iter()
            .collect())
    }
}
