use axum::{extract::State, http::StatusCode, Json};
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    domain::{
        AccountId, AccountStoreError, ChatAPIError, ChatStoreError, Message,
        MessageBody,
    },
    AppState,
};

#[tracing::instrument(name = "Send message route handler", skip_all)]
pub async fn send_message(
    State(state): State<AppState>,
    Json(request): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<Message>), ChatAPIError> {
    let sender = AccountId::parse(&request.sender)?;
    let receiver = AccountId::parse(&request.receiver)?;
    let body = MessageBody::parse(request.body)?;

    {
        let account_store = state.account_store.read().await;
        for id in [&sender, &receiver] {
            account_store.get_account(id).await.map_err(|e| match e {
                AccountStoreError::AccountNotFound => {
                    ChatAPIError::AccountNotFound(*id.as_ref())
                }
                e => ChatAPIError::UnexpectedError(eyre!(e)),
            })?;
        }
    }

    let message = Message::new(sender, receiver, body);

    state
        .chat_store
        .write()
        .await
        .add_message(&message)
        .await
        .map_err(|e| match e {
            ChatStoreError::MessageAlreadyExists => {
                ChatAPIError::MessageAlreadyExists
            }
            e => ChatAPIError::UnexpectedError(eyre!(e)),
        })?;

    Ok((StatusCode::CREATED, Json(message)))
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct SendMessageRequest {
    pub sender: String,
    pub receiver: String,
    pub body: String,
}
