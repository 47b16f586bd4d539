use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use color_eyre::eyre::eyre;
use serde::Deserialize;

use crate::{
    domain::{AccountId, ChatAPIError, Message},
    AppState,
};

#[derive(Deserialize)]
pub struct QueryParams {
    sender: String,
    receiver: String,
}

#[tracing::instrument(name = "Get messages route handler", skip_all)]
pub async fn get_messages(
    State(state): State<AppState>,
    query_params: Query<QueryParams>,
) -> Result<(StatusCode, Json<Vec<Message>>), ChatAPIError> {
    let sender = AccountId::parse(&query_params.sender)?;
    let receiver = AccountId::parse(&query_params.receiver)?;
    tracing::debug!(
        "sender: {}, receiver: {}",
        sender.as_ref(),
        receiver.as_ref()
    );

    let messages = state
        .chat_store
        .read()
        .await
        .get_messages(&sender, &receiver)
        .await
        .map_err(|e| ChatAPIError::UnexpectedError(eyre!(e)))?;

    Ok((StatusCode::OK, Json(messages)))
}
