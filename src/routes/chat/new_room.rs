use axum::{extract::State, http::StatusCode, Json};
use color_eyre::eyre::eyre;
use serde::{Deserialize, Serialize};

use crate::{
    domain::{ChatAPIError, Room, RoomName},
    AppState,
};

#[tracing::instrument(name = "Create chat room route handler", skip_all)]
pub async fn new_room(
    State(state): State<AppState>,
    Json(request): Json<NewRoomRequest>,
) -> Result<(StatusCode, Json<NewRoomResponse>), ChatAPIError> {
    let room = Room::new(RoomName::parse(request.name)?);

    state
        .chat_store
        .write()
        .await
        .add_room(&room)
        .await
        .map_err(|e| ChatAPIError::UnexpectedError(eyre!(e)))?;

    let response = Json(NewRoomResponse {
        id: room.id.as_ref().to_string(),
        name: room.name.as_ref().to_owned(),
    });

    Ok((StatusCode::CREATED, response))
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct NewRoomResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, PartialEq, Deserialize)]
pub struct NewRoomRequest {
    pub name: String,
}
