use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

use crate::{
    app_state::AppState,
    domain::{Account, AccountCreationError, AccountSubmission},
    services::AccountCreator,
};

#[tracing::instrument(name = "Signup", skip_all)]
pub async fn signup(
    State(state): State<AppState>,
    Json(request): Json<AccountSubmission>,
) -> Result<impl IntoResponse, AccountCreationError> {
    let account = AccountCreator::from_state(&state).create(request).await?;

    let response = Json(SignupResponse::from(&account));

    Ok((StatusCode::CREATED, response))
}

#[derive(Debug, Deserialize, PartialEq, Serialize)]
pub struct SignupResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: i16,
    pub email_verified: bool,
}

impl From<&Account> for SignupResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.as_ref().to_string(),
            username: account.username.as_ref().to_owned(),
            email: account.email.as_ref().expose_secret().to_owned(),
            first_name: account.first_name.as_ref().to_owned(),
            last_name: account.last_name.as_ref().to_owned(),
            role: account.role.id(),
            email_verified: account.email_verified,
        }
    }
}
