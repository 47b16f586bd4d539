use axum::{
    http::{Method, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    serve::Serve,
    Json, Router,
};

use color_eyre::eyre::Result;
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::error::Error;
use tokio::signal;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::Level;

use domain::{AccountCreationError, ChatAPIError, FieldErrors};
pub mod routes;
use crate::utils::tracing::*;
use routes::{
    auth::signup,
    chat::{get_messages, new_room, send_message},
};
pub mod app_state;
pub mod domain;
pub mod services;
use app_state::AppState;
pub mod utils;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<FieldErrors>,
}

impl IntoResponse for AccountCreationError {
    fn into_response(self) -> Response {
        let (status, error_message, fields) = match &self {
            AccountCreationError::InvalidRole
            | AccountCreationError::UnknownRole(_)
            | AccountCreationError::EmailNotValid => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, self.to_string(), None)
            }
            AccountCreationError::ValidationError(fields) => {
                log_error_chain(&self, Level::DEBUG);
                (
                    StatusCode::BAD_REQUEST,
                    "Validation error".to_string(),
                    Some(fields.clone()),
                )
            }
            AccountCreationError::ValidatorUnavailable(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Email validation is temporarily unavailable".to_string(),
                    None,
                )
            }
            AccountCreationError::AccountCreationFailed => {
                log_error_chain(&self, Level::ERROR);
                (StatusCode::INTERNAL_SERVER_ERROR, self.to_string(), None)
            }
            AccountCreationError::DispatchFailed(_)
            | AccountCreationError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                    None,
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
            fields,
        });
        (status, body).into_response()
    }
}

impl IntoResponse for ChatAPIError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ChatAPIError::AccountNotFound(id) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::NOT_FOUND, format!("Account not found: {id}"))
            }
            ChatAPIError::MessageAlreadyExists => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::CONFLICT, "Message already exists".to_string())
            }
            ChatAPIError::ValidationError(message) => {
                log_error_chain(&self, Level::DEBUG);
                (StatusCode::BAD_REQUEST, message.as_ref().to_owned())
            }
            ChatAPIError::UnexpectedError(_) => {
                log_error_chain(&self, Level::ERROR);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Unexpected error".to_string(),
                )
            }
        };
        let body = Json(ErrorResponse {
            error: error_message,
            fields: None,
        });
        (status, body).into_response()
    }
}

fn log_error_chain(e: &(dyn Error + 'static), debug_level: Level) {
    let separator =
        "\n-----------------------------------------------------------------------------------\n";
    let mut report = format!("{}{:?}\n", separator, e);
    let mut current = e.source();
    while let Some(cause) = current {
        let str = format!("Caused by:\n\n{:?}", cause);
        report = format!("{}\n{}", report, str);
        current = cause.source();
    }
    report = format!("{}\n{}", report, separator);
    match debug_level {
        Level::ERROR => tracing::error!("{}", report),
        Level::WARN => tracing::warn!("{}", report),
        Level::INFO => tracing::info!("{}", report),
        Level::DEBUG => tracing::debug!("{}", report),
        Level::TRACE => tracing::trace!("{}", report),
    }
}

pub struct Application {
    server: Serve<Router, Router>,
    pub address: String,
}

impl Application {
    pub async fn build(app_state: AppState, address: &str) -> Result<Self> {
        let allowed_origins = [
            "http://localhost:8080".parse()?,
            "http://127.0.0.1:8080".parse()?,
        ];

        let cors = CorsLayer::new()
            .allow_methods([Method::GET, Method::POST])
            .allow_credentials(true)
            .allow_origin(allowed_origins);

        let router = Router::new()
            .route("/auth/signup", post(signup))
            .route("/chat/rooms", post(new_room))
            .route("/chat/messages", post(send_message).get(get_messages))
            .with_state(app_state)
            .layer(cors)
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(make_span_with_request_id)
                    .on_request(on_request)
                    .on_response(on_response),
            );

        let listener = tokio::net::TcpListener::bind(address).await?;
        let address = listener.local_addr()?.to_string();
        let server = axum::serve(listener, router);

        Ok(Application { server, address })
    }

    pub async fn run(self) -> Result<(), std::io::Error> {
        tracing::info!("listening on {}", &self.address);
        self.server.with_graceful_shutdown(shutdown_signal()).await
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = ?e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = ?e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}

pub async fn get_postgres_pool(
    url: &Secret<String>,
) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(5)
        .connect(url.expose_secret())
        .await
}
