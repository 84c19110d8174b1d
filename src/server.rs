// The `/api/chat` proxy route.
// `POST /api/chat` with `{"messages": [{"role", "content"}, ...]}` answers
// `{"text": ...}`, or `{"error": ...}` with 400 for bad input and 500 for
// missing credentials or a failed provider call.

use crate::chat::{self, ChatError, ChatMessage};
use crate::config::ProviderConfig;
use crate::error::Error;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{error, info, warn};

#[derive(Clone)]
struct AppState {
    config: Arc<ProviderConfig>,
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match self {
            ChatError::EmptyConversation | ChatError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ChatError::MissingCredentials(_) | ChatError::Provider(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

pub fn router(config: ProviderConfig) -> Router {
    Router::new()
        .route("/api/chat", post(chat_handler))
        .with_state(AppState { config: Arc::new(config) })
}

/// Pull `messages` out of the body. Missing, non-array and empty all count
/// as "no messages".
fn parse_messages(body: &[u8]) -> Result<Vec<ChatMessage>, ChatError> {
    let value: Value =
        serde_json::from_slice(body).map_err(|e| ChatError::InvalidRequest(e.to_string()))?;
    let Some(list) = value.get("messages").and_then(Value::as_array) else {
        return Err(ChatError::EmptyConversation);
    };
    let messages: Vec<ChatMessage> = serde_json::from_value(Value::Array(list.clone()))
        .map_err(|e| ChatError::InvalidRequest(e.to_string()))?;
    chat::validate(&messages)?;
    Ok(messages)
}

async fn chat_handler(State(state): State<AppState>, body: Bytes) -> Result<Json<Value>, ChatError> {
    let messages = parse_messages(&body).inspect_err(|e| warn!("rejected chat request: {e}"))?;

    match chat::complete(&state.config, &messages).await {
        Ok(text) => Ok(Json(json!({ "text": text }))),
        Err(e) => {
            error!("chat completion failed: {e}");
            Err(e)
        }
    }
}

pub async fn serve(addr: SocketAddr, config: ProviderConfig) -> Result<(), Error> {
    let listener = tokio::net::TcpListener::bind(addr).await.map_err(Error::Server)?;
    info!(%addr, "chat route listening");
    axum::serve(listener, router(config)).await.map_err(Error::Server)
}
