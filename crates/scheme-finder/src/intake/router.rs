use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::service::{IntakeService, IntakeServiceError};
use super::store::SessionStore;

/// JSON body for the channel-neutral turn endpoint.
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    pub identity: String,
    #[serde(default)]
    pub body: String,
}

/// Form fields posted by the messaging gateway webhook.
#[derive(Debug, Deserialize)]
pub struct InboundMessage {
    #[serde(rename = "From", default)]
    pub from: String,
    #[serde(rename = "Body", default)]
    pub body: String,
}

/// Router builder exposing the conversational intake endpoints.
pub fn intake_router<S>(service: Arc<IntakeService<S>>) -> Router
where
    S: SessionStore + 'static,
{
    Router::new()
        .route("/api/v1/intake/turn", post(turn_handler::<S>))
        .route("/api/v1/intake/whatsapp", post(whatsapp_handler::<S>))
        .route(
            "/api/v1/intake/sessions/:identity/guide",
            get(guide_handler::<S>),
        )
        .with_state(service)
}

fn error_response(error: IntakeServiceError) -> Response {
    let status = match error {
        IntakeServiceError::MissingIdentity => StatusCode::BAD_REQUEST,
        IntakeServiceError::UnknownIdentity | IntakeServiceError::NoOutcome => {
            StatusCode::NOT_FOUND
        }
        IntakeServiceError::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
        IntakeServiceError::Guide(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    if status.is_server_error() {
        warn!(%error, "intake request failed");
    }
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn turn_handler<S>(
    State(service): State<Arc<IntakeService<S>>>,
    axum::Json(request): axum::Json<TurnRequest>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.handle_turn(&request.identity, &request.body) {
        Ok(reply) => (StatusCode::OK, axum::Json(reply)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn whatsapp_handler<S>(
    State(service): State<Arc<IntakeService<S>>>,
    Form(message): Form<InboundMessage>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.handle_turn(&message.from, &message.body) {
        Ok(reply) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "application/xml")],
            twiml(&reply.reply),
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn guide_handler<S>(
    State(service): State<Arc<IntakeService<S>>>,
    Path(identity): Path<String>,
) -> Response
where
    S: SessionStore + 'static,
{
    match service.guide(&identity) {
        Ok(artifact) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, artifact.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact.file_name),
                ),
            ],
            artifact.bytes,
        )
            .into_response(),
        Err(error) => error_response(error),
    }
}

/// Wraps a reply in the messaging gateway's XML envelope.
pub fn twiml(message: &str) -> String {
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?><Response><Message>{}</Message></Response>",
        escape_xml(message)
    )
}

fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            other => escaped.push(other),
        }
    }
    escaped
}
