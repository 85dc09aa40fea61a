use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tracing::warn;

use super::domain::Profile;
use super::scheme::{MatchResult, ALL_REGIONS};
use super::view::EligibilityResponse;
use super::EligibilityEngine;
use crate::guide::{GuideRenderer, PlainTextGuide};

/// Optional overrides accepted as query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct EligibilityQuery {
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub lang: Option<String>,
}

/// Router builder exposing the structured (non-conversational) eligibility check.
pub fn eligibility_router(engine: Arc<EligibilityEngine>) -> Router {
    Router::new()
        .route("/api/v1/eligibility", post(eligibility_handler))
        .route("/api/v1/eligibility/guide", post(guide_handler))
        .with_state(engine)
}

fn evaluate(
    engine: &EligibilityEngine,
    query: &EligibilityQuery,
    profile: &Profile,
) -> Result<Vec<MatchResult>, Response> {
    if let Err(error) = profile.validate() {
        let payload = json!({ "error": error.to_string() });
        return Err((StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response());
    }

    let region = query
        .region
        .as_deref()
        .or_else(|| profile.region())
        .unwrap_or(ALL_REGIONS);
    Ok(engine.find_matches(profile, region))
}

pub(crate) async fn eligibility_handler(
    State(engine): State<Arc<EligibilityEngine>>,
    Query(query): Query<EligibilityQuery>,
    axum::Json(profile): axum::Json<Profile>,
) -> Response {
    match evaluate(&engine, &query, &profile) {
        Ok(matches) => {
            let body = EligibilityResponse::from_matches(&matches);
            (StatusCode::OK, axum::Json(body)).into_response()
        }
        Err(response) => response,
    }
}

pub(crate) async fn guide_handler(
    State(engine): State<Arc<EligibilityEngine>>,
    Query(query): Query<EligibilityQuery>,
    axum::Json(profile): axum::Json<Profile>,
) -> Response {
    let matches = match evaluate(&engine, &query, &profile) {
        Ok(matches) => matches,
        Err(response) => return response,
    };

    let language = query.lang.as_deref().unwrap_or("en");
    match PlainTextGuide::new().render(&profile, &matches, language) {
        Ok(artifact) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, artifact.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("inline; filename=\"{}\"", artifact.file_name),
                ),
            ],
            artifact.bytes,
        )
            .into_response(),
        Err(error) => {
            warn!(%error, "guide rendering failed");
            let payload = json!({ "error": error.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
