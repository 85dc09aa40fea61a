use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{Extension, Json, Router};
use scheme_finder::eligibility::{eligibility_router, EligibilityEngine};
use scheme_finder::intake::{intake_router, IntakeService, SessionStore};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_scheme_routes<S>(
    engine: Arc<EligibilityEngine>,
    intake: Arc<IntakeService<S>>,
) -> Router
where
    S: SessionStore + 'static,
{
    eligibility_router(engine)
        .merge(intake_router(intake))
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use scheme_finder::config::{IntakeConfig, KnowledgeBaseConfig};
    use scheme_finder::intake::InMemorySessionStore;
    use std::sync::atomic::{AtomicBool, Ordering};
    use tower::ServiceExt;

    fn app(ready: bool) -> (Router, Arc<AtomicBool>) {
        let engine = crate::infra::build_engine(&KnowledgeBaseConfig::default())
            .expect("bundled catalogue");
        let intake = Arc::new(IntakeService::new(
            Arc::new(InMemorySessionStore::new()),
            engine.clone(),
            IntakeConfig::default(),
        ));
        let readiness = Arc::new(AtomicBool::new(ready));
        let state = AppState {
            readiness: readiness.clone(),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        let router = with_scheme_routes(engine, intake).layer(Extension(state));
        (router, readiness)
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&bytes).expect("json payload")
    }

    #[tokio::test]
    async fn readiness_follows_the_flag() {
        let (router, readiness) = app(false);

        let response = router
            .clone()
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json_body(response).await["status"], "initializing");

        readiness.store(true, Ordering::Release);
        let response = router
            .oneshot(Request::get("/ready").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn health_and_metrics_are_served() {
        let (router, _) = app(true);

        let health = router
            .clone()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(json_body(health).await["status"], "ok");

        let metrics = router
            .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
            .await
            .expect("route executes");
        assert_eq!(metrics.status(), StatusCode::OK);
        assert_eq!(
            metrics.headers()[header::CONTENT_TYPE],
            "text/plain; version=0.0.4"
        );
    }

    #[tokio::test]
    async fn eligibility_and_intake_routes_are_mounted() {
        let (router, _) = app(true);

        let eligibility = router
            .clone()
            .oneshot(
                Request::post("/api/v1/eligibility?region=WB")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(
                        r#"{"occupation":"farmer","land_owned":true,"annual_income":40000,"has_ration_card":true}"#,
                    ))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(eligibility.status(), StatusCode::OK);
        let payload = json_body(eligibility).await;
        assert_eq!(payload["eligible_schemes"][1]["scheme_id"], "krishak-bandhu");

        let turn = router
            .oneshot(
                Request::post("/api/v1/intake/turn")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"identity":"+919600000001","body":"hi"}"#))
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(turn.status(), StatusCode::OK);
        assert_eq!(json_body(turn).await["stage"], "language_select");
    }
}
