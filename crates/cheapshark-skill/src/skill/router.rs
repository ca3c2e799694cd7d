use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use tracing::warn;

use super::dispatcher::SkillDispatcher;
use super::envelope::{RequestEnvelope, ResponseEnvelope};

pub const SKILL_ROUTE: &str = "/api/v1/skill";

/// Router builder exposing the skill endpoint.
pub fn skill_router(dispatcher: Arc<SkillDispatcher>) -> Router {
    Router::new()
        .route(SKILL_ROUTE, post(skill_handler))
        .with_state(dispatcher)
}

pub(crate) async fn skill_handler(
    State(dispatcher): State<Arc<SkillDispatcher>>,
    payload: Result<Json<RequestEnvelope>, JsonRejection>,
) -> Response {
    let envelope = match payload {
        Ok(Json(envelope)) => envelope,
        Err(rejection) => return bad_request(rejection.body_text()),
    };

    let request = match envelope.into_request() {
        Ok(request) => request,
        Err(err) => return bad_request(err.to_string()),
    };

    let spoken = dispatcher.dispatch(&request).await;
    (StatusCode::OK, Json(ResponseEnvelope::from(spoken))).into_response()
}

fn bad_request(detail: String) -> Response {
    warn!(%detail, "rejected skill envelope");
    let payload = json!({ "error": detail });
    (StatusCode::BAD_REQUEST, Json(payload)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deals::{DealRecord, DealsError, DealsSource};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use serde_json::Value;
    use tower::ServiceExt;

    struct NoDeals;

    #[async_trait]
    impl DealsSource for NoDeals {
        async fn fetch_deals(&self) -> Result<Vec<DealRecord>, DealsError> {
            Err(DealsError::Retrieval("offline".to_string()))
        }
    }

    fn router() -> Router {
        skill_router(Arc::new(SkillDispatcher::standard(Arc::new(NoDeals))))
    }

    async fn post_json(body: &str) -> (StatusCode, Value) {
        let response = router()
            .oneshot(
                Request::post(SKILL_ROUTE)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .expect("request builds"),
            )
            .await
            .expect("route executes");

        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn launch_envelope_round_trips_through_route() {
        let (status, body) = post_json(r#"{"version":"1.0","request":{"type":"LaunchRequest"}}"#).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["response"]["shouldEndSession"], Value::Bool(false));
        assert!(body["response"]["outputSpeech"]["text"]
            .as_str()
            .expect("speech present")
            .starts_with("Welcome"));
    }

    #[tokio::test]
    async fn handler_failure_becomes_spoken_apology() {
        let (status, body) = post_json(
            r#"{"request":{"type":"IntentRequest","intent":{"name":"CheapSharkIntent"}}}"#,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["response"]["outputSpeech"]["text"],
            Value::String(crate::skill::APOLOGY.to_string())
        );
        assert_eq!(body["response"]["shouldEndSession"], Value::Bool(false));
    }

    #[tokio::test]
    async fn malformed_envelope_is_bad_request() {
        let (status, body) = post_json(r#"{"request": 42}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body.get("error").is_some());

        let (status, _) = post_json(r#"{"request":{"type":"IntentRequest"}}"#).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
