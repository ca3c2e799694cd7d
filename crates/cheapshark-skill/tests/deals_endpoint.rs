use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use cheapshark_skill::config::DealsConfig;
use cheapshark_skill::deals::CheapSharkClient;
use cheapshark_skill::skill::{skill_router, SkillDispatcher, APOLOGY};
use mockito::{Matcher, Server};
use serde_json::{json, Value};
use tower::ServiceExt;

const LISTING: &str = r#"[
    {"internalName": "HOLLOWKNIGHT", "title": "Hollow Knight", "dealID": "hk", "storeID": "1",
     "salePrice": "7.49", "normalPrice": "14.99", "savings": "50.033356", "metacriticScore": "87",
     "dealRating": "9.1"},
    {"internalName": "STARDEWVALLEY", "title": "Stardew Valley", "dealID": "sv", "storeID": "1",
     "salePrice": "10.04", "normalPrice": "14.99", "savings": "33.022015", "metacriticScore": "89",
     "dealRating": "7.4"},
    {"internalName": "TERRARIA", "title": "Terraria", "dealID": "tr", "storeID": "1",
     "salePrice": "4.99", "normalPrice": "9.99", "savings": "50.050050", "metacriticScore": "83",
     "dealRating": "9.8"}
]"#;

fn dispatcher_for(server: &Server) -> Arc<SkillDispatcher> {
    let client = CheapSharkClient::new(DealsConfig {
        endpoint: format!("{}/api/1.0/deals", server.url()),
        timeout: Duration::from_secs(2),
        ..DealsConfig::default()
    })
    .expect("client builds");
    Arc::new(SkillDispatcher::standard(Arc::new(client)))
}

async fn ask(dispatcher: Arc<SkillDispatcher>, envelope: Value) -> Value {
    let response = skill_router(dispatcher)
        .oneshot(
            Request::post("/api/v1/skill")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(envelope.to_string()))
                .expect("request builds"),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body reads");
    serde_json::from_slice(&bytes).expect("json body")
}

fn intent(name: &str) -> Value {
    json!({
        "version": "1.0",
        "request": {"type": "IntentRequest", "intent": {"name": name, "slots": {}}}
    })
}

#[tokio::test]
async fn deal_rating_intent_reads_live_listing() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", "/api/1.0/deals")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("storeID".into(), "1".into()),
            Matcher::UrlEncoded("upperPrice".into(), "15".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(LISTING)
        .expect(1)
        .create_async()
        .await;

    let body = ask(dispatcher_for(&server), intent("CheapSharkIntent")).await;

    mock.assert_async().await;
    assert_eq!(
        body["response"]["outputSpeech"]["text"],
        Value::String(
            "Here are the top five best current Steam game deals based on deal rating: \
             Terraria is currently 50% off for a price of $4.99. \
             Hollow Knight is currently 50% off for a price of $7.49. \
             Stardew Valley is currently 33% off for a price of $10.04."
                .to_string()
        )
    );
    assert_eq!(body["response"]["shouldEndSession"], Value::Bool(true));
}

#[tokio::test]
async fn percent_filter_intent_reads_slot_from_envelope() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/1.0/deals")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(LISTING)
        .create_async()
        .await;

    let envelope = json!({
        "request": {
            "type": "IntentRequest",
            "intent": {
                "name": "CheapSharkPercentFilterIntent",
                "slots": {"salePercent": {"name": "salePercent", "value": "40"}}
            }
        }
    });
    let body = ask(dispatcher_for(&server), envelope).await;

    assert_eq!(
        body["response"]["outputSpeech"]["text"],
        Value::String(
            "Here are all Steam game deals above 40%: \
             Hollow Knight is currently 50% off for a price of $7.49. \
             Terraria is currently 50% off for a price of $4.99."
                .to_string()
        )
    );
}

#[tokio::test]
async fn upstream_outage_is_spoken_as_apology() {
    let mut server = Server::new_async().await;
    let _mock = server
        .mock("GET", "/api/1.0/deals")
        .match_query(Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let body = ask(dispatcher_for(&server), intent("CheapSharkScoreFilterIntent")).await;

    assert_eq!(
        body["response"]["outputSpeech"]["text"],
        Value::String(APOLOGY.to_string())
    );
    assert_eq!(body["response"]["shouldEndSession"], Value::Bool(false));
}

#[tokio::test]
async fn static_intents_never_call_upstream() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", Matcher::Any)
        .expect(0)
        .create_async()
        .await;

    let body = ask(dispatcher_for(&server), intent("AMAZON.HelpIntent")).await;

    mock.assert_async().await;
    assert_eq!(body["response"]["shouldEndSession"], Value::Bool(false));
}
