use coup_web::{AppContext, ErrorResponse, WebServer};
use serde_json::{json, Value};
use warp::http::StatusCode;

fn routes() -> warp::filters::BoxedFilter<(warp::reply::Response,)> {
    WebServer::routes(&AppContext::new_for_tests())
}

async fn post_forecast(body: Value) -> (StatusCode, Value) {
    let response = warp::test::request()
        .method("POST")
        .path("/api/forecast")
        .json(&body)
        .reply(&routes())
        .await;
    let parsed = serde_json::from_slice(response.body()).expect("json body");
    (response.status(), parsed)
}

#[tokio::test]
async fn fully_dealt_tie_is_certain() {
    let (status, body) = post_forecast(json!({
        "player": ["2", "3", "8"],
        "banker": ["3", "K", "-"]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resolved");
    assert_eq!(body["enumerated"], 1);
    assert_eq!(body["tie_pct"], 100.0);
}

#[tokio::test]
async fn open_third_card_enumerates_thirteen_ranks() {
    let (status, body) = post_forecast(json!({
        "player": ["K", "4"],
        "banker": ["6", "10"]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "resolved");
    assert_eq!(body["enumerated"], 169);

    let sum = ["player_pct", "banker_pct", "tie_pct"]
        .iter()
        .map(|k| body[k].as_f64().expect("percentage"))
        .sum::<f64>();
    assert!((sum - 100.0).abs() < 1e-6);
}

#[tokio::test]
async fn empty_hands_are_pending() {
    let (status, body) = post_forecast(json!({})).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "pending");
    assert!(body["player_pct"].is_null());
    assert!(!body["next_action"].as_str().unwrap_or_default().is_empty());
}

#[tokio::test]
async fn contradiction_is_reported_not_rejected() {
    // player stands on 7, so a third player card cannot exist
    let (status, body) = post_forecast(json!({
        "player": ["3", "4", "5"],
        "banker": ["2", "2"]
    }))
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "inconsistent");
    assert!(body["conflict"].is_string());
}

#[tokio::test]
async fn invalid_label_is_bad_request() {
    let (status, body) = post_forecast(json!({
        "player": ["K", "Z"],
        "banker": []
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let error: ErrorResponse = serde_json::from_value(body).expect("error body");
    assert_eq!(error.error, "invalid_card");
    assert_eq!(error.details, Some(json!({ "label": "Z" })));
}

#[tokio::test]
async fn four_cards_is_bad_request() {
    let (status, body) = post_forecast(json!({
        "player": ["A", "2", "3", "4"]
    }))
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "too_many_cards");
}

#[tokio::test]
async fn tableau_query_returns_decision() {
    let response = warp::test::request()
        .path("/api/tableau?player=4&banker=3&third=8")
        .reply(&routes())
        .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(response.body()).expect("json");
    assert_eq!(body["player_total"], 4);
    assert_eq!(body["natural"], false);
    assert_eq!(body["player_draws"], true);
    assert_eq!(body["banker"], "stands");
}

#[tokio::test]
async fn tableau_without_third_card_waits_on_player() {
    let response = warp::test::request()
        .path("/api/tableau?player=2&banker=6")
        .reply(&routes())
        .await;

    let body: Value = serde_json::from_slice(response.body()).expect("json");
    assert!(body.get("player_third").is_none());
    assert_eq!(body["banker"], "pending_player_card");
}

#[tokio::test]
async fn tableau_total_out_of_range_is_bad_request() {
    let response = warp::test::request()
        .path("/api/tableau?player=12&banker=3")
        .reply(&routes())
        .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(response.body()).expect("json");
    assert_eq!(body["error"], "total_out_of_range");
}
