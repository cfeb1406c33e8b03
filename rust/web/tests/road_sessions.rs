use coup_web::{init_test_logging, AppContext, RoadsResponse, WebServer};
use serde_json::{json, Value};
use warp::filters::BoxedFilter;
use warp::http::StatusCode;
use warp::reply::Response;

struct Harness {
    ctx: AppContext,
    routes: BoxedFilter<(Response,)>,
}

impl Harness {
    fn new() -> Self {
        let ctx = AppContext::new_for_tests();
        let routes = WebServer::routes(&ctx);
        Self { ctx, routes }
    }

    async fn create(&self) -> RoadsResponse {
        let response = warp::test::request()
            .method("POST")
            .path("/api/roads")
            .reply(&self.routes)
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        serde_json::from_slice(response.body()).expect("roads body")
    }

    async fn post(&self, path: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut request = warp::test::request().method("POST").path(path);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.reply(&self.routes).await;
        let parsed = serde_json::from_slice(response.body()).unwrap_or(Value::Null);
        (response.status(), parsed)
    }

    async fn record(&self, id: &str, result: &str) -> (StatusCode, Value) {
        self.post(
            &format!("/api/roads/{id}/results"),
            Some(json!({ "result": result })),
        )
        .await
    }

    async fn get(&self, id: &str) -> (StatusCode, Value) {
        let response = warp::test::request()
            .path(&format!("/api/roads/{id}"))
            .reply(&self.routes)
            .await;
        let parsed = serde_json::from_slice(response.body()).unwrap_or(Value::Null);
        (response.status(), parsed)
    }
}

#[tokio::test]
async fn created_session_has_empty_roads() {
    let h = Harness::new();
    let created = h.create().await;

    assert!(created.results.is_empty());
    assert_eq!(created.roads.summary.rounds, 0);
    assert_eq!(h.ctx.sessions().active_sessions(), vec![created.session_id]);
}

#[tokio::test]
async fn results_build_the_big_road() {
    let h = Harness::new();
    let id = h.create().await.session_id;

    for result in ["banker", "B", "tie", "player"] {
        let (status, _) = h.record(&id, result).await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, body) = h.get(&id).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"], json!(["banker", "banker", "tie", "player"]));
    assert_eq!(body["roads"]["summary"]["rounds"], 4);

    let columns = body["roads"]["big"]["grid"]["columns"]
        .as_array()
        .expect("big road columns");
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0][0]["winner"], "banker");
    assert_eq!(columns[0][1]["ties"], 1);
    assert_eq!(columns[1][0]["winner"], "player");
    assert!(columns[1][1].is_null());
}

#[tokio::test]
async fn undo_restores_previous_roads() {
    let h = Harness::new();
    let id = h.create().await.session_id;
    h.record(&id, "banker").await;
    let (_, before) = h.record(&id, "player").await;

    h.record(&id, "player").await;
    let (status, after) = h.post(&format!("/api/roads/{id}/undo"), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(after["undone"], "player");
    assert_eq!(after["roads"], before["roads"]);
}

#[tokio::test]
async fn undo_on_empty_log_is_a_no_op() {
    let h = Harness::new();
    let id = h.create().await.session_id;

    let (status, body) = h.post(&format!("/api/roads/{id}/undo"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("undone").is_none());
    assert_eq!(body["results"], json!([]));
}

#[tokio::test]
async fn reset_clears_every_road() {
    let h = Harness::new();
    let id = h.create().await.session_id;
    for result in ["P", "P", "B", "T"] {
        h.record(&id, result).await;
    }

    let (status, body) = h.post(&format!("/api/roads/{id}/reset"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["roads"]["bead"]["columns"], json!([]));
    assert_eq!(body["roads"]["summary"]["rounds"], 0);
}

#[tokio::test]
async fn unknown_result_label_is_bad_request() {
    let h = Harness::new();
    let id = h.create().await.session_id;

    let (status, body) = h.record(&id, "dragon").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "invalid_result");

    let (_, roads) = h.get(&id).await;
    assert_eq!(roads["results"], json!([]));
}

#[tokio::test]
async fn delete_then_lookup_is_not_found() {
    let h = Harness::new();
    let id = h.create().await.session_id;

    let response = warp::test::request()
        .method("DELETE")
        .path(&format!("/api/roads/{id}"))
        .reply(&h.routes)
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(response.body().is_empty());

    let (status, body) = h.get(&id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "session_not_found");
    assert_eq!(body["details"]["session_id"], id.as_str());

    let (status, _) = h.record(&id, "banker").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn sessions_do_not_share_logs() {
    let h = Harness::new();
    let first = h.create().await.session_id;
    let second = h.create().await.session_id;

    h.record(&first, "tie").await;

    let (_, body) = h.get(&second).await;
    assert_eq!(body["results"], json!([]));
    assert_eq!(h.ctx.sessions().active_sessions().len(), 2);
}

#[tokio::test]
async fn recorded_results_are_logged_with_session_fields() {
    let logs = init_test_logging();
    let h = Harness::new();
    let id = h.create().await.session_id;
    h.record(&id, "banker").await;

    let entries = logs.entries();
    let recorded = entries
        .iter()
        .find(|e| e.message == "result recorded" && e.field("session_id") == Some(id.as_str()))
        .expect("result recorded event");
    assert_eq!(recorded.field("result"), Some("Banker"));
    assert_eq!(recorded.field("log_len"), Some("1"));
}

#[tokio::test]
async fn idle_session_is_gone_then_not_found() {
    use coup_web::{ServerConfig, SessionManager, StaticHandler};
    use std::sync::Arc;
    use std::time::Duration;

    let config = ServerConfig::for_tests().with_session_ttl(Duration::ZERO);
    let ctx = AppContext::new_with_dependencies(
        config.clone(),
        Arc::new(SessionManager::with_ttl(config.session_ttl())),
        Arc::new(StaticHandler::new(config.static_dir().to_path_buf())),
    );
    let h = Harness {
        routes: WebServer::routes(&ctx),
        ctx,
    };
    let id = h.create().await.session_id;

    let (status, body) = h.get(&id).await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["error"], "session_expired");

    let (status, _) = h.get(&id).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(h.ctx.sessions().active_sessions().is_empty());
}
