use coup_web::server::{AppContext, ServerConfig, ServerError, WebServer};
use std::io::{Read, Write};
use std::net::{SocketAddr, TcpStream};
use std::path::PathBuf;
use std::time::Duration;

/// Minimal blocking HTTP/1.1 GET returning the raw response text.
fn http_get(address: SocketAddr, path: &str) -> String {
    let mut stream = TcpStream::connect(address).expect("connect to server");
    stream
        .set_read_timeout(Some(Duration::from_secs(2)))
        .expect("set timeout");
    write!(
        stream,
        "GET {path} HTTP/1.1\r\nHost: {address}\r\nConnection: close\r\n\r\n"
    )
    .expect("write request");
    let mut response = String::new();
    stream.read_to_string(&mut response).expect("read response");
    response
}

fn unique_static_dir(label: &str) -> PathBuf {
    std::env::temp_dir().join(format!("coup_web_{label}_{}", uuid::Uuid::new_v4()))
}

#[tokio::test]
async fn web_server_serves_health_endpoint() {
    let server = WebServer::new(ServerConfig::for_tests()).expect("create server");
    let handle = server.start().await.expect("start server");
    let address = handle.address();

    let raw = tokio::task::spawn_blocking(move || http_get(address, "/health"))
        .await
        .expect("request task");

    assert!(raw.starts_with("HTTP/1.1 200"), "unexpected response: {raw}");
    let body = raw.split("\r\n\r\n").nth(1).expect("response body");
    let parsed: serde_json::Value = serde_json::from_str(body).expect("parse health JSON");
    assert_eq!(parsed["status"], "ok");
    assert_eq!(parsed["active_sessions"], 0);

    tokio::time::timeout(Duration::from_secs(2), handle.shutdown())
        .await
        .expect("shutdown timed out")
        .expect("shutdown failed");
}

#[tokio::test]
async fn web_server_reports_bind_error_when_port_in_use() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind fixture");
    let port = listener.local_addr().expect("listener address").port();
    let static_dir = unique_static_dir("port_in_use");

    let server =
        WebServer::new(ServerConfig::new("127.0.0.1", port, &static_dir)).expect("construct server");

    match server.start().await {
        Err(ServerError::BindError(_)) => {}
        Err(other) => panic!("expected bind error, got {other:?}"),
        Ok(_) => panic!("server started on an occupied port"),
    }

    drop(listener);
    let _ = std::fs::remove_dir_all(static_dir);
}

#[tokio::test]
async fn app_context_creates_missing_static_dir() {
    let static_dir = unique_static_dir("create");
    assert!(!static_dir.exists());

    let ctx = AppContext::new(ServerConfig::new("127.0.0.1", 0, &static_dir)).expect("context");
    assert!(static_dir.is_dir());
    assert_eq!(ctx.static_handler().root(), static_dir.as_path());

    let _ = std::fs::remove_dir_all(static_dir);
}

#[tokio::test]
async fn static_dir_index_overrides_lesson_page() {
    let dir = tempfile::tempdir().expect("tempdir");
    std::fs::write(dir.path().join("index.html"), "<p>custom</p>").expect("write index");
    std::fs::create_dir(dir.path().join("css")).expect("css dir");
    std::fs::write(dir.path().join("css").join("app.css"), "body{}").expect("write css");

    let ctx = AppContext::new(ServerConfig::new("127.0.0.1", 0, dir.path())).expect("context");
    let routes = WebServer::routes(&ctx);

    let index = warp::test::request().path("/").reply(&routes).await;
    assert_eq!(index.status(), 200);
    assert_eq!(index.body().as_ref(), b"<p>custom</p>");

    let css = warp::test::request()
        .path("/static/css/app.css")
        .reply(&routes)
        .await;
    assert_eq!(css.status(), 200);
    assert_eq!(css.headers()["content-type"], "text/css; charset=utf-8");

    let escape = warp::test::request()
        .path("/static/../Cargo.toml")
        .reply(&routes)
        .await;
    assert_eq!(escape.status(), 404);
}

#[tokio::test]
async fn lesson_page_is_served_without_static_files() {
    let ctx = AppContext::new_for_tests();
    let response = warp::test::request()
        .path("/")
        .reply(&WebServer::routes(&ctx))
        .await;

    assert_eq!(response.status(), 200);
    let body = String::from_utf8(response.body().to_vec()).expect("utf8 page");
    assert!(body.contains("/api/forecast"));
    assert!(body.contains("/api/roads"));
}
