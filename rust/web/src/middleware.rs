use std::time::Instant;
use warp::http::{Method, StatusCode};
use warp::path::FullPath;
use warp::reject::Rejection;
use warp::reply::{Reply, Response};
use warp::Filter;

#[derive(Debug, Clone)]
struct RequestStart {
    path: String,
    method: Method,
    started: Instant,
}

/// Wraps `filter` so every matched request logs its arrival and final status.
pub fn with_request_logging<F, T>(
    filter: F,
) -> impl Filter<Extract = (Response,), Error = Rejection> + Clone
where
    F: Filter<Extract = (T,), Error = Rejection> + Clone + Send + Sync + 'static,
    T: Reply,
{
    warp::any()
        .and(warp::path::full())
        .and(warp::method())
        .map(|path: FullPath, method: Method| {
            tracing::debug!(path = %path.as_str(), method = %method, "incoming request");
            RequestStart {
                path: path.as_str().to_string(),
                method,
                started: Instant::now(),
            }
        })
        .and(filter)
        .map(|start: RequestStart, reply: T| {
            let response = reply.into_response();
            log_response(
                response.status(),
                &start.path,
                start.method.as_str(),
                start.started.elapsed().as_millis(),
            );
            response
        })
}

/// 5xx at error, 4xx at warn, everything else at info.
pub fn log_response(status: StatusCode, path: &str, method: &str, duration_ms: u128) {
    let code = status.as_u16();
    if status.is_server_error() {
        tracing::error!(status = code, path, method, duration_ms, "server error");
    } else if status.is_client_error() {
        tracing::warn!(status = code, path, method, duration_ms, "client error");
    } else {
        tracing::info!(status = code, path, method, duration_ms, "response sent");
    }
}
