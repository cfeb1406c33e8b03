use crate::session::SessionManager;
use serde::Serialize;
use warp::reply::Json;

#[derive(Serialize)]
struct HealthBody {
    status: &'static str,
    active_sessions: usize,
}

pub fn health(sessions: &SessionManager) -> Json {
    warp::reply::json(&HealthBody {
        status: "ok",
        active_sessions: sessions.active_sessions().len(),
    })
}
