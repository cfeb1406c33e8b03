use crate::session::{SessionId, SessionManager};
use coup_engine::round::Outcome;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reply::Response;

use super::{empty_response, error_response, success_response};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RecordResultRequest {
    /// `player`, `banker`, `tie` or their one-letter codes
    pub result: String,
}

/// Opens a new scoreboard with an empty result log.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/roads`
///
/// # Response Format
/// - **201 Created**: `RoadsResponse` carrying the new `session_id` and four
///   empty grids
/// - **500**: `session_storage_error` when the session table is poisoned
pub async fn create_road_session(sessions: Arc<SessionManager>) -> Response {
    match sessions.create_session() {
        Ok(roads) => success_response(StatusCode::CREATED, roads),
        Err(err) => error_response(err),
    }
}

/// Current roads for a session.
///
/// # HTTP Method and Path
/// - **Method**: GET
/// - **Path**: `/api/roads/{session_id}`
///
/// # Error Cases
/// - `session_not_found` (404)
/// - `session_expired` (410): idle past the TTL; the session is dropped
pub async fn get_roads(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.roads(&session_id) {
        Ok(roads) => success_response(StatusCode::OK, roads),
        Err(err) => error_response(err),
    }
}

/// Appends one result and returns the recomputed roads.
///
/// # HTTP Method and Path
/// - **Method**: POST
/// - **Path**: `/api/roads/{session_id}/results`
///
/// # Request Format
/// ```json
/// { "result": "banker" }
/// ```
///
/// # Error Cases
/// - `invalid_result` (400): label is not a player, banker or tie
/// - `session_not_found` (404), `session_expired` (410)
pub async fn record_result(
    sessions: Arc<SessionManager>,
    session_id: SessionId,
    request: RecordResultRequest,
) -> Response {
    let outcome: Outcome = match request.result.parse() {
        Ok(outcome) => outcome,
        Err(err) => return error_response(err),
    };

    match sessions.record(&session_id, outcome) {
        Ok(roads) => success_response(StatusCode::OK, roads),
        Err(err) => error_response(err),
    }
}

/// Removes the most recent result. An empty log answers `200` with no `undone`.
pub async fn undo_result(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.undo(&session_id) {
        Ok(roads) => success_response(StatusCode::OK, roads),
        Err(err) => error_response(err),
    }
}

pub async fn reset_roads(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.reset(&session_id) {
        Ok(roads) => success_response(StatusCode::OK, roads),
        Err(err) => error_response(err),
    }
}

/// Drops the session when the page is left. `204 No Content` on success.
pub async fn delete_road_session(sessions: Arc<SessionManager>, session_id: SessionId) -> Response {
    match sessions.delete_session(&session_id) {
        Ok(()) => empty_response(StatusCode::NO_CONTENT),
        Err(err) => error_response(err),
    }
}
