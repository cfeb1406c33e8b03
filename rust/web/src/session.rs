//! Road sessions: one result log per open lesson page.
//!
//! A session lives until the page deletes it or it sits idle longer than the
//! manager's TTL. Expired sessions answer `410 Gone` once and are then
//! forgotten, after which their id is simply unknown (`404`).
use chrono::{DateTime, SecondsFormat, Utc};
use coup_engine::roads::{ResultLog, RoadMap};
use coup_engine::round::Outcome;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, RwLock};
use std::time::{Duration, Instant};
use thiserror::Error;
use uuid::Uuid;

use crate::errors::{ErrorSeverity, IntoErrorResponse};

pub type SessionId = String;

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Everything the page needs to redraw the scoreboard.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoadsResponse {
    pub session_id: SessionId,
    pub created_at: String,
    pub results: Vec<Outcome>,
    pub roads: RoadMap,
    /// Result removed by an undo; absent for every other call
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub undone: Option<Outcome>,
}

#[derive(Debug)]
pub struct RoadSession {
    id: SessionId,
    created_at: DateTime<Utc>,
    log: Mutex<ResultLog>,
    last_active: Mutex<Instant>,
}

impl RoadSession {
    fn new(id: SessionId) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            log: Mutex::new(ResultLog::new()),
            last_active: Mutex::new(Instant::now()),
        }
    }

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    fn touch(&self) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = Instant::now();
        }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        match self.last_active.lock() {
            Ok(last) => last.elapsed() >= ttl,
            Err(_) => false,
        }
    }

    #[cfg(test)]
    fn force_last_active(&self, instant: Instant) {
        if let Ok(mut guard) = self.last_active.lock() {
            *guard = instant;
        }
    }

    /// Runs `f` against the log and snapshots the roads afterwards.
    fn update<F>(&self, f: F) -> Result<RoadsResponse, SessionError>
    where
        F: FnOnce(&mut ResultLog) -> Option<Outcome>,
    {
        let mut log = self
            .log
            .lock()
            .map_err(|_| SessionError::StoragePoisoned)?;
        let undone = f(&mut *log);
        Ok(RoadsResponse {
            session_id: self.id.clone(),
            created_at: self.created_at.to_rfc3339_opts(SecondsFormat::Secs, true),
            results: log.as_slice().to_vec(),
            roads: log.roads(),
            undone,
        })
    }
}

#[derive(Debug)]
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<RoadSession>>>,
    session_ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionManager {
    pub fn new() -> Self {
        Self::with_ttl(DEFAULT_SESSION_TTL)
    }

    pub fn with_ttl(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            session_ttl: ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.session_ttl
    }

    pub fn create_session(&self) -> Result<RoadsResponse, SessionError> {
        let id = Uuid::new_v4().to_string();
        let session = Arc::new(RoadSession::new(id.clone()));

        {
            let mut guard = self
                .sessions
                .write()
                .map_err(|_| SessionError::StoragePoisoned)?;
            guard.insert(id.clone(), Arc::clone(&session));
        }

        tracing::info!(session_id = %id, "road session created");
        session.update(|_| None)
    }

    pub fn get_session(&self, id: &SessionId) -> Result<Arc<RoadSession>, SessionError> {
        let guard = self
            .sessions
            .read()
            .map_err(|_| SessionError::StoragePoisoned)?;
        guard
            .get(id)
            .cloned()
            .ok_or_else(|| SessionError::NotFound(id.clone()))
    }

    pub fn roads(&self, id: &SessionId) -> Result<RoadsResponse, SessionError> {
        self.live_session(id)?.update(|_| None)
    }

    pub fn record(&self, id: &SessionId, result: Outcome) -> Result<RoadsResponse, SessionError> {
        let response = self.live_session(id)?.update(|log| {
            log.append(result);
            None
        })?;
        tracing::debug!(
            session_id = %id,
            result = %result,
            log_len = response.results.len(),
            "result recorded"
        );
        Ok(response)
    }

    /// Removes the last result. Undo on an empty log is a no-op, not an error.
    pub fn undo(&self, id: &SessionId) -> Result<RoadsResponse, SessionError> {
        let response = self.live_session(id)?.update(ResultLog::undo)?;
        tracing::debug!(
            session_id = %id,
            result = ?response.undone,
            log_len = response.results.len(),
            "result undone"
        );
        Ok(response)
    }

    pub fn reset(&self, id: &SessionId) -> Result<RoadsResponse, SessionError> {
        let response = self.live_session(id)?.update(|log| {
            log.reset();
            None
        })?;
        tracing::info!(session_id = %id, "road session reset");
        Ok(response)
    }

    pub fn delete_session(&self, id: &SessionId) -> Result<(), SessionError> {
        match self.remove_session(id)? {
            Some(_) => {
                tracing::info!(session_id = %id, "road session deleted");
                Ok(())
            }
            None => Err(SessionError::NotFound(id.clone())),
        }
    }

    /// Drops every idle session and returns how many went.
    pub fn cleanup_expired_sessions(&self) -> usize {
        let mut guard = match self.sessions.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let before = guard.len();
        guard.retain(|id, session| {
            let expired = session.is_expired(self.session_ttl);
            if expired {
                tracing::info!(session_id = %id, "road session expired");
            }
            !expired
        });
        before - guard.len()
    }

    pub fn active_sessions(&self) -> Vec<SessionId> {
        match self.sessions.read() {
            Ok(guard) => guard.keys().cloned().collect(),
            Err(_) => Vec::new(),
        }
    }

    fn live_session(&self, id: &SessionId) -> Result<Arc<RoadSession>, SessionError> {
        let session = self.get_session(id)?;
        if session.is_expired(self.session_ttl) {
            self.remove_session(id)?;
            tracing::info!(session_id = %id, "road session expired");
            return Err(SessionError::Expired(id.clone()));
        }
        session.touch();
        Ok(session)
    }

    fn remove_session(&self, id: &SessionId) -> Result<Option<Arc<RoadSession>>, SessionError> {
        let mut guard = self
            .sessions
            .write()
            .map_err(|_| SessionError::StoragePoisoned)?;
        Ok(guard.remove(id))
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Session not found: {0}")]
    NotFound(SessionId),
    #[error("Session expired: {0}")]
    Expired(SessionId),
    #[error("Session storage poisoned")]
    StoragePoisoned,
}

impl IntoErrorResponse for SessionError {
    fn status_code(&self) -> warp::http::StatusCode {
        use warp::http::StatusCode;
        match self {
            SessionError::NotFound(_) => StatusCode::NOT_FOUND,
            SessionError::Expired(_) => StatusCode::GONE,
            SessionError::StoragePoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            SessionError::NotFound(_) => "session_not_found",
            SessionError::Expired(_) => "session_expired",
            SessionError::StoragePoisoned => "session_storage_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn error_details(&self) -> Option<serde_json::Value> {
        match self {
            SessionError::NotFound(id) => Some(serde_json::json!({ "session_id": id })),
            SessionError::Expired(id) => Some(serde_json::json!({
                "session_id": id,
                "reason": "Session expired due to inactivity"
            })),
            SessionError::StoragePoisoned => None,
        }
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            SessionError::StoragePoisoned => ErrorSeverity::Critical,
            _ => ErrorSeverity::Client,
        }
    }
}
