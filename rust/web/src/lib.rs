//! # coup-web
//!
//! HTTP front end for the lesson page: stateless tableau and forecast
//! lookups plus per-page road sessions, served with `warp`.
//!
//! ```no_run
//! use coup_web::{ServerConfig, WebServer};
//!
//! # async fn run() -> Result<(), coup_web::ServerError> {
//! let server = WebServer::new(ServerConfig::new("127.0.0.1", 8080, "static"))?;
//! let handle = server.start().await?;
//! println!("listening on {}", handle.address());
//! handle.shutdown().await
//! # }
//! ```

pub mod errors;
pub mod handlers;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod session;
pub mod static_handler;

pub use errors::{ErrorResponse, ErrorSeverity, IntoErrorResponse};
pub use logging::{init_logging, init_test_logging, LogEntry, LogFormat, TestLogSubscriber};
pub use middleware::{log_response, with_request_logging};
pub use server::{AppContext, ServerConfig, ServerError, ServerHandle, WebServer};
pub use session::{
    RoadSession, RoadsResponse, SessionError, SessionId, SessionManager, DEFAULT_SESSION_TTL,
};
pub use static_handler::{StaticError, StaticHandler, LESSON_PAGE};
