use crate::handlers;
use crate::middleware::with_request_logging;
use crate::session::{SessionError, SessionManager, DEFAULT_SESSION_TTL};
use crate::static_handler::StaticHandler;
use std::convert::Infallible;
use std::fs;
use std::net::{SocketAddr, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use warp::filters::BoxedFilter;
use warp::reply::{Reply, Response};
use warp::Filter;

/// Sweep period for idle road sessions, bounded by the TTL itself.
const MAX_SWEEP_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct ServerConfig {
    host: String,
    port: u16,
    static_dir: PathBuf,
    session_ttl: Duration,
}

impl ServerConfig {
    pub fn new(host: impl Into<String>, port: u16, static_dir: impl Into<PathBuf>) -> Self {
        Self {
            host: host.into(),
            port,
            static_dir: static_dir.into(),
            session_ttl: DEFAULT_SESSION_TTL,
        }
    }

    pub fn with_session_ttl(mut self, ttl: Duration) -> Self {
        self.session_ttl = ttl;
        self
    }

    pub fn for_tests() -> Self {
        let dir = std::env::temp_dir().join("coup_web_static");
        Self::new("127.0.0.1", 0, dir)
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn static_dir(&self) -> &Path {
        &self.static_dir
    }

    pub fn session_ttl(&self) -> Duration {
        self.session_ttl
    }
}

#[derive(Debug, Clone)]
pub struct AppContext {
    config: ServerConfig,
    sessions: Arc<SessionManager>,
    static_handler: Arc<StaticHandler>,
}

impl AppContext {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        if !config.static_dir().exists() {
            fs::create_dir_all(config.static_dir())
                .map_err(|err| ServerError::ConfigError(err.to_string()))?;
        }

        let sessions = Arc::new(SessionManager::with_ttl(config.session_ttl()));
        let static_handler = Arc::new(StaticHandler::new(config.static_dir().to_path_buf()));

        Ok(Self::new_with_dependencies(config, sessions, static_handler))
    }

    pub fn new_with_dependencies(
        config: ServerConfig,
        sessions: Arc<SessionManager>,
        static_handler: Arc<StaticHandler>,
    ) -> Self {
        Self {
            config,
            sessions,
            static_handler,
        }
    }

    /// Context that never touches the filesystem; `/` serves the built-in page.
    pub fn new_for_tests() -> Self {
        let config = ServerConfig::for_tests();
        let static_handler = Arc::new(StaticHandler::new(config.static_dir().to_path_buf()));
        let sessions = Arc::new(SessionManager::with_ttl(config.session_ttl()));
        Self::new_with_dependencies(config, sessions, static_handler)
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn sessions(&self) -> Arc<SessionManager> {
        Arc::clone(&self.sessions)
    }

    pub fn static_handler(&self) -> Arc<StaticHandler> {
        Arc::clone(&self.static_handler)
    }
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Failed to bind to address: {0}")]
    BindError(#[from] std::io::Error),
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Session error: {0}")]
    SessionError(#[from] SessionError),
}

#[derive(Debug, Clone)]
pub struct WebServer {
    context: AppContext,
}

impl WebServer {
    pub fn new(config: ServerConfig) -> Result<Self, ServerError> {
        let context = AppContext::new(config)?;
        Ok(Self { context })
    }

    pub fn from_context(context: AppContext) -> Self {
        Self { context }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn start(self) -> Result<ServerHandle, ServerError> {
        let WebServer { context } = self;
        let config = context.config().clone();
        let bind_addr = Self::bind_addr(&config)?;

        // an occupied port fails here as a plain io::Error
        if bind_addr.port() != 0 {
            drop(std::net::TcpListener::bind(bind_addr)?);
        }

        let (shutdown_tx, shutdown_rx) = oneshot::channel();
        let routes = Self::routes(&context);
        let shutdown_signal = async move {
            let _ = shutdown_rx.await;
        };

        let (addr, server_future) = warp::serve(routes)
            .try_bind_with_graceful_shutdown(bind_addr, shutdown_signal)
            .map_err(Self::map_warp_error)?;

        tracing::info!(
            address = %addr,
            session_ttl_secs = config.session_ttl().as_secs(),
            "web server listening"
        );

        let task = tokio::spawn(async move {
            server_future.await;
            Ok(())
        });
        let sweeper = Self::spawn_session_sweeper(context.sessions(), config.session_ttl());

        Ok(ServerHandle::new(addr, shutdown_tx, task, sweeper, context))
    }

    fn spawn_session_sweeper(sessions: Arc<SessionManager>, ttl: Duration) -> JoinHandle<()> {
        let period = ttl.clamp(Duration::from_secs(1), MAX_SWEEP_INTERVAL);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            loop {
                ticker.tick().await;
                let removed = sessions.cleanup_expired_sessions();
                if removed > 0 {
                    tracing::debug!(removed, "swept idle road sessions");
                }
            }
        })
    }

    fn bind_addr(config: &ServerConfig) -> Result<SocketAddr, ServerError> {
        let host = config.host();

        if let Ok(addr) = host.parse::<SocketAddr>() {
            return Ok(addr);
        }

        if let Ok(ip) = host.parse::<std::net::IpAddr>() {
            return Ok(SocketAddr::new(ip, config.port()));
        }

        let candidate = format!("{}:{}", host, config.port());
        let mut addrs = candidate.to_socket_addrs().map_err(|err| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`: {err}"))
        })?;

        addrs.next().ok_or_else(|| {
            ServerError::ConfigError(format!("failed to resolve address `{candidate}`"))
        })
    }

    fn map_warp_error(err: warp::Error) -> ServerError {
        use std::error::Error as StdError;

        let mut source = err.source();
        while let Some(cause) = source {
            if let Some(io_err) = cause.downcast_ref::<std::io::Error>() {
                return ServerError::BindError(std::io::Error::new(
                    io_err.kind(),
                    io_err.to_string(),
                ));
            }
            source = cause.source();
        }

        ServerError::ConfigError(err.to_string())
    }

    /// Every route the server answers, wrapped in request logging.
    pub fn routes(context: &AppContext) -> BoxedFilter<(Response,)> {
        let routes = Self::health_route(context)
            .or(Self::static_routes(context))
            .unify()
            .or(Self::lesson_routes())
            .unify()
            .or(Self::road_routes(context))
            .unify();

        with_request_logging(routes).boxed()
    }

    fn health_route(context: &AppContext) -> BoxedFilter<(Response,)> {
        warp::path("health")
            .and(warp::get())
            .and(warp::path::end())
            .and(Self::with_session_manager(context.sessions()))
            .map(|sessions: Arc<SessionManager>| handlers::health(&sessions).into_response())
            .boxed()
    }

    fn static_routes(context: &AppContext) -> BoxedFilter<(Response,)> {
        let handler = context.static_handler();

        let index = warp::path::end()
            .and(warp::get())
            .and(Self::with_static_handler(handler.clone()))
            .and_then(|handler: Arc<StaticHandler>| async move {
                let response = handler
                    .index()
                    .await
                    .unwrap_or_else(|err| handler.error_response(err));
                Ok::<_, Infallible>(response)
            });

        let assets = warp::path("static")
            .and(warp::path::tail())
            .and(warp::get())
            .and(Self::with_static_handler(handler))
            .and_then(
                |tail: warp::path::Tail, handler: Arc<StaticHandler>| async move {
                    let response = handler
                        .asset(tail.as_str())
                        .await
                        .unwrap_or_else(|err| handler.error_response(err));
                    Ok::<_, Infallible>(response)
                },
            );

        index.or(assets).unify().boxed()
    }

    /// Stateless tableau and forecast lookups.
    fn lesson_routes() -> BoxedFilter<(Response,)> {
        let forecast = warp::path!("api" / "forecast")
            .and(warp::post())
            .and(warp::body::json())
            .then(handlers::forecast);

        let tableau = warp::path!("api" / "tableau")
            .and(warp::get())
            .and(warp::query::<handlers::TableauQuery>())
            .then(handlers::tableau);

        forecast.or(tableau).unify().boxed()
    }

    fn road_routes(context: &AppContext) -> BoxedFilter<(Response,)> {
        let sessions = context.sessions();

        let create = warp::path!("api" / "roads")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .then(handlers::create_road_session);

        let show = warp::path!("api" / "roads" / String)
            .and(warp::get())
            .and(Self::with_session_manager(sessions.clone()))
            .then(|session_id: String, sessions: Arc<SessionManager>| {
                handlers::get_roads(sessions, session_id)
            });

        let record = warp::path!("api" / "roads" / String / "results")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .and(warp::body::json())
            .then(
                |session_id: String,
                 sessions: Arc<SessionManager>,
                 request: handlers::RecordResultRequest| {
                    handlers::record_result(sessions, session_id, request)
                },
            );

        let undo = warp::path!("api" / "roads" / String / "undo")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .then(|session_id: String, sessions: Arc<SessionManager>| {
                handlers::undo_result(sessions, session_id)
            });

        let reset = warp::path!("api" / "roads" / String / "reset")
            .and(warp::post())
            .and(Self::with_session_manager(sessions.clone()))
            .then(|session_id: String, sessions: Arc<SessionManager>| {
                handlers::reset_roads(sessions, session_id)
            });

        let delete = warp::path!("api" / "roads" / String)
            .and(warp::delete())
            .and(Self::with_session_manager(sessions))
            .then(|session_id: String, sessions: Arc<SessionManager>| {
                handlers::delete_road_session(sessions, session_id)
            });

        create
            .or(show)
            .unify()
            .or(record)
            .unify()
            .or(undo)
            .unify()
            .or(reset)
            .unify()
            .or(delete)
            .unify()
            .boxed()
    }

    fn with_static_handler(
        handler: Arc<StaticHandler>,
    ) -> impl Filter<Extract = (Arc<StaticHandler>,), Error = Infallible> + Clone {
        warp::any().map(move || handler.clone())
    }

    fn with_session_manager(
        sessions: Arc<SessionManager>,
    ) -> impl Filter<Extract = (Arc<SessionManager>,), Error = Infallible> + Clone {
        warp::any().map(move || Arc::clone(&sessions))
    }
}

#[derive(Debug)]
pub struct ServerHandle {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    task: Option<JoinHandle<Result<(), ServerError>>>,
    sweeper: Option<JoinHandle<()>>,
    context: AppContext,
}

impl ServerHandle {
    fn new(
        addr: SocketAddr,
        shutdown: oneshot::Sender<()>,
        task: JoinHandle<Result<(), ServerError>>,
        sweeper: JoinHandle<()>,
        context: AppContext,
    ) -> Self {
        Self {
            addr,
            shutdown: Some(shutdown),
            task: Some(task),
            sweeper: Some(sweeper),
            context,
        }
    }

    pub fn address(&self) -> SocketAddr {
        self.addr
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub async fn shutdown(mut self) -> Result<(), ServerError> {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }

        if let Some(task) = self.task.take() {
            match task.await {
                Ok(result) => result?,
                Err(err) => {
                    return Err(ServerError::ConfigError(format!(
                        "server task join error: {err}"
                    )))
                }
            }
        }

        tracing::info!(address = %self.addr, "web server stopped");
        Ok(())
    }
}

impl Drop for ServerHandle {
    fn drop(&mut self) {
        if let Some(sweeper) = self.sweeper.take() {
            sweeper.abort();
        }
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }
}
