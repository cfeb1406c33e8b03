use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use mime_guess::{mime, MimeGuess};
use tokio::fs;
use warp::http::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use warp::http::{Response, StatusCode};
use warp::hyper::Body;

use crate::errors::{ErrorSeverity, IntoErrorResponse};

/// Lesson page compiled into the binary, served when the static dir has no index.
pub const LESSON_PAGE: &str = include_str!("../static/index.html");

#[derive(Debug, thiserror::Error)]
pub enum StaticError {
    #[error("asset not found")]
    NotFound,
    #[error("asset io error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoErrorResponse for StaticError {
    fn status_code(&self) -> StatusCode {
        match self {
            StaticError::NotFound => StatusCode::NOT_FOUND,
            StaticError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            StaticError::NotFound => "static_not_found",
            StaticError::Io(_) => "static_io_error",
        }
    }

    fn error_message(&self) -> String {
        self.to_string()
    }

    fn severity(&self) -> ErrorSeverity {
        match self {
            StaticError::NotFound => ErrorSeverity::Client,
            StaticError::Io(_) => ErrorSeverity::Server,
        }
    }
}

/// Serves files under one root directory. Paths never escape the root.
#[derive(Debug, Clone)]
pub struct StaticHandler {
    root: Arc<PathBuf>,
    cache_header: HeaderValue,
}

impl StaticHandler {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Arc::new(root.into()),
            cache_header: HeaderValue::from_static("public, max-age=86400"),
        }
    }

    pub fn root(&self) -> &Path {
        self.root.as_path()
    }

    /// `index.html` from disk if present, else the built-in lesson page.
    pub async fn index(&self) -> Result<warp::reply::Response, StaticError> {
        match self.serve_relative("index.html").await {
            Err(StaticError::NotFound) => Ok(self.build_response(
                LESSON_PAGE.as_bytes().to_vec(),
                mime::TEXT_HTML,
                HeaderValue::from_static("no-cache"),
            )),
            other => other,
        }
    }

    pub async fn asset(&self, path: &str) -> Result<warp::reply::Response, StaticError> {
        if path.is_empty() {
            return Err(StaticError::NotFound);
        }
        self.serve_relative(path).await
    }

    /// Plain-text reply for the page; assets are not JSON consumers.
    pub fn error_response(&self, error: StaticError) -> warp::reply::Response {
        let status = error.status_code();
        if let StaticError::Io(err) = &error {
            tracing::error!(root = %self.root.display(), error = %err, "static asset read failed");
        }
        let mut response = Response::new(Body::from(
            status.canonical_reason().unwrap_or("Error").to_string(),
        ));
        *response.status_mut() = status;
        response
            .headers_mut()
            .insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
        response
    }

    async fn serve_relative(&self, relative: &str) -> Result<warp::reply::Response, StaticError> {
        let resolved = self.resolve(relative)?;
        let bytes = match fs::read(&resolved).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Err(StaticError::NotFound)
            }
            Err(err) => return Err(StaticError::Io(err)),
        };

        let mime = MimeGuess::from_path(&resolved).first_or_octet_stream();
        Ok(self.build_response(bytes, mime, self.cache_header.clone()))
    }

    fn build_response(
        &self,
        bytes: Vec<u8>,
        mime: mime::Mime,
        cache: HeaderValue,
    ) -> warp::reply::Response {
        let mut response = Response::new(Body::from(bytes));
        let mut content_type = mime.essence_str().to_string();
        if mime.type_() == mime::TEXT {
            content_type.push_str("; charset=utf-8");
        }

        let headers = response.headers_mut();
        headers.insert(
            CONTENT_TYPE,
            HeaderValue::from_str(&content_type)
                .unwrap_or_else(|_| HeaderValue::from_static("application/octet-stream")),
        );
        headers.insert(CACHE_CONTROL, cache);
        response
    }

    fn resolve(&self, path: &str) -> Result<PathBuf, StaticError> {
        let mut buf = PathBuf::new();
        for comp in Path::new(path).components() {
            match comp {
                Component::Normal(seg) => buf.push(seg),
                Component::CurDir | Component::RootDir => {}
                Component::Prefix(_) | Component::ParentDir => return Err(StaticError::NotFound),
            }
        }

        if buf.as_os_str().is_empty() {
            return Err(StaticError::NotFound);
        }

        Ok(self.root.join(buf))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parent_segments_are_rejected() {
        let handler = StaticHandler::new("/srv/coup");
        assert!(matches!(
            handler.resolve("../secrets.txt"),
            Err(StaticError::NotFound)
        ));
        assert!(matches!(handler.resolve("./"), Err(StaticError::NotFound)));
        assert_eq!(
            handler.resolve("/css/app.css").unwrap(),
            PathBuf::from("/srv/coup/css/app.css")
        );
    }

    #[tokio::test]
    async fn index_falls_back_to_lesson_page() {
        let dir = tempfile::tempdir().unwrap();
        let handler = StaticHandler::new(dir.path());

        let response = handler.index().await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers()[CONTENT_TYPE],
            "text/html; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn assets_are_read_from_root() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("roads.js"), "console.log(1)").unwrap();
        let handler = StaticHandler::new(dir.path());

        let response = handler.asset("roads.js").await.unwrap();
        assert_eq!(response.headers()[CACHE_CONTROL], "public, max-age=86400");
        assert!(matches!(
            handler.asset("missing.css").await,
            Err(StaticError::NotFound)
        ));
    }
}
