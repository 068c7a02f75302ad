//! Turns a parsed request into a response.
//!
//! Steps run in a fixed order: preflight short-circuit, method check, path
//! resolution, then header augmentation. Every failure becomes a status
//! response here; nothing escapes to the connection.

use std::io::ErrorKind;
use std::path::Path;

use crate::config::Config;
use crate::files::{Resolved, Resolver, cors};
use crate::http::mime;
use crate::http::request::{Method, Request};
use crate::http::response::{Response, ResponseBuilder, StatusCode, error_page};

#[derive(Debug, Clone)]
pub struct Handler {
    resolver: Resolver,
    enable_cors: bool,
}

impl Handler {
    pub fn new(config: &Config) -> Self {
        Self {
            resolver: Resolver::new(
                &config.document_root,
                &config.index_file,
                config.enable_spa_fallback,
            ),
            enable_cors: config.enable_cors,
        }
    }

    pub async fn handle(&self, req: &Request) -> Response {
        let mut response = if req.method == Method::OPTIONS && self.enable_cors {
            // Preflight never touches the filesystem.
            cors::preflight()
        } else {
            match req.method {
                Method::GET | Method::HEAD => self.serve(&req.path).await,
                _ => Response::method_not_allowed(self.allowed_methods()),
            }
        };

        self.decorate(&mut response);

        tracing::info!(
            method = req.method.as_str(),
            path = %req.path,
            status = response.status.as_u16(),
            "request"
        );

        response
    }

    /// Applies the header policy to a response built outside `handle`.
    pub fn decorate(&self, response: &mut Response) {
        if self.enable_cors {
            cors::apply(response);
        }
    }

    fn allowed_methods(&self) -> &'static str {
        if self.enable_cors {
            "GET, HEAD, OPTIONS"
        } else {
            "GET, HEAD"
        }
    }

    async fn serve(&self, path: &str) -> Response {
        match self.resolver.resolve(path).await {
            Ok(Resolved::File(file)) => open_file(&file).await,
            Ok(Resolved::Redirect(location)) => Response::redirect(location),
            Err(err) => {
                tracing::debug!(path = %path, error = ?err, "resolution failed");
                error_page(err.status())
            }
        }
    }
}

/// Opens the file before any byte is written, so a vanished or unreadable
/// file still yields a clean status response.
async fn open_file(path: &Path) -> Response {
    let file = match tokio::fs::File::open(path).await {
        Ok(file) => file,
        Err(err) => return io_error_response(path, err),
    };

    let len = match file.metadata().await {
        Ok(meta) => meta.len(),
        Err(err) => return io_error_response(path, err),
    };

    ResponseBuilder::new(StatusCode::Ok)
        .header("Content-Type", mime::content_type(path))
        .file(file, len)
        .build()
}

fn io_error_response(path: &Path, err: std::io::Error) -> Response {
    match err.kind() {
        ErrorKind::NotFound => Response::not_found(),
        ErrorKind::PermissionDenied => Response::forbidden(),
        _ => {
            tracing::error!(path = %path.display(), error = %err, "failed to open file");
            Response::internal_error()
        }
    }
}
