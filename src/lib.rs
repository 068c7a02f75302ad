//! devserve - static file server for frontend development
//!
//! Serves a document root over HTTP/1.1 with optional single-page-application
//! fallback routing and permissive CORS headers.

pub mod config;
pub mod files;
pub mod handler;
pub mod http;
pub mod server;
