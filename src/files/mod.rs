//! Static file serving: path resolution and the CORS header policy.

pub mod cors;
pub mod resolver;

pub use resolver::{ResolveError, Resolved, Resolver};
