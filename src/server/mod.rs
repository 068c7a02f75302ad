pub mod banner;
pub mod listener;

pub use listener::Server;
