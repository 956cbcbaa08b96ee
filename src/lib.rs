//! Case-dispatching HTTP file server library.
//!
//! Every request is classified into exactly one case (missing, script,
//! file, directory with index, directory, unknown) by an ordered chain of
//! rules, and the first matching rule answers it.

// Core subsystems
pub mod cases;
pub mod config;
pub mod error;
pub mod http;
pub mod resource;
pub mod responders;

// Cross-cutting concerns
pub mod lifecycle;
pub mod observability;

pub use config::schema::ServerConfig;
pub use error::ServeError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
