//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID, RequestContext)
//!     → dispatch.rs (resolve, run case chain, catch failures)
//!     → response.rs (status, content type, content length)
//!     → Send to client
//! ```

pub mod dispatch;
pub mod request;
pub mod response;
pub mod server;

pub use dispatch::Dispatcher;
pub use request::{RequestContext, UuidRequestId, X_REQUEST_ID};
pub use response::{send_content, send_error};
pub use server::HttpServer;
