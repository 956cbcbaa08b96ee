//! Resource resolution subsystem.
//!
//! # Data Flow
//! ```text
//! request path ("/docs/")
//!     → resolver.rs (containment checks, join onto root)
//!     → absolute path (may not exist)
//!     → ResourceKind::of (missing / file / directory / other)
//! ```

pub mod resolver;

pub use resolver::{index_candidate, ResourceKind, Resolver};
