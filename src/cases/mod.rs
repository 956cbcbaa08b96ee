//! Request classification subsystem.
//!
//! # Data Flow
//! ```text
//! RequestContext (resolved path attached)
//!     → chain.rs (walk cases in priority order)
//!     → case.rs (first `test` returning true)
//!     → that case's `act` (a responder, or a typed failure)
//! ```
//!
//! # Design Decisions
//! - Cases are compiled at startup, immutable at runtime
//! - Deterministic: the same filesystem state always picks the same case
//! - First match wins (fixed order, no priorities to tune)

pub mod case;
pub mod chain;

pub use case::{
    AlwaysFail, Case, DirectoryIndexFile, DirectoryNoIndexFile, ExistingFile, NoFile, ScriptFile,
};
pub use chain::CaseChain;
