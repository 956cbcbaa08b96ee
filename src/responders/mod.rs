//! Responders: the actions a case hands a request to.
//!
//! # Data Flow
//! ```text
//! case action
//!     → file.rs (regular files, directory index files)
//!     → listing.rs (directories without an index)
//!     → script.rs (files carrying the script extension)
//!     → http::response (status, headers, body)
//! ```
//!
//! Responders only report failures; the dispatcher renders them.

pub mod file;
pub mod listing;
pub mod script;

pub use file::serve_file;
pub use listing::list_directory;
pub use script::ScriptRunner;
