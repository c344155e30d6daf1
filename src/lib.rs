//! Registry of MIME media-type descriptors.
//!
//! This crate provides:
//! - A record model for MIME type definitions, with derived attributes
//!   (registration status, binary/ascii, platform scope, completeness)
//! - A parser for the line-oriented definition-file format
//! - A dual-index registry for lookup by type identifier or by file
//!   extension, with regex and predicate queries
//! - A deterministic priority ordering for ranking competing definitions
//!   of the same logical type
//!
//! The registry is built synchronously from definition files and is then
//! read-mostly shared state; no operation performs asynchronous I/O.

pub mod definition;
pub mod error;
pub mod grammar;
pub mod loader;
pub mod mime_type;
pub mod platform;
pub mod registry;
pub mod urls;

// Re-export commonly used types
pub use definition::parse_line;
pub use error::{Error, Result};
pub use grammar::simplify;
pub use loader::{load_dir, load_file};
pub use mime_type::{Encoding, MimeType};
pub use registry::{QueryFlags, Registry};
pub use urls::ResolvedUrl;
