//! Host APIs: the injected transports providers run on.
//!
//! - [`credentials`] - Read-only bearer credential lookup
//! - [`http`] - HTTP client with tracing and bounded timeout
//! - [`process`] - Subprocess execution for CLI ledgers
//! - [`document`] - Scriptable document host (embedded browser)

pub mod credentials;
pub mod document;
pub mod http;
pub mod process;
