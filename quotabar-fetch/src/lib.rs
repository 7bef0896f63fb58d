// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Quotabar Fetch
//!
//! Transport layer and the provider capability contract for Quotabar.
//!
//! ## Host APIs
//!
//! The [`host`] module provides the injected transports providers run on:
//!
//! - [`host::credentials`] - Read-only bearer credential lookup (keychain)
//! - [`host::http`] - HTTP client with tracing and bounded timeout
//! - [`host::process`] - Subprocess execution for CLI ledgers
//! - [`host::document`] - Scriptable document host (embedded browser)
//!
//! Each transport sits behind a trait so tests can substitute doubles; the
//! production implementations live alongside the traits.
//!
//! ## Provider contract
//!
//! [`provider::UsageProvider`] is the uniform capability every usage
//! source implements: one bounded `fetch()` per round, typed failures,
//! no cache access, no internal retries. Providers receive their
//! transports through a [`context::FetchContext`].

// Core modules
pub mod context;
pub mod error;
pub mod host;
pub mod provider;

// Re-export key types at crate root

// Errors
pub use error::{CredentialError, DocumentError, FetchError, HttpError, ParseError, ProcessError};

// Host APIs
pub use host::{
    credentials::{CredentialStore, KeyringCredentials},
    document::{DetachedDocumentHost, DocumentHost},
    http::HttpClient,
    process::{CommandOutput, CommandRunner, SystemCommandRunner},
};

// Contract & context
pub use context::{FetchContext, FetchContextBuilder, FetchSettings};
pub use provider::UsageProvider;
