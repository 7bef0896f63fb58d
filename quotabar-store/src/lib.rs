// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Quotabar Store
//!
//! Durable state for the Quotabar application:
//!
//! - **CacheStore**: the last successful snapshot per provider, written
//!   atomically and returned unconditionally (staleness is the caller's
//!   concern)
//! - **Settings**: user preferences with tolerant JSON persistence
//! - **Persistence**: file I/O helpers shared by both
//!
//! ## Usage
//!
//! ```ignore
//! use quotabar_store::CacheStore;
//! use quotabar_core::ProviderId;
//!
//! let cache = CacheStore::open_default()?;
//! cache.save(ProviderId::Claude, &result).await?;
//! let snapshot = cache.load(ProviderId::Claude).await;
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod persistence;

pub use cache::CacheStore;
pub use config::Settings;
pub use error::StoreError;
pub use persistence::{
    default_cache_dir, default_config_dir, default_settings_path, load_json,
    load_json_or_default, save_json,
};
