//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! Config.ini on disk
//!     → watcher.rs (notify, relevance filter)
//!     → debounce.rs (coalesce bursts into one reload)
//!     → parser.rs (lines → ConfigSnapshot)
//!     → store.rs (atomic swap of Arc<ConfigSnapshot>, ConfigChanged broadcast)
//!     → get_config(scope, key): [<prefix>.<scope>] then [Default]
//!
//! Store settings (TOML):
//!     loader.rs → validation.rs → StoreSettings (schema.rs)
//! ```
//!
//! # Design Decisions
//! - Snapshots are immutable once published; changes require full reparse
//! - A failed reload never replaces the last good snapshot
//! - Lookups never fail; absence is `None`

pub mod debounce;
pub mod error;
pub mod loader;
pub mod parser;
pub mod schema;
pub mod snapshot;
pub mod store;
pub mod validation;
pub mod watcher;

pub use error::{ConfigError, ParseError, StoreError};
pub use loader::{load_settings, SettingsError};
pub use parser::{parse_lines, parse_str};
pub use schema::StoreSettings;
pub use snapshot::{ConfigSnapshot, Resolved, Section, ValueSource};
pub use store::{ConfigChanged, ConfigStore};
