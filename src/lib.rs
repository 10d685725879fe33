//! Hot-reloading, scope-aware INI configuration store.

pub mod config;
pub mod observability;

pub use config::{ConfigChanged, ConfigSnapshot, ConfigStore, StoreSettings};
