//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! watcher / debouncer / store produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (fs events, reload outcomes, generation)
//!
//! Consumers:
//!     → stdout (fmt layer, filtered by RUST_LOG)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;
