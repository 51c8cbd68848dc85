//! Compare a point-cloud dataset's instance inventory against a caption
//! table: which instances lack captions, which captions lack instances, and
//! coverage per split and category.

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use config::RunConfig;
pub use data::model::{CaptionTable, Counts, Inventory, ReconciliationResult, Split};
pub use error::AuditError;

/// Initialise `env_logger` with `info` (or `debug` when `verbose`) unless
/// `RUST_LOG` says otherwise.
pub fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}
