//! Snapdiff - portfolio snapshot comparison
//!
//! This library loads two point-in-time brokerage exports, aligns them by
//! holding and separates money added or withdrawn from market gains.

pub mod cli;
pub mod compare;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod export;
pub mod locale;
pub mod snapshot;
pub mod utils;

pub use compare::{compare, Comparison, PortfolioSummary, ReconciledRow, SortOrder};
pub use error::LoadFailure;
pub use snapshot::{load_snapshot, HoldingRecord, Snapshot};
