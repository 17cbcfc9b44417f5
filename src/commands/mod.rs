//! CLI command implementations.
//!
//! - **report**: build one dashboard snapshot from a feed batch
//! - **watch**: re-read a feed batch on an interval
//! - **classify**: classify a single observation
//! - **init**: write a default `.outbreakmap.toml`

pub mod classify;
pub mod init;
pub mod report;
pub mod watch;

pub use classify::{classify_counts, run_classify, Classification, ClassifyConfig};
pub use init::init_config;
pub use report::{parse_instant, run_report, ReportSession};
pub use watch::{run_watch, WatchConfig};
