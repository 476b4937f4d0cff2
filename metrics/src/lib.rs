//! # Connect Dashboard Metrics
//!
//! Turns the text exposition payload of a Connect server's metrics endpoint into typed aggregates.
//!
//! ## Architecture
//!
//! - **`exposition`**: parser from payload text to a [`MetricsSnapshot`]
//! - **`snapshot`**: labels, samples, families and the snapshot itself
//! - **`partition`**: label-presence routing of samples into aggregate buckets
//! - **`aggregators`**: one pure function per aggregate
//! - **`aggregates`**: the typed outputs
//! - **`fetcher`**: HTTP fetch that degrades to an empty snapshot
//! - **`report`**: all aggregates of one snapshot, serializable as JSON
//!
//! ```no_run
//! # async fn run() {
//! use connect_dashboard_metrics::{fetch_snapshot, MetricsReport};
//!
//! let url = "http://localhost:3232/metrics".parse().unwrap();
//! let snapshot = fetch_snapshot(&reqwest::Client::new(), &url).await;
//! let report = MetricsReport::from_snapshot(&snapshot);
//! println!("{}", report.content.total());
//! # }
//! ```

#[macro_use]
extern crate tracing;

pub mod aggregates;
pub mod aggregators;
pub mod exposition;
pub mod fetcher;
pub mod partition;
pub mod report;
pub mod snapshot;

pub use aggregates::{
    CurrentlyRunning,
    DimensionedCount,
    Matrix,
    Window,
    WindowedCount,
};
pub use fetcher::{
    fetch_snapshot,
    try_fetch_snapshot,
};
pub use report::MetricsReport;
pub use snapshot::{
    Labels,
    MetricFamily,
    MetricKind,
    MetricsSnapshot,
    Sample,
};
