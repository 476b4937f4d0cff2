//! # Aggregators Module
//!
//! Pure functions from a `MetricsSnapshot` to one typed aggregate each.
//!
//! - **`activity`**: active users per window (`users_active`)
//! - **`content`**: content by type and runtime version (`content_count`)
//! - **`access`**: content by access control (`content_count`)
//! - **`integrations`**: OAuth integrations by template and auth type (`integrations_count`)
//! - **`workload`**: applications, processes, schedules and what is currently running
//!
//! Aggregators never fail. Families missing from the snapshot produce zeroed or absent values, and
//! samples whose labels match no partition rule are dropped.

pub mod access;
pub mod activity;
pub mod content;
pub mod integrations;
pub mod workload;

pub use access::{
    access_control,
    access_label,
};
pub use activity::user_activity;
pub use content::{
    content_stats,
    content_stats_with,
    ContentBucket,
    ContentSchema,
    ContentStats,
};
pub use integrations::integration_matrix;
pub use workload::{
    application_counts,
    currently_running,
    process_counts,
    schedule_counts,
    workload_counts,
    Workload,
};

use std::collections::BTreeMap;

pub const USERS_ACTIVE: &str = "users_active";
pub const CONTENT_COUNT: &str = "content_count";
pub const INTEGRATIONS_COUNT: &str = "integrations_count";
pub const APPLICATION_COUNT: &str = "application_count";
pub const PROCESS_COUNT: &str = "process_count";
pub const SCHEDULE_COUNT: &str = "schedule_count";

/// Bucket of a family with a single dimension label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountBucket {
    Total,
    Dimension,
}

/// Store the count of a dimension value. A repeated key replaces the earlier count.
fn set(parts: &mut BTreeMap<String, u64>, key: impl Into<String>, count: u64) {
    parts.insert(key.into(), count);
}
