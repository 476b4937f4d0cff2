use crate::{
    aggregates::{
        CurrentlyRunning,
        DimensionedCount,
        Matrix,
        WindowedCount,
    },
    aggregators::{
        access_control,
        application_counts,
        content_stats,
        currently_running,
        integration_matrix,
        process_counts,
        schedule_counts,
        user_activity,
        ContentStats,
    },
    snapshot::MetricsSnapshot,
};
use serde::Serialize;

/// Every metrics aggregate computed over one snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MetricsReport {
    pub user_activity: WindowedCount,
    pub content: ContentStats,
    pub access_control: DimensionedCount,
    pub integrations: Matrix,
    pub applications: DimensionedCount,
    pub processes: DimensionedCount,
    pub schedules: DimensionedCount,
    pub currently_running: CurrentlyRunning,
}

impl MetricsReport {
    pub fn from_snapshot(snapshot: &MetricsSnapshot) -> Self {
        Self {
            user_activity: user_activity(snapshot),
            content: content_stats(snapshot),
            access_control: access_control(snapshot),
            integrations: integration_matrix(snapshot),
            applications: application_counts(snapshot),
            processes: process_counts(snapshot),
            schedules: schedule_counts(snapshot),
            currently_running: currently_running(snapshot),
        }
    }
}
