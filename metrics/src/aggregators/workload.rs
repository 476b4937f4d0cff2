use super::{
    set,
    CountBucket,
    APPLICATION_COUNT,
    PROCESS_COUNT,
    SCHEDULE_COUNT,
};
use crate::{
    aggregates::{
        CurrentlyRunning,
        DimensionedCount,
    },
    partition::{
        Partition,
        Rule,
    },
    snapshot::MetricsSnapshot,
};
use std::collections::BTreeMap;
use strum::{
    Display,
    EnumIter,
};

pub const APPLICATION_TYPE: &str = "application_type";
pub const PROCESS_TAG: &str = "process_tag";
pub const SCHEDULE_TYPE: &str = "schedule_type";

/// Families counted along a single dimension label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumIter)]
pub enum Workload {
    Applications,
    Processes,
    Schedules,
}

impl Workload {
    pub fn family(&self) -> &'static str {
        match self {
            Workload::Applications => APPLICATION_COUNT,
            Workload::Processes => PROCESS_COUNT,
            Workload::Schedules => SCHEDULE_COUNT,
        }
    }

    pub fn dimension(&self) -> &'static str {
        match self {
            Workload::Applications => APPLICATION_TYPE,
            Workload::Processes => PROCESS_TAG,
            Workload::Schedules => SCHEDULE_TYPE,
        }
    }

    /// Whether the family emits an unlabeled total sample.
    pub fn reports_total(&self) -> bool {
        matches!(self, Workload::Applications)
    }

    fn partition(&self) -> Partition<CountBucket> {
        let dimensions: &'static [&'static str] = match self {
            Workload::Applications => &[APPLICATION_TYPE],
            Workload::Processes => &[PROCESS_TAG],
            Workload::Schedules => &[SCHEDULE_TYPE],
        };
        let mut rules = vec![Rule::new(CountBucket::Dimension, dimensions)];
        if self.reports_total() {
            rules.push(Rule::new(CountBucket::Total, &[]));
        }
        Partition::new(dimensions, rules)
    }
}

/// Counts of a workload family by its dimension label.
///
/// Families without an unlabeled total sample are totalled from their parts, so a stray unlabeled sample is
/// dropped for them.
pub fn workload_counts(snapshot: &MetricsSnapshot, workload: Workload) -> DimensionedCount {
    let partition = workload.partition();
    let mut total = None;
    let mut parts = BTreeMap::new();

    for sample in snapshot.samples(workload.family()) {
        let labels = sample.labels();
        match partition.route(labels) {
            Some(CountBucket::Total) => total = Some(sample.count()),
            Some(CountBucket::Dimension) => {
                if let Some(key) = labels.get(workload.dimension()) {
                    set(&mut parts, key, sample.count());
                }
            }
            None => {}
        }
    }

    DimensionedCount::new(total, parts)
}

pub fn application_counts(snapshot: &MetricsSnapshot) -> DimensionedCount {
    workload_counts(snapshot, Workload::Applications)
}

pub fn process_counts(snapshot: &MetricsSnapshot) -> DimensionedCount {
    workload_counts(snapshot, Workload::Processes)
}

pub fn schedule_counts(snapshot: &MetricsSnapshot) -> DimensionedCount {
    workload_counts(snapshot, Workload::Schedules)
}

/// Running applications and processes, projected from their own aggregates.
pub fn currently_running(snapshot: &MetricsSnapshot) -> CurrentlyRunning {
    CurrentlyRunning {
        applications: application_counts(snapshot).total,
        processes: process_counts(snapshot).total,
    }
}
