use super::{
    content::{
        ContentBucket,
        ContentSchema,
        ACCESS_TYPE,
    },
    set,
    CONTENT_COUNT,
};
use crate::{
    aggregates::DimensionedCount,
    snapshot::MetricsSnapshot,
};
use std::collections::BTreeMap;

/// Human readable label for an `access_type` value. Unknown values are shown as they are.
pub fn access_label(access_type: &str) -> &str {
    match access_type {
        "acl" => "Specific users/groups",
        "all" => "No login required",
        "logged_in" => "All users - login required",
        other => other,
    }
}

/// Content by access control. The family reports no total for this view, so the total is the sum of the parts.
pub fn access_control(snapshot: &MetricsSnapshot) -> DimensionedCount {
    let partition = ContentSchema::AccessAware.partition();
    let mut parts = BTreeMap::new();

    for sample in snapshot.samples(CONTENT_COUNT) {
        if partition.route(sample.labels()) != Some(ContentBucket::ByAccess) {
            continue;
        }
        if let Some(access_type) = sample.labels().get(ACCESS_TYPE) {
            set(&mut parts, access_label(access_type), sample.count());
        }
    }

    DimensionedCount::new(None, parts)
}
