use super::{
    set,
    CONTENT_COUNT,
};
use crate::{
    aggregates::DimensionedCount,
    partition::{
        Partition,
        Rule,
    },
    snapshot::MetricsSnapshot,
};
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::BTreeMap;

pub const CONTENT_TYPE: &str = "content_type";
pub const RUNTIME_LANGUAGE: &str = "runtime_language";
pub const RUNTIME_VERSION: &str = "runtime_version";
pub const ACCESS_TYPE: &str = "access_type";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentBucket {
    Total,
    ByType,
    ByRuntimeVersion,
    ByAccess,
}

/// Label schema of the `content_count` family.
///
/// `Legacy` predates the `access_type` label and must not be used against a source that emits it: an
/// `access_type` sample carries no other known label and would be taken for the unlabeled total.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentSchema {
    Legacy,
    #[default]
    AccessAware,
}

impl ContentSchema {
    pub const ALL: [ContentSchema; 2] = [ContentSchema::Legacy, ContentSchema::AccessAware];

    /// Labels whose presence decides the bucket of a sample.
    pub fn dimensions(&self) -> &'static [&'static str] {
        match self {
            ContentSchema::Legacy => &[CONTENT_TYPE, RUNTIME_LANGUAGE],
            ContentSchema::AccessAware => &[CONTENT_TYPE, RUNTIME_LANGUAGE, ACCESS_TYPE],
        }
    }

    pub fn partition(&self) -> Partition<ContentBucket> {
        let mut rules = vec![
            Rule::new(ContentBucket::Total, &[]),
            Rule::new(ContentBucket::ByType, &[CONTENT_TYPE]),
            Rule::new(ContentBucket::ByRuntimeVersion, &[RUNTIME_LANGUAGE, RUNTIME_VERSION]),
        ];
        if *self == ContentSchema::AccessAware {
            rules.push(Rule::new(ContentBucket::ByAccess, &[ACCESS_TYPE]));
        }
        Partition::new(self.dimensions(), rules)
    }
}

/// Content counts by type and by runtime version, computed in one pass over `content_count`.
///
/// Both views share the explicit unlabeled total when the family reports one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentStats {
    pub by_type: DimensionedCount,
    pub by_runtime_version: DimensionedCount,
}

impl ContentStats {
    pub fn total(&self) -> u64 {
        self.by_type.total
    }
}

/// `unknown` content is shown as `Other`.
pub fn display_content_type(content_type: &str) -> &str {
    if content_type == "unknown" {
        "Other"
    } else {
        content_type
    }
}

pub fn content_stats(snapshot: &MetricsSnapshot) -> ContentStats {
    content_stats_with(snapshot, ContentSchema::default())
}

pub fn content_stats_with(snapshot: &MetricsSnapshot, schema: ContentSchema) -> ContentStats {
    let partition = schema.partition();

    let mut total = None;
    let mut by_type = BTreeMap::new();
    let mut by_runtime_version = BTreeMap::new();

    for sample in snapshot.samples(CONTENT_COUNT) {
        let labels = sample.labels();
        match partition.route(labels) {
            Some(ContentBucket::Total) => total = Some(sample.count()),
            Some(ContentBucket::ByType) => {
                if let Some(content_type) = labels.get(CONTENT_TYPE) {
                    set(&mut by_type, display_content_type(content_type), sample.count());
                }
            }
            Some(ContentBucket::ByRuntimeVersion) => {
                if let (Some(language), Some(version)) = (labels.get(RUNTIME_LANGUAGE), labels.get(RUNTIME_VERSION)) {
                    set(&mut by_runtime_version, format!("{language} {version}"), sample.count());
                }
            }
            Some(ContentBucket::ByAccess) | None => {}
        }
    }

    ContentStats {
        by_type: DimensionedCount::new(total, by_type),
        by_runtime_version: DimensionedCount::new(total, by_runtime_version),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        exposition::parse,
        snapshot::{
            Labels,
            MetricFamily,
            MetricKind,
            Sample,
        },
    };
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    const PAYLOAD: &str = r#"
# TYPE content_count gauge
content_count 500
content_count{content_type="unknown"} 50
content_count{content_type="app"} 450
content_count{runtime_language="python",runtime_version="3.12.4"} 120
content_count{runtime_language="r",runtime_version="4.4.1"} 80
content_count{runtime_language="quarto"} 7
content_count{access_type="acl"} 300
"#;

    #[test]
    fn explicit_total_and_type_remapping() {
        let snapshot = parse(
            "content_count 500\ncontent_count{content_type=\"unknown\"} 50\ncontent_count{content_type=\"app\"} 450\n",
        )
        .unwrap();
        let stats = content_stats(&snapshot);
        assert_eq!(stats.total(), 500);
        assert_eq!(
            stats.by_type.by_dimension,
            BTreeMap::from([("Other".to_string(), 50), ("app".to_string(), 450)])
        );
    }

    #[test]
    fn remapped_type_keeps_the_last_sample() {
        let snapshot = parse(
            "content_count{content_type=\"unknown\"} 50\ncontent_count{content_type=\"Other\"} 7\n",
        )
        .unwrap();
        let stats = content_stats(&snapshot);
        assert_eq!(stats.by_type.by_dimension, BTreeMap::from([("Other".to_string(), 7)]));
        assert_eq!(stats.total(), 7);
    }

    #[test]
    fn runtime_versions_use_composite_keys() {
        let stats = content_stats(&parse(PAYLOAD).unwrap());
        assert_eq!(
            stats.by_runtime_version.by_dimension,
            BTreeMap::from([("python 3.12.4".to_string(), 120), ("r 4.4.1".to_string(), 80)])
        );
        assert_eq!(stats.by_runtime_version.total, 500);
    }

    #[test]
    fn explicit_total_wins_over_diverging_parts() {
        let snapshot = parse("content_count 10\ncontent_count{content_type=\"app\"} 450\n").unwrap();
        let stats = content_stats(&snapshot);
        assert_eq!(stats.total(), 10);
        assert_eq!(stats.by_type.parts_sum(), 450);
    }

    #[test]
    fn total_falls_back_to_sum_of_parts() {
        let snapshot = parse("content_count{content_type=\"app\"} 4\ncontent_count{content_type=\"doc\"} 6\n").unwrap();
        assert_eq!(content_stats(&snapshot).total(), 10);
    }

    #[test]
    fn legacy_schema_mistakes_access_samples_for_the_total() {
        let snapshot = parse("content_count 500\ncontent_count{access_type=\"acl\"} 300\n").unwrap();
        assert_eq!(content_stats_with(&snapshot, ContentSchema::AccessAware).total(), 500);
        assert_eq!(content_stats_with(&snapshot, ContentSchema::Legacy).total(), 300);
    }

    #[test]
    fn mixed_dimension_samples_are_dropped() {
        let snapshot = parse(
            "content_count{content_type=\"app\",runtime_language=\"python\",runtime_version=\"3.11\"} 9\n",
        )
        .unwrap();
        assert_eq!(content_stats(&snapshot), ContentStats::default());
    }

    #[test]
    fn built_in_partitions_are_valid() {
        for schema in ContentSchema::ALL {
            schema.partition().validate().unwrap();
        }
    }

    #[test]
    fn aggregation_is_idempotent() {
        let snapshot = parse(PAYLOAD).unwrap();
        assert_eq!(content_stats(&snapshot), content_stats(&snapshot));
    }

    fn label_value() -> impl Strategy<Value = Option<String>> {
        prop::option::of(prop_oneof![Just(String::new()), "[a-z0-9.]{1,6}"])
    }

    fn label_set() -> impl Strategy<Value = Labels> {
        (label_value(), label_value(), label_value(), label_value(), label_value()).prop_map(
            |(content_type, language, version, access, extra)| {
                [
                    (CONTENT_TYPE, content_type),
                    (RUNTIME_LANGUAGE, language),
                    (RUNTIME_VERSION, version),
                    (ACCESS_TYPE, access),
                    ("owner", extra),
                ]
                .into_iter()
                .filter_map(|(name, value)| value.map(|value| (name, value)))
                .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn every_sample_routes_to_at_most_one_bucket(labels in label_set()) {
            for schema in ContentSchema::ALL {
                prop_assert!(schema.partition().matching(&labels).len() <= 1);
            }
        }

        #[test]
        fn no_sample_is_counted_in_two_views(labels in label_set(), value in 0u32..10_000) {
            let mut family = MetricFamily::new(CONTENT_COUNT, MetricKind::Gauge);
            family.push(Sample::new(labels, f64::from(value)));
            let snapshot: MetricsSnapshot = [family].into_iter().collect();

            let stats = content_stats(&snapshot);
            let counted = stats.by_type.parts_sum() + stats.by_runtime_version.parts_sum();
            prop_assert!(counted == 0 || counted == u64::from(value));
            prop_assert_eq!(content_stats(&snapshot), stats);
        }
    }
}
