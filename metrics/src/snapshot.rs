//! # Snapshot Module
//!
//! In-memory representation of one metrics fetch.
//!
//! - **`Labels`**: label name to label value, unique keys, order irrelevant
//! - **`Sample`**: an immutable `(labels, value)` observation
//! - **`MetricFamily`**: a named, ordered sequence of samples
//! - **`MetricsSnapshot`**: family name to family, read-only once built

use derive_more::Deref;
use serde::{
    Deserialize,
    Serialize,
};
use std::collections::{
    btree_map,
    BTreeMap,
};
use strum::{
    Display,
    EnumString,
};

/// The label set of a sample.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Deref)]
pub struct Labels(BTreeMap<String, String>);

impl Labels {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// A label counts as present when it is set to a non-empty value.
    pub fn has(&self, name: &str) -> bool {
        self.get(name).is_some_and(|value| !value.is_empty())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Labels {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    labels: Labels,
    value: f64,
}

impl Sample {
    pub fn new(labels: Labels, value: f64) -> Self {
        Self { labels, value }
    }

    pub fn labels(&self) -> &Labels {
        &self.labels
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// The value narrowed to a count. Fractions are truncated; negative and NaN values become 0.
    pub fn count(&self) -> u64 {
        self.value as u64
    }
}

/// Declared type of a family. Only used to group suffixed sample names, never for aggregation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Counter,
    Gauge,
    Histogram,
    GaugeHistogram,
    Summary,
    Info,
    StateSet,
    #[default]
    #[strum(to_string = "untyped", serialize = "unknown")]
    Untyped,
}

impl MetricKind {
    /// Sample name suffixes that still belong to a family of this kind.
    pub fn sample_suffixes(&self) -> &'static [&'static str] {
        match self {
            MetricKind::Counter => &["_total", "_created"],
            MetricKind::Summary => &["_sum", "_count", "_created"],
            MetricKind::Histogram => &["_bucket", "_sum", "_count", "_created"],
            MetricKind::GaugeHistogram => &["_bucket", "_gsum", "_gcount"],
            MetricKind::Info => &["_info"],
            MetricKind::Gauge | MetricKind::StateSet | MetricKind::Untyped => &[],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetricFamily {
    name: String,
    kind: MetricKind,
    help: Option<String>,
    samples: Vec<Sample>,
}

impl MetricFamily {
    pub fn new(name: impl ToString, kind: MetricKind) -> Self {
        Self {
            name: name.to_string(),
            kind,
            help: None,
            samples: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> MetricKind {
        self.kind
    }

    pub fn help(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Whether a sample called `sample_name` is part of this family.
    pub fn owns_sample(&self, sample_name: &str) -> bool {
        if sample_name == self.name {
            return true;
        }
        sample_name
            .strip_prefix(self.name.as_str())
            .is_some_and(|suffix| self.kind.sample_suffixes().contains(&suffix))
    }

    pub(crate) fn set_help(&mut self, help: impl ToString) {
        self.help = Some(help.to_string());
    }

    pub(crate) fn push(&mut self, sample: Sample) {
        self.samples.push(sample);
    }

    pub(crate) fn extend(&mut self, samples: Vec<Sample>) {
        self.samples.extend(samples);
    }
}

/// One point-in-time fetch of all metric families.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    families: BTreeMap<String, MetricFamily>,
}

impl MetricsSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.families.is_empty()
    }

    pub fn len(&self) -> usize {
        self.families.len()
    }

    pub fn family(&self, name: &str) -> Option<&MetricFamily> {
        self.families.get(name)
    }

    /// Samples of a family, or an empty slice when the family was not reported.
    pub fn samples(&self, name: &str) -> &[Sample] {
        self.family(name).map(MetricFamily::samples).unwrap_or_default()
    }

    pub fn families(&self) -> impl Iterator<Item = &MetricFamily> {
        self.families.values()
    }

    pub fn family_names(&self) -> impl Iterator<Item = &str> {
        self.families.keys().map(String::as_str)
    }
}

impl FromIterator<MetricFamily> for MetricsSnapshot {
    /// Families sharing a name are merged, keeping the samples in iteration order.
    fn from_iter<T: IntoIterator<Item = MetricFamily>>(iter: T) -> Self {
        let mut families = BTreeMap::<String, MetricFamily>::new();
        for family in iter {
            match families.entry(family.name.clone()) {
                btree_map::Entry::Vacant(entry) => {
                    entry.insert(family);
                }
                btree_map::Entry::Occupied(mut entry) => {
                    entry.get_mut().extend(family.samples);
                }
            }
        }
        Self { families }
    }
}
