//! # Partition Module
//!
//! Centralized label-based routing of samples into aggregate buckets.
//!
//! A `Partition` knows the disambiguating labels of a family and holds one `Rule` per bucket. A rule
//! matches when all of its required labels are present and every other disambiguating label is absent,
//! so two rules with different disambiguating signatures can never match the same sample. Samples matching
//! no rule are dropped.

use crate::snapshot::Labels;
use eyre::{
    bail,
    Result,
};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule<B> {
    bucket: B,
    required: &'static [&'static str],
}

impl<B> Rule<B> {
    pub const fn new(bucket: B, required: &'static [&'static str]) -> Self {
        Self { bucket, required }
    }

    pub fn bucket(&self) -> &B {
        &self.bucket
    }

    pub fn required(&self) -> &'static [&'static str] {
        self.required
    }
}

#[derive(Debug, Clone)]
pub struct Partition<B> {
    dimensions: &'static [&'static str],
    rules: Vec<Rule<B>>,
}

impl<B: Clone> Partition<B> {
    pub fn new(dimensions: &'static [&'static str], rules: Vec<Rule<B>>) -> Self {
        Self { dimensions, rules }
    }

    /// Build a partition table, rejecting rules that would route the same label set to two buckets.
    pub fn try_new(dimensions: &'static [&'static str], rules: Vec<Rule<B>>) -> Result<Self> {
        let partition = Self::new(dimensions, rules);
        partition.validate()?;
        Ok(partition)
    }

    /// Check that no two rules share a disambiguating signature.
    pub fn validate(&self) -> Result<()> {
        let mut signatures = BTreeSet::new();
        for rule in &self.rules {
            let signature: BTreeSet<&str> = rule
                .required
                .iter()
                .copied()
                .filter(|label| self.dimensions.contains(label))
                .collect();
            if !signatures.insert(signature.clone()) {
                bail!("two partition rules share the disambiguating labels {signature:?}");
            }
        }
        Ok(())
    }

    pub fn dimensions(&self) -> &'static [&'static str] {
        self.dimensions
    }

    pub fn rules(&self) -> &[Rule<B>] {
        &self.rules
    }

    /// The bucket a label set belongs to, `None` when it is dropped.
    pub fn route(&self, labels: &Labels) -> Option<B> {
        self.rules
            .iter()
            .find(|rule| self.matches(rule, labels))
            .map(|rule| rule.bucket.clone())
    }

    /// Every bucket whose rule matches. Holds at most one element for a valid partition.
    pub fn matching(&self, labels: &Labels) -> Vec<B> {
        self.rules
            .iter()
            .filter(|rule| self.matches(rule, labels))
            .map(|rule| rule.bucket.clone())
            .collect()
    }

    fn matches(&self, rule: &Rule<B>, labels: &Labels) -> bool {
        rule.required.iter().all(|label| labels.has(label))
            && self
                .dimensions
                .iter()
                .filter(|label| !rule.required.contains(*label))
                .all(|label| !labels.has(label))
    }
}
