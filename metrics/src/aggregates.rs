//! # Aggregates Module
//!
//! Typed summaries handed to the presentation layer.
//!
//! - **`WindowedCount`**: active users per activity window, absent when not reported
//! - **`DimensionedCount`**: a total plus counts per dimension value
//! - **`Matrix`**: counts keyed by `(row, col)`, missing cells read as 0
//! - **`CurrentlyRunning`**: projection of the application and process totals

use serde::{
    ser::SerializeStruct,
    Deserialize,
    Serialize,
    Serializer,
};
use std::collections::{
    BTreeMap,
    BTreeSet,
};
use strum::{
    Display,
    EnumIter,
    EnumString,
    IntoEnumIterator,
};

/// The closed set of activity windows reported by `users_active`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumString, EnumIter)]
pub enum Window {
    #[strum(serialize = "24h")]
    Day,
    #[strum(serialize = "7d")]
    Week,
    #[strum(serialize = "30d")]
    Month,
    #[strum(serialize = "1y")]
    Year,
}

impl Window {
    pub fn as_str(&self) -> &'static str {
        match self {
            Window::Day => "24h",
            Window::Week => "7d",
            Window::Month => "30d",
            Window::Year => "1y",
        }
    }

    /// Dashboard caption, e.g. `DAU (24h)`.
    pub fn caption(&self) -> &'static str {
        match self {
            Window::Day => "DAU (24h)",
            Window::Week => "WAU (7d)",
            Window::Month => "MAU (30d)",
            Window::Year => "YAU (1y)",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindowedCount {
    #[serde(rename = "24h")]
    pub day: Option<u64>,
    #[serde(rename = "7d")]
    pub week: Option<u64>,
    #[serde(rename = "30d")]
    pub month: Option<u64>,
    #[serde(rename = "1y")]
    pub year: Option<u64>,
}

impl WindowedCount {
    pub fn get(&self, window: Window) -> Option<u64> {
        match window {
            Window::Day => self.day,
            Window::Week => self.week,
            Window::Month => self.month,
            Window::Year => self.year,
        }
    }

    pub fn set(&mut self, window: Window, value: u64) {
        let slot = match window {
            Window::Day => &mut self.day,
            Window::Week => &mut self.week,
            Window::Month => &mut self.month,
            Window::Year => &mut self.year,
        };
        *slot = Some(value);
    }

    pub fn iter(&self) -> impl Iterator<Item = (Window, Option<u64>)> + '_ {
        Window::iter().map(|window| (window, self.get(window)))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DimensionedCount {
    pub total: u64,
    pub by_dimension: BTreeMap<String, u64>,
}

impl DimensionedCount {
    /// Build from parts, using the sum of the parts when no explicit total was reported.
    pub fn new(explicit_total: Option<u64>, by_dimension: BTreeMap<String, u64>) -> Self {
        let total = explicit_total.unwrap_or_else(|| by_dimension.values().sum());
        Self { total, by_dimension }
    }

    pub fn get(&self, dimension: &str) -> u64 {
        self.by_dimension.get(dimension).copied().unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.by_dimension.is_empty()
    }

    /// Sum of the dimensioned parts. May differ from `total` when the source reported an explicit total.
    pub fn parts_sum(&self) -> u64 {
        self.by_dimension.values().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Matrix {
    cells: BTreeMap<(String, String), u64>,
    rows: BTreeSet<String>,
    cols: BTreeSet<String>,
}

impl Matrix {
    /// Set the cell at `(row, col)`, replacing an earlier count.
    pub fn record(&mut self, row: impl Into<String>, col: impl Into<String>, count: u64) {
        let (row, col) = (row.into(), col.into());
        self.rows.insert(row.clone());
        self.cols.insert(col.clone());
        self.cells.insert((row, col), count);
    }

    pub fn get(&self, row: &str, col: &str) -> u64 {
        self.cells
            .get(&(row.to_string(), col.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Distinct row keys, sorted.
    pub fn rows(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(String::as_str)
    }

    /// Distinct column keys, sorted.
    pub fn cols(&self) -> impl Iterator<Item = &str> {
        self.cols.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn row_total(&self, row: &str) -> u64 {
        self.cols().map(|col| self.get(row, col)).sum()
    }

    pub fn col_total(&self, col: &str) -> u64 {
        self.rows().map(|row| self.get(row, col)).sum()
    }

    /// Sum across columns for every row, in row order.
    pub fn row_totals(&self) -> BTreeMap<String, u64> {
        self.rows().map(|row| (row.to_string(), self.row_total(row))).collect()
    }

    /// Sum across rows for every column, in column order.
    pub fn col_totals(&self) -> BTreeMap<String, u64> {
        self.cols().map(|col| (col.to_string(), self.col_total(col))).collect()
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let cells: BTreeMap<String, u64> = self
            .cells
            .iter()
            .map(|((row, col), count)| (format!("{row}|{col}"), *count))
            .collect();

        let mut state = serializer.serialize_struct("Matrix", 3)?;
        state.serialize_field("rows", &self.rows)?;
        state.serialize_field("cols", &self.cols)?;
        state.serialize_field("cells", &cells)?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentlyRunning {
    pub applications: u64,
    pub processes: u64,
}
