//! Named benchmark results.
//!
//! [`StatsCollection`] maps unique names to [`Stats`] and remembers the order
//! in which they were added, so reports come out in the order benchmarks ran.
//! [`StatsLogger`] sits in front of a collection, prefixes names with the
//! current category and annotates them with iteration count and scale.

use std::collections::HashMap;

use crate::error::{MeasureError, Result};
use crate::utils::stats::{Samples, Stats};

/// Default units line for reports
pub const DEFAULT_UNITS_DESCRIPTION: &str = "Scale in usec";

/// Insertion-ordered, unique-keyed map from result name to [`Stats`].
#[derive(Debug, Default)]
pub struct StatsCollection {
    measurements: HashMap<String, Stats>,
    order: Vec<String>,
}

impl StatsCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a result. Fails if `name` is already present.
    pub fn add(&mut self, name: impl Into<String>, stats: Stats) -> Result<()> {
        let name = name.into();
        if self.measurements.contains_key(&name) {
            return Err(MeasureError::DuplicateName { name });
        }
        self.order.push(name.clone());
        self.measurements.insert(name, stats);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Stats> {
        self.measurements.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.measurements.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Names in first-insertion order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `(name, stats)` pairs in first-insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Stats)> {
        self.order
            .iter()
            .filter_map(|name| self.measurements.get(name).map(|stats| (name.as_str(), stats)))
    }
}

/// Collects results for one harness run along with attributes describing the
/// run (machine, build profile) and how values should be scaled in reports.
#[derive(Debug)]
pub struct StatsLogger {
    data: StatsCollection,
    attributes: Vec<(String, String)>,
    category: Option<String>,
    scale: f32,
    units_description: String,
}

impl Default for StatsLogger {
    fn default() -> Self {
        Self::new(StatsCollection::new())
    }
}

impl StatsLogger {
    pub fn new(data: StatsCollection) -> Self {
        Self {
            data,
            attributes: Vec::new(),
            category: None,
            scale: 1.0,
            units_description: DEFAULT_UNITS_DESCRIPTION.to_string(),
        }
    }

    pub fn data(&self) -> &StatsCollection {
        &self.data
    }

    pub fn into_data(self) -> StatsCollection {
        self.data
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// Prefix for every name added through [`add_with_count`](Self::add_with_count).
    /// `None` or an empty string clears it.
    pub fn set_category(&mut self, category: Option<&str>) {
        self.category = category.filter(|c| !c.is_empty()).map(str::to_string);
    }

    /// Divisor applied to every value in reports.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.scale = scale;
    }

    pub fn units_description(&self) -> &str {
        &self.units_description
    }

    pub fn set_units_description(&mut self, description: impl Into<String>) {
        self.units_description = description.into();
    }

    /// Set an attribute, replacing the value in place if the key exists.
    pub fn set_attribute(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((key, value)),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Attributes in the order they were first set.
    pub fn attributes(&self) -> &[(String, String)] {
        &self.attributes
    }

    pub fn add(&mut self, name: impl Into<String>, stats: Stats) -> Result<()> {
        let name = name.into();
        tracing::debug!(name = %name, "recording result");
        self.data.add(name, stats)
    }

    /// Add `samples` under a name carrying the current category and, when they
    /// differ from 1, the iteration count and scale.
    pub fn add_with_count(
        &mut self,
        name: &str,
        iteration_count: usize,
        scale: f32,
        samples: &Samples,
    ) -> Result<()> {
        let name = annotated_name(self.category(), name, iteration_count, scale);
        self.add(name, Stats::new(samples))
    }
}

/// `"{category}: {name}  [count=N scale=S.S]"`, leaving out each part that
/// does not apply.
pub fn annotated_name(category: Option<&str>, name: &str, iteration_count: usize, scale: f32) -> String {
    let mut full = match category {
        Some(category) if !category.is_empty() => format!("{}: {}", category, name),
        _ => name.to_string(),
    };

    let mut parts = Vec::with_capacity(2);
    if iteration_count != 1 {
        parts.push(format!("count={}", iteration_count));
    }
    if scale != 1.0 {
        parts.push(format!("scale={:.1}", scale));
    }
    if !parts.is_empty() {
        full.push_str("  [");
        full.push_str(&parts.join(" "));
        full.push(']');
    }
    full
}
