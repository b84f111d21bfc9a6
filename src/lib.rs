//! # MeasureIt
//!
//! A microbenchmark harness for measuring the cost of very small operations:
//! calls, array accesses, branches, allocations. Each operation is timed in
//! many samples with the harness overhead subtracted, summarised into
//! statistics and reported relative to the cost of an empty function call.

pub mod areas;
pub mod error;
pub mod fluent;
pub mod harness;
pub mod registry;
pub mod report;
pub mod results;
pub mod tui;
pub mod utils;

pub use error::{MeasureError, Result};

/// Re-export commonly used items
pub mod prelude {
    pub use crate::error::{MeasureError, Result};
    pub use crate::fluent::{FluentMeasure, NamedAction};
    pub use crate::harness::Harness;
    pub use crate::registry::{build_registry, AreaRegistry, BenchmarkArea};
    pub use crate::results::{StatsCollection, StatsLogger};
    pub use crate::ten;
    pub use crate::utils::{CodeTimer, MultiSampleTimer, PinStrategy, Samples, Stats, TimingConfig};
}

#[cfg(test)]
mod tests {
    use crate::registry::build_registry;
    use std::collections::HashSet;

    #[test]
    fn test_all_areas_registry_verify() {
        let registry = build_registry();
        let areas = registry.all();
        assert!(!areas.is_empty());

        let mut seen = HashSet::new();
        for area in areas {
            assert!(
                !area.description().is_empty(),
                "area '{}' has no description",
                area.name()
            );
            assert!(
                seen.insert(area.name().to_ascii_lowercase()),
                "area name '{}' registered twice",
                area.name()
            );
        }
        assert!(registry.defaults().len() < areas.len(), "expected a non-default area");
    }
}
