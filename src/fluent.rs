//! Quick measurements from library code.
//!
//! ```no_run
//! use measure_it::fluent::FluentMeasure;
//!
//! let results = FluentMeasure::new()
//!     .with_sample_count(100)
//!     .named_action("hash", || {
//!         std::hint::black_box("Hello".len());
//!     })?;
//! for (name, stats) in results.iter() {
//!     println!("{name}: {stats}");
//! }
//! # Ok::<(), measure_it::MeasureError>(())
//! ```

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::Result;
use crate::results::{StatsCollection, StatsLogger};
use crate::utils::MultiSampleTimer;

pub const DEFAULT_SAMPLE_COUNT: usize = 1000;
pub const DEFAULT_ITERATION_COUNT: usize = 10;

/// Name used by [`FluentMeasure::action`].
pub const DEFAULT_ACTION_NAME: &str = "default";

/// A closure to measure together with the name its results are stored under.
pub struct NamedAction<'a> {
    name: String,
    action: Box<dyn FnMut() + 'a>,
}

impl<'a> NamedAction<'a> {
    pub fn new(name: impl Into<String>, action: impl FnMut() + 'a) -> Self {
        Self {
            name: name.into(),
            action: Box::new(action),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Builder running closures through a fresh [`MultiSampleTimer`] and
/// returning their statistics.
#[derive(Clone, Copy, Debug)]
pub struct FluentMeasure {
    sample_count: usize,
    iteration_count: usize,
}

impl Default for FluentMeasure {
    fn default() -> Self {
        Self {
            sample_count: DEFAULT_SAMPLE_COUNT,
            iteration_count: DEFAULT_ITERATION_COUNT,
        }
    }
}

impl FluentMeasure {
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts of zero are reported as a configuration error when measuring.
    pub fn with_sample_count(mut self, sample_count: usize) -> Self {
        self.sample_count = sample_count;
        self
    }

    pub fn with_iteration_count(mut self, iteration_count: usize) -> Self {
        self.iteration_count = iteration_count;
        self
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    /// Measure `action` under [`DEFAULT_ACTION_NAME`].
    pub fn action<F: FnMut()>(&self, action: F) -> Result<StatsCollection> {
        self.named_action(DEFAULT_ACTION_NAME, action)
    }

    pub fn named_action<F: FnMut()>(&self, name: &str, action: F) -> Result<StatsCollection> {
        self.named_actions([NamedAction::new(name, action)])
    }

    /// Measure each action in turn. Results keep the order of `actions`; two
    /// actions with the same name fail with a duplicate-name error.
    pub fn named_actions<'a, I>(&self, actions: I) -> Result<StatsCollection>
    where
        I: IntoIterator<Item = NamedAction<'a>>,
    {
        let logger = Rc::new(RefCell::new(StatsLogger::default()));
        let mut timer = MultiSampleTimer::new(self.sample_count, self.iteration_count)?;
        let sink = Rc::clone(&logger);
        timer.on_batch(move |name, iteration_count, scale, samples| {
            sink.borrow_mut()
                .add_with_count(name, iteration_count, scale, samples)
        });

        for mut named in actions {
            timer.measure(&named.name, named.action.as_mut())?;
        }
        drop(timer);

        let data = std::mem::take(&mut *logger.borrow_mut()).into_data();
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use std::cell::Cell;

    #[test]
    fn test_defaults_and_builders() {
        let measure = FluentMeasure::new();
        assert_eq!(measure.sample_count(), 1000);
        assert_eq!(measure.iteration_count(), 10);

        let custom = measure.with_sample_count(5).with_iteration_count(3);
        assert_eq!((custom.sample_count(), custom.iteration_count()), (5, 3));
        // Builders return a copy and leave the original alone.
        assert_eq!(measure.sample_count(), 1000);
    }

    #[test]
    fn test_action_uses_default_name() {
        let results = FluentMeasure::new()
            .action(|| {
                std::hint::black_box("Hello".len());
            })
            .unwrap();
        assert_eq!(results.len(), 1);
        let stats = results.get("default  [count=10]").unwrap();
        assert_eq!(stats.count(), 1000);
    }

    #[test]
    fn test_named_actions_in_order() {
        let first = Cell::new(0usize);
        let second = Cell::new(0usize);
        let results = FluentMeasure::new()
            .with_sample_count(4)
            .with_iteration_count(2)
            .named_actions([
                NamedAction::new("first", || first.set(first.get() + 1)),
                NamedAction::new("second", || second.set(second.get() + 1)),
            ])
            .unwrap();

        let names: Vec<_> = results.names().collect();
        assert_eq!(names, ["first  [count=2]", "second  [count=2]"]);
        // One priming call plus 4 samples of 2 iterations each.
        assert_eq!(first.get(), 9);
        assert_eq!(second.get(), 9);
        for (_, stats) in results.iter() {
            assert_eq!(stats.count(), 4);
        }
    }

    #[test]
    fn test_single_iteration_has_plain_name() {
        let results = FluentMeasure::new()
            .with_sample_count(3)
            .with_iteration_count(1)
            .named_action("plain", || {})
            .unwrap();
        assert!(results.contains("plain"));
    }

    #[test]
    fn test_zero_counts_rejected() {
        let err = FluentMeasure::new().with_sample_count(0).action(|| {}).unwrap_err();
        assert!(matches!(err, MeasureError::Config { .. }));
        let err = FluentMeasure::new().with_iteration_count(0).action(|| {}).unwrap_err();
        assert!(matches!(err, MeasureError::Config { .. }));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let err = FluentMeasure::new()
            .with_sample_count(2)
            .named_actions([NamedAction::new("same", || {}), NamedAction::new("same", || {})])
            .unwrap_err();
        assert!(matches!(err, MeasureError::DuplicateName { ref name } if name == "same  [count=10]"));
    }
}
