//! Drives a benchmark run.
//!
//! The [`Harness`] owns one [`MultiSampleTimer`] per standard iteration count
//! and feeds every batch they produce into a shared [`StatsLogger`]. Areas
//! borrow the harness and pick the timer whose loop count makes their
//! operation take long enough to measure.

use std::cell::RefCell;
use std::hint::black_box;
use std::rc::Rc;
use std::time::Duration;

use crate::areas::method_calls::empty_function;
use crate::error::Result;
use crate::registry::BenchmarkArea;
use crate::results::StatsLogger;
use crate::utils::stats::Stats;
use crate::utils::{CodeTimer, MultiSampleTimer, TimingConfig};

/// Name of the baseline every other result is scaled against
pub const BASELINE_NAME: &str = "MethodCalls: EmptyStaticFunction()";

pub struct Harness {
    logger: Rc<RefCell<StatsLogger>>,
    timer1: MultiSampleTimer,
    timer10: MultiSampleTimer,
    timer100: MultiSampleTimer,
    timer1000: MultiSampleTimer,
}

impl Harness {
    /// Build the four standard timers from `config`. Its `iteration_count` is
    /// ignored; the other fields apply to every timer. Only the first timer
    /// spins the CPU up.
    pub fn new(config: &TimingConfig, logger: Rc<RefCell<StatsLogger>>) -> Result<Self> {
        let timer_with = |iteration_count: usize, spin_up: Duration| -> Result<MultiSampleTimer> {
            let mut timer = MultiSampleTimer::from_config(&TimingConfig {
                iteration_count,
                spin_up,
                ..config.clone()
            })?;
            let sink = Rc::clone(&logger);
            timer.on_batch(move |name, iteration_count, scale, samples| {
                sink.borrow_mut()
                    .add_with_count(name, iteration_count, scale, samples)
            });
            Ok(timer)
        };

        let harness = Self {
            timer1000: timer_with(1000, config.spin_up)?,
            timer100: timer_with(100, Duration::ZERO)?,
            timer10: timer_with(10, Duration::ZERO)?,
            timer1: timer_with(1, Duration::ZERO)?,
            logger: Rc::clone(&logger),
        };
        Ok(harness)
    }

    /// Also print every batch to stdout as it completes.
    pub fn echo_to_console(&mut self) {
        for timer in self.timers_mut() {
            timer.on_batch(MultiSampleTimer::print);
        }
    }

    /// Print every individual sample to stdout as well.
    pub fn echo_samples_to_console(&mut self) {
        for timer in self.timers_mut() {
            timer.on_sample(CodeTimer::print_sample);
        }
    }

    pub fn logger(&self) -> Rc<RefCell<StatsLogger>> {
        Rc::clone(&self.logger)
    }

    /// One call per sample; the only timer that accepts a reset closure.
    pub fn timer1(&mut self) -> &mut MultiSampleTimer {
        &mut self.timer1
    }

    pub fn timer10(&mut self) -> &mut MultiSampleTimer {
        &mut self.timer10
    }

    pub fn timer100(&mut self) -> &mut MultiSampleTimer {
        &mut self.timer100
    }

    pub fn timer1000(&mut self) -> &mut MultiSampleTimer {
        &mut self.timer1000
    }

    fn timers_mut(&mut self) -> [&mut MultiSampleTimer; 4] {
        [
            &mut self.timer1,
            &mut self.timer10,
            &mut self.timer100,
            &mut self.timer1000,
        ]
    }

    /// Measure the fixed baselines, then every area in order with the logger
    /// category set to the area name.
    ///
    /// Returns the empty-function baseline. When its median is positive it
    /// also becomes the logger's report scale.
    pub fn run(&mut self, areas: &[&dyn BenchmarkArea]) -> Result<Stats> {
        let baseline = self.measure_baselines()?;

        for area in areas {
            tracing::info!(area = area.name(), "running area");
            self.logger.borrow_mut().set_category(Some(area.name()));
            let outcome = area.run(self);
            self.logger.borrow_mut().set_category(None);
            outcome?;
        }

        let median = baseline.median();
        let mut logger = self.logger.borrow_mut();
        if median > 0.0 {
            logger.set_scale(median);
            logger.set_units_description(format!(
                "Scaled where EmptyStaticFunction = 1.0 ({:.1} nsec = 1.0 units)",
                median * 1000.0
            ));
        } else {
            tracing::warn!(median, "baseline median not positive, reporting raw usec");
        }
        Ok(baseline)
    }

    fn measure_baselines(&mut self) -> Result<Stats> {
        // Shows the measurement error, which should ideally be 0.
        self.timer1000.measure("NOTHING", || {})?;

        let samples = self.timer1000.measure_scaled(BASELINE_NAME, 10.0, || {
            crate::ten!(empty_function());
        })?;

        // Also gets the CPU out of any low-power state.
        self.timer1000.measure("Loop 1K times", || {
            let mut k = 0u32;
            while k < 1000 {
                k = black_box(k + 1);
            }
        })?;

        Ok(samples.stats())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeasureError;
    use crate::utils::PinStrategy;

    struct Quick;

    impl BenchmarkArea for Quick {
        fn name(&self) -> &'static str {
            "Quick"
        }

        fn description(&self) -> &'static str {
            "test area"
        }

        fn run(&self, harness: &mut Harness) -> Result<()> {
            harness.timer10().measure("noop", || {})?;
            harness
                .timer1()
                .measure_with_reset("reset", 1.0, || {}, || {})?;
            Ok(())
        }
    }

    struct Duplicate;

    impl BenchmarkArea for Duplicate {
        fn name(&self) -> &'static str {
            "Dup"
        }

        fn description(&self) -> &'static str {
            "adds the same name twice"
        }

        fn run(&self, harness: &mut Harness) -> Result<()> {
            harness.timer1().measure("same", || {})?;
            harness.timer1().measure("same", || {})?;
            Ok(())
        }
    }

    fn config() -> TimingConfig {
        TimingConfig {
            sample_count: 3,
            spin_up: Duration::ZERO,
            pin_strategy: PinStrategy::Off,
            ..TimingConfig::default()
        }
    }

    #[test]
    fn test_run_records_baselines_then_areas() {
        let logger = Rc::new(RefCell::new(StatsLogger::default()));
        let mut harness = Harness::new(&config(), Rc::clone(&logger)).unwrap();
        let baseline = harness.run(&[&Quick]).unwrap();
        assert_eq!(baseline.count(), 3);

        let logger = logger.borrow();
        let names: Vec<_> = logger.data().names().collect();
        assert_eq!(
            names,
            [
                "NOTHING  [count=1000]",
                "MethodCalls: EmptyStaticFunction()  [count=1000 scale=10.0]",
                "Loop 1K times  [count=1000]",
                "Quick: noop  [count=10]",
                "Quick: reset",
            ]
        );
        assert_eq!(logger.category(), None);
        for (_, stats) in logger.data().iter() {
            assert_eq!(stats.count(), 3);
        }
    }

    #[test]
    fn test_area_error_clears_category() {
        let logger = Rc::new(RefCell::new(StatsLogger::default()));
        let mut harness = Harness::new(&config(), Rc::clone(&logger)).unwrap();
        let err = harness.run(&[&Duplicate]).unwrap_err();
        assert!(matches!(err, MeasureError::DuplicateName { ref name } if name == "Dup: same"));
        assert_eq!(logger.borrow().category(), None);
    }

    #[test]
    fn test_console_echo_keeps_results() {
        let logger = Rc::new(RefCell::new(StatsLogger::default()));
        let mut harness = Harness::new(&config(), Rc::clone(&logger)).unwrap();
        harness.echo_to_console();
        harness.echo_samples_to_console();
        harness.run(&[&Quick]).unwrap();
        assert_eq!(logger.borrow().data().len(), 5);
    }
}
