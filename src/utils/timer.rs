//! Single-measurement timer.
//!
//! [`CodeTimer`] times one batch of `iteration_count` back-to-back calls of a
//! closure and reports the cost of one call in microseconds, with the fixed
//! cost of the timing loop itself subtracted out.

use std::hint::black_box;
use std::time::{Duration, Instant};

pub use super::cpu_affinity::PinStrategy;
use crate::error::{MeasureError, Result};

/// Busy-spin performed when a timer is created, to get the CPU out of any
/// low-power state before the first measurement.
pub const DEFAULT_SPIN_UP: Duration = Duration::from_millis(32);

/// Number of empty-closure measurements the overhead estimate takes the minimum of
const OVERHEAD_RUNS: usize = 5;

/// Number of clock-tick reads used by [`CodeTimer::resolution_usec`]
const RESOLUTION_READS: usize = 64;

// ============================================================================
// Configuration
// ============================================================================

/// Configuration for a timer
#[derive(Clone, Debug)]
pub struct TimingConfig {
    /// Calls per measured interval (default: 1)
    pub iteration_count: usize,
    /// Measured intervals per benchmark (default: 10)
    pub sample_count: usize,
    /// Run the benchmark once, untimed, before measuring (default: true)
    pub prime: bool,
    /// CPU spin performed at timer creation (default: 32ms)
    pub spin_up: Duration,
    /// CPU pinning strategy (default: PerBatch)
    pub pin_strategy: PinStrategy,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            iteration_count: 1,
            sample_count: 10,
            prime: true,
            spin_up: DEFAULT_SPIN_UP,
            pin_strategy: PinStrategy::default(),
        }
    }
}

impl TimingConfig {
    /// Check that both counts are at least 1.
    pub fn validate(&self) -> Result<()> {
        check_count("iteration count", self.iteration_count)?;
        check_count("sample count", self.sample_count)
    }
}

fn check_count(what: &str, value: usize) -> Result<()> {
    if value == 0 {
        return Err(MeasureError::config(format!("{what} must be at least 1")));
    }
    Ok(())
}

// ============================================================================
// CodeTimer
// ============================================================================

/// Listener invoked after every completed single measurement with
/// `(name, iteration_count, sample_usec)`.
pub type SampleListener = Box<dyn FnMut(&str, usize, f32)>;

/// Times `iteration_count` calls of a closure with a monotonic clock.
///
/// The timer owns a cached estimate of its own loop overhead, measured with an
/// empty closure through the same dynamic call site as real work. The cache
/// is dropped whenever the iteration count changes. A timer is meant to be
/// driven from one thread at a time.
pub struct CodeTimer {
    iteration_count: usize,
    prime: bool,
    overhead_usec: f32,
    overhead_valid: bool,
    computing_overhead: bool,
    listeners: Vec<SampleListener>,
}

impl CodeTimer {
    /// Create a timer and spin the CPU for [`DEFAULT_SPIN_UP`].
    pub fn new(iteration_count: usize) -> Result<Self> {
        Self::with_spin_up(iteration_count, DEFAULT_SPIN_UP)
    }

    pub fn with_spin_up(iteration_count: usize, spin_up: Duration) -> Result<Self> {
        check_count("iteration count", iteration_count)?;
        spin_for(spin_up);
        Ok(Self {
            iteration_count,
            prime: true,
            overhead_usec: 0.0,
            overhead_valid: false,
            computing_overhead: false,
            listeners: Vec::new(),
        })
    }

    pub fn from_config(config: &TimingConfig) -> Result<Self> {
        let mut timer = Self::with_spin_up(config.iteration_count, config.spin_up)?;
        timer.prime = config.prime;
        Ok(timer)
    }

    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }

    /// Change the number of calls per interval. Invalidates the overhead estimate.
    pub fn set_iteration_count(&mut self, iteration_count: usize) -> Result<()> {
        check_count("iteration count", iteration_count)?;
        self.iteration_count = iteration_count;
        self.overhead_valid = false;
        Ok(())
    }

    /// Whether a single untimed call precedes each measurement.
    pub fn prime(&self) -> bool {
        self.prime
    }

    /// Disable priming when the benchmark is not idempotent.
    pub fn set_prime(&mut self, prime: bool) {
        self.prime = prime;
    }

    /// Register a listener notified after every measurement.
    pub fn on_sample<F>(&mut self, listener: F)
    where
        F: FnMut(&str, usize, f32) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    /// Microseconds per call of `action`.
    pub fn measure<F: FnMut()>(&mut self, name: &str, action: F) -> f32 {
        self.measure_scaled(name, 1.0, action)
    }

    /// Microseconds per call of `action`, further divided by `scale` (the number
    /// of copies of the operation inside the closure).
    pub fn measure_scaled<F: FnMut()>(&mut self, name: &str, scale: f32, mut action: F) -> f32 {
        self.measure_dyn(name, scale, &mut action)
    }

    #[inline(never)]
    fn measure_dyn(&mut self, name: &str, scale: f32, action: &mut dyn FnMut()) -> f32 {
        let action = black_box(action);

        if self.prime {
            action();
        }
        let overhead_usec = self.overhead_usec();

        let iteration_count = self.iteration_count;
        let start = Instant::now();
        for _ in 0..iteration_count {
            action();
        }
        let elapsed_usec = start.elapsed().as_secs_f64() * 1_000_000.0;

        let sample_usec = ((elapsed_usec - overhead_usec as f64)
            / scale as f64
            / iteration_count as f64) as f32;

        if !self.computing_overhead {
            tracing::trace!(name, iteration_count, sample_usec, "sample");
            for listener in &mut self.listeners {
                listener(name, iteration_count, sample_usec);
            }
        }
        sample_usec
    }

    /// Cost of the timing loop around an empty closure, for the whole
    /// `iteration_count` loop. Returns 0 while the estimate is being computed.
    fn overhead_usec(&mut self) -> f32 {
        if !self.overhead_valid {
            if self.computing_overhead {
                return 0.0;
            }
            self.computing_overhead = true;

            let mut empty = || {};
            // First run absorbs any lazy setup; only the minimum is kept since
            // interruptions can only inflate a timing.
            self.measure_dyn("", 1.0, &mut empty);
            let mut best = f32::MAX;
            for _ in 0..OVERHEAD_RUNS {
                let per_loop = self.measure_dyn("", 1.0, &mut empty) * self.iteration_count as f32;
                best = best.min(per_loop);
            }

            self.overhead_usec = best;
            self.computing_overhead = false;
            self.overhead_valid = true;
            tracing::debug!(
                iteration_count = self.iteration_count,
                overhead_usec = best,
                "timer overhead estimated"
            );
        }
        self.overhead_usec
    }

    /// Smallest clock step observable between two consecutive reads, in
    /// microseconds.
    pub fn resolution_usec() -> f32 {
        let mut best = Duration::MAX;
        for _ in 0..RESOLUTION_READS {
            let start = Instant::now();
            let mut now = Instant::now();
            while now == start {
                now = Instant::now();
            }
            best = best.min(now - start);
        }
        (best.as_secs_f64() * 1_000_000.0) as f32
    }

    /// Sample listener printing each measurement to stdout.
    pub fn print_sample(name: &str, iteration_count: usize, sample_usec: f32) {
        println!(
            "{}: count={} time={:.3} usec",
            name, iteration_count, sample_usec
        );
    }
}

fn spin_for(duration: Duration) {
    let start = Instant::now();
    while start.elapsed() < duration {
        std::hint::spin_loop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn timer(iteration_count: usize) -> CodeTimer {
        CodeTimer::with_spin_up(iteration_count, Duration::ZERO).unwrap()
    }

    #[test]
    fn test_zero_iterations_rejected() {
        assert!(matches!(
            CodeTimer::with_spin_up(0, Duration::ZERO),
            Err(MeasureError::Config { .. })
        ));
        let mut t = timer(1);
        assert!(t.set_iteration_count(0).is_err());
        assert_eq!(t.iteration_count(), 1);
    }

    #[test]
    fn test_config_validate() {
        assert!(TimingConfig::default().validate().is_ok());
        let config = TimingConfig {
            sample_count: 0,
            ..TimingConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_action_call_count_with_and_without_prime() {
        let calls = Cell::new(0usize);

        let mut t = timer(5);
        t.measure("count", || calls.set(calls.get() + 1));
        assert_eq!(calls.get(), 6);

        calls.set(0);
        t.set_prime(false);
        t.measure("count", || calls.set(calls.get() + 1));
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn test_listener_sees_only_real_measurements() {
        let seen: Rc<RefCell<Vec<(String, usize, f32)>>> = Rc::default();
        let sink = Rc::clone(&seen);

        let mut t = timer(10);
        t.on_sample(move |name, count, sample| {
            sink.borrow_mut().push((name.to_string(), count, sample))
        });

        // The first measurement also estimates overhead through nested calls.
        let sample = t.measure("work", || {
            black_box(17u64.wrapping_mul(31));
        });

        let seen = seen.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "work");
        assert_eq!(seen[0].1, 10);
        assert_eq!(seen[0].2, sample);
        assert!(sample.is_finite());
    }

    #[test]
    fn test_overhead_cached_and_invalidated() {
        let mut t = timer(4);
        assert!(!t.overhead_valid);
        t.measure("a", || {});
        assert!(t.overhead_valid);
        assert!(!t.computing_overhead);

        t.set_iteration_count(8).unwrap();
        assert!(!t.overhead_valid);
        t.measure("b", || {});
        assert!(t.overhead_valid);
    }

    #[test]
    fn test_scale_and_iterations_divide_elapsed() {
        let mut t = timer(2);
        t.set_prime(false);
        let sample = t.measure_scaled("sleep", 2.0, || {
            std::thread::sleep(Duration::from_millis(2));
        });
        // At least 4ms elapsed, divided by 2 calls and a scale of 2.
        assert!(sample >= 900.0, "sample was {sample}");
    }

    #[test]
    fn test_overhead_subtracted_from_empty_closure() {
        let mut t = timer(1000);
        t.set_prime(false);
        // Interruptions only inflate a sample, so the best of a few runs
        // should show no cost left once the loop overhead is removed.
        let best = (0..10)
            .map(|_| t.measure("empty", || {}).abs())
            .fold(f32::MAX, f32::min);
        assert!(best < 0.01, "empty closure cost {best} usec per call");
    }

    #[test]
    fn test_print_sample_as_listener() {
        CodeTimer::print_sample("direct", 10, 1.25);

        let mut t = timer(3);
        t.on_sample(CodeTimer::print_sample);
        let sample = t.measure("printed", || {});
        assert!(sample.is_finite());
    }

    #[test]
    fn test_panicking_action_propagates() {
        let mut t = timer(1);
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            t.measure("boom", || panic!("benchmark failed"));
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_resolution_positive() {
        assert!(CodeTimer::resolution_usec() > 0.0);
    }
}
