//! Multi-sample timer.
//!
//! A single [`CodeTimer`] measurement says nothing about how noisy the number
//! is. [`MultiSampleTimer`] takes `sample_count` independent measurements of
//! one benchmark and hands the whole batch to its listeners.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use super::cpu_affinity::{pin_if, PinStrategy};
use super::stats::{Samples, Stats};
use super::timer::{CodeTimer, TimingConfig};
use crate::error::{MeasureError, Result};

/// Listener invoked once per benchmark with
/// `(name, iteration_count, scale, samples)`.
///
/// An error returned by a listener aborts the measurement call that raised it.
/// Listeners are shared with timers created by
/// [`MultiSampleTimer::from_template`].
pub type BatchListener = Rc<RefCell<dyn FnMut(&str, usize, f32, &Samples) -> Result<()>>>;

/// Collects many [`CodeTimer`] samples for one named benchmark.
pub struct MultiSampleTimer {
    timer: CodeTimer,
    sample_count: usize,
    prime: bool,
    pin_strategy: PinStrategy,
    listeners: Vec<BatchListener>,
}

impl MultiSampleTimer {
    /// `sample_count` samples of `iteration_count` calls each, with priming
    /// and the default spin-up.
    pub fn new(sample_count: usize, iteration_count: usize) -> Result<Self> {
        Self::from_config(&TimingConfig {
            sample_count,
            iteration_count,
            ..TimingConfig::default()
        })
    }

    pub fn from_config(config: &TimingConfig) -> Result<Self> {
        config.validate()?;
        let mut timer = CodeTimer::with_spin_up(config.iteration_count, config.spin_up)?;
        // Priming happens here, once per batch, not once per sample.
        timer.set_prime(false);
        Ok(Self {
            timer,
            sample_count: config.sample_count,
            prime: config.prime,
            pin_strategy: config.pin_strategy,
            listeners: Vec::new(),
        })
    }

    /// A timer with the same counts and batch listeners as `template`, without
    /// spinning up again. Sample listeners stay with the template.
    pub fn from_template(template: &MultiSampleTimer) -> Result<Self> {
        let mut timer = Self::from_config(&TimingConfig {
            iteration_count: template.iteration_count(),
            sample_count: template.sample_count,
            prime: template.prime,
            spin_up: Duration::ZERO,
            pin_strategy: template.pin_strategy,
        })?;
        timer.listeners = template.listeners.iter().map(Rc::clone).collect();
        Ok(timer)
    }

    pub fn iteration_count(&self) -> usize {
        self.timer.iteration_count()
    }

    pub fn set_iteration_count(&mut self, iteration_count: usize) -> Result<()> {
        self.timer.set_iteration_count(iteration_count)
    }

    pub fn sample_count(&self) -> usize {
        self.sample_count
    }

    pub fn set_sample_count(&mut self, sample_count: usize) -> Result<()> {
        if sample_count == 0 {
            return Err(MeasureError::config("sample count must be at least 1"));
        }
        self.sample_count = sample_count;
        Ok(())
    }

    pub fn prime(&self) -> bool {
        self.prime
    }

    pub fn set_prime(&mut self, prime: bool) {
        self.prime = prime;
    }

    /// Register a listener notified once per completed batch.
    pub fn on_batch<F>(&mut self, listener: F)
    where
        F: FnMut(&str, usize, f32, &Samples) -> Result<()> + 'static,
    {
        self.listeners.push(Rc::new(RefCell::new(listener)));
    }

    /// Register a listener on the wrapped single-measurement timer.
    pub fn on_sample<F>(&mut self, listener: F)
    where
        F: FnMut(&str, usize, f32) + 'static,
    {
        self.timer.on_sample(listener);
    }

    pub fn measure<F: FnMut()>(&mut self, name: &str, action: F) -> Result<Samples> {
        self.run(name, 1.0, action, None::<fn()>)
    }

    /// `scale` is the number of copies of the operation inside `action`.
    pub fn measure_scaled<F: FnMut()>(&mut self, name: &str, scale: f32, action: F) -> Result<Samples> {
        self.run(name, scale, action, None::<fn()>)
    }

    /// Like [`measure_scaled`](Self::measure_scaled), calling `reset` before the
    /// priming run and before every sample. Only valid with an iteration count
    /// of 1.
    pub fn measure_with_reset<F, R>(
        &mut self,
        name: &str,
        scale: f32,
        action: F,
        reset: R,
    ) -> Result<Samples>
    where
        F: FnMut(),
        R: FnMut(),
    {
        self.run(name, scale, action, Some(reset))
    }

    fn run<F, R>(&mut self, name: &str, scale: f32, mut action: F, mut reset: Option<R>) -> Result<Samples>
    where
        F: FnMut(),
        R: FnMut(),
    {
        if reset.is_some() && self.iteration_count() != 1 {
            return Err(MeasureError::config(format!(
                "reset can only be used with an iteration count of 1 (got {} for '{}')",
                self.iteration_count(),
                name
            )));
        }

        let _batch_pin = pin_if(self.pin_strategy, PinStrategy::PerBatch);

        if self.prime {
            if let Some(reset) = reset.as_mut() {
                reset();
            }
            action();
        }

        let mut samples = Samples::with_capacity(self.sample_count);
        for _ in 0..self.sample_count {
            if let Some(reset) = reset.as_mut() {
                reset();
            }
            let _sample_pin = pin_if(self.pin_strategy, PinStrategy::PerSample);
            samples.push(self.timer.measure_scaled(name, scale, &mut action));
        }

        let iteration_count = self.iteration_count();
        for listener in &self.listeners {
            (&mut *listener.borrow_mut())(name, iteration_count, scale, &samples)?;
        }
        Ok(samples)
    }

    /// Batch listener printing the mean with a ±2σ error bound.
    pub fn print(name: &str, iteration_count: usize, _scale: f32, samples: &Samples) -> Result<()> {
        let stats = Stats::new(samples);
        let error = match stats.error_percent() {
            Some(percent) if percent < 400.0 => format!("{:<5}", format!("{:.0}%", percent)),
            _ => ">400%".to_string(),
        };
        let count = if iteration_count != 1 {
            format!("count: {} ", iteration_count)
        } else {
            String::new()
        };
        println!("{}: {}{:>8.3} +- {} usec", name, count, stats.mean(), error);
        Ok(())
    }

    /// Batch listener printing every statistic.
    pub fn print_stats(name: &str, _iteration_count: usize, _scale: f32, samples: &Samples) -> Result<()> {
        println!("{}: {}", name, Stats::new(samples));
        Ok(())
    }
}
