//! # Objects
//!
//! Allocation, construction and destruction costs. [`Tracked`] values count
//! their constructions and drops in process-wide counters so a run can check
//! that every measured object was actually created and destroyed.
//!
//! The counters are global: call [`reset_counters`] before a run that inspects
//! them, and do not rely on absolute values while other code creates
//! [`Tracked`] values concurrently.

use std::hint::black_box;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::Result;
use crate::harness::Harness;
use crate::registry::BenchmarkArea;
use crate::ten;

static CONSTRUCTED: AtomicUsize = AtomicUsize::new(0);
static DROPPED: AtomicUsize = AtomicUsize::new(0);

/// Zero both counters.
pub fn reset_counters() {
    CONSTRUCTED.store(0, Ordering::Relaxed);
    DROPPED.store(0, Ordering::Relaxed);
}

/// `(constructed, dropped)` since the last reset.
pub fn counters() -> (usize, usize) {
    (
        CONSTRUCTED.load(Ordering::Relaxed),
        DROPPED.load(Ordering::Relaxed),
    )
}

/// A small value that counts its constructions and drops.
pub struct Tracked {
    pub payload: [u64; 4],
}

impl Tracked {
    pub fn new(seed: u64) -> Self {
        CONSTRUCTED.fetch_add(1, Ordering::Relaxed);
        Self {
            payload: [seed, seed ^ 1, seed ^ 2, seed ^ 3],
        }
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        DROPPED.fetch_add(1, Ordering::Relaxed);
    }
}

pub struct ObjectsArea;

impl BenchmarkArea for ObjectsArea {
    fn name(&self) -> &'static str {
        "Objects"
    }

    fn description(&self) -> &'static str {
        "Boxing, vector growth, string building and drop costs"
    }

    fn run(&self, harness: &mut Harness) -> Result<()> {
        let before = counters();

        let timer = harness.timer1000();
        timer.measure_scaled("Tracked::new() on stack", 10.0, || {
            ten!(black_box(Tracked::new(black_box(7))));
        })?;
        timer.measure_scaled("Box::new(Tracked)", 10.0, || {
            ten!(black_box(Box::new(Tracked::new(black_box(7)))));
        })?;
        timer.measure("String::from(\"hello\")", || {
            black_box(String::from(black_box("hello")));
        })?;

        let timer = harness.timer100();
        timer.measure("Vec::new() + 16 pushes", || {
            let mut v = Vec::new();
            for i in 0..16u64 {
                v.push(black_box(i));
            }
            black_box(v);
        })?;
        timer.measure("Vec::with_capacity(16) + 16 pushes", || {
            let mut v = Vec::with_capacity(16);
            for i in 0..16u64 {
                v.push(black_box(i));
            }
            black_box(v);
        })?;
        timer.measure_scaled("format!(\"{}\", n)", 10.0, || {
            ten!(black_box(format!("{}", black_box(12345))));
        })?;

        let after = counters();
        tracing::debug!(
            constructed = after.0.wrapping_sub(before.0),
            dropped = after.1.wrapping_sub(before.1),
            "tracked objects"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters_track_lifetime() {
        reset_counters();
        let (c0, d0) = counters();
        {
            let a = Tracked::new(1);
            let b = Box::new(Tracked::new(2));
            assert_eq!(a.payload[1], 0);
            assert_eq!(b.payload[3], 1);
            let (c1, _) = counters();
            assert!(c1 >= c0 + 2);
        }
        let (c2, d2) = counters();
        assert!(c2 >= c0 + 2);
        assert!(d2 >= d0 + 2);

        reset_counters();
        assert_eq!(counters(), (0, 0));
    }
}
