//! # Sorting
//!
//! Sorting is destructive, so each sample restores the unsorted input with a
//! reset closure and measures a single call. Not run by default: a thousand
//! element sort is far slower than everything else in the suite.

use std::cell::RefCell;
use std::hint::black_box;

use rand::Rng;

use crate::error::Result;
use crate::harness::Harness;
use crate::registry::BenchmarkArea;

/// Number of elements sorted per sample
pub const SORT_LEN: usize = 1000;

pub fn random_keys(len: usize) -> Vec<u32> {
    let mut rng = super::data_rng();
    (0..len).map(|_| rng.random()).collect()
}

pub struct SortingArea;

impl BenchmarkArea for SortingArea {
    fn name(&self) -> &'static str {
        "Sorting"
    }

    fn description(&self) -> &'static str {
        "Stable and unstable slice sorts of random keys"
    }

    fn is_default(&self) -> bool {
        false
    }

    fn run(&self, harness: &mut Harness) -> Result<()> {
        let original = random_keys(SORT_LEN);
        let work = RefCell::new(original.clone());
        let reset = || work.borrow_mut().copy_from_slice(&original);

        let timer = harness.timer1();
        timer.measure_with_reset(
            "sort_unstable (1000 u32)",
            1.0,
            || black_box(work.borrow_mut().as_mut_slice()).sort_unstable(),
            reset,
        )?;
        timer.measure_with_reset(
            "sort (1000 u32)",
            1.0,
            || black_box(work.borrow_mut().as_mut_slice()).sort(),
            reset,
        )?;

        let sorted = {
            let mut keys = original.clone();
            keys.sort_unstable();
            keys
        };
        timer.measure_with_reset(
            "sort_unstable (already sorted)",
            1.0,
            || black_box(work.borrow_mut().as_mut_slice()).sort_unstable(),
            || work.borrow_mut().copy_from_slice(&sorted),
        )?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_keys_deterministic() {
        let keys = random_keys(32);
        assert_eq!(keys, random_keys(32));
        assert!(keys.windows(2).any(|w| w[0] > w[1]), "keys should not start sorted");
    }
}
