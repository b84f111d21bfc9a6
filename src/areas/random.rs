//! # Random Number Generation
//!
//! A hand-written Xoroshiro128++ step against the generators shipped with the
//! `rand` crate.

use std::hint::black_box;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};

use crate::error::Result;
use crate::harness::Harness;
use crate::registry::BenchmarkArea;
use crate::ten;

/// One Xoroshiro128++ step: returns the next output and advances the state.
#[inline]
pub fn xoroshiro_next(seed_lo: &mut u64, seed_hi: &mut u64) -> u64 {
    let s0 = *seed_lo;
    let s1 = *seed_hi;

    let result = s0.wrapping_add(s1).rotate_left(17).wrapping_add(s0);

    let s1 = s1 ^ s0;
    *seed_lo = s0.rotate_left(49) ^ s1 ^ (s1 << 21);
    *seed_hi = s1.rotate_left(28);

    result
}

pub struct RandomArea;

impl BenchmarkArea for RandomArea {
    fn name(&self) -> &'static str {
        "Random"
    }

    fn description(&self) -> &'static str {
        "Xoroshiro128++ vs rand's StdRng and thread-local generator"
    }

    fn run(&self, harness: &mut Harness) -> Result<()> {
        let timer = harness.timer1000();

        let (mut lo, mut hi) = (0x12345678u64, 0x87654321u64);
        timer.measure_scaled("xoroshiro128++ next()", 10.0, || {
            ten!(black_box(xoroshiro_next(&mut lo, &mut hi)));
        })?;

        let mut std_rng = StdRng::seed_from_u64(super::DATA_SEED);
        timer.measure_scaled("StdRng::next_u64()", 10.0, || {
            ten!(black_box(std_rng.next_u64()));
        })?;

        let mut thread_rng = rand::rng();
        timer.measure_scaled("rand::rng().random::<u32>()", 10.0, || {
            ten!(black_box(thread_rng.random::<u32>()));
        })?;

        timer.measure_scaled("StdRng::random_range(0..100)", 10.0, || {
            ten!(black_box(std_rng.random_range(0..100u32)));
        })?;

        Ok(())
    }
}
