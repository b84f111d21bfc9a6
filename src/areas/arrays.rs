//! # Arrays
//!
//! Element access and reduction over slices, using the dot product
//! `dot(a, b) = Σ(a[i] * b[i])` as the workload:
//!
//! - **Iterator**: `zip` + `map` + `sum`, bounds checks elided by the iterator
//! - **Indexed**: explicit indexing in a counted loop
//! - **Unrolled**: four independent accumulators to break the add dependency chain

use std::hint::black_box;

use rand::Rng;

use crate::error::Result;
use crate::harness::Harness;
use crate::registry::BenchmarkArea;
use crate::ten;

/// Length of the vectors used by the dot product benchmarks
pub const VECTOR_LEN: usize = 1000;

/// Clean, idiomatic reference implementation.
pub fn dot_product_iter(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b.iter()).map(|(x, y)| x * y).sum()
}

/// Indexed loop; the compiler keeps the bounds checks on `b`.
pub fn dot_product_indexed(a: &[f32], b: &[f32]) -> f32 {
    let mut sum = 0.0f32;
    for i in 0..a.len() {
        sum += a[i] * b[i];
    }
    sum
}

/// Dot product with 4x loop unrolling.
///
/// # Panics
/// Panics if the vectors have different lengths.
pub fn dot_product_unrolled(a: &[f32], b: &[f32]) -> f32 {
    assert_eq!(a.len(), b.len(), "Vectors must have the same length");

    let chunks = a.len() / 4;
    let mut sum0: f32 = 0.0;
    let mut sum1: f32 = 0.0;
    let mut sum2: f32 = 0.0;
    let mut sum3: f32 = 0.0;

    for i in 0..chunks {
        let idx = i * 4;
        sum0 += a[idx] * b[idx];
        sum1 += a[idx + 1] * b[idx + 1];
        sum2 += a[idx + 2] * b[idx + 2];
        sum3 += a[idx + 3] * b[idx + 3];
    }

    for i in chunks * 4..a.len() {
        sum0 += a[i] * b[i];
    }

    (sum0 + sum1) + (sum2 + sum3)
}

/// Two random vectors in `[-1, 1)`.
pub fn random_vectors(len: usize) -> (Vec<f32>, Vec<f32>) {
    let mut rng = super::data_rng();
    let a = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
    let b = (0..len).map(|_| rng.random_range(-1.0..1.0)).collect();
    (a, b)
}

pub struct ArraysArea;

impl BenchmarkArea for ArraysArea {
    fn name(&self) -> &'static str {
        "Arrays"
    }

    fn description(&self) -> &'static str {
        "Element access and dot products over f32 slices"
    }

    fn run(&self, harness: &mut Harness) -> Result<()> {
        let (a, b) = random_vectors(VECTOR_LEN);
        let mut data = vec![0u32; 16];

        let timer = harness.timer1000();
        timer.measure_scaled("data[i] read", 10.0, || {
            let data = black_box(&data);
            ten!(black_box(data[black_box(5)]));
        })?;
        timer.measure_scaled("data[i] write", 10.0, || {
            let data = black_box(&mut data);
            ten!(data[black_box(5)] = black_box(1));
        })?;
        timer.measure_scaled("data.get(i)", 10.0, || {
            let data = black_box(&data);
            ten!(black_box(data.get(black_box(5))));
        })?;

        let name = |variant: &str| format!("dot product {} ({} floats)", variant, VECTOR_LEN);
        let timer = harness.timer100();
        timer.measure(&name("iterator"), || {
            black_box(dot_product_iter(black_box(&a), black_box(&b)));
        })?;
        timer.measure(&name("indexed"), || {
            black_box(dot_product_indexed(black_box(&a), black_box(&b)));
        })?;
        timer.measure(&name("unrolled"), || {
            black_box(dot_product_unrolled(black_box(&a), black_box(&b)));
        })?;

        Ok(())
    }
}
