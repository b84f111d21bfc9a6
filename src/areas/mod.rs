//! Built-in benchmark areas.
//!
//! Each area is a unit struct implementing
//! [`BenchmarkArea`](crate::registry::BenchmarkArea). Short operations are
//! cloned ten times inside the measured closure with [`ten!`](crate::ten) and
//! measured with a scale of 10, so the loop overhead is spread over ten
//! copies of the operation.

pub mod arrays;
pub mod control_flow;
pub mod method_calls;
pub mod objects;
pub mod random;
pub mod sorting;

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Fixed seed so every run benchmarks the same data
pub const DATA_SEED: u64 = 0x12345678;

/// Repeat a statement ten times.
#[macro_export]
macro_rules! ten {
    ($e:expr) => {{
        $e;
        $e;
        $e;
        $e;
        $e;
        $e;
        $e;
        $e;
        $e;
        $e;
    }};
}

/// Deterministic RNG for generating benchmark inputs.
pub fn data_rng() -> StdRng {
    StdRng::seed_from_u64(DATA_SEED)
}
