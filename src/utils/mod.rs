//! Measurement engine and the utilities around it.

pub mod cpu_affinity;
pub mod machine;
pub mod runner;
pub mod sampler;
pub mod stats;
pub mod timer;

// Re-export commonly used items
pub use cpu_affinity::{CpuPinGuard, PinStrategy};
pub use runner::export_csv;
pub use sampler::{BatchListener, MultiSampleTimer};
pub use stats::{Samples, Stats};
pub use timer::{CodeTimer, SampleListener, TimingConfig};
