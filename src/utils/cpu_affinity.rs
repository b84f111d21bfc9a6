//! Thread pinning for the duration of a measurement.
//!
//! Migrating between cores in the middle of a timed loop shows up as noise,
//! so the multi-sample timer can hold a [`CpuPinGuard`] while it runs. Only
//! Linux supports real pinning; elsewhere the guard is a no-op.

#[cfg(target_os = "linux")]
mod platform {
    pub type Mask = libc::cpu_set_t;

    pub fn current_cpu() -> Option<usize> {
        let cpu = unsafe { libc::sched_getcpu() };
        usize::try_from(cpu).ok()
    }

    pub fn current_mask() -> Option<Mask> {
        unsafe {
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            if libc::sched_getaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &mut set) == 0 {
                Some(set)
            } else {
                None
            }
        }
    }

    pub fn pin(core_id: usize) -> bool {
        unsafe {
            let mut set: libc::cpu_set_t = std::mem::zeroed();
            libc::CPU_ZERO(&mut set);
            libc::CPU_SET(core_id, &mut set);
            libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), &set) == 0
        }
    }

    pub fn restore(mask: &Mask) -> bool {
        unsafe { libc::sched_setaffinity(0, std::mem::size_of::<libc::cpu_set_t>(), mask) == 0 }
    }
}

#[cfg(not(target_os = "linux"))]
mod platform {
    pub type Mask = ();

    pub fn current_cpu() -> Option<usize> {
        None
    }

    pub fn current_mask() -> Option<Mask> {
        None
    }

    pub fn pin(_core_id: usize) -> bool {
        false
    }

    pub fn restore(_mask: &Mask) -> bool {
        true
    }
}

/// When the multi-sample timer pins the measuring thread
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PinStrategy {
    /// Never pin
    Off,
    /// Pin once around all samples of a benchmark
    #[default]
    PerBatch,
    /// Pin and unpin around every sample
    PerSample,
}

/// RAII guard: pins the current thread to the core it is running on and
/// restores the previous affinity mask on drop.
pub struct CpuPinGuard {
    pinned_core: Option<usize>,
    saved: Option<platform::Mask>,
}

impl CpuPinGuard {
    pub fn new() -> Self {
        let saved = platform::current_mask();
        let pinned_core = match (saved.as_ref(), platform::current_cpu()) {
            (Some(_), Some(core)) if platform::pin(core) => Some(core),
            _ => None,
        };
        if pinned_core.is_none() {
            tracing::trace!("thread pinning unavailable, measuring unpinned");
        }
        Self { pinned_core, saved }
    }

    /// Core the thread is pinned to, if pinning succeeded.
    pub fn core_id(&self) -> Option<usize> {
        self.pinned_core
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned_core.is_some()
    }
}

impl Default for CpuPinGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CpuPinGuard {
    fn drop(&mut self) {
        if self.pinned_core.is_none() {
            return;
        }
        if let Some(mask) = self.saved.take() {
            if !platform::restore(&mask) {
                tracing::warn!("failed to restore thread affinity after measurement");
            }
        }
    }
}

/// Take a guard if `strategy` matches `wanted`.
pub(crate) fn pin_if(strategy: PinStrategy, wanted: PinStrategy) -> Option<CpuPinGuard> {
    (strategy == wanted).then(CpuPinGuard::new)
}
