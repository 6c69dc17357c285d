//! Wall-clock and allocation measurements through jemalloc statistics.
//!
//! The figures are only meaningful when jemalloc is the global allocator, as
//! in the `sat-explorer` binary. Under another allocator the allocation
//! counters stay near zero.

use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats, thread};

const MIB: f64 = 1024.0 * 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Measurement {
    pub elapsed: Duration,
    /// Bytes allocated by the measuring thread while the closure ran.
    pub allocated_bytes: Option<u64>,
    /// Resident bytes of the process once the closure returned.
    pub resident_bytes: Option<u64>,
}

impl Measurement {
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn allocated_mib(&self) -> Option<f64> {
        self.allocated_bytes.map(|b| b as f64 / MIB)
    }

    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn resident_mib(&self) -> Option<f64> {
        self.resident_bytes.map(|b| b as f64 / MIB)
    }
}

/// Runs `f`, returning its result with the time it took and the bytes the
/// current thread allocated meanwhile.
pub fn measure<T>(f: impl FnOnce() -> T) -> (T, Measurement) {
    let before = thread_allocated();
    let start = Instant::now();

    let value = f();

    let elapsed = start.elapsed();
    let after = thread_allocated();

    let measurement = Measurement {
        elapsed,
        allocated_bytes: before.zip(after).map(|(b, a)| a.saturating_sub(b)),
        resident_bytes: resident(),
    };
    (value, measurement)
}

/// Total bytes ever allocated by the current thread.
#[must_use]
pub fn thread_allocated() -> Option<u64> {
    thread::allocatedp::read().ok().map(|counter| counter.get())
}

/// Resident bytes of the process, refreshed through a jemalloc epoch.
#[must_use]
pub fn resident() -> Option<u64> {
    epoch::advance().ok()?;
    stats::resident::read().ok().map(|b| b as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_returns_value_and_time() {
        let (value, m) = measure(|| {
            std::thread::sleep(Duration::from_millis(20));
            7
        });
        assert_eq!(value, 7);
        assert!(m.elapsed >= Duration::from_millis(20));
    }

    #[test]
    fn test_mib_conversion() {
        let m = Measurement {
            allocated_bytes: Some(3 * 1024 * 1024),
            ..Measurement::default()
        };
        assert_eq!(m.allocated_mib(), Some(3.0));
        assert_eq!(m.resident_mib(), None);
    }
}
