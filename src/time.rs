//! Time sources for staircase history timestamps.

use core::cell::Cell;

/// Abstraction over time sources.
/// Implementations: [`SystemTimeProvider`] (std), [`ManualTimeProvider`] (tests, embedded hosts).
pub trait TimeProvider {
    /// Current time in milliseconds from an arbitrary epoch.
    fn now_ms(&self) -> u64;
}

/// Wall-clock provider: milliseconds since the Unix epoch.
#[cfg(feature = "std")]
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemTimeProvider;

#[cfg(feature = "std")]
impl TimeProvider for SystemTimeProvider {
    fn now_ms(&self) -> u64 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Manually driven clock.
#[derive(Debug, Default)]
pub struct ManualTimeProvider {
    current_ms: Cell<u64>,
}

impl ManualTimeProvider {
    /// Clock starting at 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Jump to an absolute time.
    pub fn set_time(&self, ms: u64) {
        self.current_ms.set(ms);
    }

    /// Move forward by `delta_ms`.
    pub fn advance(&self, delta_ms: u64) {
        self.current_ms.set(self.current_ms.get().saturating_add(delta_ms));
    }
}

impl TimeProvider for ManualTimeProvider {
    fn now_ms(&self) -> u64 {
        self.current_ms.get()
    }
}

impl<T: TimeProvider + ?Sized> TimeProvider for &T {
    fn now_ms(&self) -> u64 {
        (**self).now_ms()
    }
}
