//! Single-shot timer port and a virtual-clock implementation

use tracing::trace;

/// Identifies one scheduled timer
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

impl TimerHandle {
    /// Create a handle from a raw value (for host-side schedulers)
    pub fn from_raw(id: u64) -> Self {
        Self(id)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

/// Delayed single-shot callback primitive provided by the host.
///
/// The scheduler only tracks *when* a timer is due. The host is responsible
/// for routing a due handle back to whoever scheduled it, on the same thread.
/// A cancelled timer must never be reported as due.
pub trait Scheduler {
    /// Arm a timer that becomes due after `delay_ms` milliseconds
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle;

    /// Disarm a timer. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: TimerHandle);

    /// Whether the timer is still armed
    fn is_pending(&self, handle: TimerHandle) -> bool;
}

/// A scheduler driven by an explicit virtual clock.
///
/// Time only moves when the host calls [`advance`](Self::advance) or
/// [`advance_to_next`](Self::advance_to_next), which makes the animation loop
/// fully deterministic.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    /// Current virtual time in milliseconds
    now_ms: u64,
    next_id: u64,
    /// Armed timers as (deadline, handle)
    pending: Vec<(u64, TimerHandle)>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current virtual time in milliseconds
    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Number of armed timers
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Move the clock forward without firing anything
    pub fn advance(&mut self, ms: u64) {
        self.now_ms += ms;
    }

    /// Remove and return the earliest timer that is due at the current time.
    ///
    /// Ties on deadline resolve in scheduling order.
    pub fn pop_due(&mut self) -> Option<TimerHandle> {
        let idx = self.earliest()?;
        if self.pending[idx].0 > self.now_ms {
            return None;
        }
        Some(self.pending.remove(idx).1)
    }

    /// Jump the clock to the earliest armed deadline and fire that timer.
    ///
    /// Returns `None` when nothing is armed.
    pub fn advance_to_next(&mut self) -> Option<TimerHandle> {
        let idx = self.earliest()?;
        let (deadline, handle) = self.pending.remove(idx);
        self.now_ms = self.now_ms.max(deadline);
        trace!(now_ms = self.now_ms, timer = handle.raw(), "timer due");
        Some(handle)
    }

    fn earliest(&self) -> Option<usize> {
        self.pending
            .iter()
            .enumerate()
            .min_by_key(|(_, (deadline, handle))| (*deadline, *handle))
            .map(|(i, _)| i)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay_ms: u32) -> TimerHandle {
        self.next_id += 1;
        let handle = TimerHandle(self.next_id);
        self.pending.push((self.now_ms + delay_ms as u64, handle));
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) {
        self.pending.retain(|(_, h)| *h != handle);
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        self.pending.iter().any(|(_, h)| *h == handle)
    }
}
