use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// What happened to a `submit` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Nothing to submit, or a request is already in flight. No request issued.
    Rejected,
    Succeeded,
    Failed,
    /// The request settled after a later action invalidated it; its result
    /// was dropped.
    Stale,
}

/// Single-flight guard plus an epoch that every display-invalidating action
/// bumps. A settling request applies its result only if its epoch is current.
#[derive(Debug, Default)]
pub(crate) struct RequestGuard {
    epoch: u64,
    in_flight: Arc<AtomicBool>,
}

/// Holds the single-flight slot for one request. Dropping it frees the slot,
/// so a submission whose future is cancelled does not block later ones.
#[derive(Debug)]
pub(crate) struct InFlight {
    epoch: u64,
    slot: Arc<AtomicBool>,
}

impl InFlight {
    pub fn epoch(&self) -> u64 {
        self.epoch
    }
}

impl Drop for InFlight {
    fn drop(&mut self) {
        self.slot.store(false, Ordering::Release);
    }
}

impl RequestGuard {
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Starts a request, or returns `None` while one is pending.
    pub fn begin(&mut self) -> Option<InFlight> {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            return None;
        }
        self.epoch += 1;
        Some(InFlight {
            epoch: self.epoch,
            slot: Arc::clone(&self.in_flight),
        })
    }

    pub fn invalidate(&mut self) {
        self.epoch += 1;
    }

    pub fn is_current(&self, epoch: u64) -> bool {
        self.epoch == epoch
    }

    /// Releases the single-flight slot; true if the result may be applied.
    pub fn settle(&mut self, request: InFlight) -> bool {
        let current = self.is_current(request.epoch());
        drop(request);
        current
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_is_single_flight() {
        let mut guard = RequestGuard::default();
        let request = guard.begin().unwrap();
        assert!(guard.is_busy());
        assert!(guard.begin().is_none());
        assert!(guard.settle(request));
        assert!(!guard.is_busy());
        assert!(guard.begin().is_some());
    }

    #[test]
    fn invalidated_request_settles_as_stale_and_frees_the_slot() {
        let mut guard = RequestGuard::default();
        let request = guard.begin().unwrap();
        guard.invalidate();
        assert!(!guard.settle(request));
        assert!(!guard.is_busy());
    }

    #[test]
    fn dropping_an_unsettled_request_frees_the_slot() {
        let mut guard = RequestGuard::default();
        let abandoned = guard.begin().unwrap();
        drop(abandoned);

        assert!(!guard.is_busy());
        let next = guard.begin().unwrap();
        assert!(guard.is_current(next.epoch()));
    }
}
