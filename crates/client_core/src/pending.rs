use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

/// Advisory in-flight marker. Does not cancel or serialize requests; it only
/// refuses a second claim while the first guard is alive.
#[derive(Debug, Default)]
pub(crate) struct PendingFlag(Arc<AtomicBool>);

impl PendingFlag {
    pub(crate) fn is_set(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// The guard is owned so it can travel with a spawned request.
    pub(crate) fn try_claim(&self) -> Option<PendingGuard> {
        self.0
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| PendingGuard(self.0.clone()))
    }
}

/// Clears the flag on drop, whichever way the request resolved.
pub(crate) struct PendingGuard(Arc<AtomicBool>);

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_claim_is_refused_until_guard_drops() {
        let flag = PendingFlag::default();
        let guard = flag.try_claim().expect("first claim");
        assert!(flag.is_set());
        assert!(flag.try_claim().is_none());
        drop(guard);
        assert!(!flag.is_set());
        assert!(flag.try_claim().is_some());
    }
}
