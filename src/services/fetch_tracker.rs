use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

/// Generation number handed out when a request is issued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

impl FetchTicket {
    pub fn generation(&self) -> u64 {
        self.0
    }
}

/// Orders overlapping fetches for one component.
///
/// Every request takes a ticket when it is issued. A response may be
/// applied only while the tracker is live and only if no newer ticket has
/// been applied already, so a slow response can never overwrite a fresher
/// one and nothing is applied after shutdown.
#[derive(Debug)]
pub struct FetchTracker {
    name: &'static str,
    issued: AtomicU64,
    applied: AtomicU64,
    live: AtomicBool,
}

impl FetchTracker {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            issued: AtomicU64::new(0),
            applied: AtomicU64::new(0),
            live: AtomicBool::new(true),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn issue(&self) -> FetchTicket {
        FetchTicket(self.issued.fetch_add(1, Ordering::SeqCst) + 1)
    }

    /// Claim the right to apply the response for `ticket`.
    pub fn admit(&self, ticket: FetchTicket) -> bool {
        if !self.is_live() {
            tracing::debug!(
                tracker = self.name,
                generation = ticket.0,
                "Response arrived after shutdown, discarded"
            );
            return false;
        }

        let previous = self.applied.fetch_max(ticket.0, Ordering::SeqCst);
        if previous >= ticket.0 {
            tracing::debug!(
                tracker = self.name,
                generation = ticket.0,
                newest_applied = previous,
                "Stale response, discarded"
            );
            return false;
        }
        true
    }

    pub fn shutdown(&self) {
        self.live.store(false, Ordering::SeqCst);
    }

    pub fn is_live(&self) -> bool {
        self.live.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn newest_ticket_wins() {
        let tracker = FetchTracker::new("test");
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(second > first);

        assert!(tracker.admit(second));
        assert!(!tracker.admit(first));
        assert!(!tracker.admit(second));
    }

    #[test]
    fn in_order_responses_are_all_admitted() {
        let tracker = FetchTracker::new("test");
        let first = tracker.issue();
        let second = tracker.issue();
        assert!(tracker.admit(first));
        assert!(tracker.admit(second));
    }

    #[test]
    fn nothing_admitted_after_shutdown() {
        let tracker = FetchTracker::new("test");
        let ticket = tracker.issue();
        tracker.shutdown();
        assert!(!tracker.is_live());
        assert!(!tracker.admit(ticket));
    }
}
