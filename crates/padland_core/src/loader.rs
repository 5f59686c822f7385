//! Latest-wins load bookkeeping for projection reloads.
//!
//! # Responsibility
//! - Tag each requested load with a monotonically increasing ticket.
//! - Drop results of loads superseded by a newer request.
//! - Run loads off the UI thread and hand results back over a channel.
//!
//! # Invariants
//! - Only the most recently issued ticket can be applied.
//! - A ticket is applied at most once.

use log::{debug, warn};
use std::sync::mpsc::{self, Receiver};
use std::thread;

/// Identity of one requested load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LoadTicket(u64);

impl LoadTicket {
    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Outcome of delivering a load result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery<T> {
    Applied(T),
    Discarded,
}

/// Result of a background load, tagged with its ticket.
#[derive(Debug)]
pub struct LoadResult<T> {
    pub ticket: LoadTicket,
    pub value: T,
}

#[derive(Debug, Default)]
pub struct ProjectionLoader {
    issued: u64,
    applied: Option<u64>,
}

impl ProjectionLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a new ticket, superseding every earlier one.
    pub fn request(&mut self) -> LoadTicket {
        self.issued += 1;
        LoadTicket(self.issued)
    }

    /// Most recently issued ticket, if any.
    pub fn latest(&self) -> Option<LoadTicket> {
        (self.issued > 0).then_some(LoadTicket(self.issued))
    }

    /// Whether a load was requested and has not been applied yet.
    pub fn is_pending(&self) -> bool {
        self.issued > 0 && self.applied != Some(self.issued)
    }

    pub fn deliver<T>(&mut self, ticket: LoadTicket, value: T) -> Delivery<T> {
        if ticket.0 != self.issued || self.applied == Some(ticket.0) {
            debug!(
                "event=load_discarded module=loader ticket={} latest={}",
                ticket.0, self.issued
            );
            return Delivery::Discarded;
        }
        self.applied = Some(ticket.0);
        Delivery::Applied(value)
    }
}

/// Runs `load` on a worker thread and returns the receiving end of its
/// result. The worker owns whatever it needs (typically its own SQLite
/// connection).
pub fn spawn_load<T, F>(ticket: LoadTicket, load: F) -> Receiver<LoadResult<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let value = load();
        if tx.send(LoadResult { ticket, value }).is_err() {
            warn!(
                "event=load_dropped module=loader ticket={} reason=receiver_gone",
                ticket.0
            );
        }
    });
    rx
}

#[cfg(test)]
mod tests {
    use super::{spawn_load, Delivery, ProjectionLoader};

    #[test]
    fn newer_request_discards_older_result() {
        let mut loader = ProjectionLoader::new();
        let first = loader.request();
        let second = loader.request();

        assert_eq!(loader.deliver(first, "stale"), Delivery::Discarded);
        assert!(loader.is_pending());
        assert_eq!(loader.deliver(second, "fresh"), Delivery::Applied("fresh"));
        assert!(!loader.is_pending());
    }

    #[test]
    fn ticket_is_applied_once() {
        let mut loader = ProjectionLoader::new();
        let ticket = loader.request();
        assert_eq!(loader.deliver(ticket, 1), Delivery::Applied(1));
        assert_eq!(loader.deliver(ticket, 2), Delivery::Discarded);
    }

    #[test]
    fn spawned_load_reports_its_ticket() {
        let mut loader = ProjectionLoader::new();
        let ticket = loader.request();
        let rx = spawn_load(ticket, || 42_u32);

        let result = rx.recv().expect("worker should send a result");
        assert_eq!(result.ticket, ticket);
        assert_eq!(loader.deliver(result.ticket, result.value), Delivery::Applied(42));
    }

    #[test]
    fn latest_is_none_before_any_request() {
        let loader = ProjectionLoader::new();
        assert_eq!(loader.latest(), None);
        assert!(!loader.is_pending());
    }
}
