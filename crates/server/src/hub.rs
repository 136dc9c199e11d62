//! In-process fan-out of expense updates to WebSocket sessions.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

use engine::{ExpenseEvent, ExpenseNotifier, Identity, NotifyError};
use tokio::sync::broadcast;

const DEFAULT_CAPACITY: usize = 256;

type Senders = HashMap<Identity, broadcast::Sender<ExpenseEvent>>;

/// One broadcast channel per identity, so a session only ever buffers the
/// events of its own owner.
///
/// A channel lives while it has receivers. Channels left without any are
/// dropped on the next publish or subscribe.
#[derive(Clone, Debug)]
pub struct ExpenseHub {
    senders: Arc<Mutex<Senders>>,
    capacity: usize,
}

impl Default for ExpenseHub {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ExpenseHub {
    /// `capacity` bounds the events buffered per session before it lags.
    pub fn new(capacity: usize) -> Self {
        Self {
            senders: Arc::default(),
            capacity: capacity.max(1),
        }
    }

    pub fn subscribe(&self, identity: &Identity) -> broadcast::Receiver<ExpenseEvent> {
        let mut senders = self.senders();
        senders.retain(|_, sender| sender.receiver_count() > 0);
        senders
            .entry(identity.clone())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    fn senders(&self) -> MutexGuard<'_, Senders> {
        // The map stays consistent even if a holder panicked.
        self.senders.lock().unwrap_or_else(PoisonError::into_inner)
    }

    #[cfg(test)]
    fn channels(&self) -> usize {
        self.senders().len()
    }
}

impl ExpenseNotifier for ExpenseHub {
    fn publish(&self, event: ExpenseEvent) -> Result<(), NotifyError> {
        let mut senders = self.senders();
        let Some(sender) = senders.get(&event.identity) else {
            return Err(NotifyError::NoSubscribers);
        };

        match sender.send(event) {
            Ok(_) => Ok(()),
            Err(broadcast::error::SendError(event)) => {
                senders.remove(&event.identity);
                Err(NotifyError::NoSubscribers)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(email: &str) -> ExpenseEvent {
        ExpenseEvent {
            identity: Identity::new(email),
            expenses: Vec::new(),
        }
    }

    #[test]
    fn publish_without_subscribers_reports_it() {
        let hub = ExpenseHub::default();
        assert_eq!(hub.publish(event("a@x.io")), Err(NotifyError::NoSubscribers));
    }

    #[tokio::test]
    async fn every_session_of_the_owner_receives_the_event() {
        let hub = ExpenseHub::new(8);
        let owner = Identity::new("a@x.io");
        let mut first = hub.subscribe(&owner);
        let mut second = hub.subscribe(&owner);

        hub.publish(event("a@x.io")).unwrap();

        assert_eq!(first.recv().await.unwrap().identity, owner);
        assert_eq!(second.recv().await.unwrap().identity, owner);
    }

    #[test]
    fn other_owners_events_are_never_buffered() {
        let hub = ExpenseHub::new(1);
        let mut ann = hub.subscribe(&Identity::new("ann@x.io"));
        let _bob = hub.subscribe(&Identity::new("bob@x.io"));

        for _ in 0..3 {
            hub.publish(event("bob@x.io")).unwrap();
        }

        assert!(matches!(
            ann.try_recv(),
            Err(broadcast::error::TryRecvError::Empty)
        ));
    }

    #[test]
    fn channels_without_receivers_are_pruned() {
        let hub = ExpenseHub::default();
        let ann = hub.subscribe(&Identity::new("ann@x.io"));
        drop(ann);

        assert_eq!(hub.publish(event("ann@x.io")), Err(NotifyError::NoSubscribers));
        assert_eq!(hub.channels(), 0);

        let gone = hub.subscribe(&Identity::new("bob@x.io"));
        drop(gone);
        let _carl = hub.subscribe(&Identity::new("carl@x.io"));
        assert_eq!(hub.channels(), 1);
    }
}
