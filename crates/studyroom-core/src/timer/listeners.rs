//! Subscription registry for timer notifications.
//!
//! Two channels are kept apart: phase listeners hear only `PhaseComplete`,
//! tick listeners hear the per-second `Tick` display notification.

use std::fmt;

use crate::events::Event;

/// Callback invoked with each emitted event.
pub type Listener = Box<dyn FnMut(&Event) + Send>;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    phase: Vec<(SubscriptionId, Listener)>,
    tick: Vec<(SubscriptionId, Listener)>,
}

impl Listeners {
    fn allocate(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }

    pub(crate) fn add_phase(&mut self, listener: Listener) -> SubscriptionId {
        let id = self.allocate();
        self.phase.push((id, listener));
        id
    }

    pub(crate) fn add_tick(&mut self, listener: Listener) -> SubscriptionId {
        let id = self.allocate();
        self.tick.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: SubscriptionId) -> bool {
        let before = self.phase.len() + self.tick.len();
        self.phase.retain(|(sid, _)| *sid != id);
        self.tick.retain(|(sid, _)| *sid != id);
        before != self.phase.len() + self.tick.len()
    }

    pub(crate) fn emit_phase(&mut self, event: &Event) {
        for (_, listener) in self.phase.iter_mut() {
            listener(event);
        }
    }

    pub(crate) fn emit_tick(&mut self, event: &Event) {
        for (_, listener) in self.tick.iter_mut() {
            listener(event);
        }
    }
}

impl fmt::Debug for Listeners {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Listeners")
            .field("phase", &self.phase.len())
            .field("tick", &self.tick.len())
            .finish()
    }
}
