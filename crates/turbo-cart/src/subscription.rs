//! Subscription bridge between the cart store and presentation code.
//!
//! Listeners are stored behind `Rc` and invoked outside of any internal
//! borrow, so a listener may read the store, mutate it, subscribe others or
//! unsubscribe itself while being notified.
//!
//! # Invariants
//!
//! 1. A listener is primed with the current snapshot when it subscribes.
//! 2. Every listener sees every later snapshot exactly once, in revision
//!    order. Snapshots published while a dispatch is running are queued
//!    rather than delivered re-entrantly.
//! 3. Once [`Subscription::unsubscribe`] returns, the listener is never
//!    invoked again, including for snapshots already queued.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::{Rc, Weak};

use crate::cart::CartSnapshot;

type Listener = Rc<RefCell<dyn FnMut(&CartSnapshot)>>;

/// Identifies a registered listener within one store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Clone)]
struct Slot {
    id: SubscriptionId,
    primed_at: u64,
    active: Rc<Cell<bool>>,
    listener: Listener,
}

/// Listener registry and dispatch queue owned by a cart store.
#[derive(Default)]
pub(crate) struct Bridge {
    next_id: Cell<u64>,
    slots: RefCell<Vec<Slot>>,
    pending: RefCell<VecDeque<CartSnapshot>>,
    dispatching: Cell<bool>,
}

impl Bridge {
    /// Register `listener` and prime it with `current`.
    pub(crate) fn subscribe(
        self: &Rc<Self>,
        listener: Listener,
        current: &CartSnapshot,
    ) -> Subscription {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        let active = Rc::new(Cell::new(true));

        self.slots.borrow_mut().push(Slot {
            id,
            primed_at: current.revision,
            active: Rc::clone(&active),
            listener: Rc::clone(&listener),
        });
        tracing::debug!(subscription = id.0, revision = current.revision, "listener subscribed");

        // Priming runs as part of a dispatch, so a listener that mutates the
        // store from its first call still sees the resulting snapshot.
        if self.dispatching.replace(true) {
            invoke(id, &listener, current);
        } else {
            let _guard = DispatchGuard(&self.dispatching);
            invoke(id, &listener, current);
            self.drain();
        }

        Subscription {
            id,
            active,
            bridge: Rc::downgrade(self),
            detached: false,
        }
    }

    /// Deliver `snapshot` to every active listener.
    pub(crate) fn publish(&self, snapshot: CartSnapshot) {
        self.pending.borrow_mut().push_back(snapshot);
        if self.dispatching.replace(true) {
            return;
        }
        let _guard = DispatchGuard(&self.dispatching);
        self.drain();
    }

    /// Deliver queued snapshots until the queue is empty. The caller holds
    /// the dispatch guard.
    fn drain(&self) {
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(snapshot) = next else { break };

            let slots: Vec<Slot> = self
                .slots
                .borrow()
                .iter()
                .filter(|s| s.primed_at < snapshot.revision)
                .cloned()
                .collect();
            for slot in slots {
                if slot.active.get() {
                    invoke(slot.id, &slot.listener, &snapshot);
                }
            }
        }
    }

    /// Number of registered listeners.
    pub(crate) fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    fn remove(&self, id: SubscriptionId) {
        self.slots.borrow_mut().retain(|s| s.id != id);
        tracing::debug!(subscription = id.0, "listener unsubscribed");
    }
}

fn invoke(id: SubscriptionId, listener: &Listener, snapshot: &CartSnapshot) {
    match listener.try_borrow_mut() {
        Ok(mut f) => f(snapshot),
        Err(_) => tracing::warn!(
            subscription = id.0,
            revision = snapshot.revision,
            "listener is already running, skipping nested delivery"
        ),
    }
}

struct DispatchGuard<'a>(&'a Cell<bool>);

impl Drop for DispatchGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Handle for a registered listener.
///
/// Dropping the handle unsubscribes. Call [`detach`](Self::detach) to keep
/// the listener for as long as the store lives.
#[must_use = "dropping a Subscription unsubscribes the listener"]
pub struct Subscription {
    id: SubscriptionId,
    active: Rc<Cell<bool>>,
    bridge: Weak<Bridge>,
    detached: bool,
}

impl Subscription {
    /// This subscription's id.
    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    /// Whether the listener is still registered.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Stop delivering snapshots to the listener.
    ///
    /// Safe to call repeatedly, from inside any listener, or after the store
    /// is gone.
    pub fn unsubscribe(&self) {
        if !self.active.replace(false) {
            return;
        }
        if let Some(bridge) = self.bridge.upgrade() {
            bridge.remove(self.id);
        }
    }

    /// Keep the listener registered without holding the handle.
    pub fn detach(mut self) {
        self.detached = true;
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if !self.detached {
            self.unsubscribe();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.active.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartState;

    fn snapshot(revision: u64) -> CartSnapshot {
        CartSnapshot::capture(&CartState::new(), revision)
    }

    fn recorder(log: &Rc<RefCell<Vec<u64>>>) -> Listener {
        let log = Rc::clone(log);
        Rc::new(RefCell::new(move |s: &CartSnapshot| log.borrow_mut().push(s.revision)))
    }

    #[test]
    fn test_primed_then_notified() {
        let bridge = Rc::new(Bridge::default());
        let log = Rc::new(RefCell::new(Vec::new()));
        let sub = bridge.subscribe(recorder(&log), &snapshot(0));

        bridge.publish(snapshot(1));
        bridge.publish(snapshot(2));

        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(sub.is_active());
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let bridge = Rc::new(Bridge::default());
        let log = Rc::new(RefCell::new(Vec::new()));
        let sub = bridge.subscribe(recorder(&log), &snapshot(0));

        sub.unsubscribe();
        sub.unsubscribe();
        bridge.publish(snapshot(1));

        assert_eq!(*log.borrow(), vec![0]);
        assert!(!sub.is_active());
        assert_eq!(bridge.len(), 0);
    }

    #[test]
    fn test_drop_unsubscribes_and_detach_keeps() {
        let bridge = Rc::new(Bridge::default());
        let dropped = Rc::new(RefCell::new(Vec::new()));
        let kept = Rc::new(RefCell::new(Vec::new()));

        drop(bridge.subscribe(recorder(&dropped), &snapshot(0)));
        bridge.subscribe(recorder(&kept), &snapshot(0)).detach();
        bridge.publish(snapshot(1));

        assert_eq!(*dropped.borrow(), vec![0]);
        assert_eq!(*kept.borrow(), vec![0, 1]);
        assert_eq!(bridge.len(), 1);
    }

    #[test]
    fn test_unsubscribe_after_bridge_dropped() {
        let bridge = Rc::new(Bridge::default());
        let log = Rc::new(RefCell::new(Vec::new()));
        let sub = bridge.subscribe(recorder(&log), &snapshot(0));
        drop(bridge);

        sub.unsubscribe();
        assert!(!sub.is_active());
    }

    #[test]
    fn test_unsubscribe_other_during_dispatch() {
        let bridge = Rc::new(Bridge::default());
        let second_log = Rc::new(RefCell::new(Vec::new()));
        let second: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let handle = Rc::clone(&second);
        let first = bridge.subscribe(
            Rc::new(RefCell::new(move |s: &CartSnapshot| {
                if s.revision == 1 {
                    if let Some(sub) = handle.borrow().as_ref() {
                        sub.unsubscribe();
                    }
                }
            })),
            &snapshot(0),
        );
        *second.borrow_mut() = Some(bridge.subscribe(recorder(&second_log), &snapshot(0)));

        bridge.publish(snapshot(1));

        // The first listener ran before the second and removed it.
        assert_eq!(*second_log.borrow(), vec![0]);
        assert!(first.is_active());
    }

    #[test]
    fn test_nested_publish_is_queued_in_order() {
        let bridge = Rc::new(Bridge::default());
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner = Rc::clone(&bridge);
        let _first = bridge.subscribe(
            Rc::new(RefCell::new(move |s: &CartSnapshot| {
                if s.revision == 1 {
                    inner.publish(snapshot(2));
                }
            })),
            &snapshot(0),
        );
        let _second = bridge.subscribe(recorder(&log), &snapshot(0));

        bridge.publish(snapshot(1));

        assert_eq!(*log.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn test_publish_from_priming_call_is_delivered() {
        let bridge = Rc::new(Bridge::default());
        let log = Rc::new(RefCell::new(Vec::new()));

        let inner = Rc::clone(&bridge);
        let seen = Rc::clone(&log);
        let _sub = bridge.subscribe(
            Rc::new(RefCell::new(move |s: &CartSnapshot| {
                seen.borrow_mut().push(s.revision);
                if s.revision == 0 {
                    inner.publish(snapshot(1));
                }
            })),
            &snapshot(0),
        );

        assert_eq!(*log.borrow(), vec![0, 1]);
        assert!(!bridge.dispatching.get());
    }
}
