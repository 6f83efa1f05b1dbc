//! Synchronous publish/subscribe event bus
//!
//! Listeners are registered per [`EventKind`] and invoked in registration
//! order on the thread that calls [`EventBus::emit`]. Every registration gets
//! its own [`ListenerToken`]; ids are never reused, so a token can only ever
//! retract the registration it was issued for.
//!
//! The registry lock is released before a listener runs. Listeners may
//! register, retract and emit from inside their callback.

use crate::event::{Event, EventKind};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, trace};

/// Listener callback
pub type Listener = Arc<dyn Fn(&Event) + Send + Sync>;

/// Handle for retracting exactly one registration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerToken {
    kind: EventKind,
    id: u64,
}

impl ListenerToken {
    /// Event kind this token listens to
    pub fn kind(&self) -> EventKind {
        self.kind
    }
}

impl std::fmt::Display for ListenerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.id)
    }
}

struct Registration {
    id: u64,
    once: bool,
    listener: Listener,
}

#[derive(Default)]
struct Registry {
    next_id: u64,
    listeners: HashMap<EventKind, Vec<Registration>>,
}

impl Registry {
    fn register(&mut self, kind: EventKind, once: bool, listener: Listener) -> ListenerToken {
        self.next_id += 1;
        let id = self.next_id;
        self.listeners.entry(kind).or_default().push(Registration { id, once, listener });
        ListenerToken { kind, id }
    }

    fn remove(&mut self, token: ListenerToken) -> Option<Registration> {
        let list = self.listeners.get_mut(&token.kind)?;
        let pos = list.iter().position(|r| r.id == token.id)?;
        let registration = list.remove(pos);
        if list.is_empty() {
            self.listeners.remove(&token.kind);
        }
        Some(registration)
    }

    /// Fetch a live listener for delivery; one-shot registrations are removed here
    fn take_for_delivery(&mut self, token: ListenerToken) -> Option<Listener> {
        let (once, listener) = {
            let registration = self
                .listeners
                .get(&token.kind)?
                .iter()
                .find(|r| r.id == token.id)?;
            (registration.once, Arc::clone(&registration.listener))
        };
        if once {
            self.remove(token);
        }
        Some(listener)
    }

    fn tokens(&self, kind: EventKind) -> Vec<ListenerToken> {
        self.listeners
            .get(&kind)
            .map(|list| list.iter().map(|r| ListenerToken { kind, id: r.id }).collect())
            .unwrap_or_default()
    }
}

/// Shared event bus handle
#[derive(Clone, Default)]
pub struct EventBus {
    registry: Arc<Mutex<Registry>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a persistent listener
    pub fn on<F>(&self, kind: EventKind, listener: F) -> ListenerToken
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let token = self.registry().register(kind, false, Arc::new(listener));
        debug!(token = %token, "Listener registered");
        token
    }

    /// Register a listener that is retracted after its first invocation
    pub fn once<F>(&self, kind: EventKind, listener: F) -> ListenerToken
    where
        F: Fn(&Event) + Send + Sync + 'static,
    {
        let token = self.registry().register(kind, true, Arc::new(listener));
        debug!(token = %token, "One-shot listener registered");
        token
    }

    /// Retract a registration. Returns false if it already fired or was retracted.
    pub fn off(&self, token: ListenerToken) -> bool {
        let removed = self.registry().remove(token).is_some();
        debug!(token = %token, removed, "Listener retracted");
        removed
    }

    /// Returns true while the registration can still fire
    pub fn is_live(&self, token: ListenerToken) -> bool {
        self.registry()
            .listeners
            .get(&token.kind)
            .is_some_and(|list| list.iter().any(|r| r.id == token.id))
    }

    /// Number of registrations for a kind
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.registry().listeners.get(&kind).map_or(0, Vec::len)
    }

    /// Deliver an event to the listeners registered for its kind.
    ///
    /// Only listeners registered when the call starts are considered, and a
    /// listener retracted by an earlier callback of the same delivery is
    /// skipped. Returns the number of listeners invoked.
    pub fn emit(&self, event: &Event) -> usize {
        let kind = event.kind();
        let pending = self.registry().tokens(kind);

        let mut delivered = 0;
        for token in pending {
            let listener = self.registry().take_for_delivery(token);
            if let Some(listener) = listener {
                listener(event);
                delivered += 1;
            }
        }

        trace!(event = %kind, delivered, "Event emitted");
        delivered
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let registry = self.registry();
        let counts: HashMap<EventKind, usize> = registry
            .listeners
            .iter()
            .map(|(kind, list)| (*kind, list.len()))
            .collect();
        f.debug_struct("EventBus")
            .field("next_id", &registry.next_id)
            .field("listeners", &counts)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn recorder() -> (Arc<Mutex<Vec<&'static str>>>, impl Fn(&'static str) -> Listener) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let log_ref = Arc::clone(&log);
        let make = move |name: &'static str| {
            let log = Arc::clone(&log_ref);
            Arc::new(move |_: &Event| log.lock().unwrap().push(name)) as Listener
        };
        (log, make)
    }

    #[test]
    fn test_delivery_in_registration_order() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let first = make("first");
        let second = make("second");
        let third = make("third");
        bus.on(EventKind::DialogConfirmed, move |e| first(e));
        bus.once(EventKind::DialogConfirmed, move |e| second(e));
        bus.on(EventKind::DialogConfirmed, move |e| third(e));

        assert_eq!(bus.emit(&Event::DialogConfirmed), 3);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third"]);

        assert_eq!(bus.emit(&Event::DialogConfirmed), 2);
        assert_eq!(*log.lock().unwrap(), vec!["first", "second", "third", "first", "third"]);
    }

    #[test]
    fn test_once_fires_once() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let token = bus.once(EventKind::ActivityResumed, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(bus.is_live(token));
        bus.emit(&Event::ActivityResumed);
        bus.emit(&Event::ActivityResumed);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(!bus.is_live(token));
        assert!(!bus.off(token));
    }

    #[test]
    fn test_off_prevents_later_delivery() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        let token = bus.on(EventKind::FragmentResumed, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(bus.off(token));
        assert_eq!(bus.emit(&Event::FragmentResumed), 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.listener_count(EventKind::FragmentResumed), 0);
    }

    #[test]
    fn test_off_retracts_only_its_registration() {
        let bus = EventBus::new();
        let (log, make) = recorder();
        let a = make("a");
        let b = make("b");
        let token_a = bus.on(EventKind::DialogSettings, move |e| a(e));
        let token_b = bus.on(EventKind::DialogSettings, move |e| b(e));
        assert_ne!(token_a, token_b);

        bus.off(token_a);
        bus.emit(&Event::DialogSettings);
        assert_eq!(*log.lock().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_tokens_are_not_reused() {
        let bus = EventBus::new();
        let first = bus.once(EventKind::DialogConfirmed, |_| {});
        bus.emit(&Event::DialogConfirmed);
        let second = bus.once(EventKind::DialogConfirmed, |_| {});

        assert_ne!(first, second);
        assert!(!bus.off(first));
        assert!(bus.is_live(second));
    }

    #[test]
    fn test_retraction_during_delivery_skips_listener() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let victim_slot: Arc<Mutex<Option<ListenerToken>>> = Arc::new(Mutex::new(None));

        let bus_ref = bus.clone();
        let slot = Arc::clone(&victim_slot);
        bus.once(EventKind::ActivityResumed, move |_| {
            if let Some(token) = *slot.lock().unwrap() {
                bus_ref.off(token);
            }
        });

        let counter = Arc::clone(&hits);
        let victim = bus.once(EventKind::ActivityResumed, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        *victim_slot.lock().unwrap() = Some(victim);

        assert_eq!(bus.emit(&Event::ActivityResumed), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_reentrant_emit_does_not_refire_once() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let bus_ref = bus.clone();
        let counter = Arc::clone(&hits);
        bus.once(EventKind::DialogConfirmed, move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            bus_ref.emit(&Event::DialogConfirmed);
        });

        bus.emit(&Event::DialogConfirmed);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_listener_registered_during_delivery_waits_for_next_emit() {
        let bus = EventBus::new();
        let hits = Arc::new(AtomicUsize::new(0));

        let bus_ref = bus.clone();
        let counter = Arc::clone(&hits);
        bus.once(EventKind::DialogSettings, move |_| {
            let counter = Arc::clone(&counter);
            bus_ref.once(EventKind::DialogSettings, move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            });
        });

        assert_eq!(bus.emit(&Event::DialogSettings), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.emit(&Event::DialogSettings), 1);
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_kinds_are_isolated() {
        let bus = EventBus::new();
        bus.on(EventKind::ActivityResumed, |_| {});
        assert_eq!(bus.emit(&Event::FragmentResumed), 0);
        assert_eq!(bus.listener_count(EventKind::ActivityResumed), 1);
    }
}
