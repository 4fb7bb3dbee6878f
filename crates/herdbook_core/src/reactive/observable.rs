//! Single-value observable with versioned, cancellable delivery.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

type Callback<T> = Box<dyn Fn(&Rc<T>)>;

/// Holder of one current value that notifies observers on every `set`.
///
/// Cloning yields another handle to the same value and observer list.
pub struct Observable<T> {
    shared: Rc<Shared<T>>,
}

struct Shared<T> {
    state: RefCell<Versioned<T>>,
    observers: RefCell<Vec<Rc<ObserverSlot<T>>>>,
}

struct Versioned<T> {
    value: Rc<T>,
    version: u64,
}

struct ObserverSlot<T> {
    active: Rc<Cell<bool>>,
    last_seen: Cell<u64>,
    callback: Callback<T>,
}

impl<T> ObserverSlot<T> {
    fn is_active(&self) -> bool {
        self.active.get()
    }

    fn deliver(&self, version: u64, value: &Rc<T>) {
        // Skips cancelled slots and versions superseded by a nested `set`.
        if !self.is_active() || version <= self.last_seen.get() {
            return;
        }
        self.last_seen.set(version);
        (self.callback)(value);
    }
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: Default + 'static> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: 'static> Observable<T> {
    pub fn new(initial: T) -> Self {
        Self {
            shared: Rc::new(Shared {
                state: RefCell::new(Versioned {
                    value: Rc::new(initial),
                    version: 1,
                }),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Returns the current value without side effects.
    pub fn current(&self) -> Rc<T> {
        Rc::clone(&self.shared.state.borrow().value)
    }

    /// Monotonic counter bumped by every `set`; starts at 1.
    pub fn version(&self) -> u64 {
        self.shared.state.borrow().version
    }

    /// Replaces the value and notifies every active observer.
    ///
    /// Observers may call `set` again from inside their callback; the nested
    /// value is delivered to everyone first and the outer value is then
    /// skipped for observers that already saw the newer one.
    pub fn set(&self, value: T) {
        let (value, version) = {
            let mut state = self.shared.state.borrow_mut();
            state.version += 1;
            state.value = Rc::new(value);
            (Rc::clone(&state.value), state.version)
        };

        let observers: Vec<Rc<ObserverSlot<T>>> = self
            .shared
            .observers
            .borrow()
            .iter()
            .filter(|slot| slot.is_active())
            .cloned()
            .collect();
        for slot in observers {
            slot.deliver(version, &value);
        }

        self.prune();
    }

    /// Registers `observer`, invoking it immediately with the current value.
    ///
    /// The returned handle stops delivery when cancelled or dropped.
    pub fn subscribe(&self, observer: impl Fn(&Rc<T>) + 'static) -> Subscription {
        self.prune();

        let active = Rc::new(Cell::new(true));
        let slot = Rc::new(ObserverSlot {
            active: Rc::clone(&active),
            last_seen: Cell::new(0),
            callback: Box::new(observer),
        });
        self.shared.observers.borrow_mut().push(Rc::clone(&slot));

        let (value, version) = {
            let state = self.shared.state.borrow();
            (Rc::clone(&state.value), state.version)
        };
        slot.deliver(version, &value);

        Subscription { active }
    }

    /// Number of observers that will receive the next `set`.
    pub fn observer_count(&self) -> usize {
        self.shared
            .observers
            .borrow()
            .iter()
            .filter(|slot| slot.is_active())
            .count()
    }

    fn prune(&self) {
        self.shared
            .observers
            .borrow_mut()
            .retain(|slot| slot.is_active());
    }
}

/// Handle to one observer registration.
///
/// Cancelling is idempotent and takes effect before any further delivery,
/// including deliveries of a fan-out already in progress.
#[must_use = "dropping a Subscription cancels it"]
#[derive(Debug)]
pub struct Subscription {
    active: Rc<Cell<bool>>,
}

impl Subscription {
    pub fn cancel(&self) {
        self.active.set(false);
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}
