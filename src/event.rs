//! Single-threaded event plumbing for state-change notifications.
//!
//! Everything here runs on the UI thread. Emitters hold their listeners
//! behind `Rc`/`RefCell`; firing dispatches against a snapshot, so a
//! listener may subscribe or dispose without invalidating the pass.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

type Listener = Rc<dyn Fn()>;

/// Payload-free event emitter.
///
/// Listeners are invoked in subscription order. There is no payload:
/// a fired event means "re-query whatever you derived from me".
pub struct EventEmitter {
    listeners: RefCell<Vec<(u64, Listener)>>,
    next_id: Cell<u64>,
}

impl EventEmitter {
    pub fn new() -> Rc<Self> {
        Rc::new(Self {
            listeners: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
        })
    }

    /// Register a listener. The registration lives until the returned
    /// `Disposable` is disposed (or dropped).
    pub fn subscribe(self: &Rc<Self>, listener: impl Fn() + 'static) -> Disposable {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, Rc::new(listener)));
        Disposable {
            emitter: Rc::downgrade(self),
            id,
            disposed: false,
        }
    }

    /// Invoke every listener registered at the time of the call.
    pub fn fire(&self) {
        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, f)| Rc::clone(f))
            .collect();
        for listener in snapshot {
            listener();
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    fn remove(&self, id: u64) {
        self.listeners.borrow_mut().retain(|(lid, _)| *lid != id);
    }
}

/// Handle releasing a single listener registration.
///
/// Disposing twice is a no-op. Dropping an undisposed handle disposes it.
pub struct Disposable {
    emitter: Weak<EventEmitter>,
    id: u64,
    disposed: bool,
}

impl Disposable {
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        if let Some(emitter) = self.emitter.upgrade() {
            emitter.remove(self.id);
        }
    }
}

impl Drop for Disposable {
    fn drop(&mut self) {
        self.dispose();
    }
}

/// Disposal-tracking context: owns registrations for the lifetime of
/// the component that created them and releases them all on drop.
#[derive(Default)]
pub struct Subscriptions {
    items: Vec<Disposable>,
}

impl Subscriptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, disposable: Disposable) {
        self.items.push(disposable);
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
