//! Location feed contract
//!
//! The navigator never manipulates history. It reads the current location
//! from a [`LocationFeed`] and subscribes to changes. [`LocationChannel`] is
//! a minimal in-memory feed that broadcasts whatever it is told to.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::location::Location;

/// Callback invoked with every new location
pub type Listener = Rc<dyn Fn(&Location)>;

/// Shared handle to the history backend, propagated down the tree
pub type NavigationHandle = Rc<dyn LocationFeed>;

/// Source of locations and location changes
pub trait LocationFeed {
    /// The location right now
    fn location(&self) -> Location;

    /// Registers `listener`; dropping or calling the returned handle stops delivery
    fn subscribe(&self, listener: Listener) -> Unsubscribe;
}

/// Handle that cancels a subscription
///
/// Calling [`unsubscribe`](Self::unsubscribe) more than once is a no-op.
pub struct Unsubscribe(Option<Box<dyn FnOnce()>>);

impl Unsubscribe {
    pub fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self(Some(Box::new(cancel)))
    }

    /// Handle with nothing to cancel
    pub fn noop() -> Self {
        Self(None)
    }

    pub fn unsubscribe(&mut self) {
        if let Some(cancel) = self.0.take() {
            cancel();
        }
    }

    pub fn is_active(&self) -> bool {
        self.0.is_some()
    }
}

impl fmt::Debug for Unsubscribe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Unsubscribe")
            .field("active", &self.is_active())
            .finish()
    }
}

type Listeners = RefCell<Vec<(usize, Listener)>>;

/// In-memory feed: holds a current location and broadcasts changes
///
/// # Examples
///
/// ```
/// use rhtmx_navigator::{Location, LocationChannel, LocationFeed};
/// use std::cell::RefCell;
/// use std::rc::Rc;
///
/// let channel = LocationChannel::new("/");
/// let seen = Rc::new(RefCell::new(Vec::new()));
/// let sink = Rc::clone(&seen);
/// let mut handle = channel.subscribe(Rc::new(move |l: &Location| {
///     sink.borrow_mut().push(l.pathname.clone())
/// }));
///
/// channel.emit("/a");
/// handle.unsubscribe();
/// channel.emit("/b");
///
/// assert_eq!(*seen.borrow(), vec!["/a".to_string()]);
/// assert_eq!(channel.location().pathname, "/b");
/// ```
pub struct LocationChannel {
    current: RefCell<Location>,
    listeners: Rc<Listeners>,
    next_id: Cell<usize>,
}

impl LocationChannel {
    pub fn new(initial: impl Into<Location>) -> Self {
        Self {
            current: RefCell::new(initial.into()),
            listeners: Rc::new(RefCell::new(Vec::new())),
            next_id: Cell::new(0),
        }
    }

    /// Makes `location` current and notifies listeners in subscription order
    ///
    /// Listeners may subscribe, unsubscribe or emit again while being
    /// notified; each emit delivers to the listeners registered when it began.
    pub fn emit(&self, location: impl Into<Location>) {
        let location = location.into();
        *self.current.borrow_mut() = location.clone();

        let snapshot: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        tracing::trace!(pathname = %location.pathname, listeners = snapshot.len(), "location emitted");
        for listener in snapshot {
            listener(&location);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }
}

impl LocationFeed for LocationChannel {
    fn location(&self) -> Location {
        self.current.borrow().clone()
    }

    fn subscribe(&self, listener: Listener) -> Unsubscribe {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.listeners.borrow_mut().push((id, listener));

        let listeners: Weak<Listeners> = Rc::downgrade(&self.listeners);
        Unsubscribe::new(move || {
            if let Some(listeners) = listeners.upgrade() {
                listeners.borrow_mut().retain(|(other, _)| *other != id);
            }
        })
    }
}

impl fmt::Debug for LocationChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocationChannel")
            .field("current", &self.current.borrow())
            .field("listeners", &self.listener_count())
            .finish()
    }
}
