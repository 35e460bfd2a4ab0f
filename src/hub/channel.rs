//! Synchronous multicast channel with snapshot delivery.
//!
//! - `publish` fans a notification out to every subscriber present when
//!   delivery of that notification starts.
//! - A publish issued from inside a callback is delivered immediately, to a
//!   fresh snapshot, before the inner `publish` returns. Subscribers later in
//!   the outer snapshot then see the inner notification first.
//! - Cancelling a subscription takes effect immediately, even in the middle of
//!   delivering a notification.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

type Callback<T> = Rc<dyn Fn(&T)>;

struct Entry<T> {
    id: u64,
    active: Rc<Cell<bool>>,
    callback: Callback<T>,
}

struct Shared<T> {
    entries: RefCell<Vec<Entry<T>>>,
    /// Publishes currently on the stack.
    depth: Cell<usize>,
    next_id: Cell<u64>,
}

/// Multi-subscriber broadcast channel. Clones share the same subscriber list.
pub struct Channel<T> {
    shared: Rc<Shared<T>>,
}

impl<T> Clone for Channel<T> {
    fn clone(&self) -> Self {
        Channel {
            shared: Rc::clone(&self.shared),
        }
    }
}

impl<T: 'static> Default for Channel<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Channel<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("subscribers", &self.shared.entries.borrow().len())
            .field("depth", &self.shared.depth.get())
            .finish()
    }
}

impl<T: 'static> Channel<T> {
    pub fn new() -> Self {
        Channel {
            shared: Rc::new(Shared {
                entries: RefCell::new(Vec::new()),
                depth: Cell::new(0),
                next_id: Cell::new(1),
            }),
        }
    }

    /// Register `on_next` for every subsequent notification.
    ///
    /// The returned guard cancels the subscription when cancelled or dropped.
    pub fn subscribe<F>(&self, on_next: F) -> Subscription
    where
        F: Fn(&T) + 'static,
    {
        let id = self.shared.next_id.get();
        self.shared.next_id.set(id + 1);
        let active = Rc::new(Cell::new(true));
        self.shared.entries.borrow_mut().push(Entry {
            id,
            active: Rc::clone(&active),
            callback: Rc::new(on_next),
        });

        let shared: Weak<Shared<T>> = Rc::downgrade(&self.shared);
        Subscription::new(move || {
            active.set(false);
            if let Some(shared) = shared.upgrade() {
                let mut entries = shared.entries.borrow_mut();
                let index = entries.iter().position(|entry| entry.id == id);
                let removed = index.map(|index| entries.remove(index));
                // Released first: a dropped callback may own further subscriptions.
                drop(entries);
                drop(removed);
            }
        })
    }

    /// Deliver `notification` to all current subscribers before returning.
    pub fn publish(&self, notification: T) {
        let snapshot: Vec<(Rc<Cell<bool>>, Callback<T>)> = self
            .shared
            .entries
            .borrow()
            .iter()
            .map(|entry| (Rc::clone(&entry.active), Rc::clone(&entry.callback)))
            .collect();

        let _delivery = DeliveryGuard::enter(&self.shared);
        for (active, callback) in snapshot {
            if active.get() {
                callback(&notification);
            }
        }
    }

    /// Whether a `publish` on this channel is on the call stack.
    pub fn is_delivering(&self) -> bool {
        self.shared.depth.get() > 0
    }

    /// Cancel every subscription at once.
    pub fn clear(&self) {
        let entries = std::mem::take(&mut *self.shared.entries.borrow_mut());
        for entry in entries {
            entry.active.set(false);
        }
    }

    pub fn subscriber_count(&self) -> usize {
        self.shared.entries.borrow().len()
    }
}

/// Tracks publish nesting; unwinds correctly when a subscriber panics.
struct DeliveryGuard<'a, T> {
    shared: &'a Shared<T>,
}

impl<'a, T> DeliveryGuard<'a, T> {
    fn enter(shared: &'a Shared<T>) -> Self {
        shared.depth.set(shared.depth.get() + 1);
        DeliveryGuard { shared }
    }
}

impl<T> Drop for DeliveryGuard<'_, T> {
    fn drop(&mut self) {
        self.shared.depth.set(self.shared.depth.get() - 1);
    }
}

/// Handle to a live subscription. Cancels on drop.
#[must_use = "dropping a Subscription cancels it immediately"]
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    fn new(cancel: impl FnOnce() + 'static) -> Self {
        Subscription {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop receiving notifications.
    pub fn cancel(mut self) {
        self.cancel_now();
    }

    fn cancel_now(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
