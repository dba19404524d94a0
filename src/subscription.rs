//! Explicit change subscriptions.
//!
//! Observation here is an explicit contract: `subscribe` hands back a
//! [`Subscription`] whose drop (or `cancel`) unregisters the callback. A
//! [`SubscriptionBag`] collects handles so a controller can release every
//! observation in its teardown path at once.

use std::cell::RefCell;
use std::rc::Rc;

/// Cancellation handle for one registered callback.
///
/// Dropping the handle unregisters the callback; `cancel` does the same
/// eagerly.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub(crate) fn new(cancel: impl FnOnce() + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    pub fn cancel(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

/// Collection of subscriptions released together.
#[derive(Default)]
pub struct SubscriptionBag {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, subscription: Subscription) {
        self.subscriptions.push(subscription);
    }

    /// Release every held subscription now.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }
}

/// Ordered observer list behind the recognizer's change stream.
///
/// Notification is synchronous and re-entrancy safe: callbacks registered or
/// cancelled while a notification is in flight take effect after the current
/// round completes.
pub(crate) struct Observers<E> {
    next_id: u64,
    entries: Vec<(u64, Box<dyn FnMut(&E)>)>,
    dead: Vec<u64>,
    notifying: bool,
}

impl<E: 'static> Observers<E> {
    pub fn new() -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self {
            next_id: 1,
            entries: Vec::new(),
            dead: Vec::new(),
            notifying: false,
        }))
    }

    pub fn subscribe(
        this: &Rc<RefCell<Self>>,
        callback: impl FnMut(&E) + 'static,
    ) -> Subscription {
        let id = {
            let mut list = this.borrow_mut();
            let id = list.next_id;
            list.next_id += 1;
            list.entries.push((id, Box::new(callback)));
            id
        };
        let weak = Rc::downgrade(this);
        Subscription::new(move || {
            if let Some(list) = weak.upgrade() {
                let mut list = list.borrow_mut();
                if list.notifying {
                    list.dead.push(id);
                } else {
                    list.entries.retain(|(entry_id, _)| *entry_id != id);
                }
            }
        })
    }

    pub fn notify(this: &Rc<RefCell<Self>>, event: &E) {
        let mut entries = {
            let mut list = this.borrow_mut();
            if list.notifying {
                return;
            }
            list.notifying = true;
            std::mem::take(&mut list.entries)
        };

        for (_, callback) in entries.iter_mut() {
            callback(event);
        }

        let mut list = this.borrow_mut();
        list.notifying = false;
        // Subscriptions made during the round landed in `list.entries`.
        let added = std::mem::take(&mut list.entries);
        entries.extend(added);
        let dead = std::mem::take(&mut list.dead);
        entries.retain(|(id, _)| !dead.contains(id));
        list.entries = entries;
    }
}
