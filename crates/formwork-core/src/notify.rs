//! Per-thread notification center for system configuration changes.
//!
//! Subscribing returns a [`Subscription`] guard; the callback stays registered
//! exactly as long as the guard lives. Dropping the guard unregisters it, and
//! there is no other way to unregister, so a callback can never be released
//! twice or outlive its owner.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{SlotMap, new_key_type};

new_key_type! {
    pub struct SubscriptionKey;
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Notification {
    /// The preferred text size changed.
    ContentSizeCategoryChanged,
}

struct Entry {
    kind: Notification,
    callback: Rc<dyn Fn()>,
}

thread_local! {
    static CENTER: RefCell<SlotMap<SubscriptionKey, Entry>> = RefCell::new(SlotMap::with_key());
}

/// Registration guard returned by [`subscribe`].
#[must_use = "dropping a Subscription unregisters the callback immediately"]
pub struct Subscription {
    key: SubscriptionKey,
    kind: Notification,
}

impl Subscription {
    pub fn kind(&self) -> Notification {
        self.kind
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("key", &self.key)
            .field("kind", &self.kind)
            .finish()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let removed = CENTER.with(|c| c.borrow_mut().remove(self.key));
        match removed {
            Some(_) => log::debug!("unsubscribed {:?} ({:?})", self.kind, self.key),
            None => log::warn!("subscription {:?} was already gone", self.key),
        }
    }
}

pub fn subscribe(kind: Notification, f: impl Fn() + 'static) -> Subscription {
    let key = CENTER.with(|c| {
        c.borrow_mut().insert(Entry {
            kind,
            callback: Rc::new(f),
        })
    });
    log::debug!("subscribed {kind:?} ({key:?})");
    Subscription { key, kind }
}

/// Delivers `kind` to every current subscriber.
///
/// Callbacks run after the center is released, so they may subscribe or drop
/// subscriptions themselves. A subscription dropped during delivery is not
/// called afterwards.
pub fn post(kind: Notification) {
    let targets: Vec<(SubscriptionKey, Rc<dyn Fn()>)> = CENTER.with(|c| {
        c.borrow()
            .iter()
            .filter(|(_, e)| e.kind == kind)
            .map(|(k, e)| (k, e.callback.clone()))
            .collect()
    });
    log::trace!("posting {kind:?} to {} subscriber(s)", targets.len());
    for (key, callback) in targets {
        let live = CENTER.with(|c| c.borrow().contains_key(key));
        if live {
            callback();
        }
    }
}

pub fn subscriber_count(kind: Notification) -> usize {
    CENTER.with(|c| c.borrow().values().filter(|e| e.kind == kind).count())
}
