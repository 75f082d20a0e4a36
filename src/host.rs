//! Click-outside-to-close wiring for pickers rendered on one page.
//!
//! The page owns a single [`OutsideClickHub`]. A [`PickerHost`] registers its
//! picker with the hub only while the picker is open; the registration is an
//! [`OutsideClickSubscription`] that unregisters itself when dropped, so a
//! host that goes away while open never leaves a listener behind.

use std::{
    cell::RefCell,
    collections::BTreeMap,
    rc::{Rc, Weak},
};

use tracing::{debug, trace};

use crate::{DatePicker, prelude::*};

/// Identifies one picker instance on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Display)]
#[display(fmt = "picker#{_0}")]
pub struct PickerId(u32);

#[derive(Debug, Default)]
struct Listeners {
    next_id: u32,
    // live subscriptions per picker
    active:  BTreeMap<PickerId, usize>,
}

/// Page-level pointer listener shared by every picker host.
#[derive(Debug, Clone, Default)]
pub struct OutsideClickHub {
    inner: Rc<RefCell<Listeners>>,
}

impl OutsideClickHub {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&self) -> PickerId {
        let mut listeners = self.inner.borrow_mut();
        let id = PickerId(listeners.next_id);
        listeners.next_id = listeners.next_id.wrapping_add(1);
        id
    }

    /// Starts listening on behalf of `id` until the subscription is dropped.
    /// The id keeps listening while any of its subscriptions is alive.
    pub fn subscribe(&self, id: PickerId) -> OutsideClickSubscription {
        *self.inner.borrow_mut().active.entry(id).or_default() += 1;
        trace!(%id, "outside-click listener registered");
        OutsideClickSubscription {
            id,
            hub: Rc::downgrade(&self.inner),
        }
    }

    pub fn listener_count(&self) -> usize {
        self.inner.borrow().active.len()
    }

    pub fn is_listening(&self, id: PickerId) -> bool {
        self.inner.borrow().active.contains_key(&id)
    }

    /// Reports a pointer press. `inside` is the picker whose bounds contain
    /// the pointer, if any. Returns every other listening picker; those must
    /// close.
    pub fn pointer_down(&self, inside: Option<PickerId>) -> Vec<PickerId> {
        self.inner
            .borrow()
            .active
            .keys()
            .copied()
            .filter(|id| Some(*id) != inside)
            .collect()
    }
}

/// A live registration with an [`OutsideClickHub`]; dropping it unregisters.
#[derive(Debug)]
pub struct OutsideClickSubscription {
    id:  PickerId,
    hub: Weak<RefCell<Listeners>>,
}

impl OutsideClickSubscription {
    pub const fn id(&self) -> PickerId {
        self.id
    }
}

impl Drop for OutsideClickSubscription {
    fn drop(&mut self) {
        let Some(hub) = self.hub.upgrade() else {
            return;
        };
        let mut listeners = hub.borrow_mut();
        if let Some(count) = listeners.active.get_mut(&self.id) {
            *count -= 1;
            if *count == 0 {
                listeners.active.remove(&self.id);
                trace!(id = %self.id, "outside-click listener released");
            }
        }
    }
}

/// Owns one picker and keeps its hub registration in step with `is_open`.
#[derive(Debug)]
pub struct PickerHost {
    id:           PickerId,
    picker:       DatePicker,
    hub:          OutsideClickHub,
    subscription: Option<OutsideClickSubscription>,
}

impl PickerHost {
    pub fn new(picker: DatePicker, hub: &OutsideClickHub) -> Self {
        let mut host = Self {
            id: hub.allocate_id(),
            picker,
            hub: hub.clone(),
            subscription: None,
        };
        host.sync_subscription();
        host
    }

    pub const fn id(&self) -> PickerId {
        self.id
    }

    pub const fn picker(&self) -> &DatePicker {
        &self.picker
    }

    pub fn open(&mut self) {
        self.update(DatePicker::open);
    }

    pub fn close(&mut self) {
        self.update(DatePicker::close);
    }

    /// Runs `f` against the picker, then acquires or releases the hub
    /// registration to match whether the picker ended up open.
    pub fn update<R>(&mut self, f: impl FnOnce(&mut DatePicker) -> R) -> R {
        let result = f(&mut self.picker);
        self.sync_subscription();
        result
    }

    /// Closes the picker if the hub reported this host among `outside`.
    /// Returns whether it closed.
    pub fn close_if_outside(&mut self, outside: &[PickerId]) -> bool {
        if !self.picker.is_open() || !outside.contains(&self.id) {
            return false;
        }
        debug!(id = %self.id, "closing picker on outside click");
        self.close();
        true
    }

    pub const fn is_listening(&self) -> bool {
        self.subscription.is_some()
    }

    fn sync_subscription(&mut self) {
        match (self.picker.is_open(), self.subscription.is_some()) {
            (true, false) => self.subscription = Some(self.hub.subscribe(self.id)),
            (false, true) => self.subscription = None,
            _ => {},
        }
    }
}
