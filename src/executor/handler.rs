//! Storage handle interface and handler state save/restore
//!
//! Filling a filter runs an index-only scan on the same storage handle the
//! statement later reads through. Everything the fill perturbs on that
//! handle is captured in [`HandlerState`] and put back by
//! [`HandlerStateGuard`] when the fill ends, whichever way it ends.

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::optimizer::IndexId;

use super::container::LocatorOrder;

/// Index condition pushed down into the storage engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PushedIndexCondition {
    /// Index the condition was pushed to
    pub index: IndexId,
    /// Engine handle of the condition
    pub condition_id: u64,
}

/// Per-statement handle fields the fill temporarily overrides
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HandlerState {
    pub table_status: u32,
    pub pushed_index_condition: Option<PushedIndexCondition>,
    pub in_range_check_pushed_down: bool,
}

/// Storage engine handle of one table in one statement
pub trait StorageHandle {
    /// Row locator produced by `position`
    type Locator;
    /// Engine defined order over locators
    type Order: LocatorOrder<Self::Locator>;

    /// Locator of the row the handle is positioned on
    fn position(&self) -> Self::Locator;

    /// Order the engine compares its locators by
    fn locator_order(&self) -> Self::Order;

    fn handler_state(&self) -> HandlerState;

    fn restore_handler_state(&mut self, state: HandlerState);

    /// Switches to index-only reads on `index`
    fn start_keyread(&mut self, index: IndexId);

    fn end_keyread(&mut self);

    /// Marks the handle as probing a rowid filter on subsequent reads
    fn set_rowid_filter_active(&mut self);
}

/// Saves the handler state on creation and restores it on drop.
///
/// While alive the handle has a cleared state and is in keyread mode on the
/// scanned index.
pub struct HandlerStateGuard<'a, H: StorageHandle + ?Sized> {
    handle: &'a mut H,
    saved: HandlerState,
}

impl<'a, H: StorageHandle + ?Sized> HandlerStateGuard<'a, H> {
    pub fn enter(handle: &'a mut H, index: IndexId) -> Self {
        let saved = handle.handler_state();
        handle.restore_handler_state(HandlerState::default());
        handle.start_keyread(index);
        Self { handle, saved }
    }

    /// State that will be restored
    pub fn saved(&self) -> &HandlerState {
        &self.saved
    }
}

impl<H: StorageHandle + ?Sized> Deref for HandlerStateGuard<'_, H> {
    type Target = H;

    fn deref(&self) -> &H {
        self.handle
    }
}

impl<H: StorageHandle + ?Sized> DerefMut for HandlerStateGuard<'_, H> {
    fn deref_mut(&mut self) -> &mut H {
        self.handle
    }
}

impl<H: StorageHandle + ?Sized> Drop for HandlerStateGuard<'_, H> {
    fn drop(&mut self) {
        self.handle.end_keyread();
        self.handle.restore_handler_state(self.saved);
    }
}

/// Cancellation signal polled between scan steps
pub trait KillSignal {
    fn is_killed(&self) -> bool;
}

impl KillSignal for AtomicBool {
    fn is_killed(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<K: KillSignal + ?Sized> KillSignal for &K {
    fn is_killed(&self) -> bool {
        (**self).is_killed()
    }
}

impl<K: KillSignal + ?Sized> KillSignal for Arc<K> {
    fn is_killed(&self) -> bool {
        (**self).is_killed()
    }
}
