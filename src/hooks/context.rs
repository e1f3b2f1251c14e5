//! Hook Context - per-component hook state.
//!
//! A context owns the component's slot store, the render cursor and the
//! rerender callback registered by the driver. Every hook primitive lives
//! here; the facade in [`crate::hooks::api`] only resolves the current
//! context and forwards.
//!
//! # Render protocol
//!
//! ```text
//! reset_for_render() → hook calls in fixed order → finish_render()
//! ```
//!
//! The first render appends one slot per hook call. Later renders walk the
//! same slots by index. A render whose hook sequence differs from the first
//! one fails with a structural [`HookError`] (or, in lenient mode, resets the
//! offending slot).

use std::any::{Any, type_name};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use bitflags::bitflags;

use super::deps::Deps;
use super::handles::{Dispatch, MutableRef, RerenderCallback, RerenderCell, Setter};
use super::slot::{HookKind, HookSlot, HookSlotStore, IntoCleanup};
use super::tracker::Suspendable;
use crate::config;
use crate::error::{HookError, HookResult};

bitflags! {
    /// Lifecycle flags of a context.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct ContextFlags: u8 {
        /// A first render has completed; the slot count is now fixed.
        const RENDERED = 1 << 0;
        /// Installed as current by `with_context`.
        const RENDERING = 1 << 1;
        /// Effects were cleaned up by a suspend or unmount.
        const SUSPENDED = 1 << 2;
    }
}

/// Where the next hook call lands.
enum Claim {
    /// Reuse the slot at this index.
    Existing(usize),
    /// Create (or, in lenient mode, recreate) the slot at this index.
    Fresh(usize),
}

/// Hook state for one component instance.
pub struct HookContext {
    label: Option<String>,
    store: RefCell<HookSlotStore>,
    cursor: Cell<usize>,
    rerender: RerenderCell,
    flags: Cell<ContextFlags>,
}

impl Default for HookContext {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for HookContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookContext")
            .field("label", &self.label)
            .field("slots", &self.store.borrow().kinds())
            .field("cursor", &self.cursor.get())
            .field("flags", &self.flags.get())
            .finish()
    }
}

impl HookContext {
    pub fn new() -> Self {
        Self {
            label: None,
            store: RefCell::new(HookSlotStore::new()),
            cursor: Cell::new(0),
            rerender: Rc::new(RefCell::new(None)),
            flags: Cell::new(ContextFlags::empty()),
        }
    }

    /// Context labelled with its component id (used in log output).
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: Some(label.into()),
            ..Self::new()
        }
    }

    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    pub fn flags(&self) -> ContextFlags {
        self.flags.get()
    }

    pub(crate) fn insert_flags(&self, flags: ContextFlags) {
        self.flags.set(self.flags.get() | flags);
    }

    pub(crate) fn remove_flags(&self, flags: ContextFlags) {
        self.flags.set(self.flags.get() - flags);
    }

    /// Number of stored slots.
    pub fn slot_count(&self) -> usize {
        self.store.borrow().len()
    }

    /// Hooks called so far in the current render.
    pub fn cursor(&self) -> usize {
        self.cursor.get()
    }

    /// Kinds of the stored slots, in call order.
    pub fn slot_kinds(&self) -> Vec<HookKind> {
        self.store.borrow().kinds()
    }

    // =========================================================================
    // Render lifecycle
    // =========================================================================

    /// Rewind the cursor for a new render. Stored slots are kept.
    pub fn reset_for_render(&self) {
        self.remove_flags(ContextFlags::SUSPENDED);
        self.cursor.set(0);
    }

    /// Check that this render called as many hooks as the context holds.
    ///
    /// On success the slot count is fixed: later renders that call more
    /// hooks fail with [`HookError::HookCountExceeded`].
    pub fn finish_render(&self) -> HookResult<()> {
        let called = self.cursor.get();
        let len = self.slot_count();
        if called < len {
            if config::config().strict_hook_order {
                return Err(HookError::HookCountShortfall { called, len });
            }
            tracing::warn!(label = ?self.label, called, len, "render called fewer hooks than stored");
        }
        self.insert_flags(ContextFlags::RENDERED);
        Ok(())
    }

    /// Drop whatever a failed first render left behind.
    ///
    /// Effects that already ran are cleaned up and the partial slots are
    /// discarded, so the next render starts from an empty store. Does
    /// nothing once a first render has completed.
    pub(crate) fn discard_incomplete_render(&self) {
        if self.flags().contains(ContextFlags::RENDERED) {
            return;
        }
        let (cleanups, slots) = {
            let mut store = self.store.borrow_mut();
            (store.take_cleanups(), store.drain())
        };
        self.cursor.set(0);
        if !slots.is_empty() {
            tracing::debug!(label = ?self.label, slots = slots.len(), "first render failed; discarding its slots");
        }
        drop(slots);
        for cleanup in cleanups {
            cleanup();
        }
    }

    /// Register the callback fired by state setters and reducer dispatches.
    pub fn set_rerender_callback(&self, callback: impl Fn() + 'static) {
        let callback: RerenderCallback = Rc::new(callback);
        *self.rerender.borrow_mut() = Some(callback);
    }

    pub fn has_rerender_callback(&self) -> bool {
        self.rerender.borrow().is_some()
    }

    /// Run every stored effect cleanup in registration order.
    ///
    /// The effects are marked suspended, so if the component renders again
    /// they run again regardless of deps.
    pub fn cleanup(&self) {
        let cleanups = self.store.borrow_mut().take_cleanups();
        if !cleanups.is_empty() {
            tracing::debug!(label = ?self.label, count = cleanups.len(), "running effect cleanups");
        }
        for cleanup in cleanups {
            cleanup();
        }
    }

    /// Discard every slot and the rerender callback.
    ///
    /// Effect cleanups are not run. Setters and dispatchers issued before
    /// the clear go stale.
    pub fn clear(&self) {
        let slots = self.store.borrow_mut().drain();
        *self.rerender.borrow_mut() = None;
        self.cursor.set(0);
        self.flags.set(ContextFlags::empty());
        drop(slots);
    }

    // =========================================================================
    // Slot claiming
    // =========================================================================

    fn claim(&self, kind: HookKind) -> HookResult<Claim> {
        let index = self.cursor.get();
        let stored = {
            let store = self.store.borrow();
            (store.kind_at(index), store.len())
        };
        let strict = config::config().strict_hook_order;

        let claim = match stored {
            (Some(found), _) if found == kind => Claim::Existing(index),
            (Some(found), _) => {
                if strict {
                    return Err(HookError::HookOrderViolation {
                        index,
                        expected: found,
                        found: kind,
                    });
                }
                tracing::warn!(label = ?self.label, index, %found, %kind, "hook order changed; resetting slot");
                Claim::Fresh(index)
            }
            (None, len) => {
                if self.flags().contains(ContextFlags::RENDERED) {
                    if strict {
                        return Err(HookError::HookCountExceeded { index, len });
                    }
                    tracing::warn!(label = ?self.label, index, len, "render added a hook after the first render");
                }
                Claim::Fresh(index)
            }
        };

        self.cursor.set(index + 1);
        Ok(claim)
    }

    fn install(&self, index: usize, slot: HookSlot) {
        let replaced = self.store.borrow_mut().install(index, slot);
        if let Some(HookSlot::Effect {
            cleanup: Some(cleanup),
            ..
        }) = replaced
        {
            tracing::debug!(label = ?self.label, index, "effect slot replaced; running its cleanup");
            cleanup();
        }
    }

    /// Shared value of an existing slot, downcast to `V`.
    ///
    /// `Ok(None)` means the value has another type and lenient mode asked for
    /// the slot to be recreated.
    fn downcast_existing<V: Any>(&self, index: usize, kind: HookKind) -> HookResult<Option<Rc<V>>> {
        let shared = self.store.borrow().get(index).and_then(HookSlot::shared_value);
        match shared.map(|value| value.downcast::<V>()) {
            Some(Ok(value)) => Ok(Some(value)),
            _ if config::config().strict_hook_order => Err(HookError::SlotTypeMismatch {
                index,
                kind,
                expected: type_name::<V>(),
            }),
            _ => {
                tracing::warn!(label = ?self.label, index, %kind, "slot value type changed; resetting slot");
                Ok(None)
            }
        }
    }

    /// Claim a `RefCell`-backed slot (state, ref, reducer).
    fn cell_slot<T: 'static>(&self, kind: HookKind, init: impl FnOnce() -> T) -> HookResult<Rc<RefCell<T>>> {
        let index = match self.claim(kind)? {
            Claim::Existing(index) => match self.downcast_existing::<RefCell<T>>(index, kind)? {
                Some(cell) => return Ok(cell),
                None => index,
            },
            Claim::Fresh(index) => index,
        };
        let cell = Rc::new(RefCell::new(init()));
        self.install(index, HookSlot::with_cell(kind, cell.clone()));
        Ok(cell)
    }

    // =========================================================================
    // Hook primitives
    // =========================================================================

    /// Stateful value.
    ///
    /// The first call stores `initial`; later calls ignore it and return the
    /// stored value with a setter bound to the same slot.
    pub fn state<T: Clone + 'static>(&self, initial: T) -> HookResult<(T, Setter<T>)> {
        let cell = self.cell_slot(HookKind::State, move || initial)?;
        let value = cell.borrow().clone();
        Ok((value, Setter::new(&cell, Rc::clone(&self.rerender))))
    }

    /// Side effect gated by `deps`.
    ///
    /// Runs on the first call. Later calls rerun it when `deps` changed (or
    /// is [`Deps::Always`]), running the previous cleanup first. The effect
    /// may return a cleanup, which is kept until the next rerun, `cleanup()`
    /// or a suspend.
    pub fn on_render<F, R>(&self, effect: F, deps: Deps) -> HookResult<()>
    where
        F: FnOnce() -> R,
        R: IntoCleanup,
    {
        let index = match self.claim(HookKind::Effect)? {
            Claim::Existing(index) => {
                let previous_cleanup = {
                    let mut store = self.store.borrow_mut();
                    let Some(HookSlot::Effect {
                        deps: previous,
                        cleanup,
                        suspended,
                    }) = store.get_mut(index)
                    else {
                        return Ok(());
                    };
                    if !*suspended && !deps.changed_since(previous) {
                        return Ok(());
                    }
                    *previous = deps;
                    *suspended = false;
                    cleanup.take()
                };
                tracing::trace!(label = ?self.label, index, "effect deps changed; rerunning");
                if let Some(cleanup) = previous_cleanup {
                    cleanup();
                }
                index
            }
            Claim::Fresh(index) => {
                self.install(
                    index,
                    HookSlot::Effect {
                        deps,
                        cleanup: None,
                        suspended: false,
                    },
                );
                index
            }
        };

        let new_cleanup = effect().into_cleanup();
        let mut store = self.store.borrow_mut();
        match store.get_mut(index) {
            Some(HookSlot::Effect { cleanup, .. }) => *cleanup = new_cleanup,
            _ => tracing::debug!(label = ?self.label, index, "effect slot discarded while the effect ran"),
        }
        Ok(())
    }

    /// Cached computation, recomputed only when `deps` changes.
    pub fn memo<T, F>(&self, compute: F, deps: Deps) -> HookResult<T>
    where
        T: Clone + 'static,
        F: FnOnce() -> T,
    {
        let index = match self.claim(HookKind::Memo)? {
            Claim::Existing(index) => {
                let changed = match self.store.borrow().get(index) {
                    Some(HookSlot::Memo { deps: previous, .. }) => deps.changed_since(previous),
                    _ => true,
                };
                match self.downcast_existing::<T>(index, HookKind::Memo)? {
                    Some(cached) if !changed => return Ok((*cached).clone()),
                    _ => index,
                }
            }
            Claim::Fresh(index) => index,
        };

        let value = compute();
        self.install(
            index,
            HookSlot::Memo {
                deps,
                value: Rc::new(value.clone()),
            },
        );
        Ok(value)
    }

    /// Memoized function value: the same `Rc` comes back while `deps` is unchanged.
    pub fn callback<F: 'static>(&self, f: F, deps: Deps) -> HookResult<Rc<F>> {
        self.memo(move || Rc::new(f), deps)
    }

    /// Mutable box created once and returned by identity on every render.
    pub fn mutable_ref<T: 'static>(&self, initial: T) -> HookResult<MutableRef<T>> {
        let cell = self.cell_slot(HookKind::Ref, move || initial)?;
        Ok(MutableRef::new(cell))
    }

    /// Reducer-managed state.
    ///
    /// `dispatch(action)` applies `reducer(state, action)` immediately and
    /// fires the rerender callback, exactly like a state setter.
    pub fn reducer<S, A, F>(&self, reducer: F, initial: S) -> HookResult<(S, Dispatch<S, A>)>
    where
        S: Clone + 'static,
        A: 'static,
        F: Fn(&S, A) -> S + 'static,
    {
        let cell = self.cell_slot(HookKind::Reducer, move || initial)?;
        let state = cell.borrow().clone();
        let dispatch = Dispatch::new(&cell, Rc::new(reducer), Rc::clone(&self.rerender));
        Ok((state, dispatch))
    }
}

impl Suspendable for HookContext {
    fn suspend_effects(&self) {
        tracing::debug!(label = ?self.label, "suspending effects");
        self.cleanup();
        self.insert_flags(ContextFlags::SUSPENDED);
    }
}

// =============================================================================
// Tests
// =============================================================================
