//! Handles returned by hooks: state setters, reducer dispatchers and refs.
//!
//! Setters and dispatchers hold weak handles to their slot. Once the owning
//! context is cleared the slot is gone and the handle goes stale: calls are
//! logged and ignored.

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::{Rc, Weak};

/// Callback the surrounding driver registers to hear about state changes.
pub type RerenderCallback = Rc<dyn Fn()>;

/// Shared cell holding a context's rerender callback.
pub(crate) type RerenderCell = Rc<RefCell<Option<RerenderCallback>>>;

/// Fire the rerender callback, if one is registered.
///
/// The callback is cloned out first so it may re-enter the context freely.
pub(crate) fn fire_rerender(cell: &RerenderCell) {
    let callback = cell.borrow().clone();
    if let Some(callback) = callback {
        callback();
    }
}

// =============================================================================
// State Setter
// =============================================================================

/// Argument accepted by [`Setter::apply`].
pub enum SetStateAction<T> {
    /// Replace the value.
    Value(T),
    /// Compute the next value from the previous one.
    Update(Box<dyn FnOnce(&T) -> T>),
}

impl<T> From<T> for SetStateAction<T> {
    fn from(value: T) -> Self {
        SetStateAction::Value(value)
    }
}

/// Setter returned by `state()`.
///
/// Every call updates the slot synchronously and then fires the rerender
/// callback exactly once, even when the new value equals the old one.
pub struct Setter<T> {
    cell: Weak<RefCell<T>>,
    rerender: RerenderCell,
}

impl<T> Clone for Setter<T> {
    fn clone(&self) -> Self {
        Self {
            cell: self.cell.clone(),
            rerender: Rc::clone(&self.rerender),
        }
    }
}

impl<T> fmt::Debug for Setter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Setter").field("live", &self.is_live()).finish()
    }
}

impl<T> Setter<T> {
    pub(crate) fn new(cell: &Rc<RefCell<T>>, rerender: RerenderCell) -> Self {
        Self {
            cell: Rc::downgrade(cell),
            rerender,
        }
    }

    /// False once the owning slot has been discarded.
    pub fn is_live(&self) -> bool {
        self.cell.strong_count() > 0
    }

    /// Replace the stored value.
    pub fn set(&self, value: T) {
        let Some(cell) = self.upgrade() else {
            return;
        };
        *cell.borrow_mut() = value;
        fire_rerender(&self.rerender);
    }

    fn upgrade(&self) -> Option<Rc<RefCell<T>>> {
        let cell = self.cell.upgrade();
        if cell.is_none() {
            tracing::warn!("state setter used after its hook context was cleared");
        }
        cell
    }
}

impl<T: Clone> Setter<T> {
    /// Compute the next value from the previous one.
    ///
    /// `f` sees a copy of the value, so it may call this setter itself; its
    /// result is written last.
    pub fn update(&self, f: impl FnOnce(&T) -> T) {
        let Some(cell) = self.upgrade() else {
            return;
        };
        let current = cell.borrow().clone();
        let next = f(&current);
        *cell.borrow_mut() = next;
        fire_rerender(&self.rerender);
    }

    /// Apply a value or an updater.
    pub fn apply(&self, action: impl Into<SetStateAction<T>>) {
        match action.into() {
            SetStateAction::Value(value) => self.set(value),
            SetStateAction::Update(f) => self.update(f),
        }
    }
}

// =============================================================================
// Reducer Dispatch
// =============================================================================

/// Dispatcher returned by `reducer()`.
pub struct Dispatch<S, A> {
    state: Weak<RefCell<S>>,
    reducer: Rc<dyn Fn(&S, A) -> S>,
    rerender: RerenderCell,
}

impl<S, A> Clone for Dispatch<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            reducer: Rc::clone(&self.reducer),
            rerender: Rc::clone(&self.rerender),
        }
    }
}

impl<S, A> fmt::Debug for Dispatch<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch").field("live", &self.is_live()).finish()
    }
}

impl<S, A> Dispatch<S, A> {
    pub(crate) fn new(
        state: &Rc<RefCell<S>>,
        reducer: Rc<dyn Fn(&S, A) -> S>,
        rerender: RerenderCell,
    ) -> Self {
        Self {
            state: Rc::downgrade(state),
            reducer,
            rerender,
        }
    }

    pub fn is_live(&self) -> bool {
        self.state.strong_count() > 0
    }
}

impl<S: Clone, A> Dispatch<S, A> {
    /// Run the reducer on the stored state, store the result and fire the
    /// rerender callback.
    ///
    /// The reducer runs on a copy of the state, so it may dispatch again.
    pub fn dispatch(&self, action: A) {
        let Some(cell) = self.state.upgrade() else {
            tracing::warn!("reducer dispatch used after its hook context was cleared");
            return;
        };
        let current = cell.borrow().clone();
        let next = (self.reducer)(&current, action);
        *cell.borrow_mut() = next;
        fire_rerender(&self.rerender);
    }
}

// =============================================================================
// Mutable Ref
// =============================================================================

/// Mutable box returned by `mutable_ref()`.
///
/// The same box comes back on every render; writes never trigger a rerender.
pub struct MutableRef<T>(Rc<RefCell<T>>);

impl<T> Clone for MutableRef<T> {
    fn clone(&self) -> Self {
        Self(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for MutableRef<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("MutableRef").field(&self.0.borrow()).finish()
    }
}

impl<T> MutableRef<T> {
    pub(crate) fn new(cell: Rc<RefCell<T>>) -> Self {
        Self(cell)
    }

    /// Clone of the current value.
    pub fn current(&self) -> T
    where
        T: Clone,
    {
        self.0.borrow().clone()
    }

    pub fn set_current(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Same box?
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}
