//! Hook slots - the persistent storage behind each hook call site.
//!
//! A slot is identified only by its position in the render's call sequence.
//! Each slot is tagged with the kind of hook that created it, so a render
//! that calls hooks in a different order is detected instead of handing back
//! a value of the wrong shape.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use super::deps::Deps;

/// Cleanup function returned by an effect.
pub type Cleanup = Box<dyn FnOnce()>;

/// Conversion from an effect's return value to an optional cleanup.
///
/// Effects may return nothing, a [`Cleanup`], or an `Option<Cleanup>`.
pub trait IntoCleanup {
    fn into_cleanup(self) -> Option<Cleanup>;
}

impl IntoCleanup for () {
    fn into_cleanup(self) -> Option<Cleanup> {
        None
    }
}

impl IntoCleanup for Cleanup {
    fn into_cleanup(self) -> Option<Cleanup> {
        Some(self)
    }
}

impl IntoCleanup for Option<Cleanup> {
    fn into_cleanup(self) -> Option<Cleanup> {
        self
    }
}

// =============================================================================
// Slot Kinds
// =============================================================================

/// Which hook created a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    State,
    Effect,
    Memo,
    Ref,
    Reducer,
}

impl HookKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            HookKind::State => "state",
            HookKind::Effect => "effect",
            HookKind::Memo => "memo",
            HookKind::Ref => "ref",
            HookKind::Reducer => "reducer",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One slot.
///
/// State, Ref and Reducer slots hold an `Rc<RefCell<T>>` behind `dyn Any`;
/// setters, dispatchers and refs hold handles to that cell. Memo slots hold
/// an `Rc<T>`.
pub enum HookSlot {
    State {
        value: Rc<dyn Any>,
    },
    Effect {
        deps: Deps,
        cleanup: Option<Cleanup>,
        /// Cleanup already ran because the component was suspended; the
        /// effect reruns on the next render whatever its deps say.
        suspended: bool,
    },
    Memo {
        deps: Deps,
        value: Rc<dyn Any>,
    },
    Ref {
        value: Rc<dyn Any>,
    },
    Reducer {
        state: Rc<dyn Any>,
    },
}

impl HookSlot {
    pub fn kind(&self) -> HookKind {
        match self {
            HookSlot::State { .. } => HookKind::State,
            HookSlot::Effect { .. } => HookKind::Effect,
            HookSlot::Memo { .. } => HookKind::Memo,
            HookSlot::Ref { .. } => HookKind::Ref,
            HookSlot::Reducer { .. } => HookKind::Reducer,
        }
    }

    /// Shared value handle for value-carrying slots (everything but Effect).
    pub fn shared_value(&self) -> Option<Rc<dyn Any>> {
        match self {
            HookSlot::State { value } | HookSlot::Ref { value } => Some(Rc::clone(value)),
            HookSlot::Memo { value, .. } => Some(Rc::clone(value)),
            HookSlot::Reducer { state } => Some(Rc::clone(state)),
            HookSlot::Effect { .. } => None,
        }
    }

    /// Build a cell-backed slot of the given kind.
    pub(crate) fn with_cell(kind: HookKind, value: Rc<dyn Any>) -> Self {
        match kind {
            HookKind::Ref => HookSlot::Ref { value },
            HookKind::Reducer => HookSlot::Reducer { state: value },
            _ => HookSlot::State { value },
        }
    }
}

impl fmt::Debug for HookSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HookSlot::Effect {
                deps,
                cleanup,
                suspended,
            } => f
                .debug_struct("Effect")
                .field("deps", deps)
                .field("has_cleanup", &cleanup.is_some())
                .field("suspended", suspended)
                .finish(),
            HookSlot::Memo { deps, .. } => f.debug_struct("Memo").field("deps", deps).finish(),
            other => f.write_str(other.kind().as_str()),
        }
    }
}

// =============================================================================
// Slot Store
// =============================================================================

/// Ordered, per-instance slot storage indexed by call position.
///
/// Slots are appended during a component's first render; later renders only
/// read and overwrite existing slots by index.
#[derive(Debug, Default)]
pub struct HookSlotStore {
    slots: Vec<HookSlot>,
}

impl HookSlotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&HookSlot> {
        self.slots.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut HookSlot> {
        self.slots.get_mut(index)
    }

    /// Kind of the slot at `index`.
    pub fn kind_at(&self, index: usize) -> Option<HookKind> {
        self.slots.get(index).map(HookSlot::kind)
    }

    /// Place `slot` at `index`: append when `index == len`, replace otherwise.
    ///
    /// Returns the replaced slot, if any.
    pub fn install(&mut self, index: usize, slot: HookSlot) -> Option<HookSlot> {
        if index < self.slots.len() {
            Some(std::mem::replace(&mut self.slots[index], slot))
        } else {
            debug_assert_eq!(index, self.slots.len(), "slots are appended in call order");
            self.slots.push(slot);
            None
        }
    }

    /// Take every pending effect cleanup in registration order and mark
    /// those effects suspended.
    pub fn take_cleanups(&mut self) -> Vec<Cleanup> {
        let mut cleanups = Vec::new();
        for slot in &mut self.slots {
            if let HookSlot::Effect {
                cleanup, suspended, ..
            } = slot
            {
                *suspended = true;
                if let Some(cleanup) = cleanup.take() {
                    cleanups.push(cleanup);
                }
            }
        }
        cleanups
    }

    /// Remove every slot, handing them back so they can be dropped outside
    /// any borrow.
    pub fn drain(&mut self) -> Vec<HookSlot> {
        std::mem::take(&mut self.slots)
    }

    pub fn kinds(&self) -> Vec<HookKind> {
        self.slots.iter().map(HookSlot::kind).collect()
    }
}
