//! Focus state read by `use_focus`.
//!
//! Holds the focused component index and the focus/blur callbacks. Tab
//! cycling and focus traps belong to the input layer, which drives this
//! module through [`focus`] and [`blur`].
//!
//! # Example
//!
//! ```ignore
//! use spark_hooks::{deps, hooks::use_effect, state::focus};
//!
//! // Register inside an effect so the callbacks go away with the component
//! use_effect(move || focus::register_callbacks(index, FocusCallbacks {
//!     on_focus: Some(Box::new(|| cursor.show())),
//!     on_blur: Some(Box::new(|| cursor.hide())),
//! }), deps![index])?;
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use spark_signals::{Signal, signal};

use crate::hooks::Cleanup;

// =============================================================================
// FOCUSED INDEX SIGNAL
// =============================================================================

thread_local! {
    static FOCUSED_INDEX: Signal<i32> = signal(-1);
}

/// The focused component index, if any.
pub fn focused_index() -> Option<usize> {
    let index = FOCUSED_INDEX.with(|s| s.get());
    usize::try_from(index).ok()
}

/// Check if any component is focused
pub fn has_focus() -> bool {
    focused_index().is_some()
}

/// Check if specific component is focused
pub fn is_focused(index: usize) -> bool {
    focused_index() == Some(index)
}

// =============================================================================
// FOCUS CALLBACKS
// =============================================================================

/// Callbacks fired when focus changes
#[derive(Default)]
pub struct FocusCallbacks {
    pub on_focus: Option<Box<dyn Fn()>>,
    pub on_blur: Option<Box<dyn Fn()>>,
}

thread_local! {
    // Several registrations per index (cursor blink + user callback)
    static FOCUS_CALLBACK_REGISTRY: RefCell<HashMap<usize, Vec<(u64, Rc<FocusCallbacks>)>>> =
        RefCell::new(HashMap::new());
    static NEXT_CALLBACK_ID: RefCell<u64> = const { RefCell::new(0) };
}

/// Register focus callbacks for a component.
///
/// Returns the cleanup that unregisters them, ready to hand back from an
/// effect.
pub fn register_callbacks(index: usize, callbacks: FocusCallbacks) -> Cleanup {
    let id = NEXT_CALLBACK_ID.with(|next| {
        let mut next = next.borrow_mut();
        *next += 1;
        *next
    });
    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow_mut()
            .entry(index)
            .or_default()
            .push((id, Rc::new(callbacks)));
    });

    Box::new(move || {
        FOCUS_CALLBACK_REGISTRY.with(|reg| {
            let mut reg = reg.borrow_mut();
            if let Some(list) = reg.get_mut(&index) {
                list.retain(|(entry, _)| *entry != id);
                if list.is_empty() {
                    reg.remove(&index);
                }
            }
        });
    })
}

fn callbacks_for(index: usize) -> Vec<Rc<FocusCallbacks>> {
    FOCUS_CALLBACK_REGISTRY.with(|reg| {
        reg.borrow()
            .get(&index)
            .map(|list| list.iter().map(|(_, cb)| Rc::clone(cb)).collect())
            .unwrap_or_default()
    })
}

/// Set focus and fire callbacks at the source
fn set_focus_with_callbacks(new_index: Option<usize>) {
    let old_index = focused_index();

    // No change, no callbacks
    if old_index == new_index {
        return;
    }

    // Callbacks are cloned out so they may register or unregister freely
    if let Some(old) = old_index {
        for cb in callbacks_for(old) {
            if let Some(on_blur) = &cb.on_blur {
                on_blur();
            }
        }
    }

    let raw = new_index.map_or(-1, |i| i as i32);
    FOCUSED_INDEX.with(|s| s.set(raw));

    if let Some(new) = new_index {
        for cb in callbacks_for(new) {
            if let Some(on_focus) = &cb.on_focus {
                on_focus();
            }
        }
    }
}

// =============================================================================
// FOCUS CHANGES
// =============================================================================

/// Focus a specific component by index
pub fn focus(index: usize) {
    set_focus_with_callbacks(Some(index));
}

/// Clear focus (no component focused)
pub fn blur() {
    set_focus_with_callbacks(None);
}

/// Reset all focus state (for testing)
pub fn reset_focus_state() {
    set_focus_with_callbacks(None);
    FOCUS_CALLBACK_REGISTRY.with(|reg| reg.borrow_mut().clear());
}

// =============================================================================
// TESTS
// =============================================================================
