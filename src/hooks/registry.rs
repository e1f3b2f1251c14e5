//! Hook Registry - the current context and the id → context map.
//!
//! Two independent pieces of state:
//!
//! - **current**: the context hook calls resolve to. Only `with_context`
//!   changes it while rendering, swapping it like a call stack and restoring
//!   it on every exit path (including errors and panics).
//! - **contexts**: persistent contexts keyed by stable component id, so a
//!   component keeps its hook state across separate top-level renders.
//!
//! [`HookRegistry`] can be owned and passed around explicitly. The free
//! functions in this module operate on a per-thread registry, which is what
//! the hook facade resolves against.
//!
//! # Example
//!
//! ```ignore
//! use spark_hooks::hooks::{registry, use_state};
//!
//! let ctx = registry::get_or_create_context("counter");
//! let count = registry::with_context(&ctx, || {
//!     let (count, _set) = use_state(0)?;
//!     Ok(count)
//! })?;
//! ```

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use super::context::{ContextFlags, HookContext};
use crate::config;
use crate::error::{HookError, HookResult};

/// Current-context pointer plus the persistent context map.
#[derive(Debug, Default)]
pub struct HookRegistry {
    current: RefCell<Option<Rc<HookContext>>>,
    contexts: RefCell<HashMap<String, Rc<HookContext>>>,
    depth: Cell<usize>,
}

/// Restores the previous current context when a `with_context` scope ends.
struct ScopeGuard<'a> {
    registry: &'a HookRegistry,
    context: Rc<HookContext>,
    previous: Option<Rc<HookContext>>,
    completed: bool,
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.context.remove_flags(ContextFlags::RENDERING);
        if !self.completed {
            self.context.discard_incomplete_render();
        }
        *self.registry.current.borrow_mut() = self.previous.take();
        self.registry.depth.set(self.registry.depth.get() - 1);
    }
}

impl HookRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Current Context
    // =========================================================================

    /// Replace the current context directly (bootstrap and teardown only).
    pub fn set_current(&self, context: Option<Rc<HookContext>>) -> HookResult<()> {
        if self.is_rendering() {
            return Err(HookError::ScopeActive {
                operation: "set_current",
            });
        }
        *self.current.borrow_mut() = context;
        Ok(())
    }

    /// The current context, or `MissingContext`.
    pub fn get_current(&self) -> HookResult<Rc<HookContext>> {
        self.current_for("get_current")
    }

    /// Like [`get_current`](Self::get_current), naming the calling operation in the error.
    pub fn current_for(&self, operation: &'static str) -> HookResult<Rc<HookContext>> {
        self.current
            .borrow()
            .clone()
            .ok_or_else(|| HookError::missing_context(operation))
    }

    pub fn has_current(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Whether a `with_context` scope is active.
    pub fn is_rendering(&self) -> bool {
        self.depth.get() > 0
    }

    /// Current `with_context` nesting depth.
    pub fn depth(&self) -> usize {
        self.depth.get()
    }

    /// Render `f` with `context` current.
    ///
    /// Saves the current pointer, resets `context` for a new render, installs
    /// it, runs `f` and restores the saved pointer whatever happens.
    ///
    /// A first render that returns `Err` or panics leaves no slots behind.
    pub fn with_context<R>(
        &self,
        context: &Rc<HookContext>,
        f: impl FnOnce() -> HookResult<R>,
    ) -> HookResult<R> {
        let depth = self.depth.get() + 1;
        let max = config::config().max_nesting_depth;
        if depth > max {
            return Err(HookError::NestingTooDeep { depth, max });
        }

        context.reset_for_render();
        context.insert_flags(ContextFlags::RENDERING);
        let previous = self.current.replace(Some(Rc::clone(context)));
        self.depth.set(depth);
        let mut guard = ScopeGuard {
            registry: self,
            context: Rc::clone(context),
            previous,
            completed: false,
        };

        let output = f()?;
        guard.completed = true;
        context.insert_flags(ContextFlags::RENDERED);
        Ok(output)
    }

    // =========================================================================
    // Context Map
    // =========================================================================

    /// Create a fresh context for `id`, replacing any existing one.
    pub fn create_context(&self, id: &str) -> Rc<HookContext> {
        let context = Rc::new(HookContext::with_label(id));
        let replaced = self
            .contexts
            .borrow_mut()
            .insert(id.to_string(), Rc::clone(&context));
        if replaced.is_some() {
            tracing::debug!(id, "replaced existing hook context");
        } else {
            tracing::trace!(id, "created hook context");
        }
        context
    }

    pub fn get_context(&self, id: &str) -> Option<Rc<HookContext>> {
        self.contexts.borrow().get(id).cloned()
    }

    /// Existing context for `id`, or a newly created one.
    pub fn get_or_create_context(&self, id: &str) -> Rc<HookContext> {
        match self.get_context(id) {
            Some(context) => context,
            None => self.create_context(id),
        }
    }

    /// Forget the context for `id` and hand it back.
    ///
    /// The context itself is untouched; call `cleanup()` on it for a full
    /// unmount.
    pub fn remove_context(&self, id: &str) -> Option<Rc<HookContext>> {
        let removed = self.contexts.borrow_mut().remove(id);
        if removed.is_some() {
            tracing::trace!(id, "removed hook context");
        }
        removed
    }

    pub fn contains(&self, id: &str) -> bool {
        self.contexts.borrow().contains_key(id)
    }

    /// Registered ids, sorted.
    pub fn context_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.contexts.borrow().keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Drop the current pointer and every registered context.
    pub fn clear_all(&self) -> HookResult<()> {
        if self.is_rendering() {
            return Err(HookError::ScopeActive {
                operation: "clear_all",
            });
        }
        *self.current.borrow_mut() = None;
        let contexts = std::mem::take(&mut *self.contexts.borrow_mut());
        tracing::debug!(count = contexts.len(), "cleared hook registry");
        drop(contexts);
        Ok(())
    }
}

// =============================================================================
// Thread Registry
// =============================================================================

thread_local! {
    static REGISTRY: HookRegistry = HookRegistry::new();
}

/// Run `f` against this thread's registry.
pub fn with_registry<R>(f: impl FnOnce(&HookRegistry) -> R) -> R {
    REGISTRY.with(f)
}

pub fn set_current(context: Option<Rc<HookContext>>) -> HookResult<()> {
    REGISTRY.with(|r| r.set_current(context))
}

pub fn get_current() -> HookResult<Rc<HookContext>> {
    REGISTRY.with(|r| r.get_current())
}

pub(crate) fn current_for(operation: &'static str) -> HookResult<Rc<HookContext>> {
    REGISTRY.with(|r| r.current_for(operation))
}

pub fn has_current() -> bool {
    REGISTRY.with(|r| r.has_current())
}

pub fn with_context<R>(
    context: &Rc<HookContext>,
    f: impl FnOnce() -> HookResult<R>,
) -> HookResult<R> {
    REGISTRY.with(|r| r.with_context(context, f))
}

pub fn create_context(id: &str) -> Rc<HookContext> {
    REGISTRY.with(|r| r.create_context(id))
}

pub fn get_context(id: &str) -> Option<Rc<HookContext>> {
    REGISTRY.with(|r| r.get_context(id))
}

pub fn get_or_create_context(id: &str) -> Rc<HookContext> {
    REGISTRY.with(|r| r.get_or_create_context(id))
}

pub fn remove_context(id: &str) -> Option<Rc<HookContext>> {
    REGISTRY.with(|r| r.remove_context(id))
}

/// Remove the context for `id` and run its effect cleanups.
pub fn unmount_context(id: &str) -> HookResult<()> {
    let context = remove_context(id).ok_or_else(|| HookError::not_found(id))?;
    context.cleanup();
    Ok(())
}

pub fn clear_all() -> HookResult<()> {
    REGISTRY.with(|r| r.clear_all())
}

// =============================================================================
// Tests
// =============================================================================
