//! Hook facade - the functions component authors call.
//!
//! Every function resolves this thread's current context and forwards to
//! [`HookContext`]. Outside a render they fail with
//! [`HookError::MissingContext`].
//!
//! # Example
//!
//! ```ignore
//! use spark_hooks::{deps, hooks::*};
//!
//! fn counter() -> HookResult<String> {
//!     let (count, set_count) = use_state(0)?;
//!     let ticks = use_ref(0u64)?;
//!
//!     use_effect(move || {
//!         let timer = start_timer(move || set_count.update(|c| c + 1));
//!         Box::new(move || timer.cancel()) as Cleanup
//!     }, deps![])?;
//!
//!     *ticks.borrow_mut() += 1;
//!     Ok(format!("count: {count}"))
//! }
//!
//! begin_cycle();
//! let line = render_component("counter", schedule_redraw, counter)?;
//! end_cycle();
//! ```

use std::rc::Rc;

use super::context::HookContext;
use super::deps::Deps;
use super::handles::{Dispatch, MutableRef, Setter};
use super::registry;
use super::slot::IntoCleanup;
use super::tracker;
use crate::error::HookResult;
use crate::pipeline::{ExitHandle, exit_handle, terminal_size};
use crate::state::focus;

fn current(operation: &'static str) -> HookResult<Rc<HookContext>> {
    registry::current_for(operation)
}

// =============================================================================
// Hook Primitives
// =============================================================================

/// See [`HookContext::state`].
pub fn use_state<T: Clone + 'static>(initial: T) -> HookResult<(T, Setter<T>)> {
    current("use_state")?.state(initial)
}

/// See [`HookContext::on_render`].
pub fn use_effect<F, R>(effect: F, deps: Deps) -> HookResult<()>
where
    F: FnOnce() -> R,
    R: IntoCleanup,
{
    current("use_effect")?.on_render(effect, deps)
}

/// See [`HookContext::memo`].
pub fn use_memo<T, F>(compute: F, deps: Deps) -> HookResult<T>
where
    T: Clone + 'static,
    F: FnOnce() -> T,
{
    current("use_memo")?.memo(compute, deps)
}

/// See [`HookContext::callback`].
pub fn use_callback<F: 'static>(f: F, deps: Deps) -> HookResult<Rc<F>> {
    current("use_callback")?.callback(f, deps)
}

/// See [`HookContext::mutable_ref`].
pub fn use_ref<T: 'static>(initial: T) -> HookResult<MutableRef<T>> {
    current("use_ref")?.mutable_ref(initial)
}

/// See [`HookContext::reducer`].
pub fn use_reducer<S, A, F>(reducer: F, initial: S) -> HookResult<(S, Dispatch<S, A>)>
where
    S: Clone + 'static,
    A: 'static,
    F: Fn(&S, A) -> S + 'static,
{
    current("use_reducer")?.reducer(reducer, initial)
}

// =============================================================================
// Render Driver
// =============================================================================

/// Render one component instance.
///
/// Gets or creates the registry context for `id`, installs `rerender` as the
/// callback its setters fire, tracks it in this thread's render cycle, runs
/// `render` with it current and checks the hook count.
pub fn render_component<R>(
    id: &str,
    rerender: impl Fn() + 'static,
    render: impl FnOnce() -> HookResult<R>,
) -> HookResult<R> {
    let context = registry::get_or_create_context(id);
    context.set_rerender_callback(rerender);
    tracker::track_component(&context);
    let output = registry::with_context(&context, render)?;
    context.finish_render()?;
    Ok(output)
}

// =============================================================================
// Framework Conveniences
// =============================================================================

/// Terminal size as `(width, height)`.
pub fn use_terminal_size() -> HookResult<(u16, u16)> {
    current("use_terminal_size")?;
    Ok(terminal_size().as_tuple())
}

/// Whether the component at `index` holds focus.
pub fn use_focus(index: usize) -> HookResult<bool> {
    current("use_focus")?;
    Ok(focus::is_focused(index))
}

/// Handle that stops the application loop.
pub fn use_exit() -> HookResult<ExitHandle> {
    current("use_exit")?;
    Ok(exit_handle())
}

/// Service registered with [`provide`](super::provide::provide), if any.
pub fn use_provided<T: Clone + 'static>() -> HookResult<Option<T>> {
    current("use_provided")?;
    Ok(super::provide::lookup::<T>())
}

// =============================================================================
// Tests
// =============================================================================
