//! Hooks Runtime
//!
//! Gives repeatedly-invoked render functions stable stateful primitives
//! whose identity comes from call order:
//!
//! - **Slots** - tagged per-call-site storage ([`HookSlotStore`])
//! - **Context** - slots + cursor + rerender callback for one component ([`HookContext`])
//! - **Registry** - current context and id → context map ([`HookRegistry`])
//! - **Tracker** - detects components dropped between full-tree renders ([`RenderCycleTracker`])
//! - **Facade** - `use_*` functions resolving the current context
//!
//! # Data Flow
//!
//! ```text
//! driver → get_or_create_context(id) → with_context(ctx, render) → use_* hooks
//!        └→ begin_cycle / track_component / end_cycle (once per full-tree render)
//! ```
//!
//! Everything here is single-threaded and synchronous: no hook suspends, and
//! each setter call fires the rerender callback exactly once.

mod api;
mod context;
mod deps;
mod handles;
pub mod provide;
pub mod registry;
mod slot;
pub mod tracker;

pub use api::*;
pub use context::{ContextFlags, HookContext};
pub use deps::{DepValue, Deps};
pub use handles::{Dispatch, MutableRef, RerenderCallback, SetStateAction, Setter};
pub use provide::{provide, reset_provided, unprovide};
pub use registry::{
    HookRegistry, clear_all, create_context, get_context, get_current, get_or_create_context,
    has_current, remove_context, set_current, unmount_context, with_context, with_registry,
};
pub use slot::{Cleanup, HookKind, HookSlot, HookSlotStore, IntoCleanup};
pub use tracker::{
    CycleState, RenderCycleTracker, Suspendable, begin_cycle, end_cycle, reset_cycle_tracker,
    track_component, tracked_count,
};
