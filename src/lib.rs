//! # spark-hooks
//!
//! Hooks runtime for the spark-tui component framework.
//!
//! Render functions are called again and again; hooks give them stable state
//! that is identified by call order rather than by name:
//!
//! ```ignore
//! use spark_hooks::prelude::*;
//!
//! fn greeting() -> HookResult<String> {
//!     let (name, set_name) = use_state(String::from("world"))?;
//!     let shout = use_memo(|| name.to_uppercase(), deps![name.clone()])?;
//!     Ok(format!("hello {shout}"))
//! }
//!
//! begin_cycle();
//! let line = render_component("greeting", schedule_redraw, greeting)?;
//! end_cycle();
//! ```
//!
//! ## Modules
//!
//! - [`hooks`] - slot store, hook context, registry, render-cycle tracker, `use_*` facade
//! - [`pipeline`] - terminal size and exit state the driver feeds in
//! - [`state`] - focus state
//! - [`config`] - per-thread runtime options
//! - [`error`] - [`HookError`]

pub mod config;
pub mod error;
pub mod hooks;
pub mod pipeline;
pub mod state;

pub use config::{HooksConfig, configure};
pub use error::{HookError, HookResult};

pub use hooks::{
    // Primitives
    use_callback, use_effect, use_memo, use_reducer, use_ref, use_state,
    // Conveniences
    use_exit, use_focus, use_provided, use_terminal_size,
    // Driver
    begin_cycle, end_cycle, render_component, track_component,
    // Types
    Cleanup, DepValue, Deps, Dispatch, HookContext, HookKind, HookRegistry, MutableRef,
    RenderCycleTracker, SetStateAction, Setter, Suspendable,
};

/// Everything a component module usually needs.
pub mod prelude {
    pub use crate::deps;
    pub use crate::error::{HookError, HookResult};
    pub use crate::hooks::{
        Cleanup, Deps, Dispatch, MutableRef, SetStateAction, Setter, begin_cycle, end_cycle,
        render_component, use_callback, use_effect, use_exit, use_focus, use_memo, use_provided,
        use_reducer, use_ref, use_state, use_terminal_size,
    };
}
