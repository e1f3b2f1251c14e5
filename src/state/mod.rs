//! State Module - runtime state the hook facade exposes to components
//!
//! - **Focus** - focused index and focus/blur callbacks

pub mod focus;

pub use focus::{FocusCallbacks, blur, focus, focused_index, has_focus, is_focused, register_callbacks, reset_focus_state};
