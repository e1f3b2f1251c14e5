//! Driver-facing state the hook facade reads from.
//!
//! - **terminal** - terminal size signal refreshed by the driver
//! - **exit** - the running flag shared with the event loop

pub mod exit;
pub mod terminal;

pub use exit::{ExitHandle, exit_handle, reset_exit};
pub use terminal::{
    TerminalSize, apply_resize, detect_terminal_size, reset_terminal_size, set_terminal_size,
    terminal_size, terminal_size_signal,
};
