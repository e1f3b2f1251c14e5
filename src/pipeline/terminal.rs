//! Terminal size read by `use_terminal_size`.
//!
//! One signal holds both dimensions so a resize is a single change. The
//! driver seeds it with [`detect_terminal_size`] and keeps it current by
//! passing every crossterm event through [`apply_resize`].

use crossterm::event::Event as CrosstermEvent;
use spark_signals::{Signal, signal};

use crate::error::HookResult;

/// Terminal dimensions in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub width: u16,
    pub height: u16,
}

impl TerminalSize {
    /// Size assumed until the driver reports the real one.
    pub const FALLBACK: Self = Self {
        width: 80,
        height: 24,
    };

    pub fn as_tuple(self) -> (u16, u16) {
        (self.width, self.height)
    }
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self::FALLBACK
    }
}

thread_local! {
    static TERMINAL_SIZE: Signal<TerminalSize> = signal(TerminalSize::FALLBACK);
}

/// Last size the driver reported.
pub fn terminal_size() -> TerminalSize {
    TERMINAL_SIZE.with(|size| size.get())
}

/// Record a new size. Unchanged sizes are ignored.
pub fn set_terminal_size(width: u16, height: u16) {
    let next = TerminalSize { width, height };
    if terminal_size() == next {
        return;
    }
    tracing::trace!(width, height, "terminal resized");
    TERMINAL_SIZE.with(|size| size.set(next));
}

/// Signal handle for code that tracks the size reactively.
pub fn terminal_size_signal() -> Signal<TerminalSize> {
    TERMINAL_SIZE.with(|size| size.clone())
}

/// Update the size from a resize event. Returns whether `event` was one.
pub fn apply_resize(event: &CrosstermEvent) -> bool {
    match *event {
        CrosstermEvent::Resize(width, height) => {
            set_terminal_size(width, height);
            true
        }
        _ => false,
    }
}

/// Query the real terminal and record its size.
pub fn detect_terminal_size() -> HookResult<TerminalSize> {
    let (width, height) = crossterm::terminal::size()?;
    set_terminal_size(width, height);
    Ok(TerminalSize { width, height })
}

/// Back to the fallback size (for testing).
pub fn reset_terminal_size() {
    TERMINAL_SIZE.with(|size| size.set(TerminalSize::FALLBACK));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent};

    #[test]
    fn test_fallback_until_reported() {
        reset_terminal_size();
        assert_eq!(terminal_size().as_tuple(), (80, 24));

        set_terminal_size(120, 40);
        assert_eq!(terminal_size(), TerminalSize { width: 120, height: 40 });
        reset_terminal_size();
    }

    #[test]
    fn test_resize_events_update_signal() {
        reset_terminal_size();
        let tracked = terminal_size_signal();

        assert!(apply_resize(&CrosstermEvent::Resize(100, 30)));
        assert_eq!(tracked.get().as_tuple(), (100, 30));

        let key = CrosstermEvent::Key(KeyEvent::from(KeyCode::Char('q')));
        assert!(!apply_resize(&key));
        assert_eq!(terminal_size().as_tuple(), (100, 30));
        reset_terminal_size();
    }
}
