//! Exit handle - the application's running flag.
//!
//! The event loop polls [`ExitHandle::is_running`]; any component can stop
//! the loop by calling [`ExitHandle::exit`] on the handle from `use_exit`.

use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Shared running flag.
#[derive(Debug, Clone)]
pub struct ExitHandle {
    running: Arc<AtomicBool>,
}

impl Default for ExitHandle {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitHandle {
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Request shutdown.
    pub fn exit(&self) {
        tracing::debug!("exit requested");
        self.running.store(false, Ordering::SeqCst);
    }

    /// Check if still running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

thread_local! {
    static EXIT: RefCell<ExitHandle> = RefCell::new(ExitHandle::new());
}

/// This thread's exit handle.
pub fn exit_handle() -> ExitHandle {
    EXIT.with(|e| e.borrow().clone())
}

/// Replace this thread's handle with a fresh running one.
pub fn reset_exit() {
    EXIT.with(|e| *e.borrow_mut() = ExitHandle::new());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_shared_between_clones() {
        reset_exit();
        let a = exit_handle();
        let b = exit_handle();
        assert!(a.is_running());

        b.exit();
        assert!(!a.is_running());
        assert!(!exit_handle().is_running());

        reset_exit();
        assert!(exit_handle().is_running());
        assert!(!a.is_running());
    }
}
