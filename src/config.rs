//! Runtime configuration.
//!
//! Configuration is per thread, like the rest of the framework's render state.
//! Install it once at bootstrap with [`configure`].

use std::cell::RefCell;

/// Hook runtime options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HooksConfig {
    /// Fail with a structural error when a slot's kind or type changes
    /// between renders. When false the slot is reinitialised and a warning
    /// is logged.
    pub strict_hook_order: bool,
    /// Maximum `with_context` nesting depth.
    pub max_nesting_depth: usize,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            strict_hook_order: true,
            max_nesting_depth: 256,
        }
    }
}

impl HooksConfig {
    /// Lenient configuration: mismatched slots are reset instead of failing.
    pub fn lenient() -> Self {
        Self {
            strict_hook_order: false,
            ..Self::default()
        }
    }

    /// Builder-style override for the nesting limit
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}

thread_local! {
    static CONFIG: RefCell<HooksConfig> = RefCell::new(HooksConfig::default());
}

/// Install the configuration for this thread.
pub fn configure(config: HooksConfig) {
    tracing::debug!(?config, "hooks runtime configured");
    CONFIG.with(|c| *c.borrow_mut() = config);
}

/// Current configuration for this thread.
pub fn config() -> HooksConfig {
    CONFIG.with(|c| c.borrow().clone())
}

/// Restore defaults.
pub fn reset_config() {
    CONFIG.with(|c| *c.borrow_mut() = HooksConfig::default());
}
