//! Hook runtime errors.

use std::io;
use thiserror::Error;

use crate::hooks::HookKind;

/// Errors raised by hook primitives, the registry and the facade.
#[derive(Debug, Error)]
pub enum HookError {
    /// A hook ran while no context was current.
    #[error("no current hook context (called {operation} outside a component render)")]
    MissingContext {
        /// The operation that needed a context
        operation: &'static str,
    },

    /// The slot at `index` belongs to a different hook kind.
    #[error("hook order changed at slot {index}: slot holds {expected}, render called {found}")]
    HookOrderViolation {
        index: usize,
        /// Kind stored in the slot
        expected: HookKind,
        /// Kind requested by this render
        found: HookKind,
    },

    /// A re-render called more hooks than the first render created.
    #[error("render called hook #{index} but the first render only created {len} slots")]
    HookCountExceeded { index: usize, len: usize },

    /// A re-render called fewer hooks than the first render created.
    #[error("render called {called} hooks but the context holds {len} slots")]
    HookCountShortfall { called: usize, len: usize },

    /// Same hook kind, different value type.
    #[error("{kind} slot {index} does not hold a value of type {expected}")]
    SlotTypeMismatch {
        index: usize,
        kind: HookKind,
        expected: &'static str,
    },

    /// Bootstrap-only registry mutation attempted while rendering.
    #[error("{operation} is not allowed inside an active with_context scope")]
    ScopeActive { operation: &'static str },

    /// Nested renders went deeper than the configured maximum.
    #[error("with_context nesting depth {depth} exceeds maximum {max}")]
    NestingTooDeep { depth: usize, max: usize },

    /// No context is registered under this id.
    #[error("no hook context registered for component '{id}'")]
    ContextNotFound { id: String },

    /// Terminal probing failed.
    #[error("terminal error: {0}")]
    Io(#[from] io::Error),
}

/// Specialized Result type for hook operations
pub type HookResult<T> = Result<T, HookError>;

impl HookError {
    /// Create a missing context error
    pub fn missing_context(operation: &'static str) -> Self {
        Self::MissingContext { operation }
    }

    /// Create a context-not-found error
    pub fn not_found(id: impl Into<String>) -> Self {
        Self::ContextNotFound { id: id.into() }
    }

    /// True for errors caused by hook call order or shape changing between renders
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::HookOrderViolation { .. }
                | Self::HookCountExceeded { .. }
                | Self::HookCountShortfall { .. }
                | Self::SlotTypeMismatch { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_classification() {
        let err = HookError::HookOrderViolation {
            index: 2,
            expected: HookKind::State,
            found: HookKind::Effect,
        };
        assert!(err.is_structural());
        assert!(!HookError::missing_context("use_state").is_structural());
        assert!(!HookError::not_found("app").is_structural());
    }

    #[test]
    fn test_messages() {
        let err = HookError::HookOrderViolation {
            index: 1,
            expected: HookKind::Memo,
            found: HookKind::Ref,
        };
        assert_eq!(
            err.to_string(),
            "hook order changed at slot 1: slot holds memo, render called ref"
        );
        assert_eq!(
            HookError::not_found("list").to_string(),
            "no hook context registered for component 'list'"
        );
    }
}
