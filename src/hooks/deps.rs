//! Dependency lists for effect, memo and callback hooks.
//!
//! A deps list is compared elementwise against the snapshot taken the last
//! time the hook did its work:
//!
//! - [`Deps::Always`] (deps omitted): the hook redoes its work every render
//! - [`Deps::once()`] (empty list): the hook does its work on the first render only
//! - [`Deps::Values`]: the hook redoes its work when any element changed
//!
//! ```ignore
//! use spark_hooks::deps;
//!
//! use_effect(move || subscribe(channel), deps![channel_id, "inbox"])?;
//! ```

use std::fmt;

/// One comparable dependency value.
#[derive(Debug, Clone, PartialEq)]
pub enum DepValue {
    Unit,
    Bool(bool),
    Int(i64),
    UInt(u64),
    /// IEEE equality: NaN never equals itself, so a NaN dep always counts as changed.
    Float(f64),
    Char(char),
    Str(String),
}

impl fmt::Display for DepValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DepValue::Unit => write!(f, "()"),
            DepValue::Bool(v) => write!(f, "{v}"),
            DepValue::Int(v) => write!(f, "{v}"),
            DepValue::UInt(v) => write!(f, "{v}"),
            DepValue::Float(v) => write!(f, "{v}"),
            DepValue::Char(v) => write!(f, "{v:?}"),
            DepValue::Str(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<()> for DepValue {
    fn from(_: ()) -> Self {
        DepValue::Unit
    }
}

impl From<bool> for DepValue {
    fn from(v: bool) -> Self {
        DepValue::Bool(v)
    }
}

macro_rules! dep_from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for DepValue {
            fn from(v: $t) -> Self {
                DepValue::Int(v as i64)
            }
        })*
    };
}

macro_rules! dep_from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for DepValue {
            fn from(v: $t) -> Self {
                DepValue::UInt(v as u64)
            }
        })*
    };
}

dep_from_signed!(i8, i16, i32, i64, isize);
dep_from_unsigned!(u8, u16, u32, u64, usize);

impl From<f32> for DepValue {
    fn from(v: f32) -> Self {
        DepValue::Float(v as f64)
    }
}

impl From<f64> for DepValue {
    fn from(v: f64) -> Self {
        DepValue::Float(v)
    }
}

impl From<char> for DepValue {
    fn from(v: char) -> Self {
        DepValue::Char(v)
    }
}

impl From<&str> for DepValue {
    fn from(v: &str) -> Self {
        DepValue::Str(v.to_string())
    }
}

impl From<String> for DepValue {
    fn from(v: String) -> Self {
        DepValue::Str(v)
    }
}

impl From<&String> for DepValue {
    fn from(v: &String) -> Self {
        DepValue::Str(v.clone())
    }
}

/// Dependency list passed to a hook.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Deps {
    /// Deps omitted: rerun on every render.
    #[default]
    Always,
    /// Explicit list; an empty list runs once.
    Values(Vec<DepValue>),
}

impl Deps {
    /// Empty deps: run on the first render only.
    pub fn once() -> Self {
        Deps::Values(Vec::new())
    }

    /// Build an explicit list from anything convertible to [`DepValue`].
    pub fn from_values<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<DepValue>,
    {
        Deps::Values(values.into_iter().map(Into::into).collect())
    }

    pub fn is_always(&self) -> bool {
        matches!(self, Deps::Always)
    }

    /// Whether a hook holding `previous` must redo its work for `self`.
    ///
    /// `Always` on either side counts as changed. Lists of different length
    /// are changed; otherwise elements are compared pairwise.
    pub fn changed_since(&self, previous: &Deps) -> bool {
        match (self, previous) {
            (Deps::Values(next), Deps::Values(prev)) => {
                next.len() != prev.len() || next.iter().zip(prev).any(|(a, b)| a != b)
            }
            _ => true,
        }
    }
}

/// Build a [`Deps::Values`] list.
///
/// `deps![]` is the run-once list.
#[macro_export]
macro_rules! deps {
    () => {
        $crate::hooks::Deps::once()
    };
    ($($value:expr),+ $(,)?) => {
        $crate::hooks::Deps::Values(vec![$($crate::hooks::DepValue::from($value)),+])
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_values_unchanged() {
        let prev = deps![1, 2];
        assert!(!deps![1, 2].changed_since(&prev));
        assert!(deps![1, 3].changed_since(&prev));
    }

    #[test]
    fn test_always_is_changed() {
        assert!(Deps::Always.changed_since(&Deps::Always));
        assert!(Deps::Always.changed_since(&deps![1]));
        assert!(deps![1].changed_since(&Deps::Always));
    }

    #[test]
    fn test_empty_list_never_changes() {
        assert!(!Deps::once().changed_since(&Deps::once()));
        assert_eq!(deps![], Deps::once());
    }

    #[test]
    fn test_length_change() {
        assert!(deps![1, 2, 3].changed_since(&deps![1, 2]));
        assert!(deps![1].changed_since(&deps![1, 2]));
    }

    #[test]
    fn test_mixed_values() {
        let prev = deps!["inbox", true, 'x', 2.5];
        assert!(!deps!["inbox", true, 'x', 2.5].changed_since(&prev));
        assert!(deps!["outbox", true, 'x', 2.5].changed_since(&prev));
    }

    #[test]
    fn test_nan_always_changed() {
        let prev = deps![f64::NAN];
        assert!(deps![f64::NAN].changed_since(&prev));
    }

    #[test]
    fn test_signed_and_unsigned_are_distinct() {
        assert!(deps![1i32].changed_since(&deps![1u32]));
    }

    #[test]
    fn test_from_values() {
        let ids = vec!["a".to_string(), "b".to_string()];
        assert_eq!(Deps::from_values(&ids), deps!["a", "b"]);
    }
}
