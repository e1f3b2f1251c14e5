//! Render Cycle Tracker - detects components dropped from the tree.
//!
//! The driver brackets every full-tree render with [`RenderCycleTracker::begin_cycle`]
//! and [`RenderCycleTracker::end_cycle`], calling
//! [`RenderCycleTracker::track_component`] for each component it renders.
//! Components rendered in the previous cycle but not in this one are asked to
//! suspend their effects.
//!
//! ```text
//! Idle ──begin_cycle──▶ InCycle ──end_cycle──▶ Idle
//! ```
//!
//! Identity is by allocation (`Rc` pointer), not by value. The tracker only
//! holds weak handles: a component dropped by its owner is forgotten, never
//! kept alive or suspended.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::{Rc, Weak};

/// Something whose effects can be suspended when it leaves the tree.
pub trait Suspendable {
    /// Stop and clean up active effects.
    fn suspend_effects(&self);
}

/// Tracker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CycleState {
    #[default]
    Idle,
    InCycle,
}

/// One generation of rendered components, in first-tracked order.
#[derive(Default)]
struct Generation {
    order: Vec<Weak<dyn Suspendable>>,
    keys: HashSet<usize>,
}

impl Generation {
    // A live `Weak` keeps the allocation, so a key is never reused while tracked
    fn key(component: &Weak<dyn Suspendable>) -> usize {
        component.as_ptr() as *const () as usize
    }

    fn insert(&mut self, component: Weak<dyn Suspendable>) {
        if self.keys.insert(Self::key(&component)) {
            self.order.push(component);
        }
    }

    fn contains(&self, component: &Weak<dyn Suspendable>) -> bool {
        self.keys.contains(&Self::key(component))
    }

    fn len(&self) -> usize {
        self.order.len()
    }

    fn clear(&mut self) {
        self.order.clear();
        self.keys.clear();
    }
}

/// Cross-cycle visibility tracker.
#[derive(Default)]
pub struct RenderCycleTracker {
    previously_rendered: Generation,
    currently_rendered: Generation,
    state: CycleState,
}

impl RenderCycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> CycleState {
        self.state
    }

    pub fn is_in_cycle(&self) -> bool {
        self.state == CycleState::InCycle
    }

    /// Components tracked so far in the open cycle.
    pub fn tracked_count(&self) -> usize {
        self.currently_rendered.len()
    }

    /// Components tracked by the last completed cycle.
    pub fn previous_count(&self) -> usize {
        self.previously_rendered.len()
    }

    /// Start a cycle with an empty current generation.
    pub fn begin_cycle(&mut self) {
        self.currently_rendered.clear();
        self.state = CycleState::InCycle;
    }

    /// Record a rendered component. No-op outside a cycle.
    pub fn track_component<C: Suspendable + 'static>(&mut self, component: &Rc<C>) {
        if !self.is_in_cycle() {
            return;
        }
        let component: Weak<dyn Suspendable> = Rc::<C>::downgrade(component);
        self.currently_rendered.insert(component);
    }

    /// Close the cycle: suspend every component that was rendered last cycle
    /// but not this one, then promote this cycle's set.
    ///
    /// Returns how many components were suspended. Components that no longer
    /// exist are skipped. Outside a cycle this does nothing.
    pub fn end_cycle(&mut self) -> usize {
        let dropped = self.take_dropped();
        let count = dropped.len();
        for component in dropped {
            component.suspend_effects();
        }
        count
    }

    /// The set-difference and promotion half of [`end_cycle`](Self::end_cycle).
    ///
    /// Lets a caller holding the tracker behind a `RefCell` release its borrow
    /// before running suspensions.
    pub(crate) fn take_dropped(&mut self) -> Vec<Rc<dyn Suspendable>> {
        if !self.is_in_cycle() {
            return Vec::new();
        }
        let current = std::mem::take(&mut self.currently_rendered);
        let previous = std::mem::replace(&mut self.previously_rendered, current);
        self.state = CycleState::Idle;

        let dropped: Vec<_> = previous
            .order
            .into_iter()
            .filter(|component| !self.previously_rendered.contains(component))
            .filter_map(|component| component.upgrade())
            .collect();
        if !dropped.is_empty() {
            tracing::debug!(count = dropped.len(), "components left the tree; suspending effects");
        }
        dropped
    }

    /// Forget both generations and return to idle.
    pub fn clear(&mut self) {
        self.previously_rendered.clear();
        self.currently_rendered.clear();
        self.state = CycleState::Idle;
    }
}

// =============================================================================
// Thread Tracker
// =============================================================================

thread_local! {
    static TRACKER: RefCell<RenderCycleTracker> = RefCell::new(RenderCycleTracker::new());
}

/// Begin a full-tree render pass on this thread's tracker.
pub fn begin_cycle() {
    TRACKER.with(|t| t.borrow_mut().begin_cycle());
}

/// Track a component on this thread's tracker.
pub fn track_component<C: Suspendable + 'static>(component: &Rc<C>) {
    TRACKER.with(|t| t.borrow_mut().track_component(component));
}

/// End the pass on this thread's tracker, suspending dropped components.
///
/// Suspensions run after the tracker borrow is released, so a suspended
/// component may itself touch the tracker.
pub fn end_cycle() -> usize {
    let dropped = TRACKER.with(|t| t.borrow_mut().take_dropped());
    let count = dropped.len();
    for component in dropped {
        component.suspend_effects();
    }
    count
}

/// Whether this thread's tracker is inside a cycle.
pub fn in_cycle() -> bool {
    TRACKER.with(|t| t.borrow().is_in_cycle())
}

pub fn tracked_count() -> usize {
    TRACKER.with(|t| t.borrow().tracked_count())
}

/// Reset this thread's tracker (teardown and test isolation).
pub fn reset_cycle_tracker() {
    TRACKER.with(|t| t.borrow_mut().clear());
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[derive(Default)]
    struct Tracked {
        suspended: Cell<u32>,
    }

    impl Suspendable for Tracked {
        fn suspend_effects(&self) {
            self.suspended.set(self.suspended.get() + 1);
        }
    }

    fn tracked() -> Rc<Tracked> {
        Rc::new(Tracked::default())
    }

    #[test]
    fn test_dropped_component_suspended_once() {
        let mut tracker = RenderCycleTracker::new();
        let (a, b) = (tracked(), tracked());

        tracker.begin_cycle();
        tracker.track_component(&a);
        tracker.track_component(&b);
        assert_eq!(tracker.end_cycle(), 0);
        assert_eq!(a.suspended.get(), 0);
        assert_eq!(b.suspended.get(), 0);

        tracker.begin_cycle();
        tracker.track_component(&a);
        assert_eq!(tracker.end_cycle(), 1);
        assert_eq!(a.suspended.get(), 0);
        assert_eq!(b.suspended.get(), 1);

        // Already gone: not suspended again
        tracker.begin_cycle();
        tracker.track_component(&a);
        tracker.end_cycle();
        assert_eq!(b.suspended.get(), 1);
    }

    #[test]
    fn test_track_outside_cycle_is_noop() {
        let mut tracker = RenderCycleTracker::new();
        let a = tracked();
        tracker.track_component(&a);
        assert_eq!(tracker.tracked_count(), 0);
        assert_eq!(tracker.state(), CycleState::Idle);

        // end_cycle while idle does nothing
        assert_eq!(tracker.end_cycle(), 0);
    }

    #[test]
    fn test_identity_not_value() {
        let mut tracker = RenderCycleTracker::new();
        let first = tracked();
        let twin = tracked();

        tracker.begin_cycle();
        tracker.track_component(&first);
        tracker.track_component(&first.clone());
        assert_eq!(tracker.tracked_count(), 1);
        tracker.end_cycle();

        tracker.begin_cycle();
        tracker.track_component(&twin);
        assert_eq!(tracker.end_cycle(), 1);
        assert_eq!(first.suspended.get(), 1);
    }

    #[test]
    fn test_tracker_does_not_keep_components_alive() {
        let mut tracker = RenderCycleTracker::new();
        let (a, b) = (tracked(), tracked());
        let watch = Rc::downgrade(&b);

        tracker.begin_cycle();
        tracker.track_component(&a);
        tracker.track_component(&b);
        tracker.end_cycle();

        drop(b);
        assert!(watch.upgrade().is_none());

        tracker.begin_cycle();
        tracker.track_component(&a);
        assert_eq!(tracker.end_cycle(), 0, "a dropped component is not suspended");
        assert_eq!(a.suspended.get(), 0);
    }

    #[test]
    fn test_clear_resets_generations() {
        let mut tracker = RenderCycleTracker::new();
        let a = tracked();
        tracker.begin_cycle();
        tracker.track_component(&a);
        tracker.end_cycle();
        assert_eq!(tracker.previous_count(), 1);

        tracker.begin_cycle();
        tracker.clear();
        assert!(!tracker.is_in_cycle());
        assert_eq!(tracker.previous_count(), 0);

        tracker.begin_cycle();
        assert_eq!(tracker.end_cycle(), 0);
        assert_eq!(a.suspended.get(), 0);
    }

    #[test]
    fn test_thread_tracker() {
        reset_cycle_tracker();
        let (a, b) = (tracked(), tracked());

        begin_cycle();
        assert!(in_cycle());
        track_component(&a);
        track_component(&b);
        end_cycle();

        begin_cycle();
        track_component(&b);
        assert_eq!(tracked_count(), 1);
        assert_eq!(end_cycle(), 1);
        assert_eq!(a.suspended.get(), 1);
        assert!(!in_cycle());

        reset_cycle_tracker();
    }
}
