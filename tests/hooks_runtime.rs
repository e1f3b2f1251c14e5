//! End-to-end hook behaviour through the public API.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_hooks::hooks::{self, registry, tracker};
use spark_hooks::prelude::*;
use spark_hooks::{HookContext, HookKind, RenderCycleTracker, Suspendable, config};

fn setup() {
    config::reset_config();
    registry::clear_all().unwrap();
    tracker::reset_cycle_tracker();
    hooks::reset_provided();
}

#[test]
fn state_keeps_value_and_ignores_new_initial() {
    let ctx = HookContext::new();
    let (value, set) = ctx.state(5).unwrap();
    assert_eq!(value, 5);
    set.set(10);
    ctx.reset_for_render();
    let (value, _) = ctx.state(999).unwrap();
    assert_eq!(value, 10);
}

#[test]
fn effect_reruns_only_on_changed_deps() {
    let ctx = HookContext::new();
    let runs = Rc::new(Cell::new(0));
    let render = |deps: Deps| {
        ctx.reset_for_render();
        let r = runs.clone();
        ctx.on_render(move || r.set(r.get() + 1), deps).unwrap();
    };

    render(deps![1, 2]);
    render(deps![1, 2]);
    assert_eq!(runs.get(), 1);
    render(deps![1, 3]);
    assert_eq!(runs.get(), 2);
}

#[test]
fn memo_with_empty_deps_computes_once() {
    let ctx = HookContext::new();
    let calls = Rc::new(Cell::new(0));
    for _ in 0..5 {
        ctx.reset_for_render();
        let c = calls.clone();
        ctx.memo(move || c.set(c.get() + 1), deps![]).unwrap();
    }
    assert_eq!(calls.get(), 1);
}

#[test]
fn ref_identity_survives_renders() {
    let ctx = HookContext::new();
    let r1 = ctx.mutable_ref(String::from("a")).unwrap();
    r1.set_current("changed".into());

    ctx.reset_for_render();
    let again = ctx.mutable_ref(String::from("ignored")).unwrap();
    assert!(again.ptr_eq(&r1));
    assert_eq!(again.current(), "changed");
}

#[derive(Debug)]
enum CounterAction {
    Increment,
}

#[test]
fn reducer_increment_visible_next_render() {
    setup();
    let reduce = |state: &i64, action: CounterAction| match action {
        CounterAction::Increment => state + 1,
    };

    let dispatch = render_component("counter", || (), || {
        let (state, dispatch) = use_reducer(reduce, 0)?;
        assert_eq!(state, 0);
        Ok(dispatch)
    })
    .unwrap();
    dispatch.dispatch(CounterAction::Increment);

    let state = render_component("counter", || (), || Ok(use_reducer(reduce, 0)?.0)).unwrap();
    assert_eq!(state, 1);
}

#[test]
fn with_context_nests_and_unwinds() {
    setup();
    let a = Rc::new(HookContext::new());
    let b = Rc::new(HookContext::new());

    registry::with_context(&a, || {
        registry::with_context(&b, || {
            assert!(Rc::ptr_eq(&registry::get_current()?, &b));
            Ok(())
        })?;
        assert!(Rc::ptr_eq(&registry::get_current()?, &a));

        let failed: HookResult<()> = registry::with_context(&b, || Err(HookError::not_found("boom")));
        assert!(failed.is_err());
        assert!(Rc::ptr_eq(&registry::get_current()?, &a));
        Ok(())
    })
    .unwrap();

    assert!(!registry::has_current());
}

#[derive(Default)]
struct Widget {
    suspends: Cell<u32>,
}

impl Suspendable for Widget {
    fn suspend_effects(&self) {
        self.suspends.set(self.suspends.get() + 1);
    }
}

#[test]
fn tracker_suspends_components_missing_from_next_cycle() {
    let mut cycle = RenderCycleTracker::new();
    let a = Rc::new(Widget::default());
    let b = Rc::new(Widget::default());

    cycle.begin_cycle();
    cycle.track_component(&a);
    cycle.track_component(&b);
    cycle.end_cycle();
    assert_eq!((a.suspends.get(), b.suspends.get()), (0, 0));

    cycle.begin_cycle();
    cycle.track_component(&a);
    cycle.end_cycle();
    assert_eq!((a.suspends.get(), b.suspends.get()), (0, 1));
}

#[test]
fn get_current_outside_render_fails() {
    setup();
    assert!(matches!(
        registry::get_current(),
        Err(HookError::MissingContext { .. })
    ));
    assert!(matches!(use_state(0), Err(HookError::MissingContext { .. })));
}

#[test]
fn changed_hook_order_is_a_structural_error() {
    setup();
    let swap = Rc::new(Cell::new(false));
    let render = || {
        render_component("swapper", || (), || {
            if swap.get() {
                use_ref(0)?;
                use_state(0)?;
            } else {
                use_state(0)?;
                use_ref(0)?;
            }
            Ok(())
        })
    };

    render().unwrap();
    swap.set(true);
    let err = render().unwrap_err();
    assert!(err.is_structural());
    assert!(matches!(
        err,
        HookError::HookOrderViolation { index: 0, expected: HookKind::State, found: HookKind::Ref }
    ));
    assert!(!registry::has_current());
}

#[test]
fn driver_rerenders_on_setter_and_resumes_suspended_effects() {
    setup();
    let log = Rc::new(RefCell::new(Vec::<String>::new()));
    let pending = Rc::new(Cell::new(0));

    let clock = |log: Rc<RefCell<Vec<String>>>| {
        let p = pending.clone();
        render_component("clock", move || p.set(p.get() + 1), move || {
            let (ticks, set_ticks) = use_state(0u32)?;
            let l = log.clone();
            use_effect(
                move || {
                    l.borrow_mut().push("start".into());
                    let l = l.clone();
                    Box::new(move || l.borrow_mut().push("stop".into())) as Cleanup
                },
                deps![],
            )?;
            Ok((ticks, set_ticks))
        })
    };

    begin_cycle();
    let (ticks, set_ticks) = clock(log.clone()).unwrap();
    end_cycle();
    assert_eq!(ticks, 0);

    set_ticks.update(|t| t + 1);
    set_ticks.set(1);
    assert_eq!(pending.get(), 2, "one trigger per setter call");

    // Clock leaves the tree
    begin_cycle();
    assert_eq!(end_cycle(), 1);

    // And comes back: its run-once effect starts again
    begin_cycle();
    let (ticks, _) = clock(log.clone()).unwrap();
    end_cycle();
    assert_eq!(ticks, 1);
    assert_eq!(*log.borrow(), vec!["start", "stop", "start"]);
}

#[test]
fn failed_first_render_does_not_fix_the_hook_count() {
    setup();
    let ready = Rc::new(Cell::new(false));
    let render = || {
        render_component("loader", || (), || {
            let (first, _) = use_state(0)?;
            if !ready.get() {
                return Err(HookError::not_found("data"));
            }
            let (second, _) = use_state(1)?;
            Ok(first + second)
        })
    };

    assert!(render().is_err());
    ready.set(true);
    assert_eq!(render().unwrap(), 1);
    assert_eq!(render().unwrap(), 1);
    assert_eq!(registry::get_context("loader").unwrap().slot_count(), 2);
}

#[test]
fn setter_from_render_component_fires_driver_callback() {
    setup();
    let redraws = Rc::new(Cell::new(0));
    let r = redraws.clone();
    let set = render_component("toggle", move || r.set(r.get() + 1), || Ok(use_state(false)?.1)).unwrap();

    set.set(true);
    set.update(|on| !on);
    assert_eq!(redraws.get(), 2);

    let on = render_component("toggle", || (), || Ok(use_state(false)?.0)).unwrap();
    assert!(!on);
    set.set(true);
    assert_eq!(redraws.get(), 2, "the latest rerender callback wins");
}

#[test]
fn unmounted_component_setters_go_stale() {
    setup();
    let redraws = Rc::new(Cell::new(0));
    let r = redraws.clone();

    begin_cycle();
    let set = render_component("gone", move || r.set(r.get() + 1), || Ok(use_state(0)?.1)).unwrap();
    end_cycle();

    registry::unmount_context("gone").unwrap();
    assert!(!set.is_live());
    set.set(5);
    assert_eq!(redraws.get(), 0);

    // The next cycle forgets it without suspending anything
    begin_cycle();
    assert_eq!(end_cycle(), 0);
}
