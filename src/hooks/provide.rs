//! Type-keyed service lookup for components.
//!
//! The application provides shared services (theme, clients, stores) once at
//! bootstrap; components read them with [`use_provided`](super::use_provided).

use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;

thread_local! {
    static PROVIDED: RefCell<HashMap<TypeId, Box<dyn Any>>> = RefCell::new(HashMap::new());
}

/// Register `value` as the service for type `T`, replacing any previous one.
pub fn provide<T: 'static>(value: T) {
    PROVIDED.with(|p| {
        p.borrow_mut().insert(TypeId::of::<T>(), Box::new(value));
    });
}

/// Clone of the service registered for `T`.
pub fn lookup<T: Clone + 'static>() -> Option<T> {
    PROVIDED.with(|p| {
        p.borrow()
            .get(&TypeId::of::<T>())
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    })
}

/// Remove the service for `T`, returning it.
pub fn unprovide<T: 'static>() -> Option<T> {
    PROVIDED.with(|p| p.borrow_mut().remove(&TypeId::of::<T>()))
        .and_then(|value| value.downcast::<T>().ok())
        .map(|value| *value)
}

/// Remove every service.
pub fn reset_provided() {
    let services = PROVIDED.with(|p| std::mem::take(&mut *p.borrow_mut()));
    drop(services);
}
