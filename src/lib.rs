//! # Tincan Redux
//!
//! A single-store, reducer-driven state management core for Rust.
//!
//! ## Store (single source of truth)
//!
//! - `Store<S, A>` - Holds the current state and an ordered listener list
//! - `Reducer` - Pure `(state, action) -> state` transition
//! - `Subscription` - RAII guard removing a listener on drop
//!
//! ## Bindings (locating the store)
//!
//! - `context::establish` / `context::with_store` - Scoped current store
//! - `context::set_default_store` - Fallback when no scope is active
//!
//! ## Hooks (consuming the store)
//!
//! - `use_selector` - Reactive view of a slice of state
//! - `use_dispatch` - Dispatch handle of the current store

pub mod context;
mod error;
pub mod hooks;
pub mod store;

// Re-export main types for convenience
pub use error::BindingError;
pub use hooks::{use_dispatch, use_selector, use_selector_with, Dispatch, Selected};
pub use store::{Reducer, Store, StoreBuilder, Subscription};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_works() {
        // Basic smoke test
        let store = Store::new(|n: &i32, d: &i32| n + d, 0);
        let _scope = context::establish(store.clone());

        let value = use_selector::<i32, i32, _>(|n| *n).unwrap();
        use_dispatch::<i32, i32>().unwrap().dispatch(42);
        assert_eq!(value.get(), 42);
    }
}
