//! Binding scopes for locating the current store.
//!
//! Consumers resolve "the current store" of a given type without having it
//! passed through every layer. A store is made current with [`establish`] or
//! [`with_store`]; scopes nest per thread. When no scope on the calling
//! thread carries a store of the requested type, the default set by
//! [`set_default_store`] is used.

mod scope;

pub use scope::{
    clear_default_store, current, depth, establish, set_default_store, with_store, ScopeGuard,
};
