use thiserror::Error;

/// Failure to resolve a store from the binding scope.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
    /// No enclosing scope carries a store of this type and no default is set.
    #[error("no store for state `{state}` and action `{action}` in scope, and no default store is set")]
    NoStore {
        state: &'static str,
        action: &'static str,
    },
}

impl BindingError {
    pub(crate) fn no_store<S, A>() -> Self {
        Self::NoStore {
            state: std::any::type_name::<S>(),
            action: std::any::type_name::<A>(),
        }
    }
}
