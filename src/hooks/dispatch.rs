use crate::context;
use crate::error::BindingError;
use crate::store::Store;
use std::fmt;

/// Dispatch handle for the store resolved from the current scope.
pub struct Dispatch<S, A> {
    store: Store<S, A>,
}

impl<S, A> Dispatch<S, A>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
{
    /// Wrap an explicit store.
    pub fn new(store: Store<S, A>) -> Self {
        Self { store }
    }

    /// Dispatch an action to the bound store.
    pub fn dispatch(&self, action: A) {
        self.store.dispatch(action);
    }

    /// Convert into a plain callback.
    pub fn into_fn(self) -> impl Fn(A) + Send + Sync + 'static {
        move |action| self.store.dispatch(action)
    }
}

impl<S, A> Dispatch<S, A> {
    /// Whether both handles dispatch to the same store.
    pub fn same_target(&self, other: &Self) -> bool {
        self.store.ptr_eq(&other.store)
    }

    /// The bound store.
    pub fn store(&self) -> &Store<S, A> {
        &self.store
    }
}

impl<S, A> Clone for Dispatch<S, A> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<S, A> fmt::Debug for Dispatch<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatch").field("store", &self.store).finish()
    }
}

/// Get the dispatch handle of the current store.
///
/// Fails immediately if no store of this type is in scope.
///
/// # Example
///
/// ```
/// use tincan_redux::{context, use_dispatch, Store};
///
/// let store = Store::new(|n: &i64, d: &i64| n + d, 0);
/// context::with_store(store.clone(), || {
///     let dispatch = use_dispatch::<i64, i64>().unwrap();
///     dispatch.dispatch(3);
/// });
/// assert_eq!(*store.get_state(), 3);
/// ```
pub fn use_dispatch<S, A>() -> Result<Dispatch<S, A>, BindingError>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
{
    context::current::<S, A>().map(Dispatch::new)
}
