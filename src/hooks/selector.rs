use super::equality;
use crate::context;
use crate::error::BindingError;
use crate::store::{Store, Subscription};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

type Render<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Shared<T> {
    value: RwLock<T>,
    renders: AtomicUsize,
    on_change: RwLock<Option<Render<T>>>,
}

/// A mounted consumer's view of a derived slice of store state.
///
/// Holds exactly one store listener for its whole lifetime. On every
/// notification the selector runs against the new state; when the result
/// differs from the last one under the comparator, the value is replaced,
/// the render count goes up and the [`on_change`](Self::on_change) callback
/// is invoked with the new value.
///
/// Dropping a `Selected` unmounts it: the listener is removed from the store.
pub struct Selected<T> {
    shared: Arc<Shared<T>>,
    subscription: Subscription,
}

impl<T> Selected<T>
where
    T: Clone + Send + Sync + 'static,
{
    /// Mount a selector on an explicit store.
    pub fn new<S, A, F, E>(store: &Store<S, A>, selector: F, eq: E) -> Self
    where
        S: Send + Sync + 'static,
        A: Send + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        // Evaluate and subscribe with no dispatch from another thread in
        // between, or the first value could miss a commit.
        store.with_dispatch_lock(|| Self::mount(store, selector, eq))
    }

    fn mount<S, A, F, E>(store: &Store<S, A>, selector: F, eq: E) -> Self
    where
        S: Send + Sync + 'static,
        A: Send + 'static,
        F: Fn(&S) -> T + Send + Sync + 'static,
        E: Fn(&T, &T) -> bool + Send + Sync + 'static,
    {
        let shared = Arc::new(Shared {
            value: RwLock::new(selector(&store.get_state())),
            renders: AtomicUsize::new(0),
            on_change: RwLock::new(None),
        });

        let subscription = store.subscribe({
            let store = store.clone();
            let shared = Arc::clone(&shared);
            move || {
                let next = selector(&store.get_state());
                {
                    let mut value = shared.value.write();
                    if eq(&*value, &next) {
                        return;
                    }
                    *value = next.clone();
                }
                shared.renders.fetch_add(1, Ordering::SeqCst);
                let render = shared.on_change.read().clone();
                if let Some(render) = render {
                    render(&next);
                }
            }
        });

        Self {
            shared,
            subscription,
        }
    }

    /// The last selected value.
    pub fn get(&self) -> T {
        self.shared.value.read().clone()
    }

    /// Set the callback run when the selected value changes.
    ///
    /// Replaces any previous callback.
    pub fn on_change<F>(&self, render: F)
    where
        F: Fn(&T) + Send + Sync + 'static,
    {
        *self.shared.on_change.write() = Some(Arc::new(render));
    }

    /// Read the last selected value through a closure.
    ///
    /// `f` gets a copy taken before it runs, so it may dispatch.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        let value = self.get();
        f(&value)
    }
}

impl<T> Selected<T> {

    /// How many times the selected value changed since mounting.
    pub fn render_count(&self) -> usize {
        self.shared.renders.load(Ordering::SeqCst)
    }

    /// Whether the store listener is still registered.
    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }
}

/// Select a slice of the current store's state.
///
/// Resolves the store from the current scope, evaluates `selector` once and
/// subscribes for updates. Changes are detected with `PartialEq`; use
/// [`use_selector_with`] for another comparator.
///
/// Fails immediately if no store of this type is in scope.
///
/// # Example
///
/// ```
/// use tincan_redux::{context, use_selector, Store};
///
/// #[derive(Clone)]
/// struct State { counter: i32, step: i32 }
///
/// let store = Store::new(
///     |s: &State, d: &i32| State { counter: s.counter + d, ..s.clone() },
///     State { counter: 1, step: 1 },
/// );
///
/// let _scope = context::establish(store.clone());
/// let counter = use_selector::<State, i32, _>(|s| s.counter).unwrap();
/// assert_eq!(counter.get(), 1);
///
/// store.dispatch(4);
/// assert_eq!(counter.get(), 5);
/// assert_eq!(counter.render_count(), 1);
/// ```
pub fn use_selector<S, A, T>(
    selector: impl Fn(&S) -> T + Send + Sync + 'static,
) -> Result<Selected<T>, BindingError>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
    T: Clone + PartialEq + Send + Sync + 'static,
{
    use_selector_with::<S, A, T>(selector, equality::structural)
}

/// Select a slice of the current store's state with a custom comparator.
///
/// `eq(old, new)` returning `false` triggers a re-render. See
/// [`equality`](super::equality) for the provided comparators.
pub fn use_selector_with<S, A, T>(
    selector: impl Fn(&S) -> T + Send + Sync + 'static,
    eq: impl Fn(&T, &T) -> bool + Send + Sync + 'static,
) -> Result<Selected<T>, BindingError>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
    T: Clone + Send + Sync + 'static,
{
    let store = context::current::<S, A>()?;
    Ok(Selected::new(&store, selector, eq))
}
