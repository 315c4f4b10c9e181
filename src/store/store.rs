use super::reducer::Reducer;
use super::subscription::{Subscribers, Subscription};
use parking_lot::{Mutex, ReentrantMutex, RwLock};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

/// Actions waiting behind the dispatch that is currently running.
struct DispatchQueue<A> {
    running: bool,
    pending: VecDeque<A>,
}

struct Inner<S, A> {
    name: Option<String>,
    state: RwLock<Arc<S>>,
    reducer: Box<dyn Reducer<S, A>>,
    subscribers: Arc<Mutex<Subscribers>>,
    dispatch: ReentrantMutex<RefCell<DispatchQueue<A>>>,
}

/// A single source of truth for application state.
///
/// The store owns the current state and an ordered list of listeners. Every
/// change goes through [`dispatch`](Self::dispatch): the reducer computes the
/// next state, the store swaps it in, then every listener is called in
/// registration order. Listeners receive no arguments and pull the new state
/// with [`get_state`](Self::get_state).
///
/// Cloning a store is cheap; clones share state and listeners.
///
/// # Failure
///
/// Panics are never caught. If the reducer panics the state stays at the
/// last committed value. If a listener panics the new state is already
/// committed: listeners before it have run, listeners after it have not.
///
/// # Nested dispatch
///
/// Calling `dispatch` from inside a listener (or the reducer) on the
/// dispatching thread enqueues the action and returns at once. The outer
/// `dispatch` applies queued actions in FIFO order after the current round of
/// notifications, so each listener sees every committed state in order.
/// Queued actions are discarded if a reducer or listener panics. Other
/// threads calling `dispatch` block until the running dispatch has drained
/// its queue.
///
/// # Examples
///
/// ```
/// use tincan_redux::Store;
///
/// let store = Store::new(|count: &i32, delta: &i32| count + delta, 1);
/// let sub = store.subscribe(|| println!("changed"));
///
/// store.dispatch(1);
/// assert_eq!(*store.get_state(), 2);
/// drop(sub);
/// ```
pub struct Store<S, A> {
    inner: Arc<Inner<S, A>>,
}

impl<S, A> Store<S, A>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
{
    /// Create a store from a reducer and the initial state.
    pub fn new<R>(reducer: R, initial: S) -> Self
    where
        R: Reducer<S, A>,
    {
        Self::builder(reducer, initial).build()
    }

    /// Start configuring a store.
    pub fn builder<R>(reducer: R, initial: S) -> StoreBuilder<S, A>
    where
        R: Reducer<S, A>,
    {
        StoreBuilder {
            name: None,
            reducer: Box::new(reducer),
            initial,
        }
    }

    /// Get the current state.
    pub fn get_state(&self) -> Arc<S> {
        Arc::clone(&self.inner.state.read())
    }

    /// Read the current state through a closure.
    ///
    /// `f` sees the state committed when `read` was called. No lock is held
    /// while it runs, so it may read or dispatch again.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&S) -> R,
    {
        let state = self.get_state();
        f(&*state)
    }

    /// Run `f` with dispatch blocked on other threads.
    ///
    /// Dispatches from the calling thread are still accepted and queued
    /// behind any dispatch already running.
    pub(crate) fn with_dispatch_lock<F, R>(&self, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        let _lock = self.inner.dispatch.lock();
        f()
    }

    /// Apply an action and notify every listener.
    pub fn dispatch(&self, action: A) {
        let lock = self.inner.dispatch.lock();
        {
            let mut queue = lock.borrow_mut();
            queue.pending.push_back(action);
            if queue.running {
                tracing::debug!(
                    store = self.label(),
                    queued = queue.pending.len(),
                    "nested dispatch queued"
                );
                return;
            }
            queue.running = true;
        }

        let _reset = scopeguard::guard(&*lock, |queue| {
            let mut queue = queue.borrow_mut();
            queue.running = false;
            if !queue.pending.is_empty() {
                tracing::warn!(
                    store = self.label(),
                    discarded = queue.pending.len(),
                    "dispatch aborted, dropping queued actions"
                );
                queue.pending.clear();
            }
        });

        loop {
            let next = lock.borrow_mut().pending.pop_front();
            let Some(action) = next else {
                break;
            };
            self.apply(&action);
        }
    }

    fn apply(&self, action: &A) {
        let current = self.get_state();
        let next = self.inner.reducer.reduce(&current, action);
        drop(current);
        *self.inner.state.write() = Arc::new(next);

        let pending = self.inner.subscribers.lock().snapshot();
        tracing::debug!(
            store = self.label(),
            subscribers = pending.len(),
            "state committed"
        );
        for listener in &pending {
            listener.invoke();
        }
    }

    /// Register a listener called after every committed dispatch.
    ///
    /// The listener stays registered until the returned [`Subscription`] is
    /// dropped. A listener registered while a dispatch is notifying is first
    /// called on the next dispatch.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn() + Send + Sync + 'static,
    {
        let (id, active) = self.inner.subscribers.lock().insert(Arc::new(listener));
        tracing::trace!(store = self.label(), subscriber = id, "listener added");
        Subscription::new(id, active, &self.inner.subscribers)
    }

    /// Number of registered listeners.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }
}

impl<S, A> Store<S, A> {
    /// The configured name, if any.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// Whether two handles point at the same store.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn label(&self) -> &str {
        self.name().unwrap_or("anonymous")
    }
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S, A> fmt::Debug for Store<S, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("name", &self.inner.name)
            .field("subscribers", &self.inner.subscribers.lock().len())
            .finish_non_exhaustive()
    }
}

/// Builder for [`Store`].
pub struct StoreBuilder<S, A> {
    name: Option<String>,
    reducer: Box<dyn Reducer<S, A>>,
    initial: S,
}

impl<S, A> StoreBuilder<S, A>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
{
    /// Name the store in log output.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn build(self) -> Store<S, A> {
        Store {
            inner: Arc::new(Inner {
                name: self.name,
                state: RwLock::new(Arc::new(self.initial)),
                reducer: self.reducer,
                subscribers: Arc::new(Mutex::new(Subscribers::default())),
                dispatch: ReentrantMutex::new(RefCell::new(DispatchQueue {
                    running: false,
                    pending: VecDeque::new(),
                })),
            }),
        }
    }
}
