use crate::error::BindingError;
use crate::store::Store;
use parking_lot::RwLock;
use std::any::{Any, TypeId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, OnceLock};

type AnyStore = Arc<dyn Any + Send + Sync>;

struct Scope {
    id: u64,
    store: AnyStore,
}

static NEXT_SCOPE_ID: AtomicU64 = AtomicU64::new(0);

// Thread-local stack of established scopes, innermost last
thread_local! {
    static SCOPE_STACK: RefCell<Vec<Scope>> = const { RefCell::new(Vec::new()) };
}

/// Process-wide fallback stores, one per store type.
fn defaults() -> &'static RwLock<HashMap<TypeId, AnyStore>> {
    static DEFAULTS: OnceLock<RwLock<HashMap<TypeId, AnyStore>>> = OnceLock::new();
    DEFAULTS.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Make `store` the current store for this thread until the guard drops.
///
/// Scopes nest: the innermost scope carrying a store of the requested type
/// wins, so a subtree can override the store its ancestors established.
///
/// # Examples
///
/// ```
/// use tincan_redux::{context, Store};
///
/// let store = Store::new(|n: &u32, d: &u32| n + d, 0);
/// let _scope = context::establish(store.clone());
///
/// let current = context::current::<u32, u32>().unwrap();
/// assert!(current.ptr_eq(&store));
/// ```
pub fn establish<S, A>(store: Store<S, A>) -> ScopeGuard
where
    S: Send + Sync + 'static,
    A: Send + 'static,
{
    let id = NEXT_SCOPE_ID.fetch_add(1, Ordering::Relaxed);
    let depth = SCOPE_STACK.with(|stack| {
        let mut stack = stack.borrow_mut();
        stack.push(Scope {
            id,
            store: Arc::new(store),
        });
        stack.len()
    });
    tracing::trace!(scope = id, depth, "scope established");
    ScopeGuard {
        id,
        _thread_bound: PhantomData,
    }
}

/// Run `f` with `store` as the current store.
///
/// The scope is removed when `f` returns or panics.
pub fn with_store<S, A, F, R>(store: Store<S, A>, f: F) -> R
where
    S: Send + Sync + 'static,
    A: Send + 'static,
    F: FnOnce() -> R,
{
    let _scope = establish(store);
    f()
}

/// Resolve the current store of this type.
///
/// Returns the store of the innermost enclosing scope on this thread,
/// falling back to the default set by [`set_default_store`].
pub fn current<S, A>() -> Result<Store<S, A>, BindingError>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
{
    let scoped = SCOPE_STACK.with(|stack| {
        stack
            .borrow()
            .iter()
            .rev()
            .find_map(|scope| scope.store.downcast_ref::<Store<S, A>>().cloned())
    });
    if let Some(store) = scoped {
        return Ok(store);
    }

    defaults()
        .read()
        .get(&TypeId::of::<Store<S, A>>())
        .and_then(|store| store.downcast_ref::<Store<S, A>>().cloned())
        .ok_or_else(BindingError::no_store::<S, A>)
}

/// Set the fallback store used when no scope on the calling thread carries
/// a store of this type. Returns the previous default.
///
/// The default is shared by every thread. It exists so the hooks work
/// standalone, e.g. in tests or single-store programs; prefer
/// [`establish`] when more than one store of a type is alive.
pub fn set_default_store<S, A>(store: Store<S, A>) -> Option<Store<S, A>>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
{
    tracing::debug!(store = store.name(), "default store set");
    defaults()
        .write()
        .insert(TypeId::of::<Store<S, A>>(), Arc::new(store))
        .and_then(|previous| previous.downcast_ref::<Store<S, A>>().cloned())
}

/// Remove the fallback store of this type. Returns it if one was set.
pub fn clear_default_store<S, A>() -> Option<Store<S, A>>
where
    S: Send + Sync + 'static,
    A: Send + 'static,
{
    defaults()
        .write()
        .remove(&TypeId::of::<Store<S, A>>())
        .and_then(|previous| previous.downcast_ref::<Store<S, A>>().cloned())
}

/// Number of scopes established on this thread.
pub fn depth() -> usize {
    SCOPE_STACK.with(|stack| stack.borrow().len())
}

/// Keeps a scope established; removes it on drop.
///
/// Bound to the thread that created it.
#[must_use = "dropping a ScopeGuard immediately removes the scope"]
pub struct ScopeGuard {
    id: u64,
    _thread_bound: PhantomData<*const ()>,
}

impl Drop for ScopeGuard {
    fn drop(&mut self) {
        // try_with: the guard may outlive the thread-local during thread exit
        let _ = SCOPE_STACK.try_with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(pos) = stack.iter().rposition(|scope| scope.id == self.id) {
                stack.remove(pos);
            }
        });
        tracing::trace!(scope = self.id, "scope removed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Defaults are process-wide, so each test uses its own state type.

    fn counter() -> Store<i32, i32> {
        Store::new(|s: &i32, a: &i32| s + a, 0)
    }

    #[test]
    fn no_scope_no_default() {
        #[derive(Debug)]
        struct Orphan;
        let err = current::<Orphan, ()>().unwrap_err();
        assert!(matches!(err, BindingError::NoStore { .. }));
    }

    #[test]
    fn innermost_scope_wins() {
        let outer = counter();
        let inner = counter();

        let _outer = establish(outer.clone());
        assert!(current::<i32, i32>().unwrap().ptr_eq(&outer));

        with_store(inner.clone(), || {
            assert!(current::<i32, i32>().unwrap().ptr_eq(&inner));
        });

        assert!(current::<i32, i32>().unwrap().ptr_eq(&outer));
    }

    #[test]
    fn scopes_resolve_by_type() {
        let numbers = counter();
        let text = Store::new(|s: &String, a: &char| format!("{s}{a}"), String::new());

        let _numbers = establish(numbers.clone());
        let _text = establish(text.clone());

        assert!(current::<i32, i32>().unwrap().ptr_eq(&numbers));
        assert!(current::<String, char>().unwrap().ptr_eq(&text));
    }

    #[test]
    fn guard_pops_on_drop() {
        let before = depth();
        let guard = establish(counter());
        assert_eq!(depth(), before + 1);
        drop(guard);
        assert_eq!(depth(), before);
    }

    #[test]
    fn out_of_order_drop() {
        let a = counter();
        let b = counter();
        let guard_a = establish(a);
        let guard_b = establish(b.clone());

        drop(guard_a);
        assert!(current::<i32, i32>().unwrap().ptr_eq(&b));
        drop(guard_b);
    }

    #[test]
    fn with_store_pops_on_panic() {
        let before = depth();
        let result = std::panic::catch_unwind(|| {
            with_store(counter(), || panic!("render failed"));
        });
        assert!(result.is_err());
        assert_eq!(depth(), before);
    }

    #[test]
    fn default_store_fallback() {
        #[derive(Debug, PartialEq)]
        struct Settings(u8);

        let store = Store::new(|_: &Settings, a: &u8| Settings(*a), Settings(0));
        assert!(set_default_store(store.clone()).is_none());
        assert!(current::<Settings, u8>().unwrap().ptr_eq(&store));

        let scoped = Store::new(|_: &Settings, a: &u8| Settings(*a), Settings(1));
        with_store(scoped.clone(), || {
            assert!(current::<Settings, u8>().unwrap().ptr_eq(&scoped));
        });

        let removed = clear_default_store::<Settings, u8>().unwrap();
        assert!(removed.ptr_eq(&store));
        assert!(current::<Settings, u8>().is_err());
    }

    #[test]
    fn scopes_are_per_thread() {
        let store = counter();
        let _scope = establish(store);

        let resolved = std::thread::spawn(|| current::<i32, i32>().is_ok())
            .join()
            .unwrap();
        assert!(!resolved);
    }
}
