/// A pure state-transition function.
///
/// Given the current state and an action, a reducer returns the next state.
/// It must be total: every action, including ones the application does not
/// recognize, yields a state. Unrecognized actions return a value equal to
/// the input.
///
/// The store cannot detect an impure reducer. Side effects performed here
/// run once per dispatch, while the dispatch lock is held.
///
/// Any `Fn(&S, &A) -> S` closure is a reducer:
///
/// ```
/// use tincan_redux::Store;
///
/// let store = Store::new(|count: &i32, delta: &i32| count + delta, 0);
/// store.dispatch(5);
/// assert_eq!(*store.get_state(), 5);
/// ```
pub trait Reducer<S, A>: Send + Sync + 'static {
    /// Compute the next state.
    fn reduce(&self, state: &S, action: &A) -> S;
}

impl<S, A, F> Reducer<S, A> for F
where
    F: Fn(&S, &A) -> S + Send + Sync + 'static,
{
    fn reduce(&self, state: &S, action: &A) -> S {
        self(state, action)
    }
}
