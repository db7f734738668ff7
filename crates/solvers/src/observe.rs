/// Receives events from a running computation and may steer it.
///
/// `observe` returns `Some(action)` to request a computation-specific action,
/// or `None` to let it continue unchanged.
///
/// Closures of the form `FnMut(&E) -> Option<A>` implement `Observer`, and `()`
/// is a no-op observer that never acts.
pub trait Observer<E, A> {
    /// Observes one event and optionally returns an action.
    fn observe(&mut self, event: &E) -> Option<A>;
}

impl<E, A, F> Observer<E, A> for F
where
    F: FnMut(&E) -> Option<A>,
{
    fn observe(&mut self, event: &E) -> Option<A> {
        self(event)
    }
}

impl<E, A> Observer<E, A> for () {
    fn observe(&mut self, _event: &E) -> Option<A> {
        None
    }
}
