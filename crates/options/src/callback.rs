use std::fmt;
use std::future::{self, Future};
use std::pin::Pin;
use std::sync::Arc;

/// Boxed future used by asynchronous option callbacks.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Cloneable handle to a caller-supplied synchronous callback.
///
/// Callbacks are value data from the host's point of view: they are never
/// awaited, compared structurally, or serialized. Equality is identity
/// (`same_callback`), matching the per-commit identity semantics of the
/// surrounding option records.
pub struct Callback<T>(Arc<dyn Fn(T) + Send + Sync>);

impl<T> Callback<T> {
    pub fn new(callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self(Arc::new(callback))
    }

    pub fn call(&self, value: T) {
        (self.0)(value);
    }

    /// Returns true when both handles wrap the same underlying closure.
    pub fn same_callback(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T> Clone for Callback<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T> fmt::Debug for Callback<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("Callback(..)")
    }
}

/// Cloneable handle to a caller-supplied asynchronous callback.
///
/// The host never awaits the returned future itself; it is handed to the
/// element (or the caller's runtime) to drive. Credential refresh and client
/// tool invocations use this shape.
pub struct AsyncCallback<T, R>(Arc<dyn Fn(T) -> BoxFuture<'static, R> + Send + Sync>);

impl<T, R> AsyncCallback<T, R>
where
    R: Send + 'static,
{
    pub fn new<F, Fut>(callback: F) -> Self
    where
        F: Fn(T) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = R> + Send + 'static,
    {
        Self(Arc::new(move |value| Box::pin(callback(value))))
    }

    /// Lifts a plain closure into the async callback shape.
    pub fn from_sync<F>(callback: F) -> Self
    where
        F: Fn(T) -> R + Send + Sync + 'static,
    {
        Self(Arc::new(move |value| Box::pin(future::ready(callback(value)))))
    }

    pub fn invoke(&self, value: T) -> BoxFuture<'static, R> {
        (self.0)(value)
    }

    /// Returns true when both handles wrap the same underlying closure.
    pub fn same_callback(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<T, R> Clone for AsyncCallback<T, R> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T, R> fmt::Debug for AsyncCallback<T, R> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("AsyncCallback(..)")
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicU32, Ordering};

    use super::*;

    #[test]
    fn callback_identity_survives_clone() {
        let callback = Callback::new(|_: u32| {});
        let cloned = callback.clone();
        assert!(callback.same_callback(&cloned));

        let other = Callback::new(|_: u32| {});
        assert!(!callback.same_callback(&other));
    }

    #[test]
    fn sync_lift_produces_ready_future() {
        let calls = Arc::new(AtomicU32::new(0));
        let counter = calls.clone();
        let callback = AsyncCallback::from_sync(move |value: u32| {
            counter.fetch_add(1, Ordering::SeqCst);
            value * 2
        });

        let future = callback.invoke(21);
        assert_eq!(futures::executor::block_on(future), 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
