//! Disposal traits for resource cleanup.

/// Trait for synchronous resource disposal.
///
/// Implement this trait for instances that need structured teardown (e.g.
/// flushing caches, closing connections). Factories register the hook with
/// [`Resolver::register_disposer`](crate::Resolver::register_disposer);
/// hooks run in LIFO order when the owning container closes.
///
/// # Examples
///
/// ```
/// use lattice_di::{BindingSet, Dispose, Resolver};
/// use std::sync::Arc;
///
/// struct Cache {
///     name: String,
/// }
///
/// impl Dispose for Cache {
///     fn dispose(&self) {
///         // Flush and release...
///     }
/// }
///
/// let mut bindings = BindingSet::new();
/// bindings.add_singleton_factory::<Arc<Cache>, _>(|r| {
///     let cache = Arc::new(Cache { name: "user_cache".to_string() });
///     r.register_disposer(cache.clone());
///     cache
/// }).unwrap();
///
/// let container = bindings.build().unwrap();
/// let _cache = container.get_required::<Arc<Cache>>();
/// container.close(); // runs Cache::dispose
/// ```
pub trait Dispose: Send + Sync + 'static {
    /// Perform synchronous cleanup of resources.
    fn dispose(&self);
}

/// Trait for asynchronous resource disposal.
///
/// Implement this for instances requiring async teardown (graceful
/// connection shutdown, async I/O cleanup). Async hooks run before sync
/// hooks, in LIFO order, when
/// [`Container::close_async`](crate::Container::close_async) is awaited.
#[async_trait::async_trait]
pub trait AsyncDispose: Send + Sync + 'static {
    /// Perform asynchronous cleanup of resources.
    async fn dispose(&self);
}
