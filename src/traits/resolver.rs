//! Resolver traits for binding resolution.

use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::internal::BoxFutureUnit;
use crate::key::{key_of_qualified, key_of_qualified_trait, key_of_trait, key_of_type, Key};
use crate::traits::{AsyncDispose, Dispose};

/// Core resolver trait for object-safe binding resolution.
///
/// This trait provides the fundamental resolution capability that is
/// object-safe (usable as a trait object). It handles the low-level
/// mechanics including circular dependency detection through a
/// thread-local resolution stack.
///
/// Most users should use the [`Resolver`] trait instead, which provides
/// ergonomic generic methods built on top of this one.
pub trait ResolverCore: Send + Sync {
    /// Resolves a single binding by key.
    ///
    /// Returns the instance wrapped in a type-erased `Arc`. Walks the
    /// container chain, honors lifetimes, and detects cycles.
    fn resolve_any(&self, key: &Key) -> DiResult<Arc<dyn std::any::Any + Send + Sync>>;

    /// Registers a synchronous disposal hook.
    ///
    /// Used by factories to register callbacks that run when the caching
    /// container closes.
    fn push_sync_disposer(&self, f: Box<dyn FnOnce() + Send>);

    /// Registers an asynchronous disposal hook.
    fn push_async_disposer(&self, f: Box<dyn FnOnce() -> BoxFutureUnit + Send>);
}

/// High-level resolver interface with generic, type-safe resolution methods.
///
/// Both [`Container`](crate::Container) and the
/// [`ResolverContext`](crate::ResolverContext) handed to factories
/// implement this trait, so factories resolve their dependencies exactly
/// the way application code does.
///
/// Resolution always requires the exact key that was registered: an
/// unqualified request never falls back to a qualified binding of the
/// same type, and vice versa.
///
/// # Examples
///
/// ```
/// use lattice_di::{BindingSet, Resolver};
/// use std::sync::Arc;
///
/// trait Logger: Send + Sync {
///     fn log(&self, msg: &str);
/// }
///
/// struct ConsoleLogger;
/// impl Logger for ConsoleLogger {
///     fn log(&self, msg: &str) {
///         println!("LOG: {}", msg);
///     }
/// }
///
/// let mut bindings = BindingSet::new();
/// bindings.add_singleton(42usize).unwrap();
/// bindings.add_singleton_trait::<dyn Logger>(Arc::new(ConsoleLogger)).unwrap();
///
/// let container = bindings.build().unwrap();
///
/// let number = container.get_required::<usize>();
/// assert_eq!(*number, 42);
///
/// let logger = container.get_required_trait::<dyn Logger>();
/// logger.log("resolved");
/// ```
pub trait Resolver: ResolverCore {
    /// Resolves a concrete binding.
    ///
    /// The binding must have been registered with the exact type `T` and
    /// no qualifier.
    fn get<T: 'static + Send + Sync>(&self) -> DiResult<Arc<T>> {
        let key = key_of_type::<T>();
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete binding registered under `qualifier`.
    fn get_qualified<T: 'static + Send + Sync>(&self, qualifier: &'static str) -> DiResult<Arc<T>> {
        let key = key_of_qualified::<T>(qualifier);
        let any = self.resolve_any(&key)?;
        any.downcast::<T>()
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a trait-object binding.
    ///
    /// Trait objects are stored as `Arc<Arc<dyn Trait>>` behind the
    /// type-erased `Arc`, so resolution unwraps one level.
    fn get_trait<T: ?Sized + 'static + Send + Sync>(&self) -> DiResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let key = key_of_trait::<T>();
        let any = self.resolve_any(&key)?;
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a trait-object binding registered under `qualifier`.
    fn get_qualified_trait<T: ?Sized + 'static + Send + Sync>(
        &self,
        qualifier: &'static str,
    ) -> DiResult<Arc<T>>
    where
        Arc<T>: 'static,
    {
        let key = key_of_qualified_trait::<T>(qualifier);
        let any = self.resolve_any(&key)?;
        any.downcast::<Arc<T>>()
            .map(|boxed| (*boxed).clone())
            .map_err(|_| DiError::TypeMismatch(std::any::type_name::<T>()))
    }

    /// Resolves a concrete binding, panicking on failure.
    ///
    /// Use this when the binding is known to be registered and a missing
    /// registration is a configuration defect worth failing fast on.
    fn get_required<T: 'static + Send + Sync>(&self) -> Arc<T> {
        self.get::<T>().unwrap_or_else(|e| {
            panic!(
                "Failed to resolve {}: {:?}",
                std::any::type_name::<T>(),
                e
            )
        })
    }

    /// Resolves a qualified concrete binding, panicking on failure.
    fn get_qualified_required<T: 'static + Send + Sync>(&self, qualifier: &'static str) -> Arc<T> {
        self.get_qualified::<T>(qualifier).unwrap_or_else(|e| {
            panic!(
                "Failed to resolve {} ({}): {:?}",
                std::any::type_name::<T>(),
                qualifier,
                e
            )
        })
    }

    /// Resolves a trait-object binding, panicking on failure.
    fn get_required_trait<T: ?Sized + 'static + Send + Sync>(&self) -> Arc<T>
    where
        Arc<T>: 'static,
    {
        self.get_trait::<T>().unwrap_or_else(|e| {
            panic!(
                "Failed to resolve trait {}: {:?}",
                std::any::type_name::<T>(),
                e
            )
        })
    }

    /// Resolves a qualified trait-object binding, panicking on failure.
    fn get_qualified_required_trait<T: ?Sized + 'static + Send + Sync>(
        &self,
        qualifier: &'static str,
    ) -> Arc<T>
    where
        Arc<T>: 'static,
    {
        self.get_qualified_trait::<T>(qualifier).unwrap_or_else(|e| {
            panic!(
                "Failed to resolve trait {} ({}): {:?}",
                std::any::type_name::<T>(),
                qualifier,
                e
            )
        })
    }

    /// Registers an instance for synchronous disposal.
    ///
    /// Call from factories so the instance is torn down when the caching
    /// container closes. Hooks run in LIFO order.
    fn register_disposer<T: Dispose>(&self, instance: Arc<T>) {
        self.push_sync_disposer(Box::new(move || instance.dispose()));
    }

    /// Registers an instance for asynchronous disposal.
    ///
    /// Async hooks run before sync hooks, in LIFO order, when the caching
    /// container is closed via `close_async`.
    fn register_async_disposer<T: AsyncDispose>(&self, instance: Arc<T>) {
        self.push_async_disposer(Box::new(move || {
            Box::pin(async move {
                instance.dispose().await;
            })
        }));
    }
}
