//! Resolver context handed to factory functions.

use crate::traits::{Resolver, ResolverCore};

/// Context passed to factory functions for resolving dependencies.
///
/// `ResolverContext` wraps the container a factory is being invoked for and
/// exposes the full [`Resolver`] surface, so factories declare their
/// dependencies simply by resolving them:
///
/// ```
/// use lattice_di::{BindingSet, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// let mut bindings = BindingSet::new();
/// bindings.add_singleton(Database {
///     url: "postgres://localhost".to_string(),
/// }).unwrap();
/// bindings.add_transient_factory::<UserService, _>(|resolver| {
///     UserService {
///         db: resolver.get_required::<Database>(),
///     }
/// }).unwrap();
/// # let container = bindings.build().unwrap();
/// # assert_eq!(container.get_required::<UserService>().db.url, "postgres://localhost");
/// ```
///
/// For singleton bindings the context wraps the container that owns the
/// binding, so a parent-owned singleton can never capture a child-local
/// dependency; scoped and transient factories resolve against the container
/// the resolution started on.
pub struct ResolverContext<'a> {
    resolver: &'a dyn ResolverCore,
}

impl<'a> ResolverContext<'a> {
    pub(crate) fn new<T>(resolver: &'a T) -> Self
    where
        T: ResolverCore,
    {
        Self { resolver }
    }
}

impl<'a> ResolverCore for ResolverContext<'a> {
    fn resolve_any(
        &self,
        key: &crate::Key,
    ) -> crate::DiResult<std::sync::Arc<dyn std::any::Any + Send + Sync>> {
        self.resolver.resolve_any(key)
    }

    fn push_sync_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.resolver.push_sync_disposer(f);
    }

    fn push_async_disposer(&self, f: Box<dyn FnOnce() -> crate::internal::BoxFutureUnit + Send>) {
        self.resolver.push_async_disposer(f);
    }
}

impl<'a> Resolver for ResolverContext<'a> {}
