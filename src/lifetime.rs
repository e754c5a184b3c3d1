//! Binding lifetime definitions.

/// Binding lifetimes controlling instance caching behavior
///
/// Defines how instances are created, cached, and shared within the
/// container hierarchy.
///
/// # Lifetime Characteristics
///
/// - **Singleton**: one instance per (key, owning container), shared by all
///   descendants that resolve through it
/// - **Scoped**: one instance per (key, resolving container); each child
///   container created with [`create_child`](crate::Container::create_child)
///   gets its own
/// - **Transient**: a fresh instance on every resolution, never cached
///
/// # Examples
///
/// ```rust
/// use lattice_di::{BindingSet, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct RequestContext { id: u32 }
///
/// let mut bindings = BindingSet::new();
///
/// // Singleton: one instance cached in the container that owns the binding
/// bindings.add_singleton(Database {
///     url: "postgres://localhost".to_string(),
/// }).unwrap();
///
/// // Scoped: one instance per resolving container
/// bindings.add_scoped_factory::<RequestContext, _>(|_| {
///     RequestContext { id: 7 }
/// }).unwrap();
///
/// let root = bindings.build().unwrap();
/// let child1 = root.create_child();
/// let child2 = root.create_child();
///
/// // Singleton: same instance everywhere in the chain
/// let db1 = child1.get_required::<Database>();
/// let db2 = child2.get_required::<Database>();
/// assert!(Arc::ptr_eq(&db1, &db2));
///
/// // Scoped: same within a child, different across children
/// let ctx1a = child1.get_required::<RequestContext>();
/// let ctx1b = child1.get_required::<RequestContext>();
/// let ctx2 = child2.get_required::<RequestContext>();
/// assert!(Arc::ptr_eq(&ctx1a, &ctx1b));
/// assert!(!Arc::ptr_eq(&ctx1a, &ctx2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// Single instance per owning container, cached until that container closes
    ///
    /// The instance is created on first resolution and cached in the
    /// container that owns the binding, so every container in the subtree
    /// below the owner observes the same instance.
    Singleton,
    /// Single instance per resolving container
    ///
    /// The instance is cached in the container on which `resolve` was
    /// called. Two sibling children yield two distinct instances; repeated
    /// resolutions on one container yield the same instance.
    Scoped,
    /// New instance per resolution, never cached
    Transient,
}
