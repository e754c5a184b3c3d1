//! Binding registration for the dependency injection container.
//!
//! This module contains the [`BindingSet`] type: the single-threaded
//! registration phase that is frozen into an immutable [`Container`]
//! via [`build`](BindingSet::build) or
//! [`Container::create_child_with`](crate::Container::create_child_with).

use std::sync::Arc;

use crate::binding::{AnyArc, Coerce, Registration, Registry};
use crate::container::ResolverContext;
use crate::descriptors::{BindingDescriptor, BindingKind};
use crate::key::{key_of_qualified, key_of_qualified_trait, key_of_trait, key_of_type, Key};
use crate::observer::ContainerObserver;
use crate::{Container, DiError, DiResult, Lifetime};

pub mod module_system;
pub use module_system::*;

/// A mutable set of binding registrations.
///
/// Every `add_*` method inserts under an exact `(type, qualifier)` key and
/// fails with [`DiError::DuplicateBinding`] if the key is already present
/// in this set; registration never silently overwrites. Shadowing a
/// *parent's* binding from a child set is allowed and intentional.
///
/// # Examples
///
/// ```rust
/// use lattice_di::{BindingSet, Resolver};
/// use std::sync::Arc;
///
/// struct Database { url: String }
/// struct UserService { db: Arc<Database> }
///
/// # fn main() -> lattice_di::DiResult<()> {
/// let mut bindings = BindingSet::new();
/// bindings
///     .add_singleton(Database { url: "postgres://localhost".to_string() })?
///     .add_transient_factory::<UserService, _>(|r| UserService {
///         db: r.get_required::<Database>(),
///     })?;
///
/// let container = bindings.build()?;
/// let users = container.get_required::<UserService>();
/// assert_eq!(users.db.url, "postgres://localhost");
/// # Ok(())
/// # }
/// ```
pub struct BindingSet {
    registry: Registry,
    observers: Vec<Arc<dyn ContainerObserver>>,
}

impl BindingSet {
    /// Creates a new empty binding set.
    pub fn new() -> Self {
        Self {
            registry: Registry::new(),
            observers: Vec::new(),
        }
    }

    // ----- Concrete instance registrations -----

    /// Registers a pre-built value as a singleton.
    ///
    /// The value is wrapped in an `Arc` immediately; every resolution
    /// returns the same instance.
    pub fn add_singleton<T: 'static + Send + Sync>(&mut self, value: T) -> DiResult<&mut Self> {
        self.add_instance_keyed(key_of_type::<T>(), value)
    }

    /// Registers a pre-built value as a singleton under `qualifier`.
    ///
    /// Qualified bindings coexist with the unqualified binding of the same
    /// type; each is resolved only by its exact key.
    pub fn add_qualified_singleton<T: 'static + Send + Sync>(
        &mut self,
        qualifier: &'static str,
        value: T,
    ) -> DiResult<&mut Self> {
        self.add_instance_keyed(key_of_qualified::<T>(qualifier), value)
    }

    fn add_instance_keyed<T: 'static + Send + Sync>(
        &mut self,
        key: Key,
        value: T,
    ) -> DiResult<&mut Self> {
        let arc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(arc.clone()) };
        self.registry
            .insert(key, Registration::factory(Lifetime::Singleton, Arc::new(ctor)))?;
        Ok(self)
    }

    // ----- Concrete factory registrations -----

    /// Registers a singleton factory, invoked at most once on first
    /// resolution; the result is cached in the owning container.
    pub fn add_singleton_factory<T, F>(&mut self, factory: F) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory_keyed(key_of_type::<T>(), Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory: one instance per resolving container.
    pub fn add_scoped_factory<T, F>(&mut self, factory: F) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory_keyed(key_of_type::<T>(), Lifetime::Scoped, factory)
    }

    /// Registers a transient factory: a fresh instance on every resolution.
    pub fn add_transient_factory<T, F>(&mut self, factory: F) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory_keyed(key_of_type::<T>(), Lifetime::Transient, factory)
    }

    /// Registers a qualified singleton factory.
    pub fn add_qualified_singleton_factory<T, F>(
        &mut self,
        qualifier: &'static str,
        factory: F,
    ) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory_keyed(key_of_qualified::<T>(qualifier), Lifetime::Singleton, factory)
    }

    /// Registers a qualified scoped factory.
    pub fn add_qualified_scoped_factory<T, F>(
        &mut self,
        qualifier: &'static str,
        factory: F,
    ) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory_keyed(key_of_qualified::<T>(qualifier), Lifetime::Scoped, factory)
    }

    /// Registers a qualified transient factory.
    pub fn add_qualified_transient_factory<T, F>(
        &mut self,
        qualifier: &'static str,
        factory: F,
    ) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        self.add_factory_keyed(key_of_qualified::<T>(qualifier), Lifetime::Transient, factory)
    }

    fn add_factory_keyed<T, F>(
        &mut self,
        key: Key,
        lifetime: Lifetime,
        factory: F,
    ) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> T + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry
            .insert(key, Registration::factory(lifetime, Arc::new(ctor)))?;
        Ok(self)
    }

    // ----- Fallible factory registrations -----

    /// Registers a singleton factory that may fail.
    ///
    /// A failed construction is not cached: the error surfaces to the
    /// resolving caller and the next resolution retries the factory.
    pub fn add_singleton_try_factory<T, F>(&mut self, factory: F) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_try_factory_keyed(key_of_type::<T>(), Lifetime::Singleton, factory)
    }

    /// Registers a scoped factory that may fail.
    pub fn add_scoped_try_factory<T, F>(&mut self, factory: F) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_try_factory_keyed(key_of_type::<T>(), Lifetime::Scoped, factory)
    }

    /// Registers a transient factory that may fail.
    pub fn add_transient_try_factory<T, F>(&mut self, factory: F) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        self.add_try_factory_keyed(key_of_type::<T>(), Lifetime::Transient, factory)
    }

    fn add_try_factory_keyed<T, F>(
        &mut self,
        key: Key,
        lifetime: Lifetime,
        factory: F,
    ) -> DiResult<&mut Self>
    where
        T: 'static + Send + Sync,
        F: Fn(&ResolverContext) -> DiResult<T> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> {
            let value = factory(r)?;
            Ok(Arc::new(value))
        };
        self.registry
            .insert(key, Registration::factory(lifetime, Arc::new(ctor)))?;
        Ok(self)
    }

    // ----- Trait-object registrations -----

    /// Registers a singleton trait implementation.
    ///
    /// Binds a concrete implementation, already wrapped in an `Arc`, to a
    /// trait-object key.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lattice_di::{BindingSet, Resolver};
    /// # use std::sync::Arc;
    /// trait Logger: Send + Sync {
    ///     fn log(&self, message: &str);
    /// }
    ///
    /// struct FileLogger { path: String }
    /// impl Logger for FileLogger {
    ///     fn log(&self, _message: &str) {}
    /// }
    ///
    /// let mut bindings = BindingSet::new();
    /// let logger = Arc::new(FileLogger { path: "/var/log/app.log".to_string() });
    /// bindings.add_singleton_trait::<dyn Logger>(logger).unwrap();
    /// ```
    pub fn add_singleton_trait<T>(&mut self, value: Arc<T>) -> DiResult<&mut Self>
    where
        T: ?Sized + 'static + Send + Sync,
    {
        self.add_trait_instance_keyed(key_of_trait::<T>(), value)
    }

    /// Registers a singleton trait implementation under `qualifier`.
    pub fn add_qualified_singleton_trait<T>(
        &mut self,
        qualifier: &'static str,
        value: Arc<T>,
    ) -> DiResult<&mut Self>
    where
        T: ?Sized + 'static + Send + Sync,
    {
        self.add_trait_instance_keyed(key_of_qualified_trait::<T>(qualifier), value)
    }

    fn add_trait_instance_keyed<T>(&mut self, key: Key, value: Arc<T>) -> DiResult<&mut Self>
    where
        T: ?Sized + 'static + Send + Sync,
    {
        // Trait objects are stored as Arc<Arc<dyn Trait>> behind the erased Arc
        let any_arc: AnyArc = Arc::new(value);
        let ctor = move |_: &ResolverContext| -> DiResult<AnyArc> { Ok(any_arc.clone()) };
        self.registry
            .insert(key, Registration::factory(Lifetime::Singleton, Arc::new(ctor)))?;
        Ok(self)
    }

    /// Registers a singleton trait factory.
    pub fn add_singleton_trait_factory<Trait, F>(&mut self, factory: F) -> DiResult<&mut Self>
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory_keyed(key_of_trait::<Trait>(), Lifetime::Singleton, factory)
    }

    /// Registers a scoped trait factory: one implementation instance per
    /// resolving container.
    pub fn add_scoped_trait_factory<Trait, F>(&mut self, factory: F) -> DiResult<&mut Self>
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory_keyed(key_of_trait::<Trait>(), Lifetime::Scoped, factory)
    }

    /// Registers a transient trait factory.
    pub fn add_transient_trait_factory<Trait, F>(&mut self, factory: F) -> DiResult<&mut Self>
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory_keyed(key_of_trait::<Trait>(), Lifetime::Transient, factory)
    }

    /// Registers a qualified trait factory with an explicit lifetime.
    pub fn add_qualified_trait_factory<Trait, F>(
        &mut self,
        lifetime: Lifetime,
        qualifier: &'static str,
        factory: F,
    ) -> DiResult<&mut Self>
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        self.add_trait_factory_keyed(key_of_qualified_trait::<Trait>(qualifier), lifetime, factory)
    }

    fn add_trait_factory_keyed<Trait, F>(
        &mut self,
        key: Key,
        lifetime: Lifetime,
        factory: F,
    ) -> DiResult<&mut Self>
    where
        Trait: ?Sized + 'static + Send + Sync,
        F: Fn(&ResolverContext) -> Arc<Trait> + Send + Sync + 'static,
    {
        let ctor = move |r: &ResolverContext| -> DiResult<AnyArc> { Ok(Arc::new(factory(r))) };
        self.registry
            .insert(key, Registration::factory(lifetime, Arc::new(ctor)))?;
        Ok(self)
    }

    // ----- Alias registrations -----

    /// Aliases the unqualified key of `T` to its binding under
    /// `target_qualifier`, inheriting the target's lifetime.
    ///
    /// Use this to pick one of several qualified bindings as the default.
    pub fn add_alias<T: 'static + Send + Sync>(
        &mut self,
        target_qualifier: &'static str,
    ) -> DiResult<&mut Self> {
        self.add_alias_rule(
            key_of_type::<T>(),
            key_of_qualified::<T>(target_qualifier),
            None,
            None,
        )
    }

    /// Like [`add_alias`](BindingSet::add_alias), but caching the resolved
    /// value under the alias key with `lifetime` instead of inheriting the
    /// target's.
    pub fn add_alias_as<T: 'static + Send + Sync>(
        &mut self,
        target_qualifier: &'static str,
        lifetime: Lifetime,
    ) -> DiResult<&mut Self> {
        self.add_alias_rule(
            key_of_type::<T>(),
            key_of_qualified::<T>(target_qualifier),
            Some(lifetime),
            None,
        )
    }

    /// Aliases `T` under `qualifier` to its binding under
    /// `target_qualifier`, inheriting the target's lifetime.
    pub fn add_qualified_alias<T: 'static + Send + Sync>(
        &mut self,
        qualifier: &'static str,
        target_qualifier: &'static str,
    ) -> DiResult<&mut Self> {
        self.add_alias_rule(
            key_of_qualified::<T>(qualifier),
            key_of_qualified::<T>(target_qualifier),
            None,
            None,
        )
    }

    /// Like [`add_qualified_alias`](BindingSet::add_qualified_alias) with an
    /// explicit lifetime override.
    pub fn add_qualified_alias_as<T: 'static + Send + Sync>(
        &mut self,
        qualifier: &'static str,
        target_qualifier: &'static str,
        lifetime: Lifetime,
    ) -> DiResult<&mut Self> {
        self.add_alias_rule(
            key_of_qualified::<T>(qualifier),
            key_of_qualified::<T>(target_qualifier),
            Some(lifetime),
            None,
        )
    }

    /// Aliases the trait-object key of `TTrait` to the concrete binding of
    /// `TImpl`, inheriting the target's lifetime.
    ///
    /// The `coerce` closure performs the unsizing conversion; at the call
    /// site `|imp| imp` suffices, the compiler coerces `Arc<TImpl>` to
    /// `Arc<dyn Trait>`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use lattice_di::{BindingSet, Resolver};
    /// # use std::sync::Arc;
    /// trait Repository: Send + Sync {
    ///     fn name(&self) -> &str;
    /// }
    ///
    /// struct PostgresRepository;
    /// impl Repository for PostgresRepository {
    ///     fn name(&self) -> &str { "postgres" }
    /// }
    ///
    /// # fn main() -> lattice_di::DiResult<()> {
    /// let mut bindings = BindingSet::new();
    /// bindings.add_singleton(PostgresRepository)?;
    /// bindings.add_trait_alias::<dyn Repository, PostgresRepository, _>(|imp| imp)?;
    ///
    /// let container = bindings.build()?;
    /// let repo = container.get_required_trait::<dyn Repository>();
    /// assert_eq!(repo.name(), "postgres");
    /// # Ok(())
    /// # }
    /// ```
    pub fn add_trait_alias<TTrait, TImpl, F>(&mut self, coerce: F) -> DiResult<&mut Self>
    where
        TTrait: ?Sized + 'static + Send + Sync,
        TImpl: 'static + Send + Sync,
        F: Fn(Arc<TImpl>) -> Arc<TTrait> + Send + Sync + 'static,
    {
        self.add_alias_rule(
            key_of_trait::<TTrait>(),
            key_of_type::<TImpl>(),
            None,
            Some(Self::trait_coercion::<TTrait, TImpl, F>(coerce)),
        )
    }

    /// Like [`add_trait_alias`](BindingSet::add_trait_alias) with an explicit
    /// lifetime override for the alias key.
    pub fn add_trait_alias_as<TTrait, TImpl, F>(
        &mut self,
        lifetime: Lifetime,
        coerce: F,
    ) -> DiResult<&mut Self>
    where
        TTrait: ?Sized + 'static + Send + Sync,
        TImpl: 'static + Send + Sync,
        F: Fn(Arc<TImpl>) -> Arc<TTrait> + Send + Sync + 'static,
    {
        self.add_alias_rule(
            key_of_trait::<TTrait>(),
            key_of_type::<TImpl>(),
            Some(lifetime),
            Some(Self::trait_coercion::<TTrait, TImpl, F>(coerce)),
        )
    }

    fn trait_coercion<TTrait, TImpl, F>(coerce: F) -> Coerce
    where
        TTrait: ?Sized + 'static + Send + Sync,
        TImpl: 'static + Send + Sync,
        F: Fn(Arc<TImpl>) -> Arc<TTrait> + Send + Sync + 'static,
    {
        Arc::new(move |any: AnyArc| -> DiResult<AnyArc> {
            let concrete = any
                .downcast::<TImpl>()
                .map_err(|_| DiError::TypeMismatch(std::any::type_name::<TImpl>()))?;
            Ok(Arc::new(coerce(concrete)))
        })
    }

    fn add_alias_rule(
        &mut self,
        key: Key,
        target: Key,
        lifetime: Option<Lifetime>,
        coerce: Option<Coerce>,
    ) -> DiResult<&mut Self> {
        self.registry
            .insert(key, Registration::alias(target, lifetime, coerce))?;
        Ok(self)
    }

    // ----- Observers and introspection -----

    /// Registers an observer notified of every resolution on the built
    /// container and its children.
    pub fn add_observer(&mut self, observer: Arc<dyn ContainerObserver>) -> &mut Self {
        self.observers.push(observer);
        self
    }

    /// Lists descriptors for every binding registered so far.
    pub fn descriptors(&self) -> Vec<BindingDescriptor> {
        self.registry
            .iter()
            .map(|(key, reg)| BindingDescriptor {
                key: key.clone(),
                lifetime: reg.lifetime(),
                kind: match &reg.rule {
                    crate::binding::BindingRule::Factory { .. } => BindingKind::Factory,
                    crate::binding::BindingRule::Alias { .. } => BindingKind::Alias,
                },
            })
            .collect()
    }

    // ----- Freezing -----

    /// Freezes this set into a root container.
    ///
    /// Alias rules are validated here, the earliest point at which alias
    /// chains can be fully flattened, and a dangling target fails with
    /// [`DiError::InvalidAlias`].
    pub fn build(self) -> DiResult<Container> {
        Container::from_bindings(self, None)
    }

    pub(crate) fn into_parts(self) -> (Registry, Vec<Arc<dyn ContainerObserver>>) {
        (self.registry, self.observers)
    }
}

impl Default for BindingSet {
    fn default() -> Self {
        Self::new()
    }
}
