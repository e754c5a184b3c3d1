//! The container: hierarchical binding resolution and lifecycle management.
//!
//! A [`Container`] is a frozen set of bindings plus an instance cache,
//! optionally parented to another container. Resolution walks the chain
//! child → parent; caching follows the binding's [`Lifetime`](crate::Lifetime).

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use once_cell::sync::OnceCell;

use crate::binding::{AnyArc, BindingRule, Registration, Registry};
use crate::internal::{with_circular_catch, BoxFutureUnit, DisposeBag};
use crate::observer::Observers;
use crate::traits::{Resolver, ResolverCore};
use crate::{DiError, DiResult, Key, Lifetime};

mod context;
pub use context::ResolverContext;

use crate::collection::BindingSet;

/// A node in the container hierarchy.
///
/// Containers are built by freezing a [`BindingSet`], either into a root
/// via [`BindingSet::build`] or into a child via
/// [`create_child_with`](Container::create_child_with). After freezing, the
/// registry is immutable; the per-container instance cache is the only
/// mutable state and guarantees at-most-once construction per key even
/// under concurrent first-time resolution.
///
/// `Container` is cheap to clone (`Arc` inner) and fully thread-safe.
///
/// # Examples
///
/// ```
/// use lattice_di::{BindingSet, Resolver};
/// use std::sync::Arc;
///
/// struct Config { url: String }
///
/// let mut bindings = BindingSet::new();
/// bindings.add_singleton(Config { url: "postgres://localhost".to_string() }).unwrap();
///
/// let root = bindings.build().unwrap();
/// let child = root.create_child();
///
/// // Parent bindings are visible from children
/// let a = root.get_required::<Config>();
/// let b = child.get_required::<Config>();
/// assert!(Arc::ptr_eq(&a, &b));
/// ```
pub struct Container {
    inner: Arc<ContainerInner>,
}

pub(crate) struct ContainerInner {
    registry: Registry,
    parent: Option<Container>,
    /// Instance cache: one `OnceCell` per key gives at-most-once
    /// construction; a failed construction leaves the cell empty so the
    /// next resolution retries.
    cache: Mutex<HashMap<Key, Arc<OnceCell<AnyArc>>>>,
    disposers: Mutex<DisposeBag>,
    observers: Observers,
    closed: AtomicBool,
}

impl Clone for Container {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl Container {
    /// Freezes a binding set into a container parented to `parent`.
    ///
    /// Validates every alias rule against the combined chain; a dangling
    /// target fails with `DiError::InvalidAlias`.
    pub(crate) fn from_bindings(
        bindings: BindingSet,
        parent: Option<Container>,
    ) -> DiResult<Container> {
        let (mut registry, observers) = bindings.into_parts();
        registry.finalize();
        validate_aliases(&registry, parent.as_ref())?;

        let observers = match &parent {
            Some(p) => p.inner.observers.merged(observers),
            None => Observers::from_vec(observers),
        };

        Ok(Container {
            inner: Arc::new(ContainerInner {
                registry,
                parent,
                cache: Mutex::new(HashMap::new()),
                disposers: Mutex::new(DisposeBag::default()),
                observers,
                closed: AtomicBool::new(false),
            }),
        })
    }

    /// Creates a child container with no local bindings.
    ///
    /// The child resolves everything through its parent but keeps its own
    /// instance cache, so `Scoped` bindings yield one instance per child.
    /// Use this to bound the lifetime of per-request or per-session
    /// instances: create a child, resolve through it, then
    /// [`close`](Container::close) it.
    ///
    /// # Examples
    ///
    /// ```
    /// use lattice_di::{BindingSet, Resolver};
    /// use std::sync::{Arc, Mutex};
    ///
    /// struct RequestId(u32);
    ///
    /// let mut bindings = BindingSet::new();
    /// let counter = Arc::new(Mutex::new(0));
    /// let counter_clone = counter.clone();
    /// bindings.add_scoped_factory::<RequestId, _>(move |_| {
    ///     let mut c = counter_clone.lock().unwrap();
    ///     *c += 1;
    ///     RequestId(*c)
    /// }).unwrap();
    ///
    /// let root = bindings.build().unwrap();
    /// let child1 = root.create_child();
    /// let child2 = root.create_child();
    ///
    /// let id1a = child1.get_required::<RequestId>();
    /// let id1b = child1.get_required::<RequestId>();
    /// let id2 = child2.get_required::<RequestId>();
    ///
    /// assert!(Arc::ptr_eq(&id1a, &id1b)); // same child, same instance
    /// assert!(!Arc::ptr_eq(&id1a, &id2)); // different children differ
    /// ```
    pub fn create_child(&self) -> Container {
        Container {
            inner: Arc::new(ContainerInner {
                registry: Registry::new(),
                parent: Some(self.clone()),
                cache: Mutex::new(HashMap::new()),
                disposers: Mutex::new(DisposeBag::default()),
                observers: self.inner.observers.clone(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Creates a child container with its own bindings.
    ///
    /// Local bindings shadow parent bindings for the same key; the parent
    /// is left untouched. Alias targets may live anywhere in the chain.
    pub fn create_child_with(&self, bindings: BindingSet) -> DiResult<Container> {
        Container::from_bindings(bindings, Some(self.clone()))
    }

    /// Whether [`close`](Container::close) has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    /// Closes the container: new resolutions fail with `DiError::Closed`,
    /// the instance cache is released, and sync disposal hooks run in LIFO
    /// order.
    ///
    /// Instances already handed out stay valid; they are `Arc`-owned by
    /// their holders. Closing is idempotent and safe to call concurrently
    /// with in-flight resolutions: a resolution that started before the
    /// close may still complete, anything starting after fails.
    ///
    /// Async disposal hooks are *not* run here; if any are registered a
    /// warning is logged and [`close_async`](Container::close_async) should
    /// be used instead.
    pub fn close(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.cache.lock().unwrap().clear();
        let mut bag = {
            let mut guard = self.inner.disposers.lock().unwrap();
            std::mem::take(&mut *guard)
        };
        if bag.has_async() {
            tracing::warn!(
                "container closed synchronously with pending async disposers; use close_async"
            );
        }
        bag.run_all_sync_reverse();
    }

    /// Closes the container, running async disposal hooks first (LIFO),
    /// then sync hooks (LIFO).
    pub async fn close_async(&self) {
        if self.inner.closed.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.cache.lock().unwrap().clear();
        let mut bag = {
            let mut guard = self.inner.disposers.lock().unwrap();
            std::mem::take(&mut *guard)
        };
        bag.run_all_async_reverse().await;
        bag.run_all_sync_reverse();
    }

    #[cfg(feature = "diagnostics")]
    pub fn to_debug_string(&self) -> String {
        let mut s = String::new();
        s.push_str("=== Container Debug ===\n");
        let mut cur = Some(self);
        let mut depth = 0usize;
        while let Some(c) = cur {
            s.push_str(&format!("Level {} bindings:\n", depth));
            for (k, reg) in c.inner.registry.iter() {
                s.push_str(&format!("  {}: {:?}\n", k, reg.lifetime()));
            }
            cur = c.inner.parent.as_ref();
            depth += 1;
        }
        s
    }

    /// Resolution entry with cycle detection for one key.
    fn resolve_keyed(&self, key: &Key) -> DiResult<AnyArc> {
        with_circular_catch(key, || self.resolve_impl(key))
    }

    /// Walks the chain child → parent for the owning registry.
    fn resolve_impl(&self, key: &Key) -> DiResult<AnyArc> {
        let mut cur: &Container = self;
        loop {
            if let Some(reg) = cur.inner.registry.get(key) {
                return self.resolve_registration(cur, key, reg);
            }
            match cur.inner.parent.as_ref() {
                Some(parent) => cur = parent,
                None => return Err(DiError::NotFound(key.display_name())),
            }
        }
    }

    fn resolve_registration(
        &self,
        owner: &Container,
        key: &Key,
        reg: &Registration,
    ) -> DiResult<AnyArc> {
        match &reg.rule {
            BindingRule::Factory { lifetime, ctor } => match lifetime {
                Lifetime::Transient => {
                    let ctx = ResolverContext::new(self);
                    (ctor)(&ctx)
                }
                // Singleton construction resolves its dependencies against
                // the owning container, never a child, so a parent-owned
                // instance cannot capture a child-local dependency.
                Lifetime::Singleton => owner.cache_get_or_init(key, || {
                    let ctx = ResolverContext::new(owner);
                    (ctor)(&ctx)
                }),
                Lifetime::Scoped => self.cache_get_or_init(key, || {
                    let ctx = ResolverContext::new(self);
                    (ctor)(&ctx)
                }),
            },
            BindingRule::Alias {
                target,
                lifetime,
                coerce,
            } => {
                let resolve_target = || -> DiResult<AnyArc> {
                    let raw = self.resolve_keyed(target)?;
                    match coerce {
                        Some(c) => (c)(raw),
                        None => Ok(raw),
                    }
                };
                match lifetime {
                    // No override: the target's own caching applies
                    None | Some(Lifetime::Transient) => resolve_target(),
                    Some(Lifetime::Singleton) => owner.cache_get_or_init(key, resolve_target),
                    Some(Lifetime::Scoped) => self.cache_get_or_init(key, resolve_target),
                }
            }
        }
    }

    /// At-most-once construction per (key, this container).
    ///
    /// Concurrent first-time callers serialize on the key's cell and all
    /// observe the same instance; a failed construction leaves the cell
    /// empty, so the next resolution retries.
    fn cache_get_or_init(
        &self,
        key: &Key,
        init: impl FnOnce() -> DiResult<AnyArc>,
    ) -> DiResult<AnyArc> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(DiError::Closed);
        }
        let cell = {
            let mut cache = self.inner.cache.lock().unwrap();
            cache
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .clone()
        };
        let value = cell.get_or_try_init(init)?;
        Ok(value.clone())
    }
}

fn validate_aliases(registry: &Registry, parent: Option<&Container>) -> DiResult<()> {
    for (key, reg) in registry.iter() {
        if let BindingRule::Alias { target, .. } = &reg.rule {
            let mut found = registry.contains_key(target);
            let mut cur = parent;
            while !found {
                match cur {
                    Some(c) => {
                        found = c.inner.registry.contains_key(target);
                        cur = c.inner.parent.as_ref();
                    }
                    None => break,
                }
            }
            if !found {
                return Err(DiError::InvalidAlias {
                    alias: key.display_name(),
                    target: target.display_name(),
                });
            }
        }
    }
    Ok(())
}

impl ResolverCore for Container {
    fn resolve_any(&self, key: &Key) -> DiResult<AnyArc> {
        if self.inner.closed.load(Ordering::SeqCst) {
            return Err(DiError::Closed);
        }
        if self.inner.observers.has_observers() {
            let start = std::time::Instant::now();
            self.inner.observers.resolving(key);
            let result = self.resolve_keyed(key);
            match &result {
                Ok(_) => self.inner.observers.resolved(key, start.elapsed()),
                Err(e) => self.inner.observers.resolve_failed(key, e),
            }
            result
        } else {
            self.resolve_keyed(key)
        }
    }

    fn push_sync_disposer(&self, f: Box<dyn FnOnce() + Send>) {
        self.inner.disposers.lock().unwrap().push_sync(f);
    }

    fn push_async_disposer(&self, f: Box<dyn FnOnce() -> BoxFutureUnit + Send>) {
        self.inner.disposers.lock().unwrap().push_async(f);
    }
}

impl Resolver for Container {}

impl Drop for Container {
    fn drop(&mut self) {
        // Last handle on this node: warn if teardown was skipped
        if Arc::strong_count(&self.inner) == 1 && !self.inner.closed.load(Ordering::SeqCst) {
            if let Ok(bag) = self.inner.disposers.try_lock() {
                if !bag.is_empty() {
                    tracing::warn!(
                        "container dropped with undisposed resources; call close() or close_async() first"
                    );
                }
            }
        }
    }
}
