//! Binding rules and the registry that stores them.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

use crate::error::{DiError, DiResult};
use crate::key::Key;
use crate::lifetime::Lifetime;

// ResolverContext is defined in the container module
pub(crate) use crate::container::ResolverContext;

// Type-erased Arc for storage
pub(crate) type AnyArc = Arc<dyn Any + Send + Sync>;

/// Type-erased constructor invoked with a resolver context for dependencies
pub(crate) type Ctor =
    Arc<dyn for<'a> Fn(&ResolverContext<'a>) -> DiResult<AnyArc> + Send + Sync>;

/// Converts a target key's stored representation into the alias key's
/// representation (e.g. `Arc<Impl>` into `Arc<Arc<dyn Trait>>`)
pub(crate) type Coerce = Arc<dyn Fn(AnyArc) -> DiResult<AnyArc> + Send + Sync>;

/// How a binding produces its value
pub(crate) enum BindingRule {
    /// Construct via a factory, caching per `lifetime`
    Factory { lifetime: Lifetime, ctor: Ctor },
    /// Redirect to another key.
    ///
    /// `lifetime: None` inherits the target's caching; `Some` overrides it
    /// and caches the coerced value under the alias key.
    Alias {
        target: Key,
        lifetime: Option<Lifetime>,
        coerce: Option<Coerce>,
    },
}

/// A single registered binding
pub(crate) struct Registration {
    pub(crate) rule: BindingRule,
}

impl Registration {
    pub(crate) fn factory(lifetime: Lifetime, ctor: Ctor) -> Self {
        Self {
            rule: BindingRule::Factory { lifetime, ctor },
        }
    }

    pub(crate) fn alias(target: Key, lifetime: Option<Lifetime>, coerce: Option<Coerce>) -> Self {
        Self {
            rule: BindingRule::Alias {
                target,
                lifetime,
                coerce,
            },
        }
    }

    /// The declared lifetime, if any (aliases without an override report None)
    pub(crate) fn lifetime(&self) -> Option<Lifetime> {
        match &self.rule {
            BindingRule::Factory { lifetime, .. } => Some(*lifetime),
            BindingRule::Alias { lifetime, .. } => *lifetime,
        }
    }
}

/// Binding registry holding all registrations of one container
pub(crate) struct Registry {
    /// Fast Vec lookup for the first N registrations (cache-friendly)
    one_small: Vec<(Key, Registration)>,
    /// HashMap fallback for remaining registrations
    one_large: HashMap<Key, Registration>,
    /// Threshold for Vec vs HashMap (Vec wins for small collections)
    small_threshold: usize,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            one_small: Vec::new(),
            one_large: HashMap::new(),
            small_threshold: 16,
        }
    }

    /// Inserts a registration; a key already present is a registration error,
    /// never a silent overwrite.
    pub(crate) fn insert(&mut self, key: Key, registration: Registration) -> DiResult<()> {
        if self.contains_key(&key) {
            return Err(DiError::DuplicateBinding(key.display_name()));
        }
        if self.one_small.len() < self.small_threshold {
            self.one_small.push((key, registration));
        } else {
            self.one_large.insert(key, registration);
        }
        Ok(())
    }

    /// Gets a registration with optimal lookup
    #[inline(always)]
    pub(crate) fn get(&self, key: &Key) -> Option<&Registration> {
        // Fast path: linear search through the Vec
        for (k, reg) in &self.one_small {
            if k == key {
                return Some(reg);
            }
        }
        self.one_large.get(key)
    }

    /// Checks if a key exists in the registry
    #[inline(always)]
    pub(crate) fn contains_key(&self, key: &Key) -> bool {
        self.one_small.iter().any(|(k, _)| k == key) || self.one_large.contains_key(key)
    }

    /// Iterator over all key-registration pairs
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&Key, &Registration)> {
        self.one_small
            .iter()
            .map(|(k, r)| (k, r))
            .chain(self.one_large.iter())
    }

    /// Finalizes the registry before freezing into a container: sorts the
    /// small Vec by key for better cache locality during lookup.
    pub(crate) fn finalize(&mut self) {
        self.one_small.sort_by(|a, b| a.0.cmp(&b.0));
    }
}
