//! Binding keys for the dependency injection container.

use std::any::TypeId;
use std::fmt;

/// Key for binding storage and lookup.
///
/// Keys uniquely identify bindings in a container, combining the type
/// identity with an optional qualifier. Two bindings with the same type
/// but different qualifiers are distinct keys, and resolution always
/// requires the exact `(type, qualifier)` pair; there is no fallback
/// from a qualified key to an unqualified one or vice versa.
///
/// # Key Types
///
/// - **Type**: Concrete types (structs, enums, primitives)
/// - **TypeQualified**: Concrete type plus a qualifier string
/// - **Trait**: Trait-object bindings
/// - **TraitQualified**: Trait-object bindings plus a qualifier string
///
/// # Examples
///
/// ```rust
/// use lattice_di::{BindingSet, Resolver};
///
/// let mut bindings = BindingSet::new();
/// bindings.add_singleton(8080u32).unwrap();
/// bindings.add_qualified_singleton("admin_port", 9090u32).unwrap();
///
/// let container = bindings.build().unwrap();
///
/// let port = container.get_required::<u32>();
/// let admin = container.get_qualified_required::<u32>("admin_port");
///
/// assert_eq!(*port, 8080);
/// assert_eq!(*admin, 9090);
/// ```
#[derive(Debug, Clone)]
pub enum Key {
    /// Concrete type key with TypeId and name for diagnostics
    Type(TypeId, &'static str),
    /// Qualified concrete type key with TypeId, typename, and qualifier
    ///
    /// Like `Type` but with a qualifier string for cases where multiple
    /// bindings of the same type need to coexist.
    TypeQualified(TypeId, &'static str, &'static str),
    /// Trait-object binding key
    ///
    /// Only stores the trait name since trait objects have no usable
    /// implementation TypeId at registration time.
    Trait(&'static str),
    /// Qualified trait-object binding key with trait name and qualifier
    TraitQualified(&'static str, &'static str),
}

impl Key {
    /// Get the type or trait name for display
    ///
    /// Returns the human-readable type or trait name for debugging and
    /// error messages. This is the `std::any::type_name` result.
    pub fn display_name(&self) -> &'static str {
        match self {
            Key::Type(_, name) => name,
            Key::TypeQualified(_, name, _) => name,
            Key::Trait(name) => name,
            Key::TraitQualified(name, _) => name,
        }
    }

    /// Get the qualifier for qualified keys, or None for unqualified keys
    pub fn qualifier(&self) -> Option<&'static str> {
        match self {
            Key::Type(_, _) | Key::Trait(_) => None,
            Key::TypeQualified(_, _, q) => Some(q),
            Key::TraitQualified(_, q) => Some(q),
        }
    }
}

// Hot path equality: TypeId-only comparison for concrete types; the
// type-name string is diagnostics-only and never participates.
impl PartialEq for Key {
    #[inline(always)]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a == b,
            (Key::TypeQualified(a, _, qa), Key::TypeQualified(b, _, qb)) => a == b && qa == qb,
            (Key::Trait(a), Key::Trait(b)) => a == b,
            (Key::TraitQualified(a, qa), Key::TraitQualified(b, qb)) => a == b && qa == qb,
            _ => false,
        }
    }
}

impl Eq for Key {}

// Ordering for sorting in the hybrid registry
impl PartialOrd for Key {
    #[inline(always)]
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        fn rank(key: &Key) -> u8 {
            match key {
                Key::Type(_, _) => 0,
                Key::TypeQualified(_, _, _) => 1,
                Key::Trait(_) => 2,
                Key::TraitQualified(_, _) => 3,
            }
        }

        rank(self).cmp(&rank(other)).then_with(|| match (self, other) {
            (Key::Type(a, _), Key::Type(b, _)) => a.cmp(b),
            (Key::TypeQualified(a, _, qa), Key::TypeQualified(b, _, qb)) => {
                a.cmp(b).then_with(|| qa.cmp(qb))
            }
            (Key::Trait(a), Key::Trait(b)) => a.cmp(b),
            (Key::TraitQualified(a, qa), Key::TraitQualified(b, qb)) => {
                a.cmp(b).then_with(|| qa.cmp(qb))
            }
            _ => std::cmp::Ordering::Equal,
        })
    }
}

// Hot path hash: TypeId-only for concrete types, mirroring PartialEq
impl std::hash::Hash for Key {
    #[inline(always)]
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        match self {
            Key::Type(id, _) => {
                0u8.hash(state);
                id.hash(state);
            }
            Key::TypeQualified(id, _, q) => {
                1u8.hash(state);
                id.hash(state);
                q.hash(state);
            }
            Key::Trait(name) => {
                2u8.hash(state);
                name.hash(state);
            }
            Key::TraitQualified(name, q) => {
                3u8.hash(state);
                name.hash(state);
                q.hash(state);
            }
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.qualifier() {
            Some(q) => write!(f, "{} (qualifier={:?})", self.display_name(), q),
            None => write!(f, "{}", self.display_name()),
        }
    }
}

/// Key for a concrete type `T`
#[inline(always)]
pub fn key_of_type<T: 'static>() -> Key {
    Key::Type(TypeId::of::<T>(), std::any::type_name::<T>())
}

/// Key for a concrete type `T` under `qualifier`
#[inline(always)]
pub fn key_of_qualified<T: 'static>(qualifier: &'static str) -> Key {
    Key::TypeQualified(TypeId::of::<T>(), std::any::type_name::<T>(), qualifier)
}

/// Key for a trait object `T` (e.g. `dyn Logger`)
#[inline(always)]
pub fn key_of_trait<T: ?Sized + 'static>() -> Key {
    Key::Trait(std::any::type_name::<T>())
}

/// Key for a trait object `T` under `qualifier`
#[inline(always)]
pub fn key_of_qualified_trait<T: ?Sized + 'static>(qualifier: &'static str) -> Key {
    Key::TraitQualified(std::any::type_name::<T>(), qualifier)
}
