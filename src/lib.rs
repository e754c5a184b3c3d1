//! # lattice-di
//!
//! Hierarchical, qualifier-aware dependency injection for Rust with explicit
//! registration and container-scoped lifetimes.
//!
//! ## Features
//!
//! - **Explicit registration**: bindings are plain function calls on a
//!   [`BindingSet`]: no reflection, no code generation
//! - **Type-safe lifetimes**: Singleton, Scoped, and Transient bindings
//! - **Container hierarchy**: parent-pointer tree via `create_child`, with
//!   intentional shadowing and per-container scoped caching
//! - **Qualifiers**: multiple bindings of one type, disambiguated by exact
//!   `(type, qualifier)` keys at registration and resolution
//! - **Aliases**: interface-to-implementation redirects with optional
//!   lifetime override
//! - **Thread-safe**: `Arc`-based sharing with at-most-once construction
//!   per cached key, even under concurrent first resolution
//! - **Circular dependency detection**: detailed error paths for any cycle
//!   length, including self-dependency
//! - **Structured teardown**: `close()` releases cached instances and runs
//!   disposal hooks in LIFO order
//!
//! ## Quick Start
//!
//! ```rust
//! use lattice_di::{BindingSet, Resolver};
//! use std::sync::Arc;
//!
//! struct Database {
//!     connection_string: String,
//! }
//!
//! struct UserService {
//!     db: Arc<Database>,
//! }
//!
//! # fn main() -> lattice_di::DiResult<()> {
//! // Register bindings
//! let mut bindings = BindingSet::new();
//! bindings.add_singleton(Database {
//!     connection_string: "postgres://localhost".to_string(),
//! })?;
//! bindings.add_transient_factory::<UserService, _>(|resolver| UserService {
//!     db: resolver.get_required::<Database>(),
//! })?;
//!
//! // Freeze and resolve
//! let container = bindings.build()?;
//! let user_service = container.get_required::<UserService>();
//! assert_eq!(user_service.db.connection_string, "postgres://localhost");
//! # Ok(())
//! # }
//! ```
//!
//! ## Lifetimes
//!
//! - **Singleton**: created once, cached in the container that owns the
//!   binding, shared by every descendant
//! - **Scoped**: created once per resolving container; each
//!   [`create_child`](Container::create_child) gets its own instance
//! - **Transient**: created fresh on every resolution
//!
//! ## Qualifiers
//!
//! ```rust
//! use lattice_di::{BindingSet, Resolver};
//!
//! # fn main() -> lattice_di::DiResult<()> {
//! let mut bindings = BindingSet::new();
//! bindings.add_qualified_singleton("primary", "postgres://primary".to_string())?;
//! bindings.add_qualified_singleton("replica", "postgres://replica".to_string())?;
//! // Pick the primary as the unqualified default
//! bindings.add_alias::<String>("primary")?;
//!
//! let container = bindings.build()?;
//! assert_eq!(*container.get_required::<String>(), "postgres://primary");
//! assert_eq!(
//!     *container.get_qualified_required::<String>("replica"),
//!     "postgres://replica"
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Nested scopes
//!
//! ```rust
//! use lattice_di::{BindingSet, Resolver};
//! use std::sync::{Arc, Mutex};
//!
//! struct SessionState(u32);
//!
//! # fn main() -> lattice_di::DiResult<()> {
//! let mut bindings = BindingSet::new();
//! let counter = Arc::new(Mutex::new(0));
//! let counter_clone = counter.clone();
//! bindings.add_scoped_factory::<SessionState, _>(move |_| {
//!     let mut c = counter_clone.lock().unwrap();
//!     *c += 1;
//!     SessionState(*c)
//! })?;
//!
//! let root = bindings.build()?;
//! let session = root.create_child();
//! let a = session.get_required::<SessionState>();
//! let b = session.get_required::<SessionState>();
//! assert!(Arc::ptr_eq(&a, &b)); // one instance per session
//!
//! session.close(); // session-scoped instances released here
//! # Ok(())
//! # }
//! ```

// Module declarations
pub mod collection;
pub mod container;
pub mod descriptors;
pub mod error;
pub mod key;
pub mod lifetime;
pub mod observer;
pub mod traits;

// Internal modules
mod binding;
mod internal;

use std::sync::Arc;

// Re-export core types
pub use collection::{BindingSet, BindingSetExt, Module};
pub use container::{Container, ResolverContext};
pub use descriptors::{BindingDescriptor, BindingKind};
pub use error::{DiError, DiResult};
pub use internal::CircularPanic;
pub use key::{key_of_qualified, key_of_qualified_trait, key_of_trait, key_of_type, Key};
pub use lifetime::Lifetime;
pub use observer::{ContainerObserver, LoggingObserver};
pub use traits::{AsyncDispose, Dispose, Resolver, ResolverCore};

// ===== Options Pattern =====

/// Immutable configuration snapshot resolved through the container.
///
/// `Options<T>` wraps the final configured value in an `Arc`; it is built
/// once when first resolved and stays immutable for the life of the
/// container that owns it.
///
/// # Examples
///
/// ```
/// use lattice_di::{BindingSet, Options, Resolver};
///
/// #[derive(Default)]
/// struct AppSettings {
///     name: String,
///     debug: bool,
/// }
///
/// # fn main() -> lattice_di::DiResult<()> {
/// let mut bindings = BindingSet::new();
/// bindings.add_options::<AppSettings>()
///     .configure(|_r, s| {
///         s.name = "MyApp".to_string();
///         s.debug = true;
///     })
///     .register()?;
///
/// let container = bindings.build()?;
/// let options = container.get_required::<Options<AppSettings>>();
/// let settings = options.get();
/// assert_eq!(settings.name, "MyApp");
/// assert!(settings.debug);
/// # Ok(())
/// # }
/// ```
pub struct Options<T> {
    inner: Arc<T>,
}

impl<T> Options<T> {
    /// Creates a new `Options<T>` wrapping the given value.
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(value),
        }
    }

    /// Gets a clone of the inner `Arc<T>` containing the configured value.
    pub fn get(&self) -> Arc<T> {
        self.inner.clone()
    }
}

// Type aliases for the configuration stages
type ConfigureFn<T> = Arc<dyn Fn(&ResolverContext, &mut T) + Send + Sync>;
type ValidateFn<T> = Arc<dyn Fn(&T) -> Result<(), String> + Send + Sync>;

/// Builder for configuring [`Options<T>`] with container dependencies.
///
/// Configuration runs in stages when `Options<T>` is first resolved:
///
/// 1. Create the initial value (`default_with` or `T::default()`)
/// 2. Run all `configure` callbacks in order (each may resolve other
///    bindings through the supplied resolver)
/// 3. Run all `post_configure` callbacks in order
/// 4. Run all `validate` callbacks; any failure panics, fail-fast for
///    configuration defects
///
/// # Examples
///
/// ```
/// use lattice_di::{BindingSet, Options, Resolver};
///
/// #[derive(Default)]
/// struct ApiConfig {
///     base_url: String,
///     timeout_ms: u64,
/// }
///
/// # fn main() -> lattice_di::DiResult<()> {
/// let mut bindings = BindingSet::new();
/// bindings.add_singleton("production".to_string())?; // environment name
///
/// bindings.add_options::<ApiConfig>()
///     .default_with(|| ApiConfig {
///         base_url: "https://api.example.com".to_string(),
///         timeout_ms: 5000,
///     })
///     .configure(|resolver, config| {
///         let env = resolver.get_required::<String>();
///         if env.as_str() == "production" {
///             config.timeout_ms = 2000;
///         }
///     })
///     .post_configure(|_resolver, config| {
///         if !config.base_url.ends_with('/') {
///             config.base_url.push('/');
///         }
///     })
///     .validate(|config| {
///         if config.timeout_ms == 0 {
///             return Err("timeout_ms must be greater than 0".to_string());
///         }
///         Ok(())
///     })
///     .register()?;
///
/// let container = bindings.build()?;
/// let config = container.get_required::<Options<ApiConfig>>().get();
/// assert_eq!(config.timeout_ms, 2000);
/// assert!(config.base_url.ends_with('/'));
/// # Ok(())
/// # }
/// ```
pub struct OptionsBuilder<'a, T>
where
    T: Default + Send + Sync + 'static,
{
    bindings: &'a mut BindingSet,
    default_maker: Option<Arc<dyn Fn() -> T + Send + Sync>>,
    configures: Vec<ConfigureFn<T>>,
    post_configures: Vec<ConfigureFn<T>>,
    validates: Vec<ValidateFn<T>>,
}

impl<'a, T> OptionsBuilder<'a, T>
where
    T: Default + Send + Sync + 'static,
{
    fn new(bindings: &'a mut BindingSet) -> Self {
        Self {
            bindings,
            default_maker: None,
            configures: Vec::new(),
            post_configures: Vec::new(),
            validates: Vec::new(),
        }
    }

    /// Provide a custom default value creator (otherwise `T::default()`).
    pub fn default_with<F>(mut self, f: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        self.default_maker = Some(Arc::new(f));
        self
    }

    /// Configure the value, optionally resolving other bindings through the
    /// supplied resolver. Callbacks run in registration order.
    pub fn configure<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResolverContext, &mut T) + Send + Sync + 'static,
    {
        self.configures.push(Arc::new(f));
        self
    }

    /// Post-process after all configure callbacks; useful for computed
    /// fields and normalization.
    pub fn post_configure<F>(mut self, f: F) -> Self
    where
        F: Fn(&ResolverContext, &mut T) + Send + Sync + 'static,
    {
        self.post_configures.push(Arc::new(f));
        self
    }

    /// Validate the final value.
    ///
    /// # Panics
    ///
    /// A failing validation panics when `Options<T>` is first resolved;
    /// fail-fast for configuration defects.
    pub fn validate<F>(mut self, f: F) -> Self
    where
        F: Fn(&T) -> Result<(), String> + Send + Sync + 'static,
    {
        self.validates.push(Arc::new(f));
        self
    }

    /// Finish building and register `Options<T>` as a singleton.
    pub fn register(self) -> DiResult<()> {
        let default_maker = self.default_maker;
        let configures = self.configures;
        let post_configures = self.post_configures;
        let validates = self.validates;

        self.bindings
            .add_singleton_factory::<Options<T>, _>(move |resolver| {
                let mut value: T = match &default_maker {
                    Some(mk) => (mk)(),
                    None => T::default(),
                };
                for c in &configures {
                    c(resolver, &mut value);
                }
                for pc in &post_configures {
                    pc(resolver, &mut value);
                }
                for v in &validates {
                    if let Err(msg) = v(&value) {
                        panic!(
                            "Options<{}> validation failed: {}",
                            std::any::type_name::<T>(),
                            msg
                        );
                    }
                }
                Options::new(value)
            })?;
        Ok(())
    }
}

/// Extensions to [`BindingSet`] for the Options pattern.
impl BindingSet {
    /// Start building `Options<T>`. Call `.register()` to finalize.
    pub fn add_options<T>(&mut self) -> OptionsBuilder<'_, T>
    where
        T: Default + Send + Sync + 'static,
    {
        OptionsBuilder::new(self)
    }
}
