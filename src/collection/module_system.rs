//! Module system for grouped registration.
//!
//! A module is just a value that knows how to register a related group of
//! bindings; application bootstrap composes modules instead of one long
//! registration function.

use crate::{BindingSet, DiResult};

/// A group of related binding registrations.
///
/// # Example
///
/// ```rust
/// use lattice_di::{BindingSet, BindingSetExt, DiResult, Module, Resolver};
///
/// struct UserConfig { max_sessions: u32 }
/// struct UserService;
///
/// struct UserModule;
///
/// impl Module for UserModule {
///     fn register(self, bindings: &mut BindingSet) -> DiResult<()> {
///         bindings.add_singleton(UserConfig { max_sessions: 64 })?;
///         bindings.add_scoped_factory::<UserService, _>(|r| {
///             let _config = r.get_required::<UserConfig>();
///             UserService
///         })?;
///         Ok(())
///     }
/// }
///
/// # fn main() -> DiResult<()> {
/// let mut bindings = BindingSet::new();
/// bindings.add_module(UserModule)?;
/// let container = bindings.build()?;
/// # let _ = container;
/// # Ok(())
/// # }
/// ```
pub trait Module {
    /// Register this module's bindings.
    fn register(self, bindings: &mut BindingSet) -> DiResult<()>;
}

/// Extension trait adding module registration to [`BindingSet`].
pub trait BindingSetExt {
    /// Registers a module in-place, propagating any registration error
    /// (duplicate keys across modules surface here).
    fn add_module<M: Module>(&mut self, module: M) -> DiResult<&mut Self>;
}

impl BindingSetExt for BindingSet {
    fn add_module<M: Module>(&mut self, module: M) -> DiResult<&mut Self> {
        module.register(self)?;
        Ok(self)
    }
}
