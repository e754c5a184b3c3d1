use lattice_di::{BindingSet, BindingSetExt, DiError, DiResult, Module, Resolver};
use std::sync::Arc;

struct DatabaseConfig {
    url: String,
}

struct Database {
    config: Arc<DatabaseConfig>,
}

struct DatabaseModule {
    url: &'static str,
}

impl Module for DatabaseModule {
    fn register(self, bindings: &mut BindingSet) -> DiResult<()> {
        bindings.add_singleton(DatabaseConfig {
            url: self.url.to_string(),
        })?;
        bindings.add_singleton_factory::<Database, _>(|r| Database {
            config: r.get_required::<DatabaseConfig>(),
        })?;
        Ok(())
    }
}

struct UserService {
    db: Arc<Database>,
}

struct UserModule;

impl Module for UserModule {
    fn register(self, bindings: &mut BindingSet) -> DiResult<()> {
        bindings.add_scoped_factory::<UserService, _>(|r| UserService {
            db: r.get_required::<Database>(),
        })?;
        Ok(())
    }
}

#[test]
fn test_modules_compose() {
    let mut bindings = BindingSet::new();
    bindings
        .add_module(DatabaseModule {
            url: "postgres://localhost",
        })
        .unwrap();
    bindings.add_module(UserModule).unwrap();

    let container = bindings.build().unwrap();
    let session = container.create_child();

    let users = session.get_required::<UserService>();
    assert_eq!(users.db.config.url, "postgres://localhost");
}

#[test]
fn test_duplicate_across_modules_propagates() {
    let mut bindings = BindingSet::new();
    bindings
        .add_module(DatabaseModule {
            url: "postgres://a",
        })
        .unwrap();

    // Registering the same keys again from a second module instance fails
    let result = bindings.add_module(DatabaseModule {
        url: "postgres://b",
    });
    assert!(matches!(result, Err(DiError::DuplicateBinding(_))));

    // The original registrations survive
    let container = bindings.build().unwrap();
    let db = container.get_required::<Database>();
    assert_eq!(db.config.url, "postgres://a");
}

#[test]
fn test_module_per_child_scope() {
    struct TenantConfig {
        tenant: &'static str,
    }

    struct TenantModule {
        tenant: &'static str,
    }

    impl Module for TenantModule {
        fn register(self, bindings: &mut BindingSet) -> DiResult<()> {
            let tenant = self.tenant;
            bindings.add_singleton(TenantConfig { tenant })?;
            Ok(())
        }
    }

    let root = BindingSet::new().build().unwrap();

    let mut alpha_bindings = BindingSet::new();
    alpha_bindings.add_module(TenantModule { tenant: "alpha" }).unwrap();
    let alpha = root.create_child_with(alpha_bindings).unwrap();

    let mut beta_bindings = BindingSet::new();
    beta_bindings.add_module(TenantModule { tenant: "beta" }).unwrap();
    let beta = root.create_child_with(beta_bindings).unwrap();

    assert_eq!(alpha.get_required::<TenantConfig>().tenant, "alpha");
    assert_eq!(beta.get_required::<TenantConfig>().tenant, "beta");
}
