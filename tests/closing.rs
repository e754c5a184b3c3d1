use lattice_di::{AsyncDispose, BindingSet, DiError, Dispose, Resolver};
use std::sync::{Arc, Mutex};

#[test]
fn test_resolve_after_close_fails() {
    let mut bindings = BindingSet::new();
    bindings.add_singleton(42u32).unwrap();

    let container = bindings.build().unwrap();
    assert_eq!(*container.get_required::<u32>(), 42);

    container.close();

    assert!(container.is_closed());
    assert!(matches!(container.get::<u32>(), Err(DiError::Closed)));
}

#[test]
fn test_instances_outlive_close() {
    struct Payload {
        data: Vec<u8>,
    }

    let mut bindings = BindingSet::new();
    bindings
        .add_singleton(Payload {
            data: vec![1, 2, 3],
        })
        .unwrap();

    let container = bindings.build().unwrap();
    let held = container.get_required::<Payload>();

    container.close();

    // An Arc handed out before close stays valid
    assert_eq!(held.data, vec![1, 2, 3]);
}

#[test]
fn test_close_is_idempotent() {
    let disposed = Arc::new(Mutex::new(0));

    struct Resource {
        disposed: Arc<Mutex<u32>>,
    }

    impl Dispose for Resource {
        fn dispose(&self) {
            *self.disposed.lock().unwrap() += 1;
        }
    }

    let disposed_clone = disposed.clone();
    let mut bindings = BindingSet::new();
    bindings
        .add_singleton_factory::<Arc<Resource>, _>(move |r| {
            let resource = Arc::new(Resource {
                disposed: disposed_clone.clone(),
            });
            r.register_disposer(resource.clone());
            resource
        })
        .unwrap();

    let container = bindings.build().unwrap();
    let _resource = container.get_required::<Arc<Resource>>();

    container.close();
    container.close();
    container.close();

    assert_eq!(*disposed.lock().unwrap(), 1);
}

#[test]
fn test_sync_disposal_lifo_order() {
    let disposal_order = Arc::new(Mutex::new(Vec::new()));

    struct Tracked {
        name: &'static str,
        order: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Dispose for Tracked {
        fn dispose(&self) {
            self.order.lock().unwrap().push(self.name);
        }
    }

    struct First(Arc<Tracked>);
    struct Second(Arc<Tracked>);
    struct Third(Arc<Tracked>);

    let mut bindings = BindingSet::new();

    let order1 = disposal_order.clone();
    bindings
        .add_singleton_factory::<First, _>(move |r| {
            let inner = Arc::new(Tracked {
                name: "First",
                order: order1.clone(),
            });
            r.register_disposer(inner.clone());
            First(inner)
        })
        .unwrap();

    let order2 = disposal_order.clone();
    bindings
        .add_singleton_factory::<Second, _>(move |r| {
            let inner = Arc::new(Tracked {
                name: "Second",
                order: order2.clone(),
            });
            r.register_disposer(inner.clone());
            Second(inner)
        })
        .unwrap();

    let order3 = disposal_order.clone();
    bindings
        .add_transient_factory::<Third, _>(move |r| {
            let inner = Arc::new(Tracked {
                name: "Third",
                order: order3.clone(),
            });
            r.register_disposer(inner.clone());
            Third(inner)
        })
        .unwrap();

    let container = bindings.build().unwrap();

    // Resolve in order: First, Second, Third (registers disposers in order)
    let _first = container.get_required::<First>();
    let _second = container.get_required::<Second>();
    let _third = container.get_required::<Third>();

    container.close();

    // LIFO: Third, Second, First
    assert_eq!(*disposal_order.lock().unwrap(), vec!["Third", "Second", "First"]);
}

#[test]
fn test_async_disposal_runs_before_sync() {
    let disposal_order = Arc::new(Mutex::new(Vec::new()));

    struct SyncResource {
        order: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Dispose for SyncResource {
        fn dispose(&self) {
            self.order.lock().unwrap().push("sync");
        }
    }

    struct AsyncResource {
        order: Arc<Mutex<Vec<&'static str>>>,
    }

    #[async_trait::async_trait]
    impl AsyncDispose for AsyncResource {
        async fn dispose(&self) {
            self.order.lock().unwrap().push("async");
        }
    }

    let sync_order = disposal_order.clone();
    let async_order = disposal_order.clone();

    let mut bindings = BindingSet::new();
    bindings
        .add_singleton_factory::<Arc<SyncResource>, _>(move |r| {
            let resource = Arc::new(SyncResource {
                order: sync_order.clone(),
            });
            r.register_disposer(resource.clone());
            resource
        })
        .unwrap();
    bindings
        .add_singleton_factory::<Arc<AsyncResource>, _>(move |r| {
            let resource = Arc::new(AsyncResource {
                order: async_order.clone(),
            });
            r.register_async_disposer(resource.clone());
            resource
        })
        .unwrap();

    let container = bindings.build().unwrap();
    let _sync = container.get_required::<Arc<SyncResource>>();
    let _async = container.get_required::<Arc<AsyncResource>>();

    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        container.close_async().await;
    });

    assert_eq!(*disposal_order.lock().unwrap(), vec!["async", "sync"]);
}

#[test]
fn test_closing_child_leaves_parent_usable() {
    struct SessionCache {
        entries: Arc<Mutex<Vec<String>>>,
    }

    impl Dispose for SessionCache {
        fn dispose(&self) {
            self.entries.lock().unwrap().clear();
        }
    }

    let entries = Arc::new(Mutex::new(vec!["cached".to_string()]));
    let entries_clone = entries.clone();

    let mut bindings = BindingSet::new();
    bindings.add_singleton(5u8).unwrap();
    bindings
        .add_scoped_factory::<Arc<SessionCache>, _>(move |r| {
            let cache = Arc::new(SessionCache {
                entries: entries_clone.clone(),
            });
            r.register_disposer(cache.clone());
            cache
        })
        .unwrap();

    let root = bindings.build().unwrap();
    let session = root.create_child();

    let _cache = session.get_required::<Arc<SessionCache>>();
    assert_eq!(entries.lock().unwrap().len(), 1);

    session.close();

    // Scoped teardown ran, and only for the child
    assert_eq!(entries.lock().unwrap().len(), 0);
    assert!(matches!(
        session.get::<Arc<SessionCache>>(),
        Err(DiError::Closed)
    ));
    assert_eq!(*root.get_required::<u8>(), 5);
}
