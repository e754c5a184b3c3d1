use lattice_di::{BindingSet, ContainerObserver, DiError, Key, LoggingObserver, Resolver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

#[derive(Default)]
struct CountingObserver {
    resolving: AtomicUsize,
    resolved: AtomicUsize,
    failed: AtomicUsize,
}

impl ContainerObserver for CountingObserver {
    fn resolving(&self, _key: &Key) {
        self.resolving.fetch_add(1, Ordering::SeqCst);
    }

    fn resolved(&self, _key: &Key, _duration: Duration) {
        self.resolved.fetch_add(1, Ordering::SeqCst);
    }

    fn resolve_failed(&self, _key: &Key, _error: &DiError) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }
}

#[test]
fn test_observer_sees_success_and_failure() {
    let observer = Arc::new(CountingObserver::default());

    let mut bindings = BindingSet::new();
    bindings.add_observer(observer.clone());
    bindings.add_singleton(1u8).unwrap();

    let container = bindings.build().unwrap();

    let _ = container.get_required::<u8>();
    assert_eq!(observer.resolving.load(Ordering::SeqCst), 1);
    assert_eq!(observer.resolved.load(Ordering::SeqCst), 1);
    assert_eq!(observer.failed.load(Ordering::SeqCst), 0);

    let _ = container.get::<u16>();
    assert_eq!(observer.failed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_observer_sees_transitive_resolutions() {
    struct Inner;
    struct Outer {
        _inner: Arc<Inner>,
    }

    let observer = Arc::new(CountingObserver::default());

    let mut bindings = BindingSet::new();
    bindings.add_observer(observer.clone());
    bindings.add_singleton_factory::<Inner, _>(|_| Inner).unwrap();
    bindings
        .add_transient_factory::<Outer, _>(|r| Outer {
            _inner: r.get_required::<Inner>(),
        })
        .unwrap();

    let container = bindings.build().unwrap();
    let _ = container.get_required::<Outer>();

    // Outer plus its Inner dependency
    assert_eq!(observer.resolving.load(Ordering::SeqCst), 2);
    assert_eq!(observer.resolved.load(Ordering::SeqCst), 2);
}

#[test]
fn test_children_inherit_observers() {
    struct SessionState;

    let observer = Arc::new(CountingObserver::default());

    let mut bindings = BindingSet::new();
    bindings.add_observer(observer.clone());
    bindings
        .add_scoped_factory::<SessionState, _>(|_| SessionState)
        .unwrap();

    let root = bindings.build().unwrap();
    let child = root.create_child();

    let _ = child.get_required::<SessionState>();
    assert_eq!(observer.resolved.load(Ordering::SeqCst), 1);
}

#[test]
fn test_logging_observer_smoke() {
    let mut bindings = BindingSet::new();
    bindings.add_observer(Arc::new(LoggingObserver));
    bindings.add_singleton("observed".to_string()).unwrap();

    let container = bindings.build().unwrap();

    // Events go through tracing; this just exercises the paths
    assert_eq!(*container.get_required::<String>(), "observed");
    assert!(container.get::<u128>().is_err());
}
