use fibre_wire::{BindingError, Host, Injector, Key, Modifiers, Registry, NOCACHE};
use parking_lot::Mutex;
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Test Fixtures ---

#[derive(Default)]
struct Student {
  name: Mutex<String>,
}

impl Student {
  fn set_name(&self, name: &str) {
    *self.name.lock() = name.to_string();
  }

  fn get_name(&self) -> String {
    self.name.lock().clone()
  }
}

/// A registry with a counting factory bound under `key`.
fn counting_registry(singleton: bool) -> (Arc<Registry>, Key<usize>, Arc<AtomicUsize>) {
  let registry = Arc::new(Registry::new());
  let key = Key::<usize>::new("counted");
  let calls = Arc::new(AtomicUsize::new(0));
  let counter = calls.clone();
  let scope = registry
    .register(&key)
    .unwrap()
    .to_factory(move || counter.fetch_add(1, Ordering::SeqCst));
  if singleton {
    scope.in_singleton_scope();
  }
  (registry, key, calls)
}

// --- Wiring Tests ---

#[test]
fn test_end_to_end_student_wiring() {
  // Arrange
  let registry = Arc::new(Registry::new());
  let s = Key::<Student>::new("student");
  registry
    .register(&s)
    .unwrap()
    .to::<Student>()
    .in_singleton_scope();
  let injector = Injector::new(registry);
  let o = Host::new();
  injector.wire(&o, "student", &s, Modifiers::default());

  // Act
  o.get::<Student>("student").unwrap().set_name("amit");
  let first = o.get::<Student>("student").unwrap();
  let second = o.get::<Student>("student").unwrap();

  // Assert
  assert_eq!(first.get_name(), "amit");
  assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_wire_is_lazy() {
  let (registry, key, calls) = counting_registry(false);
  let injector = Injector::new(registry);
  let host = Host::new();

  injector.wire(&host, "ticket", &key, Modifiers::default());

  assert_eq!(calls.load(Ordering::SeqCst), 0);
  host.get::<usize>("ticket").unwrap();
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_wire_caches_at_host_level() {
  // The binding is transient, but the property keeps its first value.
  let (registry, key, calls) = counting_registry(false);
  let injector = Injector::new(registry);
  let host = Host::new();
  injector.wire(&host, "ticket", &key, Modifiers::default());

  let r1 = host.get::<usize>("ticket").unwrap();
  let r2 = host.get::<usize>("ticket").unwrap();

  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert!(Arc::ptr_eq(&r1, &r2));
}

#[test]
fn test_wire_nocache_re_resolves() {
  let (registry, key, calls) = counting_registry(false);
  let injector = Injector::new(registry);
  let host = Host::new();
  injector.wire(&host, "ticket", &key, NOCACHE);

  assert_eq!(*host.get::<usize>("ticket").unwrap(), 0);
  assert_eq!(*host.get::<usize>("ticket").unwrap(), 1);
  assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_wired_value_survives_unregister() {
  // After the first read the property no longer consults the registry.
  let (registry, key, _calls) = counting_registry(false);
  let injector = Injector::new(registry.clone());
  let host = Host::new();
  injector.wire(&host, "ticket", &key, Modifiers::default());

  let before = host.get::<usize>("ticket").unwrap();
  registry.unregister(&key).unwrap();

  assert_eq!(host.get::<usize>("ticket").unwrap(), before);
}

#[test]
fn test_wire_failure_is_retried() {
  let registry = Arc::new(Registry::new());
  let key = Key::<String>::new("late");
  let injector = Injector::new(registry.clone());
  let host = Host::new();
  injector.wire(&host, "late", &key, Modifiers::default());

  assert!(matches!(
    host.get::<String>("late"),
    Err(BindingError::NotBound(_))
  ));

  registry
    .register(&key)
    .unwrap()
    .to_value("bound later".to_string());
  assert_eq!(*host.get::<String>("late").unwrap(), "bound later");
}

#[test]
fn test_rewiring_replaces_property() {
  let registry = Arc::new(Registry::new());
  let english = Key::<String>::new("english");
  let german = Key::<String>::new("german");
  registry.register(&english).unwrap().to_value("Hello".to_string());
  registry.register(&german).unwrap().to_value("Hallo".to_string());
  let injector = Injector::new(registry);
  let host = Host::new();

  injector.wire(&host, "greeting", &english, Modifiers::default());
  assert_eq!(*host.get::<String>("greeting").unwrap(), "Hello");
  injector.wire(&host, "greeting", &german, Modifiers::default());

  assert_eq!(*host.get::<String>("greeting").unwrap(), "Hallo");
  assert_eq!(host.len(), 1);
}

#[test]
fn test_host_properties_are_enumerable() {
  let registry = Arc::new(Registry::new());
  let key = Key::<u8>::new("byte");
  let injector = Injector::new(registry);
  let host = Host::new();
  assert!(host.is_empty());

  injector.wire(&host, "a", &key, Modifiers::default());
  injector.wire(&host, "b", &key, NOCACHE);
  let mut names = host.names();
  names.sort();

  assert_eq!(names, vec!["a".to_string(), "b".to_string()]);
  assert!(host.contains("a"));
  assert!(host.remove("a"));
  assert!(!host.contains("a"));
  assert!(host.remove("b"));
  assert!(host.is_empty());
}

#[test]
fn test_host_read_errors() {
  let registry = Arc::new(Registry::new());
  let key = Key::<u32>::new("number");
  registry.register(&key).unwrap().to_value(5);
  let injector = Injector::new(registry);
  let host = Host::new();
  injector.wire(&host, "number", &key, Modifiers::default());

  assert!(matches!(
    host.get::<u32>("missing"),
    Err(BindingError::NoSuchProperty(name)) if name == "missing"
  ));
  assert!(matches!(
    host.get::<String>("number"),
    Err(BindingError::PropertyType { property, .. }) if property == "number"
  ));
}

#[test]
fn test_factory_may_read_from_same_host() {
  let registry = Arc::new(Registry::new());
  let base = Key::<u32>::new("base");
  let doubled = Key::<u32>::new("doubled");
  let host = Arc::new(Host::new());
  registry.register(&base).unwrap().to_value(21);
  let inner_host = host.clone();
  registry
    .register(&doubled)
    .unwrap()
    .to_factory(move || *inner_host.get::<u32>("base").unwrap() * 2);
  let injector = Injector::new(registry);

  injector.wire(&host, "base", &base, Modifiers::default());
  injector.wire(&host, "doubled", &doubled, Modifiers::default());

  assert_eq!(*host.get::<u32>("doubled").unwrap(), 42);
}

#[test]
fn test_property_reading_itself_is_circular() {
  let registry = Arc::new(Registry::new());
  let echo = Key::<String>::new("echo");
  let host = Arc::new(Host::new());
  let inner_host = host.clone();
  registry.register(&echo).unwrap().to_factory(move || {
    match inner_host.get::<String>("echo") {
      Ok(value) => format!("echo({})", value),
      Err(BindingError::CircularDependency(_)) => "cut".to_string(),
      Err(other) => panic!("unexpected error: {}", other),
    }
  });
  let injector = Injector::new(registry);
  injector.wire(&host, "echo", &echo, Modifiers::default());

  assert_eq!(*host.get::<String>("echo").unwrap(), "cut");
}

#[test]
fn test_decorator_wires_like_wire() {
  let (registry, key, calls) = counting_registry(false);
  let injector = Injector::new(registry);
  let inject_ticket = injector.decorator(&key, Modifiers::default());
  let first = Host::new();
  let second = Host::new();

  inject_ticket(&first, "ticket");
  inject_ticket(&second, "pass");

  assert_eq!(calls.load(Ordering::SeqCst), 0);
  let a = first.get::<usize>("ticket").unwrap();
  let b = second.get::<usize>("pass").unwrap();
  assert_ne!(a, b);
  assert_eq!(first.get::<usize>("ticket").unwrap(), a);
  assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// --- Resolver Tests ---

#[test]
fn test_resolver_against_singleton_returns_cached_value() {
  let (registry, key, calls) = counting_registry(true);
  let injector = Injector::new(registry);
  let resolve = injector.resolver(&key, Modifiers::default());

  assert!(!resolve.is_resolved());
  let r1 = resolve.resolve().unwrap();
  let r2 = resolve.resolve().unwrap();

  assert!(resolve.is_resolved());
  assert!(Arc::ptr_eq(&r1, &r2));
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_resolver_memoizes_transient_binding() {
  let (registry, key, calls) = counting_registry(false);
  let injector = Injector::new(registry.clone());
  let resolve = injector.resolver(&key, Modifiers::default());

  resolve.resolve().unwrap();
  resolve.resolve().unwrap();

  assert_eq!(calls.load(Ordering::SeqCst), 1);
  // The registry itself still hands out fresh values.
  assert_eq!(*registry.resolve(&key).unwrap(), 1);
}

#[test]
fn test_resolver_nocache_re_resolves() {
  let (registry, key, calls) = counting_registry(false);
  let injector = Injector::new(registry);
  let resolve = injector.resolver(&key, NOCACHE);

  assert_eq!(*resolve.resolve().unwrap(), 0);
  assert_eq!(*resolve.resolve().unwrap(), 1);
  assert!(!resolve.is_resolved());
  assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_resolver_memoizes_any_value() {
  // Zero, empty and `None` values are memoized like any other.
  let calls = Arc::new(AtomicUsize::new(0));
  let registry = Arc::new(Registry::new());
  let key = Key::<Option<u32>>::new("maybe");
  let counter = calls.clone();
  registry.register(&key).unwrap().to_factory(move || {
    counter.fetch_add(1, Ordering::SeqCst);
    None
  });
  let injector = Injector::new(registry);
  let resolve = injector.resolver(&key, Modifiers::default());

  assert_eq!(*resolve.resolve().unwrap(), None);
  assert_eq!(*resolve.resolve().unwrap(), None);
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_resolver_shares_registry_with_injector() {
  let registry = Arc::new(Registry::new());
  let injector = Injector::new(registry.clone());
  let key = Key::<u32>::new("after");
  let resolve = injector.resolver(&key, Modifiers::default());

  registry.register(&key).unwrap().to_value(3);

  assert!(Arc::ptr_eq(injector.registry(), &registry));
  assert_eq!(*resolve.resolve().unwrap(), 3);
  assert_eq!(resolve.key(), &key);
}
