use fibre_wire::{global, resolve, Key};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

fn make_tracker(kind: &str) -> RequestTracker {
  println!("Creating {} RequestTracker...", kind);
  RequestTracker {
    id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
  }
}

fn main() {
  let singleton_tracker = Key::<RequestTracker>::new("singleton_tracker");
  let transient_tracker = Key::<RequestTracker>::new("transient_tracker");

  // This factory will only be called ONCE.
  global()
    .register(&singleton_tracker)
    .expect("fresh key")
    .to_factory(|| make_tracker("SINGLETON"))
    .in_singleton_scope();

  // This factory will be called EVERY time the key is resolved.
  global()
    .register(&transient_tracker)
    .expect("fresh key")
    .to_factory(|| make_tracker("TRANSIENT"));

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(singleton_tracker);
  let s2 = resolve!(singleton_tracker);
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert!(Arc::ptr_eq(&s1, &s2), "Singleton instances should be identical");

  println!("--- Resolving Transients ---");
  let t1 = resolve!(transient_tracker);
  let t2 = resolve!(transient_tracker);
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert_eq!(t1.id, 1);
  assert_eq!(t2.id, 2);
  assert!(!Arc::ptr_eq(&t1, &t2), "Transient instances should be different");
}
