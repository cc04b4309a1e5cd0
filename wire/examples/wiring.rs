use fibre_wire::{Host, Injector, Key, Modifiers, Registry, NOCACHE};
use std::sync::atomic::{AtomicUsize, Ordering};
use parking_lot::Mutex;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Default)]
struct Student {
  name: Mutex<String>,
}

impl Student {
  fn set_name(&self, name: &str) {
    *self.name.lock() = name.to_string();
  }

  fn name(&self) -> String {
    self.name.lock().clone()
  }
}

static REQUESTS: AtomicUsize = AtomicUsize::new(0);

fn main() {
  // RUST_LOG=fibre_wire=trace shows every registration and resolution.
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .init();

  let registry = Arc::new(Registry::new());
  let student = Key::<Student>::new("student");
  let request_id = Key::<usize>::new("request_id");

  registry
    .register(&student)
    .expect("fresh key")
    .to::<Student>()
    .in_singleton_scope();
  registry
    .register(&request_id)
    .expect("fresh key")
    .to_factory(|| REQUESTS.fetch_add(1, Ordering::SeqCst));

  let injector = Injector::new(registry);
  let classroom = Host::new();
  injector.wire(&classroom, "student", &student, Modifiers::default());
  injector.wire(&classroom, "request_id", &request_id, NOCACHE);

  classroom
    .get::<Student>("student")
    .expect("student is wired")
    .set_name("amit");
  println!("student: {}", classroom.get::<Student>("student").expect("student is wired").name());

  for _ in 0..3 {
    println!("request id: {}", classroom.get::<usize>("request_id").expect("request_id is wired"));
  }

  let next_request = injector.resolver(&request_id, Modifiers::default());
  println!("memoized: {} then {}", next_request.resolve().unwrap(), next_request.resolve().unwrap());
}
