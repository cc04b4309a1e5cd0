use fibre_wire::{BindingError, Key, Registry};

trait Mailer: Send + Sync {
  fn send(&self, to: &str) -> String;
}

struct SmtpMailer;
impl Mailer for SmtpMailer {
  fn send(&self, to: &str) -> String {
    format!("smtp -> {}", to)
  }
}

struct FakeMailer;
impl Mailer for FakeMailer {
  fn send(&self, to: &str) -> String {
    format!("recorded mail for {}", to)
  }
}

fn main() -> Result<(), BindingError> {
  let registry = Registry::new();
  let mailer = Key::<dyn Mailer>::new("mailer");
  let audit = Key::<bool>::new("audit");

  registry
    .register(&mailer)?
    .to_shared_factory(|| std::sync::Arc::new(SmtpMailer))
    .in_singleton_scope();

  // Swap in test doubles, then roll everything back in one step.
  registry.snapshot();
  registry
    .rebind(&mailer)?
    .to_shared_factory(|| std::sync::Arc::new(FakeMailer));
  registry.register(&audit)?.to_value(true);
  println!("during test: {}", registry.resolve(&mailer)?.send("ops@example.com"));

  registry.restore();
  println!("after restore: {}", registry.resolve(&mailer)?.send("ops@example.com"));

  match registry.resolve(&audit) {
    Err(BindingError::NotBound(key)) => println!("'{}' is gone again", key.label()),
    other => panic!("audit flag should have been rolled back: {:?}", other),
  }
  Ok(())
}
