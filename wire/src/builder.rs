//! The fluent builder returned by [`Registry::register`](crate::Registry::register).
//!
//! A binding moves from "empty" to exactly one of construct, factory or value.
//! Every configuring method consumes the builder, so a binding cannot be
//! configured twice. Only construct and factory bindings hand back a
//! [`Scope`], since a fixed value has nothing to cache.

use crate::core::{Binding, Erased, Producer};
use std::any::Any;
use std::marker::PhantomData;
use std::sync::Arc;

/// Configures how a freshly registered key is produced.
///
/// Dropping the builder without configuring it leaves the key registered but
/// unresolvable ([`BindingError::Unconfigured`](crate::BindingError::Unconfigured)).
#[must_use = "a registered key must be configured with to, to_factory or to_value"]
pub struct BindingBuilder<T: ?Sized> {
  binding: Arc<Binding>,
  _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized + Any + Send + Sync> BindingBuilder<T> {
  pub(crate) fn new(binding: Arc<Binding>) -> Self {
    Self {
      binding,
      _marker: PhantomData,
    }
  }

  /// Binds the key to a new `C`, built with `C::default()` and converted into
  /// the key's type on every production.
  ///
  /// ```
  /// use fibre_wire::{Key, Registry};
  ///
  /// #[derive(Default)]
  /// struct Counter(u32);
  ///
  /// let registry = Registry::new();
  /// let key = Key::<Counter>::new("counter");
  /// registry.register(&key).unwrap().to::<Counter>();
  ///
  /// assert_eq!(registry.resolve(&key).unwrap().0, 0);
  /// ```
  pub fn to<C>(self) -> Scope
  where
    C: Default + Into<T> + 'static,
    T: Sized,
  {
    self.finish(Producer::Construct(Box::new(|| {
      Box::new(Arc::<T>::new(C::default().into())) as Erased
    })))
  }

  /// Binds the key to a zero-argument factory.
  pub fn to_factory(self, factory: impl Fn() -> T + Send + Sync + 'static) -> Scope
  where
    T: Sized,
  {
    self.finish(Producer::Factory(Box::new(move || {
      Box::new(Arc::new(factory())) as Erased
    })))
  }

  /// Binds the key to a factory that returns a shared pointer directly.
  ///
  /// This is the form to use for trait-object keys such as `Key<dyn Trait>`.
  pub fn to_shared_factory(self, factory: impl Fn() -> Arc<T> + Send + Sync + 'static) -> Scope {
    self.finish(Producer::Factory(Box::new(move || Box::new(factory()) as Erased)))
  }

  /// Binds the key to a fixed value. Value bindings are terminal.
  pub fn to_value(self, value: T)
  where
    T: Sized,
  {
    self.to_shared(Arc::new(value));
  }

  /// Binds the key to an already shared value, handed out as-is.
  pub fn to_shared(self, value: Arc<T>) {
    self.binding.configure(Producer::Value(Box::new(value)));
  }

  fn finish(self, producer: Producer) -> Scope {
    self.binding.configure(producer);
    Scope {
      binding: self.binding,
    }
  }
}

/// Scope options for construct and factory bindings.
pub struct Scope {
  binding: Arc<Binding>,
}

impl Scope {
  /// Caches the first produced value and returns it on every later resolve.
  ///
  /// Calling this more than once has no further effect.
  pub fn in_singleton_scope(&self) -> &Self {
    tracing::debug!(key = %self.binding.key, "binding marked singleton");
    self.binding.set_singleton();
    self
  }
}
