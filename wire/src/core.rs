//! Core data structures shared by the registry, the builder and the injector.

use crate::error::BindingError;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_KEY_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_REGISTRY_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
  // (registry, key) pairs currently being resolved on this thread. A pair
  // showing up twice means a factory (directly or transitively) asked its own
  // registry for itself. The same key in another registry is not a cycle.
  static RESOLVING_STACK: RefCell<HashSet<(RegistryId, KeyId)>> = RefCell::new(HashSet::new());
}

/// The identity of one [`Registry`](crate::Registry) instance.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct RegistryId(u64);

impl Default for RegistryId {
  fn default() -> Self {
    Self(NEXT_REGISTRY_ID.fetch_add(1, Ordering::Relaxed))
  }
}

/// The process-unique identity behind a [`Key`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct KeyId(u64);

impl KeyId {
  fn next() -> Self {
    Self(NEXT_KEY_ID.fetch_add(1, Ordering::Relaxed))
  }
}

impl fmt::Debug for KeyId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "#{}", self.0)
  }
}

/// An opaque binding key.
///
/// Every call to [`Key::new`] produces a distinct key, even when two keys share
/// the same label; clones of a key are the same key. The type parameter names
/// what the key resolves to, which may be a trait object:
///
/// ```
/// use fibre_wire::Key;
///
/// trait Clock: Send + Sync {}
///
/// let port = Key::<u16>::new("port");
/// let other = Key::<u16>::new("port");
/// let clock = Key::<dyn Clock>::new("clock");
///
/// assert_eq!(port, port.clone());
/// assert_ne!(port, other);
/// assert_eq!(clock.label(), "clock");
/// ```
pub struct Key<T: ?Sized> {
  id: KeyId,
  label: Arc<str>,
  _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> Key<T> {
  /// Creates a new, unique key. The label is only used for diagnostics.
  pub fn new(label: impl Into<Arc<str>>) -> Self {
    Self {
      id: KeyId::next(),
      label: label.into(),
      _marker: PhantomData,
    }
  }

  /// The diagnostic label this key was created with.
  pub fn label(&self) -> &str {
    &self.label
  }

  pub(crate) fn id(&self) -> KeyId {
    self.id
  }

  pub(crate) fn describe(&self) -> KeyInfo {
    KeyInfo {
      id: self.id,
      label: self.label.clone(),
    }
  }
}

impl<T: ?Sized> Clone for Key<T> {
  fn clone(&self) -> Self {
    Self {
      id: self.id,
      label: self.label.clone(),
      _marker: PhantomData,
    }
  }
}

impl<T: ?Sized> PartialEq for Key<T> {
  fn eq(&self, other: &Self) -> bool {
    self.id == other.id
  }
}

impl<T: ?Sized> Eq for Key<T> {}

impl<T: ?Sized> Hash for Key<T> {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.id.hash(state);
  }
}

impl<T: ?Sized> fmt::Debug for Key<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({:?} {:?})", self.id, self.label)
  }
}

impl<T: ?Sized> fmt::Display for Key<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{:?}", self.label, self.id)
  }
}

/// The untyped description of a key carried by errors.
#[derive(Clone, PartialEq, Eq)]
pub struct KeyInfo {
  id: KeyId,
  label: Arc<str>,
}

impl KeyInfo {
  /// The diagnostic label of the key.
  pub fn label(&self) -> &str {
    &self.label
  }
}

impl fmt::Debug for KeyInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({:?} {:?})", self.id, self.label)
  }
}

impl fmt::Display for KeyInfo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}{:?}", self.label, self.id)
  }
}

/// An RAII guard marking a key of one registry as "being resolved" on the
/// current thread.
///
/// Entering a pair that is already on the stack fails with
/// [`BindingError::CircularDependency`]. Dropping the guard pops the pair.
pub(crate) struct ResolutionGuard {
  entry: (RegistryId, KeyId),
}

impl ResolutionGuard {
  pub(crate) fn enter(registry: RegistryId, key: &KeyInfo) -> Result<Self, BindingError> {
    let entry = (registry, key.id);
    let fresh = RESOLVING_STACK.with(|stack| stack.borrow_mut().insert(entry));
    if !fresh {
      tracing::warn!(key = %key, "circular dependency detected");
      return Err(BindingError::CircularDependency(key.clone()));
    }
    Ok(Self { entry })
  }
}

impl Drop for ResolutionGuard {
  fn drop(&mut self) {
    RESOLVING_STACK.with(|stack| {
      stack.borrow_mut().remove(&self.entry);
    });
  }
}

/// A type-erased `Arc<T>`.
pub(crate) type Erased = Box<dyn Any + Send + Sync>;

pub(crate) type Produce = Box<dyn Fn() -> Erased + Send + Sync>;

/// How a binding produces its value. Exactly one kind per binding.
pub(crate) enum Producer {
  /// Construct a type with no arguments.
  Construct(Produce),
  /// Invoke a zero-argument factory.
  Factory(Produce),
  /// Hand out a value fixed at binding time.
  Value(Erased),
}

impl Producer {
  pub(crate) fn kind(&self) -> &'static str {
    match self {
      Producer::Construct(_) => "construct",
      Producer::Factory(_) => "factory",
      Producer::Value(_) => "value",
    }
  }
}

/// The registry's record for one key.
///
/// An empty `producer` cell is the "unconfigured" state. Records are shared
/// between the live mapping and any snapshots, so the singleton cache is too.
pub(crate) struct Binding {
  pub(crate) key: KeyInfo,
  producer: OnceCell<Producer>,
  singleton: AtomicBool,
  cache: OnceCell<Erased>,
}

impl Binding {
  pub(crate) fn new(key: KeyInfo) -> Self {
    Self {
      key,
      producer: OnceCell::new(),
      singleton: AtomicBool::new(false),
      cache: OnceCell::new(),
    }
  }

  /// Installs the producer. Only the binding's builder calls this, once.
  pub(crate) fn configure(&self, producer: Producer) {
    let kind = producer.kind();
    let installed = self.producer.set(producer).is_ok();
    debug_assert!(installed, "binding for {} configured twice", self.key);
    tracing::debug!(key = %self.key, kind, "binding configured");
  }

  pub(crate) fn set_singleton(&self) {
    self.singleton.store(true, Ordering::Release);
  }

  pub(crate) fn is_singleton(&self) -> bool {
    self.singleton.load(Ordering::Acquire)
  }

  /// Produces (or fetches) the value for this binding.
  ///
  /// Must be called without any registry lock held: construct and factory
  /// producers run user code.
  pub(crate) fn instance<T>(&self) -> Result<Arc<T>, BindingError>
  where
    T: ?Sized + Send + Sync + 'static,
  {
    let producer = self
      .producer
      .get()
      .ok_or_else(|| BindingError::Unconfigured(self.key.clone()))?;

    let instance = match producer {
      Producer::Value(value) => {
        tracing::trace!(key = %self.key, "resolved fixed value");
        value.downcast_ref::<Arc<T>>().cloned()
      }
      Producer::Construct(make) | Producer::Factory(make) if self.is_singleton() => {
        let hit = self.cache.get().is_some();
        tracing::trace!(key = %self.key, kind = producer.kind(), hit, "resolving singleton");
        self
          .cache
          .get_or_init(make)
          .downcast_ref::<Arc<T>>()
          .cloned()
      }
      Producer::Construct(make) | Producer::Factory(make) => {
        tracing::trace!(key = %self.key, kind = producer.kind(), "resolving transient");
        make()
          .downcast::<Arc<T>>()
          .ok()
          .map(|arc_in_a_box| *arc_in_a_box)
      }
    };

    instance.ok_or_else(|| BindingError::TypeMismatch(self.key.clone()))
  }
}
