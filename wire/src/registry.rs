//! The binding registry.

use crate::builder::BindingBuilder;
use crate::core::{Binding, Key, KeyId, RegistryId, ResolutionGuard};
use crate::error::BindingError;
use parking_lot::Mutex;
use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;

type Bindings = HashMap<KeyId, Arc<Binding>>;

#[derive(Default)]
struct RegistryState {
  bindings: Bindings,
  snapshots: Vec<Bindings>,
}

impl RegistryState {
  fn add<T: ?Sized + Any + Send + Sync>(
    &mut self,
    key: &Key<T>,
  ) -> Result<BindingBuilder<T>, BindingError> {
    if self.bindings.contains_key(&key.id()) {
      return Err(BindingError::AlreadyBound(key.describe()));
    }
    let binding = Arc::new(Binding::new(key.describe()));
    self.bindings.insert(key.id(), binding.clone());
    Ok(BindingBuilder::new(binding))
  }

  fn remove<T: ?Sized>(&mut self, key: &Key<T>) -> Result<Arc<Binding>, BindingError> {
    self
      .bindings
      .remove(&key.id())
      .ok_or_else(|| BindingError::NotBound(key.describe()))
  }
}

/// A registry of keyed bindings.
///
/// The registry is thread-safe: the binding map and the snapshot stack sit
/// behind one lock, taken once per operation. The lock is released before any
/// constructor or factory runs, so producers may resolve other keys from the
/// same registry. Cycle detection is per registry: a factory may delegate a
/// key to another registry that binds the same key.
///
/// ```
/// use fibre_wire::{Key, Registry};
/// use std::sync::Arc;
///
/// let registry = Registry::new();
/// let greeting = Key::<String>::new("greeting");
///
/// registry
///   .register(&greeting)
///   .unwrap()
///   .to_factory(|| String::from("hello"))
///   .in_singleton_scope();
///
/// let first = registry.resolve(&greeting).unwrap();
/// let second = registry.resolve(&greeting).unwrap();
/// assert!(Arc::ptr_eq(&first, &second));
/// ```
#[derive(Default)]
pub struct Registry {
  id: RegistryId,
  state: Mutex<RegistryState>,
}

impl Registry {
  /// Creates a new, empty `Registry`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- Registration ---

  /// Reserves `key` and returns a builder to configure it.
  ///
  /// Fails with [`BindingError::AlreadyBound`] if the key is already bound.
  pub fn register<T: ?Sized + Any + Send + Sync>(
    &self,
    key: &Key<T>,
  ) -> Result<BindingBuilder<T>, BindingError> {
    let builder = self.state.lock().add(key)?;
    tracing::debug!(key = %key, "registered binding");
    Ok(builder)
  }

  /// Removes the binding for `key`, along with any cached singleton it holds.
  ///
  /// Fails with [`BindingError::NotBound`] if the key has no binding.
  pub fn unregister<T: ?Sized>(&self, key: &Key<T>) -> Result<&Self, BindingError> {
    // Dropped outside the lock: a cached singleton's destructor may use the registry.
    let removed = self.state.lock().remove(key)?;
    tracing::debug!(key = %key, "unregistered binding");
    drop(removed);
    Ok(self)
  }

  /// Replaces the binding for `key` with a fresh, unconfigured one.
  ///
  /// The key must currently be bound; rebinding an unbound key fails with
  /// [`BindingError::NotBound`] and registers nothing.
  pub fn rebind<T: ?Sized + Any + Send + Sync>(
    &self,
    key: &Key<T>,
  ) -> Result<BindingBuilder<T>, BindingError> {
    let (removed, builder) = {
      let mut state = self.state.lock();
      let removed = state.remove(key)?;
      (removed, state.add(key)?)
    };
    tracing::debug!(key = %key, "rebound binding");
    drop(removed);
    Ok(builder)
  }

  // --- Resolution ---

  /// Resolves `key` to its value.
  ///
  /// Fixed values are returned as bound. Construct and factory bindings
  /// produce a fresh value per call, or a single cached value when bound in
  /// singleton scope.
  pub fn resolve<T: ?Sized + Any + Send + Sync>(&self, key: &Key<T>) -> Result<Arc<T>, BindingError> {
    let binding = self
      .state
      .lock()
      .bindings
      .get(&key.id())
      .cloned()
      .ok_or_else(|| BindingError::NotBound(key.describe()))?;

    let _guard = ResolutionGuard::enter(self.id, &binding.key)?;
    binding.instance::<T>()
  }

  /// Returns `true` if `key` currently has a binding.
  pub fn is_bound<T: ?Sized>(&self, key: &Key<T>) -> bool {
    self.state.lock().bindings.contains_key(&key.id())
  }

  /// The number of bound keys.
  pub fn len(&self) -> usize {
    self.state.lock().bindings.len()
  }

  /// Returns `true` if no key is bound.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  // --- Snapshots ---

  /// Saves the current set of bindings on the snapshot stack.
  ///
  /// Snapshots are shallow: they share binding records with the live registry,
  /// so singletons cached later are visible after a [`restore`](Self::restore).
  pub fn snapshot(&self) -> &Self {
    let mut state = self.state.lock();
    let saved = state.bindings.clone();
    state.snapshots.push(saved);
    tracing::debug!(depth = state.snapshots.len(), "took registry snapshot");
    self
  }

  /// Restores the most recent snapshot. Does nothing if there is none.
  pub fn restore(&self) -> &Self {
    let replaced = {
      let mut state = self.state.lock();
      let saved = state.snapshots.pop();
      let depth = state.snapshots.len();
      saved.map(|saved| {
        tracing::debug!(depth, "restored registry snapshot");
        std::mem::replace(&mut state.bindings, saved)
      })
    };
    if replaced.is_none() {
      tracing::debug!("no registry snapshot to restore");
    }
    drop(replaced);
    self
  }

  /// The number of snapshots waiting to be restored.
  pub fn snapshot_depth(&self) -> usize {
    self.state.lock().snapshots.len()
  }
}
