//! Lazy injection on top of a [`Registry`].

use crate::core::Key;
use crate::error::BindingError;
use crate::host::Host;
use crate::registry::Registry;
use once_cell::sync::OnceCell;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Per-call options for [`Injector::wire`] and [`Injector::resolver`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Modifiers {
  /// Re-resolve on every access instead of keeping the first value.
  pub no_cache: bool,
}

impl Modifiers {
  /// Memoize the first resolved value. This is the default.
  pub const CACHED: Modifiers = Modifiers { no_cache: false };
  /// Resolve again on every access.
  pub const NO_CACHE: Modifiers = Modifiers { no_cache: true };
}

/// The shared "do not cache" modifier.
pub const NOCACHE: Modifiers = Modifiers::NO_CACHE;

/// Wires registry bindings onto hosts and hands out lazy resolvers.
///
/// An `Injector` shares its registry; it never owns or tears it down.
///
/// ```
/// use fibre_wire::{Host, Injector, Key, Registry};
/// use std::sync::Arc;
///
/// let registry = Arc::new(Registry::new());
/// let name = Key::<String>::new("name");
/// registry.register(&name).unwrap().to_value("amit".to_string());
///
/// let injector = Injector::new(registry);
/// let host = Host::new();
/// injector.wire(&host, "name", &name, Default::default());
///
/// assert_eq!(*host.get::<String>("name").unwrap(), "amit");
/// ```
#[derive(Clone)]
pub struct Injector {
  registry: Arc<Registry>,
}

impl Injector {
  pub fn new(registry: Arc<Registry>) -> Self {
    Self { registry }
  }

  /// The registry this injector resolves against.
  pub fn registry(&self) -> &Arc<Registry> {
    &self.registry
  }

  /// Defines the lazy property `property` on `host`, backed by `key`.
  ///
  /// Nothing is resolved until the property is first read. Unless
  /// `modifiers.no_cache` is set, the first successful read is kept and later
  /// reads never reach the registry again. Wiring an existing property name
  /// replaces it.
  pub fn wire<T: ?Sized + Any + Send + Sync>(
    &self,
    host: &Host,
    property: &str,
    key: &Key<T>,
    modifiers: Modifiers,
  ) {
    tracing::debug!(property, key = %key, no_cache = modifiers.no_cache, "wiring property");
    host.define(property, self.resolver(key, modifiers));
  }

  /// Returns a handle that resolves `key` when called.
  ///
  /// ```
  /// use fibre_wire::{Injector, Key, Registry, NOCACHE};
  /// use std::sync::Arc;
  /// use std::sync::atomic::{AtomicUsize, Ordering};
  ///
  /// static CALLS: AtomicUsize = AtomicUsize::new(0);
  ///
  /// let registry = Arc::new(Registry::new());
  /// let ticket = Key::<usize>::new("ticket");
  /// registry
  ///   .register(&ticket)
  ///   .unwrap()
  ///   .to_factory(|| CALLS.fetch_add(1, Ordering::SeqCst));
  ///
  /// let injector = Injector::new(registry);
  /// let cached = injector.resolver(&ticket, Default::default());
  /// let fresh = injector.resolver(&ticket, NOCACHE);
  ///
  /// assert_eq!(*cached.resolve().unwrap(), *cached.resolve().unwrap());
  /// assert_ne!(*fresh.resolve().unwrap(), *fresh.resolve().unwrap());
  /// ```
  pub fn resolver<T: ?Sized + Any + Send + Sync>(
    &self,
    key: &Key<T>,
    modifiers: Modifiers,
  ) -> Resolver<T> {
    Resolver {
      registry: self.registry.clone(),
      key: key.clone(),
      no_cache: modifiers.no_cache,
      memo: OnceCell::new(),
    }
  }

  /// Captures `key` and `modifiers` once, returning a function that wires them
  /// onto any host and property name.
  pub fn decorator<T: ?Sized + Any + Send + Sync>(
    &self,
    key: &Key<T>,
    modifiers: Modifiers,
  ) -> impl Fn(&Host, &str) + Send + Sync + 'static {
    let injector = self.clone();
    let key = key.clone();
    move |host: &Host, property: &str| injector.wire(host, property, &key, modifiers)
  }
}

/// A lazily resolving handle for one key.
///
/// Holds a private memo slot which starts out empty. A cached resolver fills
/// it on the first successful [`resolve`](Resolver::resolve) and returns it
/// from then on; a `no_cache` resolver goes to the registry every time. Errors
/// are never memoized.
pub struct Resolver<T: ?Sized> {
  registry: Arc<Registry>,
  key: Key<T>,
  no_cache: bool,
  memo: OnceCell<Arc<T>>,
}

impl<T: ?Sized + Any + Send + Sync> Resolver<T> {
  pub fn resolve(&self) -> Result<Arc<T>, BindingError> {
    if let Some(value) = self.memo.get() {
      return Ok(value.clone());
    }
    // Resolve outside the cell so a self-referencing producer hits the
    // registry's cycle check instead of blocking on its own initialization.
    let value = self.registry.resolve(&self.key)?;
    if self.no_cache {
      return Ok(value);
    }
    // On a race the first stored value wins and every caller sees it.
    Ok(self.memo.get_or_init(|| value).clone())
  }

  /// Returns `true` once a value has been memoized.
  pub fn is_resolved(&self) -> bool {
    self.memo.get().is_some()
  }

  pub fn key(&self) -> &Key<T> {
    &self.key
  }
}

impl<T: ?Sized> fmt::Debug for Resolver<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Resolver")
      .field("key", &self.key)
      .field("no_cache", &self.no_cache)
      .field("resolved", &self.memo.get().is_some())
      .finish()
  }
}
