//! Public macros for ergonomic resolution.

/// Resolves a key from the global registry, panicking on failure.
///
/// # Panics
///
/// Panics if the key cannot be resolved. For a non-panicking version, use
/// [`maybe_resolve!`] or `global().resolve(...)` directly.
///
/// # Examples
///
/// ```
/// use fibre_wire::{global, resolve, Key};
///
/// let answer = Key::<u32>::new("answer");
/// global().register(&answer).unwrap().to_value(42);
///
/// assert_eq!(*resolve!(answer), 42);
/// ```
#[macro_export]
macro_rules! resolve {
  ($key:expr) => {
    $crate::resolve_from!($crate::global(), $key)
  };
}

/// Resolves a key from the given registry, panicking on failure.
///
/// ```
/// use fibre_wire::{resolve_from, Key, Registry};
///
/// let registry = Registry::new();
/// let answer = Key::<u32>::new("answer");
/// registry.register(&answer).unwrap().to_factory(|| 7);
///
/// assert_eq!(*resolve_from!(registry, answer), 7);
/// ```
#[macro_export]
macro_rules! resolve_from {
  ($registry:expr, $key:expr) => {
    match $registry.resolve(&$key) {
      ::std::result::Result::Ok(instance) => instance,
      ::std::result::Result::Err(error) => {
        panic!("Failed to resolve required binding: {}", error)
      }
    }
  };
}

/// Resolves a key from the global registry into an `Option`.
///
/// ```
/// use fibre_wire::{maybe_resolve, Key};
///
/// let missing = Key::<u32>::new("missing");
/// assert!(maybe_resolve!(missing).is_none());
/// ```
#[macro_export]
macro_rules! maybe_resolve {
  ($key:expr) => {
    $crate::maybe_resolve_from!($crate::global(), $key)
  };
}

/// Resolves a key from the given registry into an `Option`.
#[macro_export]
macro_rules! maybe_resolve_from {
  ($registry:expr, $key:expr) => {
    $registry.resolve(&$key).ok()
  };
}
