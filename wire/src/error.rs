use crate::core::KeyInfo;
use thiserror::Error;

/// Errors returned by registry, injector and host operations.
///
/// Panics raised by user constructors or factories are not caught and pass
/// through resolution untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindingError {
  /// `register` was called for a key that already has a binding.
  #[error("key can only be bound once: {0}")]
  AlreadyBound(KeyInfo),
  /// The key has no binding (never registered, or unregistered since).
  #[error("nothing is bound to {0}")]
  NotBound(KeyInfo),
  /// The key was registered but its builder never configured a producer.
  #[error("binding for {0} was registered but never configured")]
  Unconfigured(KeyInfo),
  /// Resolving the key re-entered its own resolution on the same thread.
  #[error("circular dependency detected while resolving {0}")]
  CircularDependency(KeyInfo),
  /// The stored value does not have the key's type.
  #[error("binding for {0} holds a value of an unexpected type")]
  TypeMismatch(KeyInfo),
  /// A host has no wired property with this name.
  #[error("no property named '{0}' is wired on this host")]
  NoSuchProperty(String),
  /// A host property was wired with a key of a different type.
  #[error("property '{property}' is not wired to a {expected}")]
  PropertyType {
    property: String,
    expected: &'static str,
  },
}

impl BindingError {
  /// The key this error is about, if any.
  pub fn key(&self) -> Option<&KeyInfo> {
    match self {
      BindingError::AlreadyBound(key)
      | BindingError::NotBound(key)
      | BindingError::Unconfigured(key)
      | BindingError::CircularDependency(key)
      | BindingError::TypeMismatch(key) => Some(key),
      BindingError::NoSuchProperty(_) | BindingError::PropertyType { .. } => None,
    }
  }
}
