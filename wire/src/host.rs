//! Host objects carrying lazily wired properties.

use crate::error::BindingError;
use crate::inject::Resolver;
use dashmap::DashMap;
use std::any::{type_name, Any};
use std::sync::Arc;

type Property = Arc<dyn Any + Send + Sync>;

/// An object whose named properties are wired by an [`Injector`](crate::Injector).
///
/// Each property starts out pending and is resolved on its first read. Reads
/// never hold the property table lock while resolving, so a factory is free to
/// read or wire properties on the same host.
#[derive(Default)]
pub struct Host {
  properties: DashMap<String, Property>,
}

impl Host {
  pub fn new() -> Self {
    Self::default()
  }

  pub(crate) fn define<T: ?Sized + Any + Send + Sync>(&self, property: &str, resolver: Resolver<T>) {
    self
      .properties
      .insert(property.to_owned(), Arc::new(resolver) as Property);
  }

  /// Reads the property `property`, resolving it if needed.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, property: &str) -> Result<Arc<T>, BindingError> {
    let slot = self
      .properties
      .get(property)
      .map(|entry| entry.value().clone())
      .ok_or_else(|| BindingError::NoSuchProperty(property.to_owned()))?;

    let resolver = slot
      .downcast::<Resolver<T>>()
      .map_err(|_| BindingError::PropertyType {
        property: property.to_owned(),
        expected: type_name::<T>(),
      })?;
    resolver.resolve()
  }

  /// Returns `true` if a property with this name has been wired.
  pub fn contains(&self, property: &str) -> bool {
    self.properties.contains_key(property)
  }

  /// The names of all wired properties, in no particular order.
  pub fn names(&self) -> Vec<String> {
    self
      .properties
      .iter()
      .map(|entry| entry.key().clone())
      .collect()
  }

  /// Removes a wired property. Returns `true` if it existed.
  pub fn remove(&self, property: &str) -> bool {
    self.properties.remove(property).is_some()
  }

  /// The number of wired properties.
  pub fn len(&self) -> usize {
    self.properties.len()
  }

  /// Returns `true` if no property is wired.
  pub fn is_empty(&self) -> bool {
    self.properties.is_empty()
  }
}
