//! The global registry instance and access functions.

use crate::registry::Registry;
use once_cell::sync::Lazy;
use std::sync::Arc;

// Created on first access, in a thread-safe manner.
static GLOBAL_REGISTRY: Lazy<Arc<Registry>> = Lazy::new(|| Arc::new(Registry::new()));

/// Provides a reference to the global registry instance.
///
/// The registry is handed out as an `Arc` so it can back an
/// [`Injector`](crate::Injector) directly.
///
/// # Examples
///
/// ```
/// use fibre_wire::{global, Injector, Key};
///
/// let banner = Key::<String>::new("banner");
/// global()
///   .register(&banner)
///   .unwrap()
///   .to_value(String::from("Hello from global!"));
///
/// let injector = Injector::new(global().clone());
/// let resolve_banner = injector.resolver(&banner, Default::default());
/// assert_eq!(*resolve_banner.resolve().unwrap(), "Hello from global!");
/// ```
pub fn global() -> &'static Arc<Registry> {
  &GLOBAL_REGISTRY
}
