//! # Fibre Wire
//!
//! A small runtime dependency-injection registry with lazy property wiring.
//!
//! Bindings are looked up by opaque [`Key`]s rather than by type or by name, so
//! two parts of an application can bind the same type without colliding. A key
//! is bound once to a production strategy (construct a type, call a factory,
//! or hand out a fixed value) and resolved on demand.
//!
//! ## Core Concepts
//!
//! - **Registry**: maps keys to bindings. Supports `register`, `unregister`,
//!   `rebind`, `resolve` and an undo stack of `snapshot`/`restore`.
//! - **Singleton scope**: construct and factory bindings can cache their first
//!   value with `in_singleton_scope()`.
//! - **Injector**: wires keys onto a [`Host`] as lazy properties, or hands out
//!   [`Resolver`]s. Both resolve on first use and memoize unless given
//!   [`NOCACHE`].
//! - **Global Registry**: a process-wide registry, accessible via [`global()`]
//!   and the [`resolve!`] macro.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_wire::{Host, Injector, Key, Registry};
//! use parking_lot::Mutex;
//! use std::sync::Arc;
//!
//! #[derive(Default)]
//! struct Student {
//!     name: Mutex<String>,
//! }
//!
//! impl Student {
//!     fn set_name(&self, name: &str) {
//!         *self.name.lock() = name.to_string();
//!     }
//!     fn name(&self) -> String {
//!         self.name.lock().clone()
//!     }
//! }
//!
//! let registry = Arc::new(Registry::new());
//! let student = Key::<Student>::new("student");
//! registry
//!     .register(&student)
//!     .unwrap()
//!     .to::<Student>()
//!     .in_singleton_scope();
//!
//! let injector = Injector::new(registry);
//! let school = Host::new();
//! injector.wire(&school, "student", &student, Default::default());
//!
//! school.get::<Student>("student").unwrap().set_name("amit");
//! assert_eq!(school.get::<Student>("student").unwrap().name(), "amit");
//! ```

mod builder;
mod core;
mod error;
mod global;
mod host;
mod inject;
mod macros;
mod registry;

pub use builder::{BindingBuilder, Scope};
pub use crate::core::{Key, KeyInfo};
pub use error::BindingError;
pub use global::global;
pub use host::Host;
pub use inject::{Injector, Modifiers, Resolver, NOCACHE};
pub use registry::Registry;
