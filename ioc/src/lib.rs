//! # Fibre Wire
//!
//! A thread-safe, reflection-free dependency injection container for Rust.
//!
//! Services are registered once and built on demand. Three kinds of service are
//! supported:
//!
//! - **Instance**: a value you already have, registered as an `Arc<T>`.
//! - **Lazy**: a constructor `Fn(Arc<A>, Arc<B>, ...) -> Arc<T>` (or
//!   `Result<Arc<T>, E>`). Its parameters are resolved by type the first time
//!   the service is needed.
//! - **Zero**: a `Default` struct whose `Slot` fields are wired by the
//!   injector. Zero services may depend on each other in cycles.
//!
//! ## Core Concepts
//!
//! - **Injector**: The registry for all your services. Share it behind an `Arc`
//!   or use the process-wide one returned by `global()`.
//! - **Names**: Every service has a name, its type's name by default. Services
//!   registered under an explicit name are resolved with `invoke_named`.
//! - **Aliases**: An `As` witness (see `alias!`) also registers a service under
//!   a trait object type, so it can be resolved as `Arc<dyn Trait>`.
//! - **Overrides**: `override_*` replaces a registration. Everything that was
//!   built from the replaced service is rebuilt on its next resolution.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_wire::{alias, Injector, ProvideOptions};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//!
//! struct Message(String);
//!
//! struct EnglishGreeter {
//!   message: Arc<Message>,
//! }
//!
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     self.message.0.clone()
//!   }
//! }
//!
//! let injector = Injector::new();
//! injector.provide_instance(Arc::new(Message("Hello, World!".into()))).unwrap();
//!
//! // The constructor's parameter is resolved from the injector.
//! injector
//!   .provide_with(
//!     |message: Arc<Message>| Arc::new(EnglishGreeter { message }),
//!     ProvideOptions::new().with_as(alias!(EnglishGreeter => dyn Greeter)),
//!   )
//!   .unwrap();
//!
//! let greeter = injector.invoke::<dyn Greeter>().unwrap();
//! assert_eq!(greeter.greet(), "Hello, World!");
//! ```

mod core;
mod error;
mod global;
mod injector;
mod lazy;
mod macros;
mod options;
mod registry;
mod service;
mod zero;

pub use crate::core::Instance;
pub use error::{BoxError, Error, Result};
pub use global::{
  clear, contains, global, invoke, invoke_by_name, invoke_named, override_ctor, override_ctor_with,
  override_instance, override_instance_with, override_zero, override_zero_with, provide,
  provide_instance, provide_instance_with, provide_with, provide_zero, provide_zero_with,
};
pub use injector::Injector;
pub use lazy::{Constructor, CtorOutput};
pub use options::{As, ProvideOptions};
pub use zero::{Slot, Wire, Wiring};
