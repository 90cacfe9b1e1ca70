//! Errors produced while registering or resolving services.

use thiserror::Error;

/// The boxed error type a constructor's failure is carried in.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for every fallible `Injector` operation.
#[derive(Debug, Error)]
pub enum Error {
  /// A registration targeted a name (primary or alias) that is already taken.
  #[error("service already exists: {name}")]
  ServiceAlreadyExists { name: String },

  /// No service is registered under the requested name.
  #[error("unknown service: {name}")]
  UnknownService { name: String },

  /// An `As` witness converts from a type other than the one the service produces.
  #[error("service {service} does not implement {alias}")]
  ServiceNotImplementsAs { service: String, alias: String },

  /// An `As` witness targets a sized type rather than a trait object.
  #[error("invalid as type: {alias}")]
  InvalidAsType { alias: String },

  /// A constructor does not produce exactly one service.
  #[error("invalid constructor type for {name}: {reason}")]
  InvalidCtorType { name: String, reason: &'static str },

  /// A resolved value is not of the type requested at the call site.
  #[error("invalid invoke type for {name}: expected {expected}, found {found}")]
  InvalidInvokeType {
    name: String,
    expected: &'static str,
    found: &'static str,
  },

  /// Constructors that need each other's output before either can run.
  #[error("circular dependency detected while building {name}")]
  CircularDependency { name: String },

  /// The error returned by a user constructor, passed through unchanged.
  #[error(transparent)]
  Constructor(BoxError),
}

impl Error {
  /// Returns the constructor's own error if it is of type `E`.
  pub fn constructor_error<E: std::error::Error + 'static>(&self) -> Option<&E> {
    match self {
      Error::Constructor(source) => source.downcast_ref::<E>(),
      _ => None,
    }
  }
}

/// A specialized `Result` type for `fibre_wire` operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
