//! Core, type-erased data structures shared by every service kind.

use crate::error::{Error, Result};
use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// The registry key a type is known by when no explicit name is given.
#[inline]
pub(crate) fn type_key<T: ?Sized + 'static>() -> &'static str {
  type_name::<T>()
}

/// A resolved service, as returned by `Injector::invoke_by_name`.
///
/// The handle wraps the `Arc<T>` the service produced. Cloning it is cheap and
/// every clone (and every `downcast`) shares the same underlying allocation.
#[derive(Clone)]
pub struct Instance {
  inner: Arc<dyn Any + Send + Sync>,
  type_id: TypeId,
  type_name: &'static str,
}

impl Instance {
  pub(crate) fn new<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Self {
    Self {
      inner: Arc::new(value),
      type_id: TypeId::of::<T>(),
      type_name: type_name::<T>(),
    }
  }

  /// The name of the type this instance can be downcast to.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }

  /// Returns `true` if this instance holds an `Arc<T>`.
  pub fn is<T: ?Sized + 'static>(&self) -> bool {
    self.type_id == TypeId::of::<T>()
  }

  /// Returns the shared `Arc<T>`, or `None` if the instance holds another type.
  pub fn downcast<T: ?Sized + Send + Sync + 'static>(&self) -> Option<Arc<T>> {
    self.inner.downcast_ref::<Arc<T>>().cloned()
  }

  /// Like `downcast`, but reports a mismatch against the name it was resolved under.
  pub(crate) fn cast<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
    self.downcast::<T>().ok_or_else(|| Error::InvalidInvokeType {
      name: name.to_owned(),
      expected: type_name::<T>(),
      found: self.type_name,
    })
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({})", self.type_name)
  }
}
