//! Options accepted by the registration methods.

use crate::core::{type_key, Instance};
use std::any::TypeId;
use std::fmt;
use std::mem::size_of;
use std::sync::Arc;

type Caster = Arc<dyn Fn(&Instance) -> Option<Instance> + Send + Sync>;

/// A witness that a service producing `Arc<T>` can also be served as `Arc<I>`.
///
/// Registering a service with an `As` witness makes it reachable under the
/// alias type's key as well as its own. The alias target must be unsized; the
/// conversion itself is an ordinary unsizing coercion. Sized targets are
/// rejected with `Error::InvalidAsType`. Only the pointer width is checked, so
/// `str` and slice targets are accepted alongside trait objects.
///
/// ```
/// use fibre_wire::As;
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync {}
/// struct English;
/// impl Greeter for English {}
///
/// let witness = As::of::<English, dyn Greeter>(|s| -> Arc<dyn Greeter> { s });
/// assert!(witness.target().ends_with("Greeter"));
/// ```
///
/// The `alias!` macro writes the same thing more briefly.
#[derive(Clone)]
pub struct As {
  source: TypeId,
  target: &'static str,
  is_interface: bool,
  cast: Caster,
}

impl As {
  /// Creates a witness from the conversion `Arc<T> -> Arc<I>`.
  pub fn of<T, I>(convert: fn(Arc<T>) -> Arc<I>) -> Self
  where
    T: ?Sized + Send + Sync + 'static,
    I: ?Sized + Send + Sync + 'static,
  {
    Self {
      source: TypeId::of::<T>(),
      target: type_key::<I>(),
      // Only unsized targets are carried behind a fat pointer.
      is_interface: size_of::<Arc<I>>() != size_of::<Arc<()>>(),
      cast: Arc::new(move |instance: &Instance| {
        instance.downcast::<T>().map(|v| Instance::new(convert(v)))
      }),
    }
  }

  /// The key the service will additionally be registered under.
  pub fn target(&self) -> &'static str {
    self.target
  }

  pub(crate) fn source(&self) -> TypeId {
    self.source
  }

  pub(crate) fn is_interface(&self) -> bool {
    self.is_interface
  }

  pub(crate) fn project(&self, instance: &Instance) -> Option<Instance> {
    (self.cast)(instance)
  }
}

impl fmt::Debug for As {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "As({})", self.target)
  }
}

/// Options for a single `provide*` or `override_*` call.
#[derive(Debug, Clone, Default)]
pub struct ProvideOptions {
  pub(crate) name: Option<String>,
  pub(crate) aliases: Vec<As>,
}

impl ProvideOptions {
  /// Options that register under the type-derived key with no aliases.
  pub fn new() -> Self {
    Self::default()
  }

  /// Registers the service under `name` instead of its type-derived key.
  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Also makes the service reachable under the witness's alias.
  pub fn with_as(mut self, alias: As) -> Self {
    self.aliases.push(alias);
    self
  }

  /// Appends every witness in `aliases`.
  pub fn with_aliases(mut self, aliases: impl IntoIterator<Item = As>) -> Self {
    self.aliases.extend(aliases);
    self
  }
}
