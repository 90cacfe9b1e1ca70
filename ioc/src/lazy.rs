//! Constructor-backed services, built on first use.

use crate::core::{type_key, Instance};
use crate::error::{BoxError, Error, Result};
use crate::registry::Resolution;
use crate::service::Service;
use parking_lot::Mutex;
use std::sync::Arc;
use tracing::debug;

/// The values a constructor may return.
///
/// Implemented for `Arc<T>` and `Result<Arc<T>, E>`. It is also implemented
/// for `()` and for 2- and 3-tuples so that constructors of those shapes are
/// rejected with `Error::InvalidCtorType` when they are registered.
pub trait CtorOutput: 'static {
  /// The service type the constructor produces.
  type Service: ?Sized + Send + Sync + 'static;

  #[doc(hidden)]
  fn check() -> std::result::Result<(), &'static str> {
    Ok(())
  }

  #[doc(hidden)]
  fn into_service(self) -> std::result::Result<Arc<Self::Service>, BoxError>;
}

impl<T: ?Sized + Send + Sync + 'static> CtorOutput for Arc<T> {
  type Service = T;

  fn into_service(self) -> std::result::Result<Arc<T>, BoxError> {
    Ok(self)
  }
}

impl<T, E> CtorOutput for std::result::Result<Arc<T>, E>
where
  T: ?Sized + Send + Sync + 'static,
  E: Into<BoxError> + 'static,
{
  type Service = T;

  fn into_service(self) -> std::result::Result<Arc<T>, BoxError> {
    self.map_err(Into::into)
  }
}

macro_rules! reject_ctor_output {
  ($reason:expr; $($param:ident)*) => {
    impl<$($param: 'static,)*> CtorOutput for ($($param,)*) {
      type Service = ();

      fn check() -> std::result::Result<(), &'static str> {
        Err($reason)
      }

      fn into_service(self) -> std::result::Result<Arc<()>, BoxError> {
        Err($reason.into())
      }
    }
  };
}

reject_ctor_output! { "constructor returns no value"; }
reject_ctor_output! { "constructor returns two values and the second is not an error"; T1 T2 }
reject_ctor_output! { "constructor returns three values"; T1 T2 T3 }

/// A function that can build a service from its resolved dependencies.
///
/// Implemented for every `Fn(Arc<D1>, ..., Arc<Dn>) -> R` with up to eight
/// parameters, where `R: CtorOutput`. Each parameter is resolved by the key of
/// its pointee type, so a parameter `Arc<dyn Cache>` is satisfied by whatever
/// service is registered as `dyn Cache`.
pub trait Constructor<Args>: Send + Sync + 'static {
  type Output: CtorOutput;

  /// Keys of the parameters, in call order.
  fn dependencies(&self) -> Vec<&'static str>;

  /// Calls the constructor with already-resolved arguments.
  fn construct(&self, args: &[Instance]) -> Result<Self::Output>;
}

fn next_arg<T: ?Sized + Send + Sync + 'static>(
  args: &mut std::slice::Iter<'_, Instance>,
) -> Result<Arc<T>> {
  let name = type_key::<T>();
  args
    .next()
    .ok_or_else(|| Error::UnknownService { name: name.to_owned() })?
    .cast::<T>(name)
}

// The marker is a tuple of `Arc`s so that unsized parameters such as
// `Arc<dyn Trait>` stay legal tuple elements.
macro_rules! define_constructor ({ $($param:ident)* } => {
  impl<Func, Out, $($param,)*> Constructor<($(Arc<$param>,)*)> for Func
  where
    Func: Fn($(Arc<$param>),*) -> Out + Send + Sync + 'static,
    Out: CtorOutput,
    $($param: ?Sized + Send + Sync + 'static,)*
  {
    type Output = Out;

    #[inline]
    fn dependencies(&self) -> Vec<&'static str> {
      vec![$(type_key::<$param>()),*]
    }

    #[inline]
    #[allow(non_snake_case, unused_mut, unused_variables)]
    fn construct(&self, args: &[Instance]) -> Result<Out> {
      let mut args = args.iter();
      $(let $param = next_arg::<$param>(&mut args)?;)*
      Ok((self)($($param),*))
    }
  }
});

define_constructor! {}
define_constructor! { T1 }
define_constructor! { T1 T2 }
define_constructor! { T1 T2 T3 }
define_constructor! { T1 T2 T3 T4 }
define_constructor! { T1 T2 T3 T4 T5 }
define_constructor! { T1 T2 T3 T4 T5 T6 }
define_constructor! { T1 T2 T3 T4 T5 T6 T7 }
define_constructor! { T1 T2 T3 T4 T5 T6 T7 T8 }

type Factory = Box<dyn Fn(&[Instance]) -> Result<Instance> + Send + Sync>;

#[derive(Default)]
struct LazyState {
  // `Some` exactly when the service is built.
  value: Option<Instance>,
  params: Vec<String>,
}

pub(crate) struct LazyService {
  dependencies: Vec<&'static str>,
  factory: Factory,
  state: Mutex<LazyState>,
}

impl LazyService {
  /// Wraps `ctor`, rejecting output shapes that do not describe one service.
  pub(crate) fn new<Args, C>(name: &str, ctor: C) -> Result<Self>
  where
    C: Constructor<Args>,
  {
    <C::Output as CtorOutput>::check().map_err(|reason| Error::InvalidCtorType {
      name: name.to_owned(),
      reason,
    })?;
    let dependencies = ctor.dependencies();
    let factory: Factory = Box::new(move |args: &[Instance]| {
      ctor
        .construct(args)?
        .into_service()
        .map(Instance::new)
        .map_err(Error::Constructor)
    });
    Ok(Self {
      dependencies,
      factory,
      state: Mutex::new(LazyState::default()),
    })
  }

  /// Returns the cached value, building it first if needed.
  pub(crate) fn get(&self, owner: &Arc<Service>, resolution: &mut Resolution<'_>) -> Result<Instance> {
    let mut state = self
      .state
      .try_lock()
      .ok_or_else(|| Error::CircularDependency {
        name: owner.name().to_owned(),
      })?;
    if let Some(value) = &state.value {
      return Ok(value.clone());
    }

    let mut args = Vec::with_capacity(self.dependencies.len());
    for dependency in &self.dependencies {
      args.push(resolution.value(dependency)?);
    }
    let value = (self.factory)(&args)?;

    debug!(name = owner.name(), dependencies = ?self.dependencies, "constructed lazy service");
    state.params = self.dependencies.iter().map(|d| (*d).to_owned()).collect();
    state.value = Some(value.clone());
    resolution.associate(&state.params, owner);
    Ok(value)
  }

  pub(crate) fn reset(&self) -> Option<Vec<String>> {
    let mut state = self.state.lock();
    state.value.take()?;
    Some(std::mem::take(&mut state.params))
  }
}
