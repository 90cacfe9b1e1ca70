//! Auto-wired services: default-constructed structs whose fields are resolved
//! from the injector.
//!
//! A zero service is always handed out as a shared `Arc<T>`, and its
//! dependencies live in `Slot`s that are filled through `&self`. That lets the
//! injector hand the allocation to a consumer before the fields are wired, which
//! is how dependency cycles between such services are broken.

use crate::core::{type_key, Instance};
use crate::error::{Error, Result};
use crate::registry::Resolution;
use crate::service::Service;
use parking_lot::{Mutex, RwLock};
use std::any::type_name;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// A struct the injector can populate field by field.
///
/// `wire` is called on a freshly defaulted value and lists, in order, the slots
/// that should receive dependencies. Fields it does not mention are left as
/// `Default` made them.
///
/// ```
/// use fibre_wire::{Injector, Slot, Wire, Wiring};
/// use std::sync::Arc;
///
/// struct Config { url: String }
///
/// #[derive(Default)]
/// struct Repository { config: Slot<Config> }
///
/// impl Wire for Repository {
///   fn wire(&self, wiring: &mut Wiring<'_, '_>) -> fibre_wire::Result<()> {
///     wiring.field(&self.config)
///   }
/// }
///
/// let injector = Injector::new();
/// injector.provide_instance(Arc::new(Config { url: "db://local".into() })).unwrap();
/// injector.provide_zero::<Repository>().unwrap();
///
/// let repo = injector.invoke::<Repository>().unwrap();
/// assert_eq!(repo.config.get().url, "db://local");
/// ```
pub trait Wire: Send + Sync + 'static {
  fn wire(&self, wiring: &mut Wiring<'_, '_>) -> Result<()>;
}

/// A dependency field of a `Wire` struct.
///
/// Slots start empty and are filled by the injector. A slot handed out as part
/// of a not-yet-wired allocation is filled in place before the resolution that
/// produced it returns.
pub struct Slot<T: ?Sized> {
  value: RwLock<Option<Arc<T>>>,
}

impl<T: ?Sized> Slot<T> {
  pub fn new() -> Self {
    Self {
      value: RwLock::new(None),
    }
  }

  /// Returns the wired dependency.
  ///
  /// # Panics
  ///
  /// Panics if the slot has not been wired, which only happens when a value is
  /// read from inside a constructor while its owner is still being resolved.
  /// Use `try_get` there.
  pub fn get(&self) -> Arc<T> {
    self.try_get().unwrap_or_else(|| {
      panic!(
        "Slot<{}> was read before it was wired",
        type_name::<T>()
      )
    })
  }

  pub fn try_get(&self) -> Option<Arc<T>> {
    self.value.read().clone()
  }

  pub fn is_wired(&self) -> bool {
    self.value.read().is_some()
  }

  fn set(&self, value: Arc<T>) {
    *self.value.write() = Some(value);
  }
}

impl<T: ?Sized> Default for Slot<T> {
  fn default() -> Self {
    Self::new()
  }
}

impl<T: ?Sized> fmt::Debug for Slot<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Slot")
      .field("type", &type_name::<T>())
      .field("wired", &self.is_wired())
      .finish()
  }
}

/// The handle a `Wire` implementation resolves its fields through.
pub struct Wiring<'w, 'r> {
  resolution: &'w mut Resolution<'r>,
  consumed: Vec<String>,
}

impl<'w, 'r> Wiring<'w, 'r> {
  fn new(resolution: &'w mut Resolution<'r>) -> Self {
    Self {
      resolution,
      consumed: Vec::new(),
    }
  }

  /// Fills `slot` with the service registered under the key of `T`.
  pub fn field<T: ?Sized + Send + Sync + 'static>(&mut self, slot: &Slot<T>) -> Result<()> {
    self.named_field(slot, type_key::<T>())
  }

  /// Fills `slot` with the service registered under `name`.
  pub fn named_field<T: ?Sized + Send + Sync + 'static>(
    &mut self,
    slot: &Slot<T>,
    name: &str,
  ) -> Result<()> {
    let value = self.resolution.value(name)?.cast::<T>(name)?;
    slot.set(value);
    self.consumed.push(name.to_owned());
    Ok(())
  }
}

type WireFn = Arc<dyn Fn(&mut Wiring<'_, '_>) -> Result<()> + Send + Sync>;

/// One default-constructed object plus the means to wire it.
#[derive(Clone)]
struct Allocation {
  value: Instance,
  wire: WireFn,
}

fn allocate<T: Wire + Default>() -> Allocation {
  let object = Arc::new(T::default());
  let target = Arc::clone(&object);
  Allocation {
    value: Instance::new(object),
    wire: Arc::new(move |wiring: &mut Wiring<'_, '_>| target.wire(wiring)),
  }
}

#[derive(Default)]
struct ZeroState {
  built: bool,
  params: Vec<String>,
}

pub(crate) struct ZeroService {
  allocate: fn() -> Allocation,
  // Held for the whole of a build.
  state: Mutex<ZeroState>,
  // The allocation handed out so far; kept until the service is reset.
  pending: Mutex<Option<Allocation>>,
}

impl ZeroService {
  pub(crate) fn new<T: Wire + Default>() -> Self {
    Self {
      allocate: allocate::<T>,
      state: Mutex::new(ZeroState::default()),
      pending: Mutex::new(None),
    }
  }

  fn allocation(&self) -> Allocation {
    self.pending.lock().get_or_insert_with(self.allocate).clone()
  }

  /// Returns the wired allocation, wiring it first if needed.
  pub(crate) fn get_instance(
    &self,
    owner: &Arc<Service>,
    resolution: &mut Resolution<'_>,
  ) -> Result<Instance> {
    let mut state = self
      .state
      .try_lock()
      .ok_or_else(|| Error::CircularDependency {
        name: owner.name().to_owned(),
      })?;
    let allocation = self.allocation();
    if state.built {
      return Ok(allocation.value);
    }

    let mut wiring = Wiring::new(resolution);
    (allocation.wire)(&mut wiring)?;
    let consumed = wiring.consumed;

    debug!(name = owner.name(), dependencies = ?consumed, "wired zero service");
    state.built = true;
    state.params = consumed;
    resolution.associate(&state.params, owner);
    Ok(allocation.value)
  }

  /// Returns the allocation as a dependency value without waiting for it to be
  /// wired. An allocation that nobody is wiring yet is queued on the
  /// resolution so it is completed before the top-level invoke returns.
  pub(crate) fn get_value(&self, owner: &Arc<Service>, resolution: &mut Resolution<'_>) -> Result<Instance> {
    let deferred = match self.state.try_lock() {
      Some(state) => !state.built,
      // Locked by a build further up this resolution, which will finish wiring it.
      None => false,
    };
    if deferred {
      resolution.defer(owner);
    }
    Ok(self.allocation().value)
  }

  pub(crate) fn reset(&self) -> Option<Vec<String>> {
    let mut state = self.state.lock();
    if !state.built {
      return None;
    }
    state.built = false;
    *self.pending.lock() = None;
    Some(std::mem::take(&mut state.params))
  }
}
