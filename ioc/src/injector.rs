//! The main `Injector` struct and its associated methods.

use crate::core::{type_key, Instance};
use crate::error::Result;
use crate::lazy::Constructor;
use crate::options::ProvideOptions;
use crate::registry::{InstanceCache, Registry, Resolution};
use crate::service::Service;
use crate::zero::Wire;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::trace;

/// The dependency injection container.
///
/// Services are registered under a name (their type's name unless
/// `ProvideOptions::name` says otherwise) and built the first time they, or
/// something depending on them, is invoked. Built instances are cached, so
/// every invoke of a name returns the same `Arc` until an override invalidates
/// it.
///
/// All methods take `&self`; an `Injector` can be shared freely between threads.
#[derive(Default)]
pub struct Injector {
  instances: InstanceCache,
  registry: RwLock<Registry>,
}

impl Injector {
  /// Creates a new, empty `Injector`.
  pub fn new() -> Self {
    Self::default()
  }

  // --- PRIVATE HELPERS ---

  fn register(&self, service: Service, options: ProvideOptions, replace: bool) -> Result<()> {
    let mut registry = self.registry.write();
    registry.insert(service, options.aliases, replace, &self.instances)
  }

  fn cached(&self, name: &str) -> Option<Instance> {
    self.instances.get(name).map(|entry| entry.value().clone())
  }

  // --- PUBLIC API ---

  // --- Constructor Registration ---

  /// Registers a constructor. Its parameters are resolved by type when the
  /// service is first needed.
  pub fn provide<Args, C: Constructor<Args>>(&self, ctor: C) -> Result<()> {
    self.provide_with(ctor, ProvideOptions::default())
  }
  pub fn provide_with<Args, C: Constructor<Args>>(&self, ctor: C, options: ProvideOptions) -> Result<()> {
    let service = Service::lazy(options.name.clone(), ctor)?;
    self.register(service, options, false)
  }

  // --- Instance Registration ---
  pub fn provide_instance<T: ?Sized + Send + Sync + 'static>(&self, value: Arc<T>) -> Result<()> {
    self.provide_instance_with(value, ProvideOptions::default())
  }
  pub fn provide_instance_with<T: ?Sized + Send + Sync + 'static>(
    &self,
    value: Arc<T>,
    options: ProvideOptions,
  ) -> Result<()> {
    let service = Service::instance(options.name.clone(), value);
    self.register(service, options, false)
  }

  // --- Zero Registration ---

  /// Registers `T` to be built from `T::default()` with its `Wire` fields resolved.
  pub fn provide_zero<T: Wire + Default>(&self) -> Result<()> {
    self.provide_zero_with::<T>(ProvideOptions::default())
  }
  pub fn provide_zero_with<T: Wire + Default>(&self, options: ProvideOptions) -> Result<()> {
    let service = Service::zero::<T>(options.name.clone());
    self.register(service, options, false)
  }

  // --- Overrides ---
  //
  // Same as the `provide*` family, except that occupied names are taken over.
  // Everything that was built from a replaced name is reset and rebuilt on its
  // next invoke.

  pub fn override_ctor<Args, C: Constructor<Args>>(&self, ctor: C) -> Result<()> {
    self.override_ctor_with(ctor, ProvideOptions::default())
  }
  pub fn override_ctor_with<Args, C: Constructor<Args>>(&self, ctor: C, options: ProvideOptions) -> Result<()> {
    let service = Service::lazy(options.name.clone(), ctor)?;
    self.register(service, options, true)
  }

  pub fn override_instance<T: ?Sized + Send + Sync + 'static>(&self, value: Arc<T>) -> Result<()> {
    self.override_instance_with(value, ProvideOptions::default())
  }
  pub fn override_instance_with<T: ?Sized + Send + Sync + 'static>(
    &self,
    value: Arc<T>,
    options: ProvideOptions,
  ) -> Result<()> {
    let service = Service::instance(options.name.clone(), value);
    self.register(service, options, true)
  }

  pub fn override_zero<T: Wire + Default>(&self) -> Result<()> {
    self.override_zero_with::<T>(ProvideOptions::default())
  }
  pub fn override_zero_with<T: Wire + Default>(&self, options: ProvideOptions) -> Result<()> {
    let service = Service::zero::<T>(options.name.clone());
    self.register(service, options, true)
  }

  // --- Resolution ---

  /// Resolves the service registered under `name`.
  pub fn invoke_by_name(&self, name: &str) -> Result<Instance> {
    if let Some(instance) = self.cached(name) {
      trace!(name, "instance cache hit");
      return Ok(instance);
    }
    let mut registry = self.registry.write();
    Resolution::new(&mut registry, &self.instances).invoke(name)
  }

  /// Resolves the service registered under the name of `T`.
  pub fn invoke<T: ?Sized + Send + Sync + 'static>(&self) -> Result<Arc<T>> {
    self.invoke_named::<T>(type_key::<T>())
  }

  /// Resolves the service registered under `name` as an `Arc<T>`.
  pub fn invoke_named<T: ?Sized + Send + Sync + 'static>(&self, name: &str) -> Result<Arc<T>> {
    self.invoke_by_name(name)?.cast::<T>(name)
  }

  /// Returns `true` if a service is registered under `name`.
  pub fn contains(&self, name: &str) -> bool {
    self.registry.read().contains(name)
  }

  /// Removes every registration and cached instance.
  pub fn clear(&self) {
    let mut registry = self.registry.write();
    registry.clear(&self.instances);
  }
}
