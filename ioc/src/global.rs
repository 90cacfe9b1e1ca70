//! The global injector instance and functions that forward to it.
//!
//! The global injector lives for the whole process, so registrations made by
//! one test are visible to the next. Tests that use it should run serially and
//! call `global().clear()` first.

use crate::core::Instance;
use crate::error::Result;
use crate::injector::Injector;
use crate::lazy::Constructor;
use crate::options::ProvideOptions;
use crate::zero::Wire;
use once_cell::sync::Lazy;
use std::sync::Arc;

// The one and only global injector instance.
// It will be created on its first access in a thread-safe manner.
static GLOBAL_INJECTOR: Lazy<Injector> = Lazy::new(Injector::default);

/// Provides a reference to the global injector instance.
///
/// # Examples
///
/// ```
/// use fibre_wire::global;
/// use std::sync::Arc;
///
/// fn register_services() -> fibre_wire::Result<()> {
///   global().provide_instance(Arc::new(String::from("Hello from global!")))
/// }
/// ```
pub fn global() -> &'static Injector {
  &GLOBAL_INJECTOR
}

pub fn provide<Args, C: Constructor<Args>>(ctor: C) -> Result<()> {
  global().provide(ctor)
}

pub fn provide_with<Args, C: Constructor<Args>>(ctor: C, options: ProvideOptions) -> Result<()> {
  global().provide_with(ctor, options)
}

pub fn provide_instance<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Result<()> {
  global().provide_instance(value)
}

pub fn provide_instance_with<T: ?Sized + Send + Sync + 'static>(
  value: Arc<T>,
  options: ProvideOptions,
) -> Result<()> {
  global().provide_instance_with(value, options)
}

pub fn provide_zero<T: Wire + Default>() -> Result<()> {
  global().provide_zero::<T>()
}

pub fn provide_zero_with<T: Wire + Default>(options: ProvideOptions) -> Result<()> {
  global().provide_zero_with::<T>(options)
}

pub fn override_ctor<Args, C: Constructor<Args>>(ctor: C) -> Result<()> {
  global().override_ctor(ctor)
}

pub fn override_ctor_with<Args, C: Constructor<Args>>(ctor: C, options: ProvideOptions) -> Result<()> {
  global().override_ctor_with(ctor, options)
}

pub fn override_instance<T: ?Sized + Send + Sync + 'static>(value: Arc<T>) -> Result<()> {
  global().override_instance(value)
}

pub fn override_instance_with<T: ?Sized + Send + Sync + 'static>(
  value: Arc<T>,
  options: ProvideOptions,
) -> Result<()> {
  global().override_instance_with(value, options)
}

pub fn override_zero<T: Wire + Default>() -> Result<()> {
  global().override_zero::<T>()
}

pub fn override_zero_with<T: Wire + Default>(options: ProvideOptions) -> Result<()> {
  global().override_zero_with::<T>(options)
}

pub fn invoke<T: ?Sized + Send + Sync + 'static>() -> Result<Arc<T>> {
  global().invoke::<T>()
}

pub fn invoke_named<T: ?Sized + Send + Sync + 'static>(name: &str) -> Result<Arc<T>> {
  global().invoke_named::<T>(name)
}

pub fn invoke_by_name(name: &str) -> Result<Instance> {
  global().invoke_by_name(name)
}

pub fn contains(name: &str) -> bool {
  global().contains(name)
}

/// Empties the global injector.
pub fn clear() {
  global().clear()
}
