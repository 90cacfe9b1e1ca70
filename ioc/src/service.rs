//! The registered unit of the injector: one strategy for producing one value.

use crate::core::{type_key, Instance};
use crate::error::Result;
use crate::lazy::{Constructor, CtorOutput, LazyService};
use crate::registry::Resolution;
use crate::zero::{Wire, ZeroService};
use std::any::TypeId;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_SERVICE_ID: AtomicU64 = AtomicU64::new(0);

pub(crate) enum ServiceKind {
  /// A value supplied by the caller. Never built, never reset.
  Instance(Instance),
  Lazy(LazyService),
  Zero(ZeroService),
}

pub(crate) struct Service {
  id: u64,
  name: String,
  type_id: TypeId,
  type_name: &'static str,
  kind: ServiceKind,
}

impl Service {
  fn with_kind<T: ?Sized + 'static>(name: Option<String>, kind: ServiceKind) -> Self {
    Self {
      id: NEXT_SERVICE_ID.fetch_add(1, Ordering::Relaxed),
      name: name.unwrap_or_else(|| type_key::<T>().to_owned()),
      type_id: TypeId::of::<T>(),
      type_name: type_key::<T>(),
      kind,
    }
  }

  pub(crate) fn instance<T: ?Sized + Send + Sync + 'static>(name: Option<String>, value: Arc<T>) -> Self {
    Self::with_kind::<T>(name, ServiceKind::Instance(Instance::new(value)))
  }

  pub(crate) fn lazy<Args, C: Constructor<Args>>(name: Option<String>, ctor: C) -> Result<Self> {
    let key = name
      .clone()
      .unwrap_or_else(|| type_key::<<C::Output as CtorOutput>::Service>().to_owned());
    let lazy = LazyService::new(&key, ctor)?;
    Ok(Self::with_kind::<<C::Output as CtorOutput>::Service>(
      name,
      ServiceKind::Lazy(lazy),
    ))
  }

  pub(crate) fn zero<T: Wire + Default>(name: Option<String>) -> Self {
    Self::with_kind::<T>(name, ServiceKind::Zero(ZeroService::new::<T>()))
  }

  pub(crate) fn id(&self) -> u64 {
    self.id
  }

  pub(crate) fn name(&self) -> &str {
    &self.name
  }

  pub(crate) fn type_id(&self) -> TypeId {
    self.type_id
  }

  pub(crate) fn type_name(&self) -> &'static str {
    self.type_name
  }

  pub(crate) fn kind_name(&self) -> &'static str {
    match &self.kind {
      ServiceKind::Instance(_) => "instance",
      ServiceKind::Lazy(_) => "lazy",
      ServiceKind::Zero(_) => "zero",
    }
  }

  /// The fully built value, building it if necessary.
  pub(crate) fn get_instance(self: &Arc<Self>, resolution: &mut Resolution<'_>) -> Result<Instance> {
    match &self.kind {
      ServiceKind::Instance(value) => Ok(value.clone()),
      ServiceKind::Lazy(lazy) => lazy.get(self, resolution),
      ServiceKind::Zero(zero) => zero.get_instance(self, resolution),
    }
  }

  /// The value to inject into a consumer. Zero services may return it before
  /// it is wired.
  pub(crate) fn get_value(self: &Arc<Self>, resolution: &mut Resolution<'_>) -> Result<Instance> {
    match &self.kind {
      ServiceKind::Instance(value) => Ok(value.clone()),
      ServiceKind::Lazy(lazy) => lazy.get(self, resolution),
      ServiceKind::Zero(zero) => zero.get_value(self, resolution),
    }
  }

  /// Discards the built value. Returns the dependency keys of the discarded
  /// build, or `None` if there was nothing to discard.
  pub(crate) fn reset(&self) -> Option<Vec<String>> {
    match &self.kind {
      ServiceKind::Instance(_) => None,
      ServiceKind::Lazy(lazy) => lazy.reset(),
      ServiceKind::Zero(zero) => zero.reset(),
    }
  }
}
