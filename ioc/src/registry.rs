//! Structural state of an injector and the build protocol that walks it.

use crate::core::Instance;
use crate::error::{Error, Result};
use crate::options::As;
use crate::service::Service;
use dashmap::DashMap;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, trace};

/// Realized instances by name. Readable without the structural lock.
pub(crate) type InstanceCache = DashMap<String, Instance>;

/// A name's view of a service: the service itself, or one of its aliases.
#[derive(Clone)]
pub(crate) struct Binding {
  service: Arc<Service>,
  alias: Option<As>,
}

impl Binding {
  fn project(&self, instance: Instance, name: &str) -> Result<Instance> {
    match &self.alias {
      None => Ok(instance),
      Some(alias) => alias.project(&instance).ok_or_else(|| Error::InvalidInvokeType {
        name: name.to_owned(),
        expected: alias.target(),
        found: instance.type_name(),
      }),
    }
  }
}

#[derive(Default)]
pub(crate) struct Registry {
  services: HashMap<String, Binding>,
  // Service id -> every name currently bound to it.
  names: HashMap<u64, Vec<String>>,
  // Allocations handed out before being wired, keyed by service id.
  early: BTreeMap<u64, Arc<Service>>,
  // Dependency name -> services whose last build consumed it.
  associated: HashMap<String, Vec<Arc<Service>>>,
}

impl Registry {
  pub(crate) fn contains(&self, name: &str) -> bool {
    self.services.contains_key(name)
  }

  /// Binds `service` under its own name and every alias.
  ///
  /// All names are validated before anything is changed. With `replace`,
  /// occupied names are taken over and everything built from them is
  /// invalidated.
  pub(crate) fn insert(
    &mut self,
    service: Service,
    aliases: Vec<As>,
    replace: bool,
    instances: &InstanceCache,
  ) -> Result<()> {
    let mut bindings: Vec<(String, Option<As>)> = vec![(service.name().to_owned(), None)];
    for alias in aliases {
      if !alias.is_interface() {
        return Err(Error::InvalidAsType {
          alias: alias.target().to_owned(),
        });
      }
      if alias.source() != service.type_id() {
        return Err(Error::ServiceNotImplementsAs {
          service: service.type_name().to_owned(),
          alias: alias.target().to_owned(),
        });
      }
      if bindings.iter().all(|(name, _)| name != alias.target()) {
        bindings.push((alias.target().to_owned(), Some(alias)));
      }
    }

    if !replace {
      if let Some((name, _)) = bindings.iter().find(|(name, _)| self.services.contains_key(name)) {
        return Err(Error::ServiceAlreadyExists { name: name.clone() });
      }
    }

    for (name, _) in &bindings {
      if let Some(old) = self.services.remove(name) {
        self.displace(&old.service, name, instances);
      }
    }

    let service = Arc::new(service);
    let names: Vec<String> = bindings.iter().map(|(name, _)| name.clone()).collect();
    debug!(
      name = service.name(),
      kind = service.kind_name(),
      aliases = ?&names[1..],
      replace,
      "registered service"
    );
    self.names.insert(service.id(), names);
    for (name, alias) in bindings {
      let binding = Binding {
        service: Arc::clone(&service),
        alias,
      };
      self.services.insert(name, binding);
    }
    Ok(())
  }

  /// Removes every registration and cached instance.
  pub(crate) fn clear(&mut self, instances: &InstanceCache) {
    self.services.clear();
    self.names.clear();
    self.early.clear();
    self.associated.clear();
    instances.clear();
  }

  /// Detaches `name` from `old` and invalidates whatever was built from it.
  fn displace(&mut self, old: &Arc<Service>, name: &str, instances: &InstanceCache) {
    debug!(name, replaced = old.name(), "overriding service");
    instances.remove(name);
    let orphaned = match self.names.get_mut(&old.id()) {
      Some(names) => {
        names.retain(|n| n != name);
        names.is_empty()
      }
      None => true,
    };
    if orphaned {
      self.names.remove(&old.id());
      if let Some(params) = old.reset() {
        self.dissociate(old, &params);
      }
    }
    self.invalidate_dependents(name, instances);
  }

  /// Resets every service built from `name`, depth first, evicting each reset
  /// service's instances under all of its names.
  fn invalidate_dependents(&mut self, name: &str, instances: &InstanceCache) {
    let Some(consumers) = self.associated.remove(name) else {
      return;
    };
    for consumer in consumers {
      // Already unbuilt: its dependents were handled when it was reset.
      let Some(params) = consumer.reset() else {
        continue;
      };
      self.dissociate(&consumer, &params);
      let names = self.names.get(&consumer.id()).cloned().unwrap_or_default();
      debug!(name = consumer.name(), cause = name, "invalidated service");
      for consumer_name in names {
        instances.remove(&consumer_name);
        self.invalidate_dependents(&consumer_name, instances);
      }
    }
  }

  fn dissociate(&mut self, consumer: &Arc<Service>, params: &[String]) {
    for param in params {
      if let Some(list) = self.associated.get_mut(param) {
        list.retain(|s| s.id() != consumer.id());
        if list.is_empty() {
          self.associated.remove(param);
        }
      }
    }
  }
}

/// One top-level resolution, holding the registry exclusively.
///
/// Services call back into this while they build, so the structural lock is
/// taken once by the injector and never re-entered.
pub(crate) struct Resolution<'a> {
  registry: &'a mut Registry,
  instances: &'a InstanceCache,
}

impl<'a> Resolution<'a> {
  pub(crate) fn new(registry: &'a mut Registry, instances: &'a InstanceCache) -> Self {
    Self { registry, instances }
  }

  /// Resolves `name` and completes every allocation handed out along the way.
  pub(crate) fn invoke(&mut self, name: &str) -> Result<Instance> {
    if let Some(instance) = self.instances.get(name).map(|entry| entry.value().clone()) {
      return Ok(instance);
    }
    let outcome = self
      .instance(name)
      .and_then(|instance| self.drain().map(|()| instance));
    if outcome.is_err() {
      self.abandon();
    }
    outcome
  }

  fn binding(&self, name: &str) -> Result<Binding> {
    self
      .registry
      .services
      .get(name)
      .cloned()
      .ok_or_else(|| Error::UnknownService { name: name.to_owned() })
  }

  fn instance(&mut self, name: &str) -> Result<Instance> {
    let binding = self.binding(name)?;
    self.materialize(&binding, name)
  }

  fn materialize(&mut self, binding: &Binding, name: &str) -> Result<Instance> {
    let built = binding.service.get_instance(self)?;
    let instance = binding.project(built, name)?;
    self.instances.insert(name.to_owned(), instance.clone());
    Ok(instance)
  }

  /// Forces a full build of every deferred allocation until none remain.
  fn drain(&mut self) -> Result<()> {
    while let Some((id, service)) = self.registry.early.pop_first() {
      trace!(name = service.name(), "completing early service");
      if let Err(err) = self.complete(&service) {
        self.registry.early.insert(id, service);
        return Err(err);
      }
    }
    Ok(())
  }

  /// Wires a deferred service and caches it under the names still bound to it.
  /// A service that was displaced from all of its names is wired but not cached.
  fn complete(&mut self, service: &Arc<Service>) -> Result<()> {
    let built = service.get_instance(self)?;
    let names = self
      .registry
      .names
      .get(&service.id())
      .cloned()
      .unwrap_or_default();
    for name in names {
      let binding = self.binding(&name)?;
      if binding.service.id() != service.id() {
        continue;
      }
      let instance = binding.project(built.clone(), &name)?;
      self.instances.insert(name, instance);
    }
    Ok(())
  }

  /// Drops allocations left unwired by a failed resolution, together with
  /// anything that was built on top of them.
  fn abandon(&mut self) {
    let early = std::mem::take(&mut self.registry.early);
    for service in early.values() {
      let names = self
        .registry
        .names
        .get(&service.id())
        .cloned()
        .unwrap_or_default();
      debug!(name = service.name(), "abandoning unwired service");
      for name in names {
        self.registry.invalidate_dependents(&name, self.instances);
      }
    }
  }

  /// The value of `name` for injection into a consumer.
  pub(crate) fn value(&mut self, name: &str) -> Result<Instance> {
    let binding = self.binding(name)?;
    let value = binding.service.get_value(self)?;
    binding.project(value, name)
  }

  /// Records that `consumer` was built from each of `params`.
  pub(crate) fn associate(&mut self, params: &[String], consumer: &Arc<Service>) {
    for param in params {
      let list = self.registry.associated.entry(param.clone()).or_default();
      if list.iter().all(|s| s.id() != consumer.id()) {
        list.push(Arc::clone(consumer));
      }
    }
  }

  /// Queues `service` to be wired before the top-level invoke returns.
  pub(crate) fn defer(&mut self, service: &Arc<Service>) {
    trace!(name = service.name(), "handing out early service");
    self
      .registry
      .early
      .entry(service.id())
      .or_insert_with(|| Arc::clone(service));
  }
}
