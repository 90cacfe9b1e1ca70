// ioc/tests/common/mod.rs

//! Fixtures shared by the integration tests.
//!
//! The graph they form:
//! - `ServiceA` has no dependencies.
//! - `ServiceB` is built by a constructor from `ServiceA` and `ServiceC`.
//! - `ServiceC` and `ServiceD` are wired structs that depend on each other.
//! - `ServiceE` and `ServiceH` are wired from whatever serves `dyn ServiceTest`.
//! - `ServiceF` always fails to construct, and `ServiceG` depends on it.
//! - `ServiceJ` is built by a constructor from `dyn ServiceTest`.

#![allow(dead_code)]

use fibre_wire::{alias, wire, As, BoxError, Slot};
use std::sync::Arc;

pub trait ServiceTest: Send + Sync {
  fn print(&self) -> &'static str;
}

#[derive(Debug, Default)]
pub struct ServiceA {
  pub val: i32,
}

impl ServiceTest for ServiceA {
  fn print(&self) -> &'static str {
    "A"
  }
}

wire!(ServiceA {});

pub fn new_service_a() -> Arc<ServiceA> {
  Arc::new(ServiceA::default())
}

#[derive(Debug)]
pub struct ServiceB {
  pub a: Arc<ServiceA>,
  pub c: Arc<ServiceC>,
}

impl ServiceTest for ServiceB {
  fn print(&self) -> &'static str {
    "B"
  }
}

pub fn new_service_b(a: Arc<ServiceA>, c: Arc<ServiceC>) -> Result<Arc<ServiceB>, BoxError> {
  Ok(Arc::new(ServiceB { a, c }))
}

#[derive(Debug, Default)]
pub struct ServiceC {
  pub d: Slot<ServiceD>,
}

impl ServiceTest for ServiceC {
  fn print(&self) -> &'static str {
    "C"
  }
}

wire!(ServiceC { d });

#[derive(Debug, Default)]
pub struct ServiceD {
  pub c: Slot<ServiceC>,
  pub a: Slot<ServiceA>,
}

impl ServiceTest for ServiceD {
  fn print(&self) -> &'static str {
    "D"
  }
}

wire!(ServiceD { c, a });

#[derive(Debug, Default)]
pub struct ServiceE {
  pub b: Slot<dyn ServiceTest>,
}

impl ServiceTest for ServiceE {
  fn print(&self) -> &'static str {
    "E"
  }
}

wire!(ServiceE { b });

#[derive(Debug, Default)]
pub struct ServiceF;

#[derive(Debug, thiserror::Error)]
#[error("new service f failed")]
pub struct NewServiceFError;

pub fn new_service_f() -> Result<Arc<ServiceF>, NewServiceFError> {
  Err(NewServiceFError)
}

#[derive(Debug, Default)]
pub struct ServiceG {
  pub f: Slot<ServiceF>,
}

wire!(ServiceG { f });

#[derive(Debug, Default)]
pub struct ServiceH {
  pub s: Slot<dyn ServiceTest>,
}

wire!(ServiceH { s });

pub struct ServiceJ {
  pub s: Arc<dyn ServiceTest>,
}

pub fn new_service_j(s: Arc<dyn ServiceTest>) -> Arc<ServiceJ> {
  Arc::new(ServiceJ { s })
}

pub fn a_as_test() -> As {
  alias!(ServiceA => dyn ServiceTest)
}

pub fn b_as_test() -> As {
  alias!(ServiceB => dyn ServiceTest)
}

pub fn c_as_test() -> As {
  alias!(ServiceC => dyn ServiceTest)
}

pub fn d_as_test() -> As {
  alias!(ServiceD => dyn ServiceTest)
}

/// Routes the crate's `tracing` output through the test harness.
/// Set `RUST_LOG=fibre_wire=trace` to see it.
pub fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}
