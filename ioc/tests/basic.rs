// ioc/tests/basic.rs

//! Registration and validation tests against private `Injector` instances.

mod common;

use common::*;
use fibre_wire::{alias, As, BoxError, Error, Injector, ProvideOptions};
use std::any::type_name;
use std::sync::Arc;

// --- Constructor Registration ---

#[test]
fn test_provide_rejects_ctor_without_value() {
  let injector = Injector::new();
  let err = injector.provide(|| {}).unwrap_err();
  assert!(matches!(err, Error::InvalidCtorType { .. }), "got {err:?}");
}

#[test]
fn test_provide_accepts_single_value_ctor() {
  let injector = Injector::new();
  injector.provide(new_service_a).unwrap();
  assert!(injector.contains(type_name::<ServiceA>()));
}

#[test]
fn test_provide_rejects_two_plain_values() {
  let injector = Injector::new();
  let err = injector.provide(|| (0i64, 1i64)).unwrap_err();
  assert!(matches!(err, Error::InvalidCtorType { .. }), "got {err:?}");
}

#[test]
fn test_provide_accepts_value_with_error() {
  let injector = Injector::new();
  injector.provide(new_service_b).unwrap();
  assert!(injector.contains(type_name::<ServiceB>()));
}

#[test]
fn test_provide_rejects_three_values() {
  let injector = Injector::new();
  let err = injector
    .provide(|| (0i64, 1i64, Ok::<(), BoxError>(())))
    .unwrap_err();
  assert!(matches!(err, Error::InvalidCtorType { .. }), "got {err:?}");
}

#[test]
fn test_provide_duplicate_type_fails() {
  let injector = Injector::new();
  injector.provide(new_service_a).unwrap();

  let err = injector
    .provide(|| -> Result<Arc<ServiceA>, BoxError> { Ok(Arc::new(ServiceA::default())) })
    .unwrap_err();
  match err {
    Error::ServiceAlreadyExists { name } => assert_eq!(name, type_name::<ServiceA>()),
    other => panic!("expected ServiceAlreadyExists, got {other:?}"),
  }
}

#[test]
fn test_provide_same_type_under_other_name() {
  let injector = Injector::new();
  injector.provide(new_service_a).unwrap();
  injector
    .provide_with(
      || -> Result<Arc<ServiceA>, BoxError> { Ok(Arc::new(ServiceA { val: 7 })) },
      ProvideOptions::new().name("service a"),
    )
    .unwrap();

  let named = injector.invoke_named::<ServiceA>("service a").unwrap();
  let unnamed = injector.invoke::<ServiceA>().unwrap();
  assert_eq!(named.val, 7);
  assert_eq!(unnamed.val, 0);
  assert!(!Arc::ptr_eq(&named, &unnamed));
}

// --- Instance Registration ---

#[test]
fn test_provide_instance() {
  let injector = Injector::new();
  let original = Arc::new(ServiceA { val: 3 });
  injector.provide_instance(original.clone()).unwrap();

  let err = injector.provide_instance(Arc::new(ServiceA::default())).unwrap_err();
  assert!(matches!(err, Error::ServiceAlreadyExists { .. }), "got {err:?}");

  injector
    .provide_instance_with(Arc::new(ServiceA { val: 4 }), ProvideOptions::new().name("service a"))
    .unwrap();

  let resolved = injector.invoke::<ServiceA>().unwrap();
  assert!(Arc::ptr_eq(&resolved, &original));
  assert_eq!(injector.invoke_named::<ServiceA>("service a").unwrap().val, 4);
}

#[test]
fn test_provide_instance_of_a_function() {
  let injector = Injector::new();
  let factory: fn() -> Arc<ServiceA> = new_service_a;
  injector.provide_instance(Arc::new(factory)).unwrap();

  let resolved = injector.invoke::<fn() -> Arc<ServiceA>>().unwrap();
  assert_eq!((*resolved)().print(), "A");
}

#[test]
fn test_provide_instance_as_trait_object() {
  let injector = Injector::new();
  let service: Arc<dyn ServiceTest> = Arc::new(ServiceA::default());
  injector.provide_instance(service).unwrap();

  let resolved = injector.invoke::<dyn ServiceTest>().unwrap();
  assert_eq!(resolved.print(), "A");
}

// --- Zero Registration ---

#[test]
fn test_provide_zero() {
  let injector = Injector::new();
  injector.provide_zero::<ServiceA>().unwrap();

  let err = injector.provide_zero::<ServiceA>().unwrap_err();
  assert!(matches!(err, Error::ServiceAlreadyExists { .. }), "got {err:?}");

  injector
    .provide_zero_with::<ServiceA>(ProvideOptions::new().name("service a"))
    .unwrap();

  let unnamed = injector.invoke::<ServiceA>().unwrap();
  let named = injector.invoke_named::<ServiceA>("service a").unwrap();
  assert_eq!(unnamed.val, 0);
  assert!(!Arc::ptr_eq(&unnamed, &named));
}

// --- Aliases ---

#[test]
fn test_alias_to_sized_type_is_rejected() {
  let injector = Injector::new();
  let err = injector
    .provide_with(
      new_service_b,
      ProvideOptions::new().with_as(As::of::<ServiceB, ServiceB>(|b| b)),
    )
    .unwrap_err();
  assert!(matches!(err, Error::InvalidAsType { .. }), "got {err:?}");
  assert!(!injector.contains(type_name::<ServiceB>()));
}

#[test]
fn test_alias_from_other_service_is_rejected() {
  let injector = Injector::new();
  let err = injector
    .provide_zero_with::<ServiceG>(ProvideOptions::new().with_as(a_as_test()))
    .unwrap_err();
  match err {
    Error::ServiceNotImplementsAs { service, alias } => {
      assert_eq!(service, type_name::<ServiceG>());
      assert_eq!(alias, type_name::<dyn ServiceTest>());
    }
    other => panic!("expected ServiceNotImplementsAs, got {other:?}"),
  }
}

#[test]
fn test_alias_to_non_interface_is_rejected() {
  let injector = Injector::new();
  let err = injector
    .provide_zero_with::<ServiceA>(
      ProvideOptions::new().with_as(As::of::<ServiceA, i64>(|_| Arc::new(0))),
    )
    .unwrap_err();
  assert!(matches!(err, Error::InvalidAsType { .. }), "got {err:?}");
  assert!(!injector.contains(type_name::<ServiceA>()));
}

#[test]
fn test_alias_to_str_target_is_accepted() {
  let injector = Injector::new();
  injector
    .provide_with(
      new_service_a,
      ProvideOptions::new().with_as(As::of::<ServiceA, str>(|a| Arc::from(a.print()))),
    )
    .unwrap();

  let label = injector.invoke::<str>().unwrap();
  assert_eq!(&*label, "A");
}

#[test]
fn test_alias_registration_and_conflict() {
  let injector = Injector::new();
  injector
    .provide_with(new_service_a, ProvideOptions::new().with_as(a_as_test()))
    .unwrap();
  assert!(injector.contains(type_name::<dyn ServiceTest>()));

  // The primary name is free but the alias is not; nothing may be registered.
  let err = injector
    .provide_zero_with::<ServiceC>(ProvideOptions::new().with_as(c_as_test()))
    .unwrap_err();
  match err {
    Error::ServiceAlreadyExists { name } => assert_eq!(name, type_name::<dyn ServiceTest>()),
    other => panic!("expected ServiceAlreadyExists, got {other:?}"),
  }
  assert!(!injector.contains(type_name::<ServiceC>()));
}

#[test]
fn test_alias_resolves_to_same_allocation() {
  let injector = Injector::new();
  injector
    .provide_with(new_service_a, ProvideOptions::new().with_as(alias!(ServiceA => dyn ServiceTest)))
    .unwrap();

  let concrete = injector.invoke::<ServiceA>().unwrap();
  let as_trait = injector.invoke::<dyn ServiceTest>().unwrap();
  assert_eq!(as_trait.print(), "A");
  assert_eq!(
    Arc::as_ptr(&concrete) as *const u8,
    Arc::as_ptr(&as_trait) as *const u8
  );
}

// --- Resolution Errors ---

#[test]
fn test_invoke_unknown_service() {
  let injector = Injector::new();
  let err = injector.invoke_by_name("wheels.ServiceTestA").unwrap_err();
  match err {
    Error::UnknownService { name } => assert_eq!(name, "wheels.ServiceTestA"),
    other => panic!("expected UnknownService, got {other:?}"),
  }
}

#[test]
fn test_invoke_with_wrong_type() {
  let injector = Injector::new();
  injector.provide_instance(Arc::new(ServiceA::default())).unwrap();

  let err = injector
    .invoke_named::<ServiceB>(type_name::<ServiceA>())
    .unwrap_err();
  match err {
    Error::InvalidInvokeType { expected, found, .. } => {
      assert_eq!(expected, type_name::<ServiceB>());
      assert_eq!(found, type_name::<ServiceA>());
    }
    other => panic!("expected InvalidInvokeType, got {other:?}"),
  }
}

#[test]
fn test_invoke_by_name_returns_instance_handle() {
  let injector = Injector::new();
  injector.provide(new_service_a).unwrap();

  let instance = injector.invoke_by_name(type_name::<ServiceA>()).unwrap();
  assert!(instance.is::<ServiceA>());
  assert!(!instance.is::<ServiceB>());
  assert_eq!(instance.type_name(), type_name::<ServiceA>());
  assert!(instance.downcast::<ServiceB>().is_none());

  let typed = injector.invoke::<ServiceA>().unwrap();
  assert!(Arc::ptr_eq(&instance.downcast::<ServiceA>().unwrap(), &typed));
}

#[test]
fn test_clear_removes_everything() {
  let injector = Injector::new();
  injector.provide(new_service_a).unwrap();
  injector.invoke::<ServiceA>().unwrap();

  injector.clear();

  assert!(!injector.contains(type_name::<ServiceA>()));
  assert!(matches!(
    injector.invoke::<ServiceA>().unwrap_err(),
    Error::UnknownService { .. }
  ));
  injector.provide(new_service_a).unwrap();
}

#[test]
#[should_panic(expected = "was read before it was wired")]
fn test_unwired_slot_panics_on_get() {
  let service = ServiceC::default();
  assert!(!service.d.is_wired());
  let _ = service.d.get();
}
