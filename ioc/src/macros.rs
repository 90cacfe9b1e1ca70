//! Public macros for registration and resolution.

/// Resolves a service from the global injector.
///
/// # Panics
///
/// This macro will panic if the service cannot be resolved. For a non-panicking
/// version, use `global().invoke::<T>()` directly.
///
/// # Examples
///
/// ```
/// use fibre_wire::{global, resolve};
/// use std::sync::Arc;
///
/// global().provide(|| Arc::new(String::from("hello"))).unwrap();
///
/// let message = resolve!(String);
/// assert_eq!(*message, "hello");
/// ```
///
/// ```
/// use fibre_wire::{alias, global, resolve, ProvideOptions};
/// use std::sync::Arc;
///
/// trait Greeter: Send + Sync { fn greet(&self) -> String; }
/// struct EnglishGreeter;
/// impl Greeter for EnglishGreeter { fn greet(&self) -> String { "Hello!".to_string() } }
///
/// global()
///   .provide_with(
///     || Arc::new(EnglishGreeter),
///     ProvideOptions::new().with_as(alias!(EnglishGreeter => dyn Greeter)),
///   )
///   .unwrap();
///
/// let greeter = resolve!(trait Greeter);
/// assert_eq!(greeter.greet(), "Hello!");
/// ```
#[macro_export]
macro_rules! resolve {
    // Arm for resolving a concrete type: resolve!(MyService)
    ($type:ty) => {
        $crate::global()
            .invoke::<$type>()
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to resolve required service: {}: {}",
                    std::any::type_name::<$type>(),
                    err
                )
            })
    };

    // Arm for resolving by name: resolve!(MyService, "name")
    ($type:ty, $name:expr) => {
        $crate::global()
            .invoke_named::<$type>($name)
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to resolve required service with name '{}': {}",
                    $name,
                    err
                )
            })
    };

    // Arm for resolving a trait object: resolve!(trait MyTrait)
    (trait $trait_ident:ident) => {
        $crate::global()
            .invoke::<dyn $trait_ident>()
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to resolve required trait service: {}: {}",
                    std::any::type_name::<dyn $trait_ident>(),
                    err
                )
            })
    };

    // Arm for resolving a named trait object: resolve!(trait MyTrait, "name")
    (trait $trait_ident:ident, $name:expr) => {
        $crate::global()
            .invoke_named::<dyn $trait_ident>($name)
            .unwrap_or_else(|err| {
                panic!(
                    "Failed to resolve required trait service with name '{}': {}",
                    $name,
                    err
                )
            })
    };
}

/// Builds an `As` witness serving `Service` as the trait object `dyn Trait`.
///
/// ```
/// use fibre_wire::alias;
///
/// trait Store: Send + Sync {}
/// struct MemoryStore;
/// impl Store for MemoryStore {}
///
/// let witness = alias!(MemoryStore => dyn Store);
/// assert_eq!(witness.target(), std::any::type_name::<dyn Store>());
/// ```
#[macro_export]
macro_rules! alias {
    ($service:ty => $target:ty) => {
        $crate::As::of::<$service, $target>(
            |service: ::std::sync::Arc<$service>| -> ::std::sync::Arc<$target> { service },
        )
    };
}

/// Implements `Wire` for a struct by wiring the listed `Slot` fields by type,
/// in order.
///
/// ```
/// use fibre_wire::{wire, Slot};
///
/// struct Clock;
///
/// #[derive(Default)]
/// struct Scheduler {
///   clock: Slot<Clock>,
///   ticks: u64,
/// }
///
/// wire!(Scheduler { clock });
/// ```
#[macro_export]
macro_rules! wire {
    ($type:ty { $($field:ident),* $(,)? }) => {
        impl $crate::Wire for $type {
            #[allow(unused_variables)]
            fn wire(&self, wiring: &mut $crate::Wiring<'_, '_>) -> $crate::Result<()> {
                $( wiring.field(&self.$field)?; )*
                Ok(())
            }
        }
    };
}
