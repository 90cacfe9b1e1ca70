use fibre_wire::{global, resolve, Error};
use std::panic;

struct UnregisteredService;

fn main() {
  // --- Using the panicking `resolve!` macro ---
  println!("Attempting to resolve a service that was never registered...");

  let result = panic::catch_unwind(|| {
    // This line will panic!
    let _service = resolve!(UnregisteredService);
  });

  assert!(result.is_err(), "resolve! should have panicked.");
  println!("Successfully caught the expected panic from resolve!.");

  // --- Using the fallible `invoke()` method ---
  println!("\nNow, attempting to resolve using the fallible `invoke()` method...");

  match global().invoke::<UnregisteredService>() {
    Ok(_) => panic!("Should not have found the service!"),
    Err(Error::UnknownService { name }) => println!("Correctly received UnknownService for {name}."),
    Err(other) => panic!("Unexpected error: {other}"),
  }
}
