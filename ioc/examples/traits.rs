use fibre_wire::{alias, global, resolve, wire, ProvideOptions, Slot};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}

// 2. Define a concrete implementation
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}

// 3. A service built by a constructor that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    // ... logic to generate report ...
    self.logger.log("Finished report generation.");
  }
}

// 4. A service whose fields are wired by the injector
#[derive(Default)]
struct AuditService {
  logger: Slot<dyn Logger>,
  reports: Slot<ReportService>,
}

wire!(AuditService { logger, reports });

fn main() -> fibre_wire::Result<()> {
  // --- Registration ---

  // ConsoleLogger is stored as Arc<ConsoleLogger> and also served as Arc<dyn Logger>.
  global().provide_with(
    || Arc::new(ConsoleLogger),
    ProvideOptions::new().with_as(alias!(ConsoleLogger => dyn Logger)),
  )?;

  // ReportService never creates its logger; the injector passes it in.
  global().provide(|logger: Arc<dyn Logger>| Arc::new(ReportService { logger }))?;

  global().provide_zero::<AuditService>()?;

  // --- Resolution and Usage ---
  println!("Resolving the high-level service...");
  let report_service = resolve!(ReportService);

  println!("Using the service...");
  report_service.generate_report();

  let audit = resolve!(AuditService);
  audit.logger.get().log("Audit service is wired.");
  assert!(Arc::ptr_eq(&audit.reports.get(), &report_service));
  Ok(())
}
