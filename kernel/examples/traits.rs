use fibre_kernel::{injectable, resolve, service, Binding, Kernel};
use std::sync::Arc;

// 1. Define the abstraction (the trait)
trait Logger: Send + Sync {
  fn log(&self, message: &str);
}
service!(dyn Logger);

// 2. Define a concrete implementation
#[derive(Default)]
struct ConsoleLogger;
impl Logger for ConsoleLogger {
  fn log(&self, message: &str) {
    println!("[CONSOLE LOG]: {}", message);
  }
}
injectable!(ConsoleLogger);

// 3. Define a service that depends on the abstraction
struct ReportService {
  logger: Arc<dyn Logger>,
}
injectable!(ReportService { logger: dyn Logger });

impl ReportService {
  fn generate_report(&self) {
    self.logger.log("Starting report generation.");
    self.logger.log("Finished report generation.");
  }
}

fn main() {
  let kernel = Kernel::new();

  // --- Registration ---
  // Requests for `dyn Logger` are redirected to `ConsoleLogger`. The cast
  // turns the concrete `Arc<ConsoleLogger>` into `Arc<dyn Logger>`.
  kernel.bind(
    Binding::of::<dyn Logger>()
      .to::<ConsoleLogger>(|logger| logger)
      .singleton(),
  );

  // ReportService needs no binding: it is built from its own constructor and
  // receives the logger through injection.
  let report_service = resolve!(kernel, ReportService);
  report_service.generate_report();

  let logger = resolve!(kernel, dyn Logger);
  assert!(Arc::ptr_eq(&logger, &report_service.logger));
  println!("The injected logger is the shared singleton.");
}
