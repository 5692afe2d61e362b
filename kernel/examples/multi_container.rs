use fibre_kernel::{Binding, Kernel, Service};
use std::sync::Arc;

struct DatabaseUrl(&'static str);
impl Service for DatabaseUrl {}

fn main() {
  // Every kernel keeps its own bindings and singletons.
  let production = Kernel::with_name("production");
  production.bind(Binding::of::<DatabaseUrl>().instance(Arc::new(DatabaseUrl("postgres://prod"))));

  let testing = Kernel::with_name("testing");
  testing.bind(Binding::of::<DatabaseUrl>().instance(Arc::new(DatabaseUrl("sqlite::memory:"))));

  for kernel in [&production, &testing] {
    let url = kernel.get::<DatabaseUrl>().unwrap();
    println!("[{}] database: {}", kernel.name(), url.0);
  }

  // Rebinding in one kernel leaves the other untouched.
  testing.rebind(Binding::of::<DatabaseUrl>().instance(Arc::new(DatabaseUrl("sqlite://test.db"))));
  assert_eq!(production.get::<DatabaseUrl>().unwrap().0, "postgres://prod");
  assert_eq!(testing.get::<DatabaseUrl>().unwrap().0, "sqlite://test.db");
  println!("Kernels are isolated from one another.");
}
