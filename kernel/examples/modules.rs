use fibre_kernel::{
  Binder, Binding, Constructor, FactoryDeclaration, InterceptorDeclaration, Kernel, Module,
  Parameter, Service,
};
use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Default)]
struct Settings {
  greeting: &'static str,
}

impl Service for Settings {}

struct Greeter {
  settings: Arc<Settings>,
  greeted: Mutex<Vec<String>>,
}

impl Service for Greeter {}

impl Greeter {
  fn greet(&self, name: &str) {
    println!("{}, {}!", self.settings.greeting, name);
    self.greeted.lock().push(name.to_string());
  }
}

// Declares a singleton factory for the greeter and an interceptor that greets
// the administrator as soon as the greeter is created.
struct GreetingModule;

impl Module for GreetingModule {
  fn factories(&self) -> Vec<FactoryDeclaration> {
    vec![FactoryDeclaration::new(
      "provide_greeter",
      Constructor::new::<Greeter, _>(vec![Parameter::of::<Settings>("settings")], |args| {
        Ok(Greeter {
          settings: args.take("settings")?,
          greeted: Mutex::new(Vec::new()),
        })
      }),
    )
    .singleton()]
  }

  fn interceptors(&self) -> Vec<InterceptorDeclaration> {
    vec![InterceptorDeclaration::new(
      "greet_admin",
      |greeter: &Greeter| greeter.greet("admin"),
    )]
  }

  fn configure(&self, binder: &dyn Binder) {
    binder.bind(
      Binding::of::<Settings>()
        .instance(Arc::new(Settings { greeting: "Hello" }))
        .build(),
    );
  }
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let kernel = Kernel::builder()
    .name("modules-demo")
    .module(GreetingModule)
    .build()
    .unwrap();

  let greeter = kernel.get::<Greeter>().unwrap();
  greeter.greet("world");

  assert_eq!(*greeter.greeted.lock(), vec!["admin", "world"]);
  println!("Greeted so far: {:?}", greeter.greeted.lock());
}
