use fibre_kernel::{Binding, Error, Kernel, Service};

trait PaymentGateway: Send + Sync {}
fibre_kernel::service!(dyn PaymentGateway);

struct ShoppingCart;
impl Service for ShoppingCart {}

fn main() {
  let kernel = Kernel::new();

  // An interface with no binding has nothing to construct.
  match kernel.get::<dyn PaymentGateway>() {
    Err(Error::NotConstructible { service }) => {
      println!("No implementation is bound for `{}`.", service)
    }
    Err(err) => println!("Unexpected error: {}", err),
    Ok(_) => unreachable!("service should not resolve"),
  }

  // A scoped service needs an open scope.
  kernel.bind(Binding::of::<ShoppingCart>().scoped());
  if let Err(err) = kernel.get::<ShoppingCart>() {
    println!("Resolving without a scope failed: {}", err);
  }

  // The `resolve!` macro panics instead of returning the error.
  let result = std::panic::catch_unwind(|| {
    let kernel = Kernel::new();
    fibre_kernel::resolve!(kernel, dyn PaymentGateway)
  });
  assert!(result.is_err());
  println!("resolve! panicked, as expected.");
}
