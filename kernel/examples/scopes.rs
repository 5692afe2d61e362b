use fibre_kernel::{Binding, Constructor, Kernel, Parameter, Service};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

static NEXT_REQUEST: AtomicUsize = AtomicUsize::new(0);

// Per-request state, shared by everything resolved in the same scope.
struct RequestContext {
  request_id: usize,
}

impl Service for RequestContext {
  fn constructor() -> Option<Constructor> {
    Some(Constructor::new::<RequestContext, _>(Vec::new(), |_| {
      Ok(RequestContext {
        request_id: NEXT_REQUEST.fetch_add(1, Ordering::SeqCst),
      })
    }))
  }
}

struct AuditLog {
  context: Arc<RequestContext>,
}

impl Service for AuditLog {
  fn constructor() -> Option<Constructor> {
    Some(Constructor::new::<AuditLog, _>(
      vec![Parameter::of::<RequestContext>("context")],
      |args| {
        Ok(AuditLog {
          context: args.take("context")?,
        })
      },
    ))
  }
}

fn handle_request(kernel: &Kernel) {
  kernel.scoped(|scope| {
    let context = scope.get::<RequestContext>().unwrap();
    let audit = scope.get::<AuditLog>().unwrap();

    println!(
      "Scope {} handles request {} (audit sees request {})",
      scope.id(),
      context.request_id,
      audit.context.request_id
    );
    assert!(Arc::ptr_eq(&context, &audit.context));
  });
}

fn main() {
  tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .init();

  let kernel = Kernel::with_name("scopes-demo");
  kernel.bind(Binding::of::<RequestContext>().scoped());

  handle_request(&kernel);
  handle_request(&kernel);

  // Scoped services are not available outside of a scope.
  match kernel.get::<RequestContext>() {
    Ok(_) => unreachable!("scoped service resolved without a scope"),
    Err(err) => println!("Outside a scope: {}", err),
  }
}
