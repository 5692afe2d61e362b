use fibre_kernel::{resolve, Binding, Constructor, Kernel, Service};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// A simple service that gets a unique ID upon creation.
struct RequestTracker {
  id: usize,
}

// A global, thread-safe counter to generate unique IDs.
static ID_COUNTER: AtomicUsize = AtomicUsize::new(0);

impl Service for RequestTracker {
  fn constructor() -> Option<Constructor> {
    Some(Constructor::new::<RequestTracker, _>(Vec::new(), |_| {
      println!("Creating RequestTracker...");
      Ok(RequestTracker {
        id: ID_COUNTER.fetch_add(1, Ordering::SeqCst),
      })
    }))
  }
}

fn main() {
  // --- Transient (the default) ---
  // The constructor runs EVERY time the service is resolved.
  let kernel = Kernel::new();

  println!("--- Resolving Transients ---");
  let t1 = resolve!(kernel, RequestTracker);
  let t2 = resolve!(kernel, RequestTracker);
  println!("Transient 1 ID: {}, Transient 2 ID: {}", t1.id, t2.id);
  assert_ne!(t1.id, t2.id);
  assert!(!Arc::ptr_eq(&t1, &t2));
  println!("Transient instances are different, as expected.\n");

  // --- Singleton Registration ---
  // The constructor runs only ONCE per kernel.
  kernel.bind(Binding::of::<RequestTracker>().singleton());

  println!("--- Resolving Singletons ---");
  let s1 = resolve!(kernel, RequestTracker);
  let s2 = resolve!(kernel, RequestTracker);
  println!("Singleton 1 ID: {}, Singleton 2 ID: {}", s1.id, s2.id);
  assert_eq!(s1.id, s2.id);
  assert!(
    Arc::ptr_eq(&s1, &s2),
    "Singleton instances should be identical"
  );
  println!("Singleton instances are the same pointer, as expected.");
}
