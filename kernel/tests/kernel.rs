mod common;

use common::*;
use fibre_kernel::{
  injectable, Arguments, Binding, Constructor, Error, Kernel, Parameter, Result, Service,
};
use std::sync::{
  atomic::{AtomicUsize, Ordering},
  Arc,
};

// --- Test Fixtures ---

#[derive(Default)]
struct Database;
injectable!(Database);

struct UserService {
  db: Arc<Database>,
}
injectable!(UserService { db: Database });

// A handler whose event bus is optional: it is only injected when bound.
struct NotifyingHandler {
  bus: Option<Arc<dyn EventBus>>,
  retries: u32,
}

impl Service for NotifyingHandler {
  fn constructor() -> Option<Constructor> {
    Some(Constructor::new::<Self, _>(
      vec![
        Parameter::of::<dyn EventBus>("bus").optional().with_default(),
        Parameter::untyped("retries").with_default(),
      ],
      |args: &mut Arguments| {
        Ok(NotifyingHandler {
          bus: args.take_optional("bus")?,
          // Untyped parameters are never injected.
          retries: if args.contains("retries") { 0 } else { 3 },
        })
      },
    ))
  }
}

// A concrete dependency with a default: skipped until explicitly bound.
struct Reporter {
  db: Option<Arc<Database>>,
}

impl Service for Reporter {
  fn constructor() -> Option<Constructor> {
    Some(Constructor::new::<Self, _>(
      vec![Parameter::of::<Database>("db").with_default()],
      |args: &mut Arguments| Ok(Reporter { db: args.take_optional("db")? }),
    ))
  }
}

// An optional dependency without a default: it must be bound.
struct AuditedHandler {
  bus: Option<Arc<dyn EventBus>>,
}

impl Service for AuditedHandler {
  fn constructor() -> Option<Constructor> {
    Some(Constructor::new::<Self, _>(
      vec![Parameter::of::<dyn EventBus>("bus").optional()],
      |args: &mut Arguments| Ok(AuditedHandler { bus: args.take_optional("bus")? }),
    ))
  }
}

// --- Basic Tests ---

#[test]
fn test_self_binding_without_arguments() {
  let kernel = Kernel::new();
  kernel.bind(Binding::of::<Database>());

  let db = kernel.get::<Database>();
  assert!(db.is_ok());
}

#[test]
fn test_unbound_concrete_service_constructs_itself() {
  let kernel = Kernel::new();

  // No binding at all: the implicit self-binding applies.
  let r1 = kernel.get::<Database>().unwrap();
  let r2 = kernel.get::<Database>().unwrap();

  assert!(!Arc::ptr_eq(&r1, &r2));
  assert!(!kernel.is_bound::<Database>());
}

#[test]
fn test_binding_interface_to_implementation() {
  let kernel = Kernel::new();
  kernel.bind(Binding::of::<dyn FileSystem>().to::<InMemoryFileSystem>(|fs| fs));

  let fs = kernel.get::<dyn FileSystem>().unwrap();
  assert_eq!(fs.kind(), "memory");
}

#[test]
fn test_constructor_parameters_are_injected() {
  let kernel = Kernel::new();
  kernel.bind(Binding::of::<Database>());
  kernel.bind(Binding::of::<UserService>());

  let service = kernel.get::<UserService>().unwrap();
  let other = kernel.get::<UserService>().unwrap();

  // Both the service and its transient dependency are fresh each time.
  assert!(!Arc::ptr_eq(&service, &other));
  assert!(!Arc::ptr_eq(&service.db, &other.db));
}

#[test]
fn test_interface_parameter_is_injected_through_its_binding() {
  let kernel = Kernel::new();
  kernel.bind(Binding::of::<dyn FileSystem>().to::<S3FileSystem>(|fs| fs));

  let handler = kernel.get::<FileHandler>().unwrap();
  assert_eq!(handler.fs.kind(), "s3");
}

#[test]
fn test_optional_injection_when_missing() {
  let kernel = Kernel::new();

  let handler = kernel.get::<NotifyingHandler>().unwrap();

  assert!(handler.bus.is_none());
  assert_eq!(handler.retries, 3);
}

#[test]
fn test_optional_injection_once_bound() {
  let kernel = Kernel::new();
  assert!(kernel.get::<NotifyingHandler>().unwrap().bus.is_none());

  // Adding a binding later makes the next resolution inject it.
  kernel.bind(Binding::of::<dyn EventBus>().to::<NoopEventBus>(|bus| bus));
  let handler = kernel.get::<NotifyingHandler>().unwrap();

  assert!(handler.bus.is_some());
  assert_eq!(handler.retries, 3);
}

#[test]
fn test_optional_injection_skips_unbound_concrete_types() {
  let kernel = Kernel::new();
  assert!(kernel.get::<Reporter>().unwrap().db.is_none());

  kernel.bind(Binding::of::<Database>());
  assert!(kernel.get::<Reporter>().unwrap().db.is_some());
}

#[test]
fn test_optional_parameter_without_default_resolves_its_inner_type() {
  let kernel = Kernel::new();

  let err = kernel.get::<AuditedHandler>().err().unwrap();
  assert!(matches!(err, Error::NotConstructible { service } if service.contains("EventBus")));

  kernel.bind(Binding::of::<dyn EventBus>().to::<NoopEventBus>(|bus| bus));
  assert!(kernel.get::<AuditedHandler>().unwrap().bus.is_some());
}

#[test]
fn test_unbound_interface_is_not_constructible() {
  let kernel = Kernel::new();

  let err = kernel.get::<FileHandler>().err().unwrap();

  assert!(matches!(err, Error::NotConstructible { service } if service.contains("FileSystem")));
  assert!(err.is_construction());
}

#[test]
fn test_instance_binding_returns_the_supplied_instance() {
  let kernel = Kernel::new();
  let fs = Arc::new(InMemoryFileSystem::default());
  fs.add("/etc/hosts", b"127.0.0.1 localhost");
  kernel.bind(Binding::of::<InMemoryFileSystem>().instance(fs.clone()));

  let resolved = kernel.get::<InMemoryFileSystem>().unwrap();

  assert!(Arc::ptr_eq(&fs, &resolved));
  assert!(resolved.exists("/etc/hosts"));
}

#[test]
fn test_last_binding_wins() {
  let kernel = Kernel::new();
  kernel.bind(Binding::of::<dyn FileSystem>().to::<InMemoryFileSystem>(|fs| fs));
  kernel.bind(Binding::of::<dyn FileSystem>().to::<S3FileSystem>(|fs| fs));

  assert_eq!(kernel.get::<dyn FileSystem>().unwrap().kind(), "s3");
  assert_eq!(kernel.binding_count::<dyn FileSystem>(), 2);
}

#[test]
fn test_rebind_replaces_instead_of_appending() {
  let kernel = Kernel::new();
  kernel.bind(Binding::of::<dyn FileSystem>().to::<InMemoryFileSystem>(|fs| fs));
  kernel.bind(Binding::of::<dyn EventBus>().to::<NoopEventBus>(|bus| bus));

  kernel.rebind(Binding::of::<dyn FileSystem>().to::<S3FileSystem>(|fs| fs));

  assert_eq!(kernel.get::<dyn FileSystem>().unwrap().kind(), "s3");
  assert_eq!(kernel.binding_count::<dyn FileSystem>(), 1);

  // A plain rebind still only touches its own service.
  kernel.rebind(Binding::of::<InMemoryFileSystem>());
  assert_eq!(kernel.binding_count::<dyn FileSystem>(), 1);
  assert_eq!(kernel.binding_count::<dyn EventBus>(), 1);
}

#[test]
fn test_rebind_without_prior_binding() {
  let kernel = Kernel::new();
  kernel.rebind(Binding::of::<dyn FileSystem>().to::<S3FileSystem>(|fs| fs));

  assert_eq!(kernel.get::<dyn FileSystem>().unwrap().kind(), "s3");
}

#[test]
fn test_binding_precedence() {
  let kernel = Kernel::new();

  // `to` wins over `factory`.
  kernel.bind(
    Binding::of::<dyn FileSystem>()
      .to::<InMemoryFileSystem>(|fs| fs)
      .factory(Constructor::shared::<dyn FileSystem, _>(Vec::new(), |_| {
        Ok(Arc::new(S3FileSystem) as Arc<dyn FileSystem>)
      })),
  );
  assert_eq!(kernel.get::<dyn FileSystem>().unwrap().kind(), "memory");

  // `instance` wins over everything.
  let fixed: Arc<dyn FileSystem> = Arc::new(S3FileSystem);
  kernel.bind(
    Binding::of::<dyn FileSystem>()
      .to::<InMemoryFileSystem>(|fs| fs)
      .instance(fixed.clone()),
  );
  assert!(Arc::ptr_eq(&kernel.get::<dyn FileSystem>().unwrap(), &fixed));
}

#[test]
fn test_factory_parameters_are_injected() {
  static FACTORY_CALLS: AtomicUsize = AtomicUsize::new(0);

  let kernel = Kernel::new();
  let db = Arc::new(Database);
  kernel.bind(Binding::of::<Database>().instance(db.clone()));
  kernel.bind(Binding::of::<UserService>().factory(Constructor::new::<UserService, _>(
    vec![Parameter::of::<Database>("db")],
    |args| {
      FACTORY_CALLS.fetch_add(1, Ordering::SeqCst);
      Ok(UserService { db: args.take("db")? })
    },
  )));

  let service = kernel.get::<UserService>().unwrap();

  assert!(Arc::ptr_eq(&service.db, &db));
  assert_eq!(FACTORY_CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_multi_level_redirect_chain() {
  // ReadOnlyView -> dyn FileSystem -> InMemoryFileSystem (singleton).
  struct ReadOnlyView {
    fs: Arc<dyn FileSystem>,
  }
  impl Service for ReadOnlyView {}

  let kernel = Kernel::new();
  kernel.bind(Binding::of::<InMemoryFileSystem>().singleton());
  kernel.bind(Binding::of::<dyn FileSystem>().to::<InMemoryFileSystem>(|fs| fs));
  kernel.bind(Binding::of::<ReadOnlyView>().to::<dyn FileSystem>(|fs| Arc::new(ReadOnlyView { fs })));

  let view = kernel.get::<ReadOnlyView>().unwrap();
  let direct = kernel.get::<InMemoryFileSystem>().unwrap();

  assert_eq!(view.fs.kind(), "memory");
  assert!(same(&view.fs, &direct));
  // The view itself is transient.
  assert!(!Arc::ptr_eq(&view, &kernel.get::<ReadOnlyView>().unwrap()));
}

#[test]
fn test_construction_errors_propagate_unchanged() {
  let kernel = Kernel::new();
  kernel.bind(Binding::of::<Database>().factory(Constructor::new::<Database, _>(
    Vec::new(),
    |_| -> Result<Database> { Err(Error::construction::<Database, _>("connection refused")) },
  )));

  let err = kernel.get::<UserService>().err().unwrap();

  assert!(matches!(err, Error::Construction { .. }));
  assert!(err.to_string().contains("connection refused"));
}

#[test]
fn test_kernels_are_isolated() {
  let first = Kernel::new();
  let second = Kernel::new();

  first.bind(Binding::of::<dyn FileSystem>().to::<S3FileSystem>(|fs| fs));

  assert!(first.get::<dyn FileSystem>().is_ok());
  assert!(matches!(
    second.get::<dyn FileSystem>(),
    Err(Error::NotConstructible { .. })
  ));
}

#[test]
fn test_singleton_depending_on_transient() {
  // A singleton resolves its transient dependencies only once, when it is built.
  static TRANSIENT_COUNTER: AtomicUsize = AtomicUsize::new(0);

  struct TransientDependency {
    id: usize,
  }
  impl Service for TransientDependency {
    fn constructor() -> Option<Constructor> {
      Some(Constructor::new::<Self, _>(Vec::new(), |_| {
        Ok(TransientDependency {
          id: TRANSIENT_COUNTER.fetch_add(1, Ordering::SeqCst),
        })
      }))
    }
  }

  struct SingletonHolder {
    dependency: Arc<TransientDependency>,
  }
  injectable!(SingletonHolder { dependency: TransientDependency });

  let kernel = Kernel::new();
  kernel.bind(Binding::of::<SingletonHolder>().singleton());

  let holder1 = kernel.get::<SingletonHolder>().unwrap();
  let holder2 = kernel.get::<SingletonHolder>().unwrap();
  let standalone = kernel.get::<TransientDependency>().unwrap();

  assert!(Arc::ptr_eq(&holder1, &holder2));
  assert!(Arc::ptr_eq(&holder1.dependency, &holder2.dependency));
  assert_eq!(holder1.dependency.id, 0);
  assert_eq!(standalone.id, 1);
}

#[test]
fn test_drop_behavior_of_singletons() {
  // The kernel owns its singletons and releases them when dropped.
  static DROP_COUNTER: AtomicUsize = AtomicUsize::new(0);

  #[derive(Default)]
  struct ConnectionPool;
  impl Drop for ConnectionPool {
    fn drop(&mut self) {
      DROP_COUNTER.fetch_add(1, Ordering::SeqCst);
    }
  }
  injectable!(ConnectionPool);

  let kernel = Kernel::new();
  kernel.bind(Binding::of::<ConnectionPool>().singleton());

  let pool = kernel.get::<ConnectionPool>().unwrap();
  drop(pool);
  assert_eq!(DROP_COUNTER.load(Ordering::SeqCst), 0);

  drop(kernel);
  assert_eq!(DROP_COUNTER.load(Ordering::SeqCst), 1);
}
