//! Public macros for describing services and resolving them.

/// Marks one or more types as abstract service identities.
///
/// Abstract services have no constructor of their own and resolve only
/// through a binding.
///
/// ```
/// use fibre_kernel::service;
///
/// trait Mailer: Send + Sync {}
/// trait Clock: Send + Sync {}
///
/// service!(dyn Mailer, dyn Clock);
/// ```
#[macro_export]
macro_rules! service {
  ($($service:ty),+ $(,)?) => {
    $(impl $crate::Service for $service {})+
  };
}

/// Describes how a concrete type is constructed.
///
/// - `injectable!(Type)` builds the type with `Default::default()`.
/// - `injectable!(Type { field: Dependency, ... })` injects every listed field
///   as an `Arc<Dependency>`.
///
/// ```
/// use fibre_kernel::{injectable, Kernel};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct Database;
/// injectable!(Database);
///
/// struct UserRepository {
///   db: Arc<Database>,
/// }
/// injectable!(UserRepository { db: Database });
///
/// let kernel = Kernel::new();
/// let repo = kernel.get::<UserRepository>().unwrap();
/// let _db: &Database = &repo.db;
/// ```
#[macro_export]
macro_rules! injectable {
  ($target:ident { $($field:ident : $dependency:ty),* $(,)? }) => {
    impl $crate::Service for $target {
      fn constructor() -> ::std::option::Option<$crate::Constructor> {
        ::std::option::Option::Some($crate::Constructor::new::<$target, _>(
          ::std::vec![$($crate::Parameter::of::<$dependency>(::std::stringify!($field))),*],
          |_args| {
            ::std::result::Result::Ok($target {
              $($field: _args.take::<$dependency>(::std::stringify!($field))?),*
            })
          },
        ))
      }
    }
  };

  ($target:ty) => {
    impl $crate::Service for $target {
      fn constructor() -> ::std::option::Option<$crate::Constructor> {
        ::std::option::Option::Some($crate::Constructor::new::<$target, _>(
          ::std::vec::Vec::new(),
          |_| ::std::result::Result::Ok(<$target as ::std::default::Default>::default()),
        ))
      }
    }
  };
}

/// Resolves a service from a `Kernel` or a `Scope`, panicking on failure.
///
/// # Panics
///
/// Panics with the resolution error if the service cannot be resolved. Use
/// `get` directly for a `Result`.
///
/// ```
/// use fibre_kernel::{injectable, resolve, Kernel};
///
/// #[derive(Default)]
/// struct Settings;
/// injectable!(Settings);
///
/// let kernel = Kernel::new();
/// let _settings = resolve!(kernel, Settings);
/// ```
#[macro_export]
macro_rules! resolve {
  ($source:expr, $service:ty) => {
    match $source.get::<$service>() {
      ::std::result::Result::Ok(instance) => instance,
      ::std::result::Result::Err(err) => panic!(
        "Failed to resolve required service {}: {}",
        ::std::any::type_name::<$service>(),
        err
      ),
    }
  };
}
