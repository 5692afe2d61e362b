//! Grouped configuration: the `Binder` surface and installable modules.

use crate::binding::Binding;
use crate::core::{Lifetime, Service, ServiceKey};
use crate::error::{Error, Result};
use crate::interceptor::Interceptor;
use crate::signature::{Constructor, Parameter};

/// The registration surface handed to modules.
pub trait Binder {
  /// Appends a binding.
  fn bind(&self, binding: Binding);
  /// Replaces all bindings of the service with `binding`.
  fn rebind(&self, binding: Binding);
  /// Appends an interceptor.
  fn intercept(&self, interceptor: Interceptor);
}

/// A factory a module contributes, bound for the service it declares.
#[derive(Debug, Clone)]
pub struct FactoryDeclaration {
  name: &'static str,
  service: Option<ServiceKey>,
  lifetime: Lifetime,
  constructor: Constructor,
}

impl FactoryDeclaration {
  /// Declares `constructor` as the factory of the service it builds.
  pub fn new(name: &'static str, constructor: Constructor) -> Self {
    let service = Some(constructor.output().clone());
    Self::returning(name, service, constructor)
  }

  /// Declares a factory with an explicitly stated return type, which may be
  /// unknown.
  pub fn returning(name: &'static str, service: Option<ServiceKey>, constructor: Constructor) -> Self {
    Self {
      name,
      service,
      lifetime: Lifetime::Transient,
      constructor,
    }
  }

  pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
    self.lifetime = lifetime;
    self
  }

  pub fn singleton(self) -> Self {
    self.lifetime(Lifetime::Singleton)
  }

  pub fn scoped(self) -> Self {
    self.lifetime(Lifetime::Scoped)
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  fn validate(&self) -> Result<ServiceKey> {
    let Some(service) = &self.service else {
      return Err(Error::Declaration {
        name: self.name,
        reason: "factory has no declared return type".to_string(),
      });
    };
    if service != self.constructor.output() {
      return Err(Error::Declaration {
        name: self.name,
        reason: format!(
          "factory declares `{}` but builds `{}`",
          service.name(),
          self.constructor.output().name()
        ),
      });
    }
    Ok(service.clone())
  }

  fn into_binding(self, service: ServiceKey) -> Binding {
    let mut binding = Binding::implicit(service);
    binding.factory = Some(self.constructor);
    binding.lifetime = self.lifetime;
    binding
  }
}

/// An interceptor a module contributes.
///
/// The intercepted service is the declared type of the handler's first
/// positional parameter.
#[derive(Debug, Clone)]
pub struct InterceptorDeclaration {
  name: &'static str,
  parameters: Vec<Parameter>,
  interceptor: Interceptor,
}

impl InterceptorDeclaration {
  /// Declares `handler` as an interceptor of `S`.
  pub fn new<S, F>(name: &'static str, handler: F) -> Self
  where
    S: ?Sized + Service,
    F: Fn(&S) + Send + Sync + 'static,
  {
    Self::with_signature(name, vec![Parameter::of::<S>("instance")], Interceptor::new(handler))
  }

  /// Declares an interceptor described by an explicit handler signature.
  pub fn with_signature(name: &'static str, parameters: Vec<Parameter>, interceptor: Interceptor) -> Self {
    Self {
      name,
      parameters,
      interceptor,
    }
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  fn validate(&self) -> Result<()> {
    let Some(first) = self.parameters.iter().find(|p| p.is_positional()) else {
      return Err(Error::Declaration {
        name: self.name,
        reason: "interceptor has no first positional argument".to_string(),
      });
    };
    let Some(service) = first.service() else {
      return Err(Error::Declaration {
        name: self.name,
        reason: format!("interceptor has untyped first argument `{}`", first.name()),
      });
    };
    if service != self.interceptor.service() {
      return Err(Error::Declaration {
        name: self.name,
        reason: format!(
          "interceptor argument `{}` is a `{}` but the handler intercepts `{}`",
          first.name(),
          service.name(),
          self.interceptor.service().name()
        ),
      });
    }
    Ok(())
  }
}

/// A group of related registrations.
///
/// ```
/// use fibre_kernel::{service, Constructor, FactoryDeclaration, Kernel, Module};
/// use std::sync::Arc;
///
/// trait Storage: Send + Sync {
///   fn kind(&self) -> &'static str;
/// }
/// service!(dyn Storage);
///
/// struct Disk;
/// impl Storage for Disk {
///   fn kind(&self) -> &'static str {
///     "disk"
///   }
/// }
///
/// struct StorageModule;
///
/// impl Module for StorageModule {
///   fn factories(&self) -> Vec<FactoryDeclaration> {
///     vec![FactoryDeclaration::new(
///       "storage",
///       Constructor::shared::<dyn Storage, _>(Vec::new(), |_| Ok(Arc::new(Disk) as Arc<dyn Storage>)),
///     )
///     .singleton()]
///   }
/// }
///
/// let kernel = Kernel::new();
/// kernel.install(&StorageModule).unwrap();
/// assert_eq!(kernel.get::<dyn Storage>().unwrap().kind(), "disk");
/// ```
pub trait Module {
  /// Factories to bind, each for the service it declares.
  fn factories(&self) -> Vec<FactoryDeclaration> {
    Vec::new()
  }

  /// Interceptors to register.
  fn interceptors(&self) -> Vec<InterceptorDeclaration> {
    Vec::new()
  }

  /// Free-form registrations, run after the declarations are registered.
  fn configure(&self, _binder: &dyn Binder) {}
}

/// Registers everything `module` declares against `binder`.
///
/// Declarations are validated up front; on error nothing is registered.
pub fn install_module(module: &dyn Module, binder: &dyn Binder) -> Result<()> {
  let factories = module
    .factories()
    .into_iter()
    .map(|factory| factory.validate().map(|service| (service, factory)))
    .collect::<Result<Vec<_>>>()?;
  let interceptors = module.interceptors();
  for interceptor in &interceptors {
    interceptor.validate()?;
  }

  tracing::debug!(
    factories = factories.len(),
    interceptors = interceptors.len(),
    "installing module"
  );
  for (service, factory) in factories {
    binder.bind(factory.into_binding(service));
  }
  for declaration in interceptors {
    binder.intercept(declaration.interceptor);
  }
  module.configure(binder);
  Ok(())
}
