//! Binding records: the rules describing how a service is produced.

use crate::core::{erase, unerase, Erased, Lifetime, Service, ServiceKey};
use crate::error::Result;
use crate::signature::Constructor;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

type CastFn = dyn Fn(Erased) -> Result<Erased> + Send + Sync;

/// A redirect from one service identity to another.
#[derive(Clone)]
pub(crate) struct Redirect {
  pub(crate) target: ServiceKey,
  cast: Arc<CastFn>,
}

impl Redirect {
  /// Converts an instance of the target into an instance of the bound service.
  pub(crate) fn cast(&self, instance: Erased) -> Result<Erased> {
    (self.cast)(instance)
  }
}

/// An immutable rule describing how to produce instances of one service.
///
/// When several sources are set, resolution uses the first present of
/// `instance`, `to`, `factory`, and finally the service's own constructor.
#[derive(Clone)]
pub struct Binding {
  pub(crate) service: ServiceKey,
  pub(crate) to: Option<Redirect>,
  pub(crate) factory: Option<Constructor>,
  pub(crate) instance: Option<Erased>,
  pub(crate) lifetime: Lifetime,
}

impl Binding {
  /// Starts a transient binding of `S` to itself.
  ///
  /// ```
  /// use fibre_kernel::{injectable, service, Binding, Kernel};
  ///
  /// trait Clock: Send + Sync {
  ///   fn now(&self) -> u64;
  /// }
  /// service!(dyn Clock);
  ///
  /// #[derive(Default)]
  /// struct FixedClock;
  /// impl Clock for FixedClock {
  ///   fn now(&self) -> u64 {
  ///     42
  ///   }
  /// }
  /// injectable!(FixedClock);
  ///
  /// let kernel = Kernel::new();
  /// kernel.bind(Binding::of::<dyn Clock>().to::<FixedClock>(|clock| clock).singleton());
  ///
  /// let clock = kernel.get::<dyn Clock>().unwrap();
  /// assert_eq!(clock.now(), 42);
  /// ```
  pub fn of<S: ?Sized + Service>() -> BindingBuilder<S> {
    BindingBuilder {
      binding: Self::implicit(ServiceKey::of::<S>()),
      _service: PhantomData,
    }
  }

  /// The binding used for a service nobody bound.
  pub(crate) fn implicit(service: ServiceKey) -> Self {
    Self {
      service,
      to: None,
      factory: None,
      instance: None,
      lifetime: Lifetime::Transient,
    }
  }

  /// The service this binding is registered for.
  pub fn service(&self) -> &ServiceKey {
    &self.service
  }

  /// The caching lifetime of instances produced by this binding.
  pub fn lifetime(&self) -> Lifetime {
    self.lifetime
  }

  /// The service this binding redirects to, if any.
  pub fn target(&self) -> Option<&ServiceKey> {
    self.to.as_ref().map(|redirect| &redirect.target)
  }

  /// Returns `true` if this binding always resolves to a fixed instance.
  pub fn has_instance(&self) -> bool {
    self.instance.is_some()
  }

  /// Returns `true` if this binding builds through a factory.
  pub fn has_factory(&self) -> bool {
    self.factory.is_some()
  }
}

impl fmt::Debug for Binding {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Binding")
      .field("service", &self.service)
      .field("to", &self.target())
      .field("factory", &self.factory)
      .field("has_instance", &self.has_instance())
      .field("lifetime", &self.lifetime)
      .finish()
  }
}

/// A typed, fluent builder for a [`Binding`] of the service `S`.
pub struct BindingBuilder<S: ?Sized> {
  binding: Binding,
  _service: PhantomData<fn() -> Arc<S>>,
}

impl<S: ?Sized + Service> BindingBuilder<S> {
  /// Redirects `S` to the service `T`, converting each instance with `cast`.
  ///
  /// For an interface implemented by `T` the identity closure `|t| t`
  /// performs the coercion.
  pub fn to<T: ?Sized + Service>(
    mut self,
    cast: impl Fn(Arc<T>) -> Arc<S> + Send + Sync + 'static,
  ) -> Self {
    let target = ServiceKey::of::<T>();
    let source = target.clone();
    self.binding.to = Some(Redirect {
      target,
      cast: Arc::new(move |instance: Erased| {
        let instance = unerase::<T>(&source, &instance)?;
        Ok(erase(cast(instance)))
      }),
    });
    self
  }

  /// Produces instances with `factory` instead of the service's own constructor.
  pub fn factory(mut self, factory: Constructor) -> Self {
    self.binding.factory = Some(factory);
    self
  }

  /// Always resolves to `instance`, bypassing caches and interceptors.
  pub fn instance(mut self, instance: Arc<S>) -> Self {
    self.binding.instance = Some(erase(instance));
    self
  }

  pub fn lifetime(mut self, lifetime: Lifetime) -> Self {
    self.binding.lifetime = lifetime;
    self
  }

  pub fn transient(self) -> Self {
    self.lifetime(Lifetime::Transient)
  }

  pub fn singleton(self) -> Self {
    self.lifetime(Lifetime::Singleton)
  }

  pub fn scoped(self) -> Self {
    self.lifetime(Lifetime::Scoped)
  }

  /// Finishes the builder.
  pub fn build(self) -> Binding {
    self.binding
  }
}

impl<S: ?Sized + Service> From<BindingBuilder<S>> for Binding {
  fn from(builder: BindingBuilder<S>) -> Self {
    builder.build()
  }
}
