//! The resolution engine.

use crate::binding::Binding;
use crate::builder::KernelBuilder;
use crate::core::{unerase, Erased, Lifetime, Service, ServiceKey};
use crate::error::{Error, Result};
use crate::interceptor::Interceptor;
use crate::module::{install_module, Binder, Module};
use crate::registry::Registry;
use crate::scope::{Scope, ScopeCache};
use crate::signature::Constructor;
use dashmap::DashMap;
use parking_lot::ReentrantMutex;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

const DEFAULT_NAME: &str = "kernel";

/// The dependency injection kernel.
///
/// Holds the binding registry and the singleton cache, and builds object
/// graphs on demand. It is thread-safe: bindings may be added and services
/// resolved from any thread at any time. There is no global kernel; every
/// kernel is independent of the others.
pub struct Kernel {
  name: String,
  registry: Registry,
  singletons: DashMap<ServiceKey, Erased>,
  // Held for the whole construction of a singleton. Re-entrant so a singleton
  // can depend on other singletons.
  singleton_lock: ReentrantMutex<()>,
  next_scope: AtomicU64,
}

impl Default for Kernel {
  fn default() -> Self {
    Self::with_name(DEFAULT_NAME)
  }
}

impl Kernel {
  /// Creates a new, empty `Kernel`.
  pub fn new() -> Self {
    Self::default()
  }

  /// Creates a new, empty `Kernel` labelled `name` in logs.
  pub fn with_name(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      registry: Registry::default(),
      singletons: DashMap::new(),
      singleton_lock: ReentrantMutex::new(()),
      next_scope: AtomicU64::new(1),
    }
  }

  /// Returns a builder for configuring a kernel up front.
  pub fn builder() -> KernelBuilder {
    KernelBuilder::new()
  }

  /// The label attached to this kernel's log events.
  pub fn name(&self) -> &str {
    &self.name
  }

  // --- Configuration ---

  /// Appends a binding. The most recent binding of a service wins.
  pub fn bind(&self, binding: impl Into<Binding>) {
    let binding = binding.into();
    tracing::debug!(
      kernel = %self.name,
      service = binding.service.name(),
      lifetime = %binding.lifetime,
      "bind"
    );
    self.registry.bind(binding);
  }

  /// Replaces every binding of the service with `binding`.
  ///
  /// A singleton already built for the service is discarded with the old
  /// bindings.
  pub fn rebind(&self, binding: impl Into<Binding>) {
    let binding = binding.into();
    tracing::debug!(
      kernel = %self.name,
      service = binding.service.name(),
      lifetime = %binding.lifetime,
      "rebind"
    );
    let _guard = self.singleton_lock.lock();
    self.singletons.remove(&binding.service);
    self.registry.rebind(binding);
  }

  /// Appends an interceptor to the chain of its service.
  pub fn intercept(&self, interceptor: Interceptor) {
    tracing::debug!(
      kernel = %self.name,
      service = interceptor.service().name(),
      "intercept"
    );
    self.registry.intercept(interceptor);
  }

  /// Installs a module, registering its declarations and running its
  /// `configure` step.
  ///
  /// Every declaration is validated before anything is registered.
  pub fn install(&self, module: &dyn Module) -> Result<()> {
    install_module(module, self)
  }

  /// Returns `true` if `S` has at least one explicit binding.
  pub fn is_bound<S: ?Sized + Service>(&self) -> bool {
    self.registry.is_bound(&ServiceKey::of::<S>())
  }

  /// Number of bindings currently registered for `S`.
  pub fn binding_count<S: ?Sized + Service>(&self) -> usize {
    self.registry.binding_count(&ServiceKey::of::<S>())
  }

  // --- Resolution ---

  /// Resolves `S` outside of any call scope.
  ///
  /// Resolving a `Scoped` service this way fails with
  /// [`Error::ScopeRequired`].
  pub fn get<S: ?Sized + Service>(&self) -> Result<Arc<S>> {
    let key = ServiceKey::of::<S>();
    let instance = self.resolve(&key, None)?;
    unerase::<S>(&key, &instance)
  }

  /// Opens a new call scope with an empty cache.
  pub fn open_scope(&self) -> Scope<'_> {
    let id = self.next_scope.fetch_add(1, Ordering::Relaxed);
    tracing::debug!(kernel = %self.name, scope = id, "opening scope");
    Scope::new(self, id)
  }

  /// Runs `f` inside a fresh scope that is closed when `f` returns.
  pub fn scoped<R>(&self, f: impl FnOnce(&Scope<'_>) -> R) -> R {
    let scope = self.open_scope();
    f(&scope)
  }

  pub(crate) fn resolve(&self, key: &ServiceKey, scope: Option<&ScopeCache>) -> Result<Erased> {
    let binding = self.registry.lookup(key);

    if let Some(instance) = &binding.instance {
      return Ok(Arc::clone(instance));
    }

    match binding.lifetime {
      Lifetime::Transient => self.produce(&binding, scope),
      Lifetime::Singleton => self.resolve_singleton(key, scope),
      Lifetime::Scoped => {
        let cache = scope.ok_or(Error::ScopeRequired { service: key.name() })?;
        if let Some(hit) = cache.get(key) {
          tracing::trace!(kernel = %self.name, service = key.name(), "scope cache hit");
          return Ok(hit);
        }
        let instance = self.produce(&binding, scope)?;
        cache.insert(key.clone(), Arc::clone(&instance));
        Ok(instance)
      }
    }
  }

  fn resolve_singleton(&self, key: &ServiceKey, scope: Option<&ScopeCache>) -> Result<Erased> {
    if let Some(hit) = self.singletons.get(key) {
      return Ok(Arc::clone(hit.value()));
    }

    let guard = self.singleton_lock.lock();
    // Another thread may have finished while this one waited.
    if let Some(hit) = self.singletons.get(key) {
      return Ok(Arc::clone(hit.value()));
    }

    // A rebind may have replaced the binding while this one waited.
    let binding = self.registry.lookup(key);
    if binding.instance.is_some() || binding.lifetime != Lifetime::Singleton {
      drop(guard);
      return self.resolve(key, scope);
    }

    tracing::debug!(kernel = %self.name, service = key.name(), "constructing singleton");
    let instance = self.produce(&binding, None)?;
    self.singletons.insert(key.clone(), Arc::clone(&instance));
    Ok(instance)
  }

  /// Builds a fresh instance for `binding` and runs its interceptors.
  fn produce(&self, binding: &Binding, scope: Option<&ScopeCache>) -> Result<Erased> {
    // A singleton resolves its whole graph at the singleton tier.
    let scope = match binding.lifetime {
      Lifetime::Singleton => None,
      _ => scope,
    };
    let instance = if let Some(redirect) = &binding.to {
      let target = self.resolve(&redirect.target, scope)?;
      redirect.cast(target)?
    } else if let Some(factory) = &binding.factory {
      self.construct(factory, scope)?
    } else {
      let constructor = binding
        .service
        .self_constructor()
        .ok_or(Error::NotConstructible {
          service: binding.service.name(),
        })?;
      self.construct(&constructor, scope)?
    };

    for interceptor in self.registry.interceptors(&binding.service) {
      interceptor.apply(&instance)?;
    }
    Ok(instance)
  }

  fn construct(&self, constructor: &Constructor, scope: Option<&ScopeCache>) -> Result<Erased> {
    let mut arguments = constructor.arguments();
    for parameter in constructor.parameters() {
      let Some(service) = parameter.service() else {
        continue;
      };
      if parameter.has_default() && !self.registry.is_bound(service) {
        tracing::trace!(
          kernel = %self.name,
          target = constructor.target(),
          parameter = parameter.name(),
          "unbound parameter left to its default"
        );
        continue;
      }
      let value = self.resolve(service, scope)?;
      arguments.insert(parameter, service.clone(), value);
    }
    constructor.invoke(arguments)
  }
}

impl Binder for Kernel {
  fn bind(&self, binding: Binding) {
    Kernel::bind(self, binding);
  }

  fn rebind(&self, binding: Binding) {
    Kernel::rebind(self, binding);
  }

  fn intercept(&self, interceptor: Interceptor) {
    Kernel::intercept(self, interceptor);
  }
}

impl fmt::Debug for Kernel {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Kernel")
      .field("name", &self.name)
      .field("singletons", &self.singletons.len())
      .finish_non_exhaustive()
  }
}
