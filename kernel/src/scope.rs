//! Call scopes: caller-managed caches for `Scoped` services.

use crate::core::{unerase, Erased, Service, ServiceKey};
use crate::error::Result;
use crate::kernel::Kernel;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// The instance cache of one call scope.
///
/// Not `Sync`: a scope serves a single unit of work on a single thread.
#[derive(Default)]
pub(crate) struct ScopeCache {
  entries: RefCell<HashMap<ServiceKey, Erased>>,
}

impl ScopeCache {
  pub(crate) fn get(&self, service: &ServiceKey) -> Option<Erased> {
    self.entries.borrow().get(service).cloned()
  }

  pub(crate) fn insert(&self, service: ServiceKey, instance: Erased) {
    self.entries.borrow_mut().insert(service, instance);
  }

  pub(crate) fn len(&self) -> usize {
    self.entries.borrow().len()
  }

  pub(crate) fn clear(&self) {
    self.entries.borrow_mut().clear();
  }
}

/// An open call scope.
///
/// `Scoped` services resolved through the same scope share one instance.
/// Closing the scope, explicitly or by dropping it, discards every
/// instance it cached.
///
/// ```
/// use fibre_kernel::{injectable, Binding, Kernel};
/// use std::sync::Arc;
///
/// #[derive(Default)]
/// struct RequestContext;
/// injectable!(RequestContext);
///
/// let kernel = Kernel::new();
/// kernel.bind(Binding::of::<RequestContext>().scoped());
///
/// let scope = kernel.open_scope();
/// let a = scope.get::<RequestContext>().unwrap();
/// let b = scope.get::<RequestContext>().unwrap();
/// assert!(Arc::ptr_eq(&a, &b));
/// scope.close();
/// ```
pub struct Scope<'k> {
  id: u64,
  kernel: &'k Kernel,
  cache: ScopeCache,
}

impl<'k> Scope<'k> {
  pub(crate) fn new(kernel: &'k Kernel, id: u64) -> Self {
    Self {
      id,
      kernel,
      cache: ScopeCache::default(),
    }
  }

  /// Resolves `S` with this scope as the active call scope.
  pub fn get<S: ?Sized + Service>(&self) -> Result<Arc<S>> {
    let key = ServiceKey::of::<S>();
    let instance = self.kernel.resolve(&key, Some(&self.cache))?;
    unerase::<S>(&key, &instance)
  }

  /// The kernel this scope belongs to.
  pub fn kernel(&self) -> &'k Kernel {
    self.kernel
  }

  /// A kernel-unique identifier of this scope.
  pub fn id(&self) -> u64 {
    self.id
  }

  /// Number of instances currently cached by this scope.
  pub fn cached(&self) -> usize {
    self.cache.len()
  }

  /// Closes the scope, discarding its cache.
  pub fn close(self) {}
}

impl Drop for Scope<'_> {
  fn drop(&mut self) {
    tracing::debug!(
      kernel = self.kernel.name(),
      scope = self.id,
      discarded = self.cache.len(),
      "closing scope"
    );
    self.cache.clear();
  }
}

impl fmt::Debug for Scope<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Scope")
      .field("id", &self.id)
      .field("cached", &self.cache.len())
      .finish()
  }
}
