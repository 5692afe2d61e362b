//! The binding registry and interceptor chains.

use crate::binding::Binding;
use crate::core::ServiceKey;
use crate::interceptor::Interceptor;
use dashmap::DashMap;

/// Ordered binding stacks and interceptor chains, keyed by service.
///
/// Values are cloned out of the maps so no shard guard is held while the
/// resolver recurses.
#[derive(Default)]
pub(crate) struct Registry {
  bindings: DashMap<ServiceKey, Vec<Binding>>,
  interceptors: DashMap<ServiceKey, Vec<Interceptor>>,
}

impl Registry {
  pub(crate) fn bind(&self, binding: Binding) {
    self
      .bindings
      .entry(binding.service.clone())
      .or_default()
      .push(binding);
  }

  /// Replaces every binding of the service with `binding`.
  pub(crate) fn rebind(&self, binding: Binding) {
    self.bindings.insert(binding.service.clone(), vec![binding]);
  }

  pub(crate) fn intercept(&self, interceptor: Interceptor) {
    self
      .interceptors
      .entry(interceptor.service().clone())
      .or_default()
      .push(interceptor);
  }

  /// The most recent binding for `service`, or its implicit self-binding.
  pub(crate) fn lookup(&self, service: &ServiceKey) -> Binding {
    self
      .bindings
      .get(service)
      .and_then(|stack| stack.last().cloned())
      .unwrap_or_else(|| Binding::implicit(service.clone()))
  }

  pub(crate) fn is_bound(&self, service: &ServiceKey) -> bool {
    self
      .bindings
      .get(service)
      .is_some_and(|stack| !stack.is_empty())
  }

  /// Number of bindings registered for `service`.
  pub(crate) fn binding_count(&self, service: &ServiceKey) -> usize {
    self.bindings.get(service).map_or(0, |stack| stack.len())
  }

  /// The interceptor chain of `service`, in registration order.
  pub(crate) fn interceptors(&self, service: &ServiceKey) -> Vec<Interceptor> {
    self
      .interceptors
      .get(service)
      .map(|chain| chain.clone())
      .unwrap_or_default()
  }
}
