//! Post-construction hooks.

use crate::core::{unerase, Erased, Service, ServiceKey};
use crate::error::Result;
use std::fmt;
use std::sync::Arc;

type HandlerFn = dyn Fn(&Erased) -> Result<()> + Send + Sync;

/// A handler run against every newly constructed instance of one service.
///
/// Handlers receive a shared reference: an instance reached through a redirect
/// may already be cached elsewhere, so mutation goes through interior
/// mutability.
#[derive(Clone)]
pub struct Interceptor {
  service: ServiceKey,
  handler: Arc<HandlerFn>,
}

impl Interceptor {
  pub fn new<S, F>(handler: F) -> Self
  where
    S: ?Sized + Service,
    F: Fn(&S) + Send + Sync + 'static,
  {
    let service = ServiceKey::of::<S>();
    let key = service.clone();
    Self {
      service,
      handler: Arc::new(move |instance: &Erased| {
        let instance = unerase::<S>(&key, instance)?;
        handler(&instance);
        Ok(())
      }),
    }
  }

  /// The service this interceptor is attached to.
  pub fn service(&self) -> &ServiceKey {
    &self.service
  }

  pub(crate) fn apply(&self, instance: &Erased) -> Result<()> {
    (self.handler)(instance)
  }
}

impl fmt::Debug for Interceptor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Interceptor")
      .field("service", &self.service)
      .finish_non_exhaustive()
  }
}
