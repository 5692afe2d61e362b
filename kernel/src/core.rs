//! Core data structures shared by the registry, the scopes and the resolver.

use crate::signature::Constructor;
use std::any::{Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// A type-erased, shareable instance.
///
/// The inner value is always an `Arc<S>` for the service `S` it was produced
/// for, so unsized services (`dyn Trait`) can travel through the same maps.
pub(crate) type Erased = Arc<dyn Any + Send + Sync>;

pub(crate) fn erase<S: ?Sized + Service>(instance: Arc<S>) -> Erased {
  Arc::new(instance)
}

pub(crate) fn unerase<S: ?Sized + Service>(key: &ServiceKey, erased: &Erased) -> crate::Result<Arc<S>> {
  erased
    .downcast_ref::<Arc<S>>()
    .cloned()
    .ok_or_else(|| crate::Error::TypeMismatch {
      service: key.name(),
      expected: std::any::type_name::<S>(),
    })
}

/// A type that can be used as a service identity.
///
/// Concrete types describe how to build themselves by returning a
/// [`Constructor`]; interfaces (`dyn Trait`) keep the default and can only be
/// resolved through a binding. See the [`service!`](crate::service) and
/// [`injectable!`](crate::injectable) macros for the usual implementations.
pub trait Service: Any + Send + Sync {
  /// The constructor used when this service has no binding of its own.
  fn constructor() -> Option<Constructor> {
    None
  }
}

/// The erased identity under which bindings are registered and looked up.
#[derive(Clone)]
pub struct ServiceKey {
  type_id: TypeId,
  name: &'static str,
  constructor: fn() -> Option<Constructor>,
}

impl ServiceKey {
  /// Returns the key for the service `S`.
  pub fn of<S: ?Sized + Service>() -> Self {
    Self {
      type_id: TypeId::of::<S>(),
      name: std::any::type_name::<S>(),
      constructor: S::constructor,
    }
  }

  /// The full type name of the service.
  pub fn name(&self) -> &'static str {
    self.name
  }

  pub(crate) fn self_constructor(&self) -> Option<Constructor> {
    (self.constructor)()
  }
}

impl PartialEq for ServiceKey {
  fn eq(&self, other: &Self) -> bool {
    self.type_id == other.type_id
  }
}

impl Eq for ServiceKey {}

impl Hash for ServiceKey {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.type_id.hash(state);
  }
}

impl fmt::Debug for ServiceKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Key({})", self.name)
  }
}

/// The caching policy applied to the instances a binding produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Lifetime {
  /// A new instance on every resolution.
  #[default]
  Transient,
  /// One instance per kernel.
  Singleton,
  /// One instance per open [`Scope`](crate::Scope).
  Scoped,
}

impl Lifetime {
  /// Returns `true` if instances produced under this lifetime are cached.
  pub fn is_cached(&self) -> bool {
    !matches!(self, Lifetime::Transient)
  }
}

impl fmt::Display for Lifetime {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Lifetime::Transient => write!(f, "transient"),
      Lifetime::Singleton => write!(f, "singleton"),
      Lifetime::Scoped => write!(f, "scoped"),
    }
  }
}
