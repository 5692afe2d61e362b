//! Constructor signatures: the parameter descriptors a constructible target
//! exposes and the argument bag its build function receives.

use crate::core::{erase, unerase, Erased, Service, ServiceKey};
use crate::error::{Error, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// How a parameter may be passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterKind {
  /// May be passed by position or by name.
  #[default]
  PositionalOrKeyword,
  /// Can only be passed by name.
  KeywordOnly,
}

/// Describes a single constructor parameter.
#[derive(Clone, PartialEq, Eq)]
pub struct Parameter {
  name: &'static str,
  service: Option<ServiceKey>,
  has_default: bool,
  is_optional: bool,
  kind: ParameterKind,
}

impl Parameter {
  /// A parameter injected with the service `S`.
  pub fn of<S: ?Sized + Service>(name: &'static str) -> Self {
    Self {
      name,
      service: Some(ServiceKey::of::<S>()),
      has_default: false,
      is_optional: false,
      kind: ParameterKind::PositionalOrKeyword,
    }
  }

  /// A parameter with no declared type. It is never injected.
  pub fn untyped(name: &'static str) -> Self {
    Self {
      name,
      service: None,
      has_default: false,
      is_optional: false,
      kind: ParameterKind::PositionalOrKeyword,
    }
  }

  /// Marks the parameter as having a default value.
  ///
  /// A typed parameter with a default is only injected when its service has
  /// a binding.
  pub fn with_default(mut self) -> Self {
    self.has_default = true;
    self
  }

  /// Marks the declared type as wrapped in an `Option`.
  ///
  /// Optional-wrapped parameters are looked up as their inner service.
  pub fn optional(mut self) -> Self {
    self.is_optional = true;
    self
  }

  /// Marks the parameter as keyword-only.
  pub fn keyword_only(mut self) -> Self {
    self.kind = ParameterKind::KeywordOnly;
    self
  }

  pub fn name(&self) -> &'static str {
    self.name
  }

  pub fn service(&self) -> Option<&ServiceKey> {
    self.service.as_ref()
  }

  pub fn has_default(&self) -> bool {
    self.has_default
  }

  pub fn is_optional(&self) -> bool {
    self.is_optional
  }

  pub fn kind(&self) -> ParameterKind {
    self.kind
  }

  pub fn is_positional(&self) -> bool {
    self.kind == ParameterKind::PositionalOrKeyword
  }
}

impl fmt::Debug for Parameter {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Parameter")
      .field("name", &self.name)
      .field("service", &self.service.as_ref().map(ServiceKey::name))
      .field("has_default", &self.has_default)
      .field("is_optional", &self.is_optional)
      .field("kind", &self.kind)
      .finish()
  }
}

/// The injected arguments handed to a build function, keyed by parameter name.
pub struct Arguments {
  target: &'static str,
  values: HashMap<&'static str, (ServiceKey, Erased)>,
}

impl Arguments {
  pub(crate) fn new(target: &'static str) -> Self {
    Self {
      target,
      values: HashMap::new(),
    }
  }

  pub(crate) fn insert(&mut self, parameter: &Parameter, key: ServiceKey, value: Erased) {
    self.values.insert(parameter.name, (key, value));
  }

  /// Takes a required argument.
  ///
  /// Fails with [`Error::MissingArgument`] when the parameter was not injected.
  pub fn take<S: ?Sized + Service>(&mut self, name: &'static str) -> Result<Arc<S>> {
    self
      .take_optional::<S>(name)?
      .ok_or(Error::MissingArgument {
        target: self.target,
        parameter: name,
      })
  }

  /// Takes an argument that may have been skipped, leaving the caller to
  /// apply its default.
  pub fn take_optional<S: ?Sized + Service>(&mut self, name: &'static str) -> Result<Option<Arc<S>>> {
    match self.values.remove(name) {
      Some((key, value)) => unerase::<S>(&key, &value)
        .map(Some)
        .map_err(|_| Error::ArgumentType {
          target: self.target,
          parameter: name,
          expected: std::any::type_name::<S>(),
        }),
      None => Ok(None),
    }
  }

  /// Returns `true` if an argument was injected for `name`.
  pub fn contains(&self, name: &str) -> bool {
    self.values.contains_key(name)
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }
}

type BuildFn = dyn Fn(&mut Arguments) -> Result<Erased> + Send + Sync;

/// A constructible target: an ordered parameter list and the function that
/// builds an instance from the resolved arguments.
#[derive(Clone)]
pub struct Constructor {
  target: &'static str,
  output: ServiceKey,
  parameters: Arc<[Parameter]>,
  build: Arc<BuildFn>,
}

impl Constructor {
  /// A constructor for a sized service built by value.
  pub fn new<T, F>(parameters: Vec<Parameter>, build: F) -> Self
  where
    T: Service,
    F: Fn(&mut Arguments) -> Result<T> + Send + Sync + 'static,
  {
    Self {
      target: std::any::type_name::<T>(),
      output: ServiceKey::of::<T>(),
      parameters: parameters.into(),
      build: Arc::new(move |args: &mut Arguments| build(args).map(|value| erase(Arc::new(value)))),
    }
  }

  /// A constructor producing an already shared instance, typically a factory
  /// for an interface.
  pub fn shared<S, F>(parameters: Vec<Parameter>, build: F) -> Self
  where
    S: ?Sized + Service,
    F: Fn(&mut Arguments) -> Result<Arc<S>> + Send + Sync + 'static,
  {
    Self {
      target: std::any::type_name::<S>(),
      output: ServiceKey::of::<S>(),
      parameters: parameters.into(),
      build: Arc::new(move |args: &mut Arguments| build(args).map(erase)),
    }
  }

  /// The type name of what this constructor builds.
  pub fn target(&self) -> &'static str {
    self.target
  }

  /// The service identity of the instances this constructor builds.
  pub fn output(&self) -> &ServiceKey {
    &self.output
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub(crate) fn arguments(&self) -> Arguments {
    Arguments::new(self.target)
  }

  pub(crate) fn invoke(&self, mut arguments: Arguments) -> Result<Erased> {
    (self.build)(&mut arguments)
  }
}

impl fmt::Debug for Constructor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Constructor")
      .field("target", &self.target)
      .field("parameters", &self.parameters)
      .finish_non_exhaustive()
  }
}
