use thiserror::Error;

/// The error type for every fallible kernel operation.
#[derive(Debug, Error)]
pub enum Error {
  /// A scoped service was resolved without an open scope.
  #[error("service `{service}` is scoped and can only be resolved through an open scope")]
  ScopeRequired { service: &'static str },

  /// The service has no binding and no constructor of its own.
  #[error("service `{service}` has no binding and cannot be constructed by itself")]
  NotConstructible { service: &'static str },

  /// A constructor asked for an argument that was neither injected nor defaulted.
  #[error("missing argument `{parameter}` while constructing `{target}`")]
  MissingArgument {
    target: &'static str,
    parameter: &'static str,
  },

  /// An injected argument did not hold the type the constructor asked for.
  #[error("argument `{parameter}` of `{target}` is not a `{expected}`")]
  ArgumentType {
    target: &'static str,
    parameter: &'static str,
    expected: &'static str,
  },

  /// A resolved instance did not hold the type it was requested as.
  #[error("instance resolved for `{service}` is not a `{expected}`")]
  TypeMismatch {
    service: &'static str,
    expected: &'static str,
  },

  /// A module declared a factory or interceptor without a usable signature.
  #[error("invalid declaration `{name}`: {reason}")]
  Declaration { name: &'static str, reason: String },

  /// A constructor or factory failed for its own reasons.
  #[error("failed to construct `{target}`: {source}")]
  Construction {
    target: &'static str,
    #[source]
    source: Box<dyn std::error::Error + Send + Sync>,
  },
}

impl Error {
  /// Wraps a failure raised by user construction code.
  pub fn construction<T: ?Sized, E>(source: E) -> Self
  where
    E: Into<Box<dyn std::error::Error + Send + Sync>>,
  {
    Error::Construction {
      target: std::any::type_name::<T>(),
      source: source.into(),
    }
  }

  /// Returns `true` for errors raised while building an instance.
  pub fn is_construction(&self) -> bool {
    matches!(
      self,
      Error::NotConstructible { .. }
        | Error::MissingArgument { .. }
        | Error::ArgumentType { .. }
        | Error::Construction { .. }
    )
  }
}

/// A specialized `Result` type for kernel operations.
pub type Result<T, E = Error> = std::result::Result<T, E>;
