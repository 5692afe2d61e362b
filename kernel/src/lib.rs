//! # Fibre Kernel
//!
//! A thread-safe dependency injection kernel for Rust.
//!
//! A [`Kernel`] holds a set of [`Binding`]s and builds fully wired object
//! graphs on demand. Each binding chooses a [`Lifetime`]:
//!
//! - **Transient**: a new instance on every resolution (the default).
//! - **Singleton**: one instance per kernel, constructed at most once even
//!   when many threads ask for it at the same time.
//! - **Scoped**: one instance per open [`Scope`]; resolving a scoped service
//!   outside of a scope is an error.
//!
//! ## Core Concepts
//!
//! - **Service**: any `Send + Sync` type, concrete or `dyn Trait`, used as the
//!   key of a binding. Concrete types describe their constructor parameters
//!   explicitly (see [`injectable!`]); interfaces are marked with [`service!`].
//! - **Binding**: how a service is produced: a fixed instance, a redirect to
//!   another service, a factory, or the service's own constructor. The most
//!   recent binding of a service wins; [`Kernel::rebind`] replaces them all.
//! - **Interceptor**: a hook run against every newly built instance of a
//!   service.
//! - **Module**: a reusable group of factories, interceptors and bindings.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_kernel::{injectable, service, Binding, Kernel};
//! use std::sync::Arc;
//!
//! trait Greeter: Send + Sync {
//!   fn greet(&self) -> String;
//! }
//! service!(dyn Greeter);
//!
//! #[derive(Default)]
//! struct EnglishGreeter;
//! impl Greeter for EnglishGreeter {
//!   fn greet(&self) -> String {
//!     "Hello, World!".to_string()
//!   }
//! }
//! injectable!(EnglishGreeter);
//!
//! // A service that depends on the abstraction.
//! struct Reception {
//!   greeter: Arc<dyn Greeter>,
//! }
//! injectable!(Reception { greeter: dyn Greeter });
//!
//! let kernel = Kernel::new();
//! kernel.bind(Binding::of::<dyn Greeter>().to::<EnglishGreeter>(|g| g).singleton());
//!
//! let reception = kernel.get::<Reception>().unwrap();
//! assert_eq!(reception.greeter.greet(), "Hello, World!");
//! ```

mod binding;
mod builder;
mod core;
mod error;
mod interceptor;
mod kernel;
mod macros;
mod module;
mod registry;
mod scope;
mod signature;

pub use binding::{Binding, BindingBuilder};
pub use builder::KernelBuilder;
pub use crate::core::{Lifetime, Service, ServiceKey};
pub use error::{Error, Result};
pub use interceptor::Interceptor;
pub use kernel::Kernel;
pub use module::{install_module, Binder, FactoryDeclaration, InterceptorDeclaration, Module};
pub use scope::Scope;
pub use signature::{Arguments, Constructor, Parameter, ParameterKind};
