use crate::binding::Binding;
use crate::error::Result;
use crate::interceptor::Interceptor;
use crate::kernel::Kernel;
use crate::module::Module;
use std::fmt;

enum Registration {
  Bind(Binding),
  Rebind(Binding),
  Intercept(Interceptor),
  Install(Box<dyn Module>),
}

/// A builder for creating a configured `Kernel`.
///
/// Registrations are applied in the order they were added, so "last binding
/// wins" holds across modules and direct bindings alike.
#[derive(Default)]
pub struct KernelBuilder {
  name: Option<String>,
  registrations: Vec<Registration>,
}

// Manual Debug implementation for KernelBuilder.
impl fmt::Debug for KernelBuilder {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("KernelBuilder")
      .field("name", &self.name)
      .field("registrations", &self.registrations.len())
      .finish()
  }
}

impl KernelBuilder {
  pub fn new() -> Self {
    Self::default()
  }

  /// Sets the name the kernel reports in its log events.
  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  pub fn bind(mut self, binding: impl Into<Binding>) -> Self {
    self.registrations.push(Registration::Bind(binding.into()));
    self
  }

  pub fn rebind(mut self, binding: impl Into<Binding>) -> Self {
    self.registrations.push(Registration::Rebind(binding.into()));
    self
  }

  pub fn intercept(mut self, interceptor: Interceptor) -> Self {
    self.registrations.push(Registration::Intercept(interceptor));
    self
  }

  /// Queues a module for installation.
  pub fn module(mut self, module: impl Module + 'static) -> Self {
    self.registrations.push(Registration::Install(Box::new(module)));
    self
  }

  /// Builds the kernel, failing on the first invalid module declaration.
  pub fn build(self) -> Result<Kernel> {
    let kernel = match self.name {
      Some(name) => Kernel::with_name(name),
      None => Kernel::new(),
    };
    for registration in self.registrations {
      match registration {
        Registration::Bind(binding) => kernel.bind(binding),
        Registration::Rebind(binding) => kernel.rebind(binding),
        Registration::Intercept(interceptor) => kernel.intercept(interceptor),
        Registration::Install(module) => kernel.install(module.as_ref())?,
      }
    }
    Ok(kernel)
  }
}
