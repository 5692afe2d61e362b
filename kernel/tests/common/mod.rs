#![allow(dead_code)]

//! Shared service fixtures for the integration tests.

use fibre_kernel::{injectable, service};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::Arc;

// --- File systems ---

pub trait FileSystem: Send + Sync {
  fn kind(&self) -> &'static str;
  fn exists(&self, path: &str) -> bool;
}
service!(dyn FileSystem);

#[derive(Default)]
pub struct InMemoryFileSystem {
  contents: Mutex<HashMap<String, Vec<u8>>>,
}

impl InMemoryFileSystem {
  pub fn add(&self, name: &str, contents: &[u8]) {
    self.contents.lock().insert(name.to_string(), contents.to_vec());
  }
}

impl FileSystem for InMemoryFileSystem {
  fn kind(&self) -> &'static str {
    "memory"
  }
  fn exists(&self, path: &str) -> bool {
    self.contents.lock().contains_key(path)
  }
}
injectable!(InMemoryFileSystem);

#[derive(Default)]
pub struct S3FileSystem;

impl FileSystem for S3FileSystem {
  fn kind(&self) -> &'static str {
    "s3"
  }
  fn exists(&self, _path: &str) -> bool {
    false
  }
}
injectable!(S3FileSystem);

// --- Event bus ---

pub trait EventBus: Send + Sync {
  fn publish(&self, topic: &str);
}
service!(dyn EventBus);

#[derive(Default)]
pub struct NoopEventBus;

impl EventBus for NoopEventBus {
  fn publish(&self, _topic: &str) {}
}
injectable!(NoopEventBus);

// --- Web routing ---

pub trait Router: Send + Sync {
  fn add_route(&self, route: &'static str);
  fn routes(&self) -> Vec<&'static str>;
}
service!(dyn Router);

#[derive(Default)]
pub struct WebRouter {
  routes: Mutex<Vec<&'static str>>,
}

impl Router for WebRouter {
  fn add_route(&self, route: &'static str) {
    self.routes.lock().push(route);
  }
  fn routes(&self) -> Vec<&'static str> {
    self.routes.lock().clone()
  }
}
injectable!(WebRouter);

// --- Handlers ---

/// A transient consumer of a file system.
pub struct FileHandler {
  pub fs: Arc<dyn FileSystem>,
}
injectable!(FileHandler { fs: dyn FileSystem });

/// Returns `true` if both handles point at the same instance, regardless of
/// the type they are viewed through.
pub fn same<A: ?Sized, B: ?Sized>(a: &Arc<A>, b: &Arc<B>) -> bool {
  Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}
