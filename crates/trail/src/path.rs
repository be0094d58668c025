//! Current route path providers

use parking_lot::RwLock;
use std::sync::Arc;

/// Synchronous accessor for the current route path
pub trait PathProvider {
    fn current_path(&self) -> String;
}

impl<F> PathProvider for F
where
    F: Fn() -> String,
{
    fn current_path(&self) -> String {
        self()
    }
}

/// Route path shared between the router side (writer) and the tracker (reader)
#[derive(Debug, Clone, Default)]
pub struct SharedPath {
    inner: Arc<RwLock<String>>,
}

impl SharedPath {
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(initial.into())),
        }
    }

    /// Replace the current route path
    pub fn set(&self, path: impl Into<String>) {
        *self.inner.write() = path.into();
    }

    pub fn get(&self) -> String {
        self.inner.read().clone()
    }
}

impl PathProvider for SharedPath {
    fn current_path(&self) -> String {
        self.get()
    }
}
