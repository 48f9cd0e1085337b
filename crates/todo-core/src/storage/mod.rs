//! Storage Layer
//!
//! Task storage abstraction and implementations.

mod credential;
mod memory;
mod rest;
mod traits;


use std::rc::Rc;

pub use credential::Credential;
pub use memory::{AccessGuard, Grant, MemoryStorage};
pub use rest::RestStorage;
pub use traits::TaskStorage;

use crate::config::{StorageBackend, StorageConfig};

/// Pick the storage implementation named by the config
pub fn build_storage(config: &StorageConfig, credential: Credential) -> Rc<dyn TaskStorage> {
    match config.backend {
        StorageBackend::Rest => Rc::new(RestStorage::new(config, credential)),
        StorageBackend::Memory => Rc::new(MemoryStorage::new()),
    }
}
