//! Storage Layer - Core Trait
//!
//! The capability the view-model persists through.
//! Implementations can talk HTTP, keep things in memory, or wrap another
//! storage.

use async_trait::async_trait;

use crate::domain::{NewTask, StorageResult, Task, TaskFilter};

/// Remote task collection
///
/// Futures are not required to be `Send`: the app runs on a single thread
/// and browser fetch futures are not `Send`.
#[async_trait(?Send)]
pub trait TaskStorage {
    /// List tasks matching the filter
    async fn query(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>>;

    /// Persist a new task, returning it with its assigned id
    async fn save(&self, task: &NewTask) -> StorageResult<Task>;

    /// Replace an existing task, returning the stored representation
    async fn update(&self, task: &Task) -> StorageResult<Task>;

    /// Delete a task
    async fn remove(&self, task: &Task) -> StorageResult<()>;
}
