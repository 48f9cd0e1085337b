//! Domain Layer
//!
//! Task records, filter queries and storage errors.
//! This layer has NO external dependencies (except serde for serialization).

mod error;
mod filter;
mod task;

pub use error::{StorageError, StorageResult};
pub use filter::TaskFilter;
pub use task::{NewTask, Task, TaskStats};
