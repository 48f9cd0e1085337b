//! Secured TodoMVC Core
//!
//! Layered architecture:
//! - domain: tasks, filters, errors
//! - storage: the task storage capability and its implementations
//! - routing / session: location and auth collaborators
//! - controller: the list view-model and the attack simulation

pub mod config;
pub mod controller;
pub mod domain;
pub mod routing;
pub mod session;
pub mod storage;

pub use config::{AppConfig, ConfigError};
pub use controller::{AttackController, AttackMode, AttackSettings, AttackStorage, TodoController};
pub use domain::{NewTask, StorageError, StorageResult, Task, TaskFilter, TaskStats};
pub use routing::{Location, MemoryLocation, Route};
pub use session::{Session, StaticSession};
pub use storage::{build_storage, Credential, MemoryStorage, RestStorage, TaskStorage};
