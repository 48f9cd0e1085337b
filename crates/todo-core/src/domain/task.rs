//! Task Entity
//!
//! A single to-do record scoped to its owner.

use serde::{Deserialize, Serialize};

/// A to-do record as returned by the storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Identifier assigned by the storage
    pub id: String,
    /// Task text; never persisted empty
    pub title: String,
    /// Completion status
    #[serde(default)]
    pub completed: bool,
    /// Owning user identifier
    #[serde(rename = "user", default)]
    pub owner: String,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            completed: false,
            owner: owner.into(),
        }
    }

    /// Builder-style completion flag, mostly for fixtures
    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = completed;
        self
    }
}

/// A task that has not been persisted yet
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewTask {
    pub title: String,
    pub completed: bool,
    #[serde(rename = "user")]
    pub owner: String,
}

impl NewTask {
    pub fn new(title: impl Into<String>, owner: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            completed: false,
            owner: owner.into(),
        }
    }

    /// Attach a storage-assigned id
    pub fn into_task(self, id: impl Into<String>) -> Task {
        Task {
            id: id.into(),
            title: self.title,
            completed: self.completed,
            owner: self.owner,
        }
    }
}

/// Counts derived from the current list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TaskStats {
    /// Tasks not yet completed
    pub remaining: usize,
    /// Tasks completed
    pub completed: usize,
    /// True when no incomplete task is left
    pub all_checked: bool,
}

impl TaskStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let remaining = tasks.iter().filter(|t| !t.completed).count();
        Self {
            remaining,
            completed: tasks.len() - remaining,
            all_checked: remaining == 0,
        }
    }
}
