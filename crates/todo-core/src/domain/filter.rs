//! Task Filter
//!
//! Query constraints sent to the storage. A missing field means
//! "no constraint".

use serde::{Deserialize, Serialize};

use super::task::Task;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<bool>,
    #[serde(rename = "user", default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
}

impl TaskFilter {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn with_completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn with_owner(mut self, owner: impl Into<String>) -> Self {
        self.owner = Some(owner.into());
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.completed.is_none() && self.owner.is_none()
    }

    pub fn matches(&self, task: &Task) -> bool {
        self.completed.map_or(true, |c| task.completed == c)
            && self.owner.as_deref().map_or(true, |o| task.owner == o)
    }
}
