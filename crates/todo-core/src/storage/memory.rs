//! In-Memory Storage Implementation
//!
//! Keeps the collection in process. Optionally enforces the same owner
//! rules the remote collection applies, and can be told to fail updates.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use async_trait::async_trait;
use log::debug;

use crate::domain::{NewTask, StorageError, StorageResult, Task, TaskFilter};
use super::credential::Credential;
use super::traits::TaskStorage;

/// What a token is allowed to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grant {
    pub user: String,
    pub elevated: bool,
}

/// Token checks applied to every call
#[derive(Debug, Clone)]
pub struct AccessGuard {
    credential: Credential,
    grants: HashMap<String, Grant>,
}

impl AccessGuard {
    pub fn new(credential: Credential) -> Self {
        Self {
            credential,
            grants: HashMap::new(),
        }
    }

    pub fn grant(mut self, token: impl Into<String>, user: impl Into<String>, elevated: bool) -> Self {
        self.grants.insert(token.into(), Grant { user: user.into(), elevated });
        self
    }

    fn current(&self) -> StorageResult<Grant> {
        let token = self
            .credential
            .token()
            .ok_or_else(|| StorageError::Unauthorized("missing bearer token".to_string()))?;
        self.grants
            .get(&token)
            .cloned()
            .ok_or_else(|| StorageError::Unauthorized("unknown bearer token".to_string()))
    }
}

impl Grant {
    fn may_write(&self, owner: &str) -> StorageResult<()> {
        if self.elevated || self.user == owner {
            Ok(())
        } else {
            Err(StorageError::Forbidden(format!(
                "{} may not write tasks owned by {}",
                self.user, owner
            )))
        }
    }
}

/// In-memory task collection
#[derive(Debug, Default)]
pub struct MemoryStorage {
    tasks: RefCell<Vec<Task>>,
    next_id: Cell<u64>,
    guard: Option<AccessGuard>,
    fail_updates: Cell<bool>,
    queries: RefCell<Vec<TaskFilter>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the collection; ids are kept as given
    pub fn with_tasks(tasks: Vec<Task>) -> Self {
        let storage = Self::new();
        storage.next_id.set(tasks.len() as u64);
        *storage.tasks.borrow_mut() = tasks;
        storage
    }

    pub fn with_guard(mut self, guard: AccessGuard) -> Self {
        self.guard = Some(guard);
        self
    }

    /// Make every following update fail until switched back
    pub fn set_fail_updates(&self, fail: bool) {
        self.fail_updates.set(fail);
    }

    /// Copy of the stored collection
    pub fn snapshot(&self) -> Vec<Task> {
        self.tasks.borrow().clone()
    }

    /// Filters received so far, oldest first
    pub fn queries(&self) -> Vec<TaskFilter> {
        self.queries.borrow().clone()
    }

    pub fn last_query(&self) -> Option<TaskFilter> {
        self.queries.borrow().last().cloned()
    }

    fn grant(&self) -> StorageResult<Option<Grant>> {
        self.guard.as_ref().map(AccessGuard::current).transpose()
    }

    fn allocate_id(&self) -> String {
        let mut id = self.next_id.get();
        loop {
            id += 1;
            let candidate = id.to_string();
            if !self.tasks.borrow().iter().any(|t| t.id == candidate) {
                self.next_id.set(id);
                return candidate;
            }
        }
    }

    fn stored_owner(&self, id: &str) -> StorageResult<String> {
        self.tasks
            .borrow()
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.owner.clone())
            .ok_or_else(|| StorageError::NotFound(format!("task {}", id)))
    }
}

#[async_trait(?Send)]
impl TaskStorage for MemoryStorage {
    async fn query(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>> {
        self.queries.borrow_mut().push(filter.clone());
        let grant = self.grant()?;
        debug!("memory query {:?}", filter);

        let tasks = self.tasks.borrow();
        Ok(tasks
            .iter()
            .filter(|t| filter.matches(t))
            .filter(|t| match &grant {
                Some(g) => g.elevated || g.user == t.owner,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn save(&self, task: &NewTask) -> StorageResult<Task> {
        if let Some(grant) = self.grant()? {
            grant.may_write(&task.owner)?;
        }
        if task.title.trim().is_empty() {
            return Err(StorageError::InvalidInput("title must not be empty".to_string()));
        }

        let created = task.clone().into_task(self.allocate_id());
        debug!("memory save {}", created.id);
        self.tasks.borrow_mut().push(created.clone());
        Ok(created)
    }

    async fn update(&self, task: &Task) -> StorageResult<Task> {
        if self.fail_updates.get() {
            return Err(StorageError::Internal("update rejected".to_string()));
        }
        let stored_owner = self.stored_owner(&task.id)?;
        if let Some(grant) = self.grant()? {
            grant.may_write(&stored_owner)?;
            grant.may_write(&task.owner)?;
        }

        let mut tasks = self.tasks.borrow_mut();
        let slot = tasks
            .iter_mut()
            .find(|t| t.id == task.id)
            .ok_or_else(|| StorageError::NotFound(format!("task {}", task.id)))?;
        *slot = task.clone();
        debug!("memory update {}", task.id);
        Ok(task.clone())
    }

    async fn remove(&self, task: &Task) -> StorageResult<()> {
        let stored_owner = self.stored_owner(&task.id)?;
        if let Some(grant) = self.grant()? {
            grant.may_write(&stored_owner)?;
        }

        self.tasks.borrow_mut().retain(|t| t.id != task.id);
        debug!("memory remove {}", task.id);
        Ok(())
    }
}
