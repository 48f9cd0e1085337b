//! Task List Controller
//!
//! Owns the visible list and its edit snapshots. All persistence goes
//! through the injected [`TaskStorage`]; local state only changes once the
//! storage has answered, except for the optimistic completion toggle which
//! is rolled back when the update fails.

use std::rc::Rc;

use log::{debug, warn};

use crate::config::AuthConfig;
use crate::domain::{NewTask, StorageResult, Task, TaskFilter, TaskStats};
use crate::routing::{normalize_path, Location, Route};
use crate::session::{user_label, Session};
use crate::storage::TaskStorage;

pub struct TodoController {
    storage: Rc<dyn TaskStorage>,
    location: Rc<dyn Location>,
    session: Rc<dyn Session>,
    auth: AuthConfig,
    todos: Vec<Task>,
    /// Pre-edit copies, positionally parallel to `todos`
    snapshots: Vec<Option<Task>>,
    editing: Option<String>,
    new_title: String,
    path: String,
    stats: TaskStats,
}

impl TodoController {
    pub fn new(
        storage: Rc<dyn TaskStorage>,
        location: Rc<dyn Location>,
        session: Rc<dyn Session>,
    ) -> Self {
        let path = normalize_path(&location.current_path());
        Self {
            storage,
            location,
            session,
            auth: AuthConfig::default(),
            todos: Vec::new(),
            snapshots: Vec::new(),
            editing: None,
            new_title: String::new(),
            path,
            stats: TaskStats::default(),
        }
    }

    pub fn with_auth(mut self, auth: AuthConfig) -> Self {
        self.auth = auth;
        self
    }

    // ========================
    // Accessors
    // ========================

    pub fn todos(&self) -> &[Task] {
        &self.todos
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.todos.iter().find(|t| t.id == id)
    }

    pub fn stats(&self) -> TaskStats {
        self.stats
    }

    pub fn remaining_count(&self) -> usize {
        self.stats.remaining
    }

    pub fn completed_count(&self) -> usize {
        self.stats.completed
    }

    pub fn all_checked(&self) -> bool {
        self.stats.all_checked
    }

    /// Id of the task whose title is being edited
    pub fn editing(&self) -> Option<&str> {
        self.editing.as_deref()
    }

    pub fn snapshot(&self, id: &str) -> Option<&Task> {
        self.position(id).and_then(|i| self.snapshots[i].as_ref())
    }

    pub fn route(&self) -> Route {
        Route::from_path(&self.path)
    }

    pub fn username(&self) -> String {
        self.session.identity()
    }

    /// Viewer may see every owner's tasks
    pub fn show_all(&self) -> bool {
        self.session.has_role(&self.auth.elevated_role)
    }

    pub fn user_label(&self) -> String {
        user_label(self.session.as_ref(), &self.auth.elevated_role, &self.auth.user_role)
    }

    pub fn new_title(&self) -> &str {
        &self.new_title
    }

    pub fn set_new_title(&mut self, title: impl Into<String>) {
        self.new_title = title.into();
    }

    pub fn storage(&self) -> Rc<dyn TaskStorage> {
        Rc::clone(&self.storage)
    }

    /// Swap the storage used by subsequent operations
    pub fn set_storage(&mut self, storage: Rc<dyn TaskStorage>) {
        self.storage = storage;
    }

    // ========================
    // Querying
    // ========================

    /// Filter for the current route and viewer
    pub fn current_filter(&self) -> TaskFilter {
        let filter = self.route().filter();
        if self.show_all() {
            filter
        } else {
            filter.with_owner(self.username())
        }
    }

    /// Re-read the location and replace the list with a fresh query
    pub async fn refresh(&mut self) -> StorageResult<()> {
        self.path = normalize_path(&self.location.current_path());
        let filter = self.current_filter();
        debug!("refresh {} with {:?}", self.path, filter);

        let todos = self.storage.query(&filter).await?;
        self.replace_todos(todos);
        Ok(())
    }

    /// React to a route change; refreshes only when the path differs
    pub async fn on_path_changed(&mut self, path: &str) -> StorageResult<bool> {
        if normalize_path(path) == self.path {
            return Ok(false);
        }
        self.refresh().await?;
        Ok(true)
    }

    // ========================
    // Mutations
    // ========================

    /// Persist a new task from the pending input; blank titles are ignored
    pub async fn add(&mut self, title: &str) -> StorageResult<Option<Task>> {
        let title = title.trim();
        if title.is_empty() {
            return Ok(None);
        }

        let created = self.storage.save(&NewTask::new(title, self.username())).await?;
        self.todos.push(created.clone());
        self.snapshots.push(None);
        self.new_title.clear();
        self.recompute();
        Ok(Some(created))
    }

    /// Add whatever is in the pending input
    pub async fn add_pending(&mut self) -> StorageResult<Option<Task>> {
        let title = self.new_title.clone();
        self.add(&title).await
    }

    pub fn edit(&mut self, id: &str) {
        if let Some(i) = self.position(id) {
            self.editing = Some(id.to_string());
            self.snapshots[i] = Some(self.todos[i].clone());
        }
    }

    /// Live title binding while editing
    pub fn set_title(&mut self, id: &str, title: impl Into<String>) {
        if let Some(i) = self.position(id) {
            self.todos[i].title = title.into();
        }
    }

    /// Commit the edit; an emptied title deletes the task
    pub async fn done_editing(&mut self, id: &str) -> StorageResult<()> {
        if self.editing.is_none() {
            return Ok(());
        }
        self.editing = None;

        let Some(i) = self.position(id) else {
            return Ok(());
        };
        let trimmed = self.todos[i].title.trim().to_string();
        self.todos[i].title = trimmed;

        if self.todos[i].title.is_empty() {
            self.remove(id).await
        } else {
            self.update(id).await
        }
    }

    pub fn revert_editing(&mut self, id: &str) {
        if let Some(i) = self.position(id) {
            if let Some(original) = self.snapshots[i].take() {
                self.todos[i] = original;
            }
        }
        self.editing = None;
        self.recompute();
    }

    /// Flip completion optimistically and persist it
    pub async fn toggle_completion(&mut self, id: &str) -> StorageResult<()> {
        let Some(i) = self.position(id) else {
            return Ok(());
        };
        self.snapshots[i] = Some(self.todos[i].clone());
        self.todos[i].completed = !self.todos[i].completed;
        self.recompute();

        self.update(id).await
    }

    pub async fn remove(&mut self, id: &str) -> StorageResult<()> {
        let Some(task) = self.task(id).cloned() else {
            return Ok(());
        };
        self.storage.remove(&task).await?;

        if let Some(i) = self.position(id) {
            self.todos.remove(i);
            self.snapshots.remove(i);
        }
        if self.editing.as_deref() == Some(id) {
            self.editing = None;
        }
        self.recompute();
        Ok(())
    }

    /// Persist the local task; on failure fall back to its snapshot
    pub async fn update(&mut self, id: &str) -> StorageResult<()> {
        let Some(task) = self.task(id).cloned() else {
            return Ok(());
        };

        let result = self.storage.update(&task).await;
        let Some(i) = self.position(id) else {
            return result.map(|_| ());
        };

        match result {
            Ok(updated) => {
                self.todos[i] = updated;
                self.snapshots[i] = None;
                self.recompute();
                Ok(())
            }
            Err(e) => {
                warn!("update of {} failed, reverting: {}", id, e);
                if let Some(original) = self.snapshots[i].take() {
                    self.todos[i] = original;
                }
                self.recompute();
                Err(e)
            }
        }
    }

    /// Remove every completed task. Each removal is attempted even when an
    /// earlier one fails; the first error is returned.
    pub async fn clear_completed(&mut self) -> StorageResult<()> {
        let completed: Vec<String> = self
            .todos
            .iter()
            .filter(|t| t.completed)
            .map(|t| t.id.clone())
            .collect();

        let mut first_error = None;
        for id in completed {
            if let Err(e) = self.remove(&id).await {
                warn!("remove of {} failed: {}", id, e);
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Set every task to `completed`, reverting individually on failure.
    /// Returns the number of tasks whose update failed.
    pub async fn mark_all(&mut self, completed: bool) -> usize {
        let targets: Vec<String> = self
            .todos
            .iter()
            .filter(|t| t.completed != completed)
            .map(|t| t.id.clone())
            .collect();

        let mut failed = 0;
        for id in targets {
            if self.toggle_completion(&id).await.is_err() {
                failed += 1;
            }
        }
        failed
    }

    /// Check everything, or uncheck everything when already all checked
    pub async fn toggle_all(&mut self) -> usize {
        let target = !self.stats.all_checked;
        self.mark_all(target).await
    }

    // ========================
    // Internals
    // ========================

    fn position(&self, id: &str) -> Option<usize> {
        self.todos.iter().position(|t| t.id == id)
    }

    fn replace_todos(&mut self, todos: Vec<Task>) {
        self.snapshots = vec![None; todos.len()];
        self.todos = todos;
        let stale = self
            .editing
            .as_deref()
            .map_or(false, |id| self.position(id).is_none());
        if stale {
            self.editing = None;
        }
        self.recompute();
    }

    fn recompute(&mut self) {
        self.stats = TaskStats::from_tasks(&self.todos);
    }
}
