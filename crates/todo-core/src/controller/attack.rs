//! Attack Simulation
//!
//! Wraps the task storage with a decorator that drops or forges the owner
//! field, so server-side authorization can be exercised from the UI.
//! `reset` puts the original storage and credential back.

use std::cell::RefCell;
use std::rc::Rc;

use async_trait::async_trait;
use log::{debug, info};

use crate::config::AuthConfig;
use crate::domain::{NewTask, StorageResult, Task, TaskFilter};
use crate::session::Session;
use crate::storage::{Credential, TaskStorage};
use super::todo::TodoController;

/// Knobs the attack panel exposes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttackSettings {
    /// Identity forced into queries and writes; empty means "leave as is"
    pub username: String,
    /// Strip the owner constraint from queries
    pub show_all: bool,
    /// Present the original credential; `false` sends no token
    pub authorization: bool,
    /// Force `username` as owner on updates too
    pub use_changed_user_on_update: bool,
}

impl AttackSettings {
    pub fn from_session(session: &dyn Session, auth: &AuthConfig) -> Self {
        Self {
            username: session.identity(),
            show_all: session.has_role(&auth.elevated_role),
            authorization: true,
            use_changed_user_on_update: false,
        }
    }

    fn forced_owner(&self) -> Option<&str> {
        (!self.username.is_empty()).then_some(self.username.as_str())
    }

    pub fn rewrite_query(&self, filter: &TaskFilter) -> TaskFilter {
        let mut filter = filter.clone();
        if self.show_all {
            filter.owner = None;
        } else if let Some(owner) = self.forced_owner() {
            filter.owner = Some(owner.to_string());
        }
        filter
    }

    pub fn rewrite_save(&self, task: &NewTask) -> NewTask {
        let mut task = task.clone();
        if let Some(owner) = self.forced_owner() {
            task.owner = owner.to_string();
        }
        task
    }

    pub fn rewrite_update(&self, task: &Task) -> Task {
        let mut task = task.clone();
        if self.use_changed_user_on_update {
            if let Some(owner) = self.forced_owner() {
                task.owner = owner.to_string();
            }
        }
        task
    }
}

/// Storage decorator applying the current [`AttackSettings`]
pub struct AttackStorage {
    inner: Rc<dyn TaskStorage>,
    settings: Rc<RefCell<AttackSettings>>,
}

impl AttackStorage {
    pub fn new(inner: Rc<dyn TaskStorage>, settings: Rc<RefCell<AttackSettings>>) -> Self {
        Self { inner, settings }
    }
}

#[async_trait(?Send)]
impl TaskStorage for AttackStorage {
    async fn query(&self, filter: &TaskFilter) -> StorageResult<Vec<Task>> {
        let filter = self.settings.borrow().rewrite_query(filter);
        debug!("attack query {:?}", filter);
        self.inner.query(&filter).await
    }

    async fn save(&self, task: &NewTask) -> StorageResult<Task> {
        let task = self.settings.borrow().rewrite_save(task);
        debug!("attack save as {}", task.owner);
        self.inner.save(&task).await
    }

    async fn update(&self, task: &Task) -> StorageResult<Task> {
        let task = self.settings.borrow().rewrite_update(task);
        debug!("attack update {} as {}", task.id, task.owner);
        self.inner.update(&task).await
    }

    async fn remove(&self, task: &Task) -> StorageResult<()> {
        self.inner.remove(task).await
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttackMode {
    #[default]
    Normal,
    Attacking,
}

pub struct AttackController {
    session: Rc<dyn Session>,
    auth: AuthConfig,
    credential: Credential,
    original_token: Option<String>,
    original_storage: Option<Rc<dyn TaskStorage>>,
    settings: Rc<RefCell<AttackSettings>>,
    mode: AttackMode,
}

impl AttackController {
    /// Remembers the credential's current token as the one to restore
    pub fn new(session: Rc<dyn Session>, credential: Credential) -> Self {
        Self::with_auth(session, credential, AuthConfig::default())
    }

    pub fn with_auth(session: Rc<dyn Session>, credential: Credential, auth: AuthConfig) -> Self {
        let settings = AttackSettings::from_session(session.as_ref(), &auth);
        Self {
            original_token: credential.token(),
            session,
            auth,
            credential,
            original_storage: None,
            settings: Rc::new(RefCell::new(settings)),
            mode: AttackMode::Normal,
        }
    }

    pub fn mode(&self) -> AttackMode {
        self.mode
    }

    pub fn is_attacking(&self) -> bool {
        self.mode == AttackMode::Attacking
    }

    pub fn settings(&self) -> AttackSettings {
        self.settings.borrow().clone()
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.settings.borrow_mut().username = username.into();
    }

    pub fn set_show_all(&mut self, show_all: bool) {
        self.settings.borrow_mut().show_all = show_all;
    }

    pub fn set_use_changed_user_on_update(&mut self, enabled: bool) {
        self.settings.borrow_mut().use_changed_user_on_update = enabled;
    }

    /// Record the flag; while attacking, present or withdraw the credential
    pub fn set_authorization(&mut self, authorization: bool) {
        self.settings.borrow_mut().authorization = authorization;
        if self.is_attacking() {
            self.apply_credential();
        }
    }

    /// Install the decorator and reload the list through it
    pub async fn attack(&mut self, todo: &mut TodoController) -> StorageResult<()> {
        if self.mode == AttackMode::Normal {
            let original = todo.storage();
            todo.set_storage(Rc::new(AttackStorage::new(
                Rc::clone(&original),
                Rc::clone(&self.settings),
            )));
            self.original_storage = Some(original);
            self.mode = AttackMode::Attacking;
            info!("attack mode on as {:?}", self.settings.borrow().username);
        }
        self.apply_credential();
        todo.refresh().await
    }

    /// Back to normal: default settings, original credential and storage
    pub async fn reset(&mut self, todo: &mut TodoController) -> StorageResult<()> {
        *self.settings.borrow_mut() = AttackSettings::from_session(self.session.as_ref(), &self.auth);
        self.credential.set_token(self.original_token.clone());
        if let Some(original) = self.original_storage.take() {
            todo.set_storage(original);
        }
        self.mode = AttackMode::Normal;
        info!("attack mode off");
        todo.refresh().await
    }

    fn apply_credential(&self) {
        if self.settings.borrow().authorization {
            self.credential.set_token(self.original_token.clone());
        } else {
            self.credential.clear();
        }
    }
}
