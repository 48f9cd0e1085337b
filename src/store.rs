//! Global Application State Store
//!
//! Reactive mirror of the view-model. Handlers mutate the controller, then
//! publish it here; components only read from the store.

use leptos::prelude::*;
use reactive_stores::Store;
use todo_core::{AttackMode, AttackSettings, Route, Task, TaskStats};

use crate::context::ViewModel;

/// Attack panel state
#[derive(Clone, Debug, PartialEq)]
pub struct AttackView {
    pub mode: AttackMode,
    pub settings: AttackSettings,
}

/// Global application state with field-level reactivity
#[derive(Clone, Debug, Default, Store)]
pub struct AppState {
    /// Tasks of the current route
    pub todos: Vec<Task>,
    pub stats: TaskStats,
    /// Id of the task being edited
    pub editing: Option<String>,
    pub route: Route,
    pub user_label: String,
    /// None when the attack tools are disabled
    pub attack: Option<AttackView>,
    /// Last storage failure, cleared on the next successful publish
    pub last_error: Option<String>,
}

/// Type alias for the store
pub type AppStore = Store<AppState>;

// ========================
// Store Helper Functions
// ========================

/// Copy the view-model into the store
pub fn store_publish(store: &AppStore, vm: &ViewModel) {
    let todo = &vm.todo;
    *store.todos().write() = todo.todos().to_vec();
    *store.stats().write() = todo.stats();
    *store.editing().write() = todo.editing().map(str::to_string);
    *store.route().write() = todo.route();
    *store.user_label().write() = todo.user_label();
    *store.attack().write() = vm.attack.as_ref().map(|attack| AttackView {
        mode: attack.mode(),
        settings: attack.settings(),
    });
}

pub fn store_set_error(store: &AppStore, error: Option<String>) {
    *store.last_error().write() = error;
}

pub fn todos(store: &AppStore) -> Vec<Task> {
    store.todos().get()
}

pub fn stats(store: &AppStore) -> TaskStats {
    store.stats().get()
}

pub fn is_editing(store: &AppStore, id: &str) -> bool {
    store.editing().with(|editing| editing.as_deref() == Some(id))
}

/// Completion as last published; false once the task is gone
pub fn is_completed(store: &AppStore, id: &str) -> bool {
    store
        .todos()
        .with(|todos| todos.iter().any(|t| t.id == id && t.completed))
}

pub fn route(store: &AppStore) -> Route {
    store.route().get()
}

pub fn user_label(store: &AppStore) -> String {
    store.user_label().get()
}

pub fn attack(store: &AppStore) -> Option<AttackView> {
    store.attack().get()
}

pub fn last_error(store: &AppStore) -> Option<String> {
    store.last_error().get()
}
