//! Application Context
//!
//! Shared view-model handle provided via Leptos Context API.

use std::rc::Rc;

use futures::lock::Mutex;
use leptos::prelude::*;
use todo_core::{AttackController, StorageResult, TodoController};

use crate::store::{store_publish, store_set_error, AppStore};

/// Everything the handlers mutate
pub struct ViewModel {
    pub todo: TodoController,
    /// Present only when the attack tools are enabled
    pub attack: Option<AttackController>,
}

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    /// Locked for the whole of each handler so overlapping events run in order
    view_model: StoredValue<Rc<Mutex<ViewModel>>, LocalStorage>,
    pub store: AppStore,
}

impl AppContext {
    pub fn new(view_model: ViewModel, store: AppStore) -> Self {
        Self {
            view_model: StoredValue::new_local(Rc::new(Mutex::new(view_model))),
            store,
        }
    }

    pub fn view_model(&self) -> Rc<Mutex<ViewModel>> {
        self.view_model.get_value()
    }

    /// Push the view-model into the reactive store
    pub fn publish(&self, vm: &ViewModel) {
        store_publish(&self.store, vm);
    }

    /// Log a failed operation and surface it; success clears the banner
    pub fn report<T>(&self, action: &str, result: StorageResult<T>) {
        match result {
            Ok(_) => store_set_error(&self.store, None),
            Err(e) => {
                log::warn!("{} failed: {}", action, e);
                store_set_error(&self.store, Some(format!("{}: {}", action, e)));
            }
        }
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
