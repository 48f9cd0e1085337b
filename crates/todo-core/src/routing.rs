//! Routing
//!
//! The location collaborator and the three list routes it maps to.

use std::cell::RefCell;
use std::rc::Rc;

use crate::domain::TaskFilter;

/// Source of the current route path
pub trait Location {
    fn current_path(&self) -> String;
}

/// Normalize a raw path; the empty path means `/`
pub fn normalize_path(path: &str) -> String {
    if path.is_empty() {
        "/".to_string()
    } else {
        path.to_string()
    }
}

/// Which slice of the list is shown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Route {
    #[default]
    All,
    Active,
    Completed,
}

impl Route {
    pub fn from_path(path: &str) -> Self {
        match path {
            "/active" => Route::Active,
            "/completed" => Route::Completed,
            _ => Route::All,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            Route::All => "/",
            Route::Active => "/active",
            Route::Completed => "/completed",
        }
    }

    /// Completion constraint for this route
    pub fn filter(&self) -> TaskFilter {
        match self {
            Route::All => TaskFilter::all(),
            Route::Active => TaskFilter::all().with_completed(false),
            Route::Completed => TaskFilter::all().with_completed(true),
        }
    }
}

/// Settable in-process location, shared by clones
#[derive(Debug, Clone, Default)]
pub struct MemoryLocation {
    path: Rc<RefCell<String>>,
}

impl MemoryLocation {
    pub fn new(path: &str) -> Self {
        Self {
            path: Rc::new(RefCell::new(path.to_string())),
        }
    }

    pub fn set_path(&self, path: &str) {
        *self.path.borrow_mut() = path.to_string();
    }
}

impl Location for MemoryLocation {
    fn current_path(&self) -> String {
        self.path.borrow().clone()
    }
}
