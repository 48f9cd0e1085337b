//! Bearer credential shared between the storage client and the
//! attack controller.

use std::cell::RefCell;
use std::rc::Rc;

/// Shared, swappable bearer token. Clones observe the same slot.
#[derive(Debug, Clone, Default)]
pub struct Credential {
    token: Rc<RefCell<Option<String>>>,
}

impl Credential {
    pub fn new(token: Option<String>) -> Self {
        Self {
            token: Rc::new(RefCell::new(token)),
        }
    }

    pub fn token(&self) -> Option<String> {
        self.token.borrow().clone()
    }

    pub fn set_token(&self, token: Option<String>) {
        *self.token.borrow_mut() = token;
    }

    pub fn clear(&self) {
        self.set_token(None);
    }
}
