//! Browser Adapters
//!
//! Location and session collaborators backed by `window`.

use js_sys::{Array, Reflect};
use todo_core::{Location, StaticSession};
use wasm_bindgen::JsValue;

/// Route path taken from the URL fragment (`#/active` → `/active`)
#[derive(Debug, Clone, Copy, Default)]
pub struct HashLocation;

impl HashLocation {
    /// Point an empty fragment at `/`
    pub fn ensure_root() {
        if let Some(location) = web_sys::window().map(|w| w.location()) {
            if location.hash().unwrap_or_default().is_empty() {
                let _ = location.set_hash("/");
            }
        }
    }
}

impl Location for HashLocation {
    fn current_path(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().hash().ok())
            .map(|hash| hash.trim_start_matches('#').to_string())
            .unwrap_or_default()
    }
}

/// Identity published by the login page on `window.oauth`
pub struct BrowserAuth {
    pub session: StaticSession,
    pub token: Option<String>,
}

/// Read `window.oauth = { username, roles: [..], token }`
pub fn read_browser_auth() -> BrowserAuth {
    let oauth = web_sys::window()
        .map(JsValue::from)
        .and_then(|w| Reflect::get(&w, &JsValue::from_str("oauth")).ok())
        .filter(|v| v.is_object());

    let Some(oauth) = oauth else {
        log::warn!("window.oauth missing, continuing anonymously");
        return BrowserAuth {
            session: StaticSession::default(),
            token: None,
        };
    };

    let username = js_string(&oauth, "username").unwrap_or_default();
    let mut session = StaticSession::new(username);
    if let Ok(roles) = Reflect::get(&oauth, &JsValue::from_str("roles")) {
        if Array::is_array(&roles) {
            for role in Array::from(&roles).iter().filter_map(|r| r.as_string()) {
                session = session.with_role(role);
            }
        }
    }

    BrowserAuth {
        session,
        token: js_string(&oauth, "token"),
    }
}

fn js_string(object: &JsValue, key: &str) -> Option<String> {
    Reflect::get(object, &JsValue::from_str(key))
        .ok()
        .and_then(|v| v.as_string())
}
