//! Session
//!
//! The authenticated viewer: identity and role membership.

use std::collections::BTreeSet;

/// Role allowing visibility across all owners' tasks
pub const ELEVATED_ROLE: &str = "admin";
/// Ordinary member role
pub const USER_ROLE: &str = "user";

/// Auth collaborator
pub trait Session {
    fn identity(&self) -> String;
    fn has_role(&self, role: &str) -> bool;
}

/// Fixed identity and role set
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticSession {
    username: String,
    roles: BTreeSet<String>,
}

impl StaticSession {
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            roles: BTreeSet::new(),
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.roles.insert(role.into());
        self
    }
}

impl Session for StaticSession {
    fn identity(&self) -> String {
        self.username.clone()
    }

    fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}

/// Display label such as `alice (admin)`
pub fn user_label(session: &dyn Session, elevated_role: &str, user_role: &str) -> String {
    let role = if session.has_role(elevated_role) {
        elevated_role
    } else if session.has_role(user_role) {
        user_role
    } else {
        ""
    };
    format!("{} ({})", session.identity(), role)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_label_prefers_elevated_role() {
        let admin = StaticSession::new("root").with_role(USER_ROLE).with_role(ELEVATED_ROLE);
        assert_eq!(user_label(&admin, ELEVATED_ROLE, USER_ROLE), "root (admin)");

        let bob = StaticSession::new("bob").with_role(USER_ROLE);
        assert_eq!(user_label(&bob, ELEVATED_ROLE, USER_ROLE), "bob (user)");

        let guest = StaticSession::new("guest");
        assert_eq!(user_label(&guest, ELEVATED_ROLE, USER_ROLE), "guest ()");
    }
}
