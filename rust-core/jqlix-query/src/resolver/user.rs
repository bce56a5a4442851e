// SPDX-License-Identifier: PMPL-1.0-or-later
//! Users, indexed by lowercase key.

use crate::domain::User;
use crate::resolver::IndexInfoResolver;

/// Matches a username first; only when none matches are emails and display
/// names consulted, and those may match several users.
#[derive(Debug, Clone, Default)]
pub struct UserResolver {
    users: Vec<User>,
}

impl UserResolver {
    pub fn new(users: Vec<User>) -> Self {
        Self { users }
    }
}

impl IndexInfoResolver<User> for UserResolver {
    fn indexed_values(&self, raw: &str) -> Vec<String> {
        let raw = raw.trim().to_lowercase();
        if let Some(user) = self.users.iter().find(|u| u.username.to_lowercase() == raw) {
            return vec![self.indexed_value(user)];
        }
        self.users
            .iter()
            .filter(|u| {
                u.display_name.to_lowercase() == raw
                    || u.email.as_deref().is_some_and(|e| e.to_lowercase() == raw)
            })
            .map(|u| self.indexed_value(u))
            .collect()
    }

    fn indexed_values_for_number(&self, raw: i64) -> Vec<String> {
        self.indexed_values(&raw.to_string())
    }

    fn indexed_value(&self, object: &User) -> String {
        object.key.to_lowercase()
    }
}
