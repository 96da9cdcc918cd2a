use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use crate::model::User;

/// Append-only cache of resolved users keyed by login.
///
/// One directory is meant to outlive many ingestion runs so that a user is
/// looked up over the network at most once. The map sits behind a mutex, so a
/// shared `&UserDirectory` (or an `Arc`) can serve concurrent runs.
#[derive(Debug, Default)]
pub struct UserDirectory {
    users: Mutex<HashMap<String, User>>,
}

impl UserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached user for `login`. Never touches the network.
    pub fn lookup(&self, login: &str) -> Option<User> {
        self.guard().get(login).cloned()
    }

    /// Insert `user` unless its login is already present.
    ///
    /// Returns `true` when inserted. An existing entry is kept as is.
    pub fn register(&self, user: User) -> bool {
        let mut users = self.guard();
        if users.contains_key(&user.login) {
            return false;
        }
        users.insert(user.login.clone(), user);
        true
    }

    pub fn len(&self) -> usize {
        self.guard().len()
    }

    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    // The map is only ever appended to, so a poisoned lock still holds a
    // consistent map.
    fn guard(&self) -> MutexGuard<'_, HashMap<String, User>> {
        self.users.lock().unwrap_or_else(|e| e.into_inner())
    }
}
