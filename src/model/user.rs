use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// An account on the hosting service.
///
/// Two users are the same user when their logins match; `id` and `name` are
/// carried along but do not take part in equality.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
}

impl User {
    pub fn new(id: u64, login: impl Into<String>, name: Option<String>) -> Self {
        Self {
            id,
            login: login.into(),
            name,
        }
    }
}

impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.login == other.login
    }
}

impl Eq for User {}

impl Hash for User {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.login.hash(state);
    }
}
