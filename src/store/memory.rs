use anyhow::Result;
use parking_lot::RwLock;
use std::collections::HashMap;

use crate::config::DirectoryUser;
use crate::store::traits::UserDirectory;

/// Directory held in memory, seeded from configuration.
#[derive(Debug, Default)]
pub struct InMemoryUserDirectory {
    users: RwLock<HashMap<String, String>>,
}

impl InMemoryUserDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_users(users: &[DirectoryUser]) -> Self {
        let directory = Self::new();
        for user in users {
            directory.insert(&user.email, &user.unique_identifier);
        }
        directory
    }

    pub fn insert(&self, email: &str, unique_identifier: &str) {
        self.users
            .write()
            .insert(normalize_email(email), unique_identifier.trim().to_string());
    }

    pub fn len(&self) -> usize {
        self.users.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.read().is_empty()
    }
}

#[async_trait::async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn unique_identifier_for(&self, email: &str) -> Result<Option<String>> {
        Ok(self
            .users
            .read()
            .get(&normalize_email(email))
            .filter(|number| !number.is_empty())
            .cloned())
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
