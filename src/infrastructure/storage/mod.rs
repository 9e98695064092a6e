//! In-memory user storage

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::entities::{UserLevel, UserRecord};
use crate::domain::traits::UserStore;
use crate::infrastructure::config::UsersConfig;

/// User records kept in memory; unknown ids resolve to guests
#[derive(Default, Clone)]
pub struct MemoryUserStore {
    users: Arc<RwLock<HashMap<String, UserRecord>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed owners and admins listed in the config
    pub fn from_config(config: &UsersConfig) -> Self {
        let users = config
            .admins
            .iter()
            .map(|id| UserRecord::new(id.clone()).with_level(UserLevel::Admin))
            .chain(
                config
                    .owners
                    .iter()
                    .map(|id| UserRecord::new(id.clone()).with_level(UserLevel::Owner)),
            )
            .map(|user| (user.id.clone(), user))
            .collect();

        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    pub async fn save_user(&self, user: UserRecord) {
        let mut users = self.users.write().await;
        users.insert(user.id.clone(), user);
    }

    pub async fn get_user(&self, id: &str) -> Option<UserRecord> {
        let users = self.users.read().await;
        users.get(id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn resolve_user(&self, id: &str) -> UserRecord {
        self.get_user(id)
            .await
            .unwrap_or_else(|| UserRecord::guest(id))
    }
}
