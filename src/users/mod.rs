//! Maps transport connection ids to the users behind them.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::debug;

pub trait User: Send + Sync + 'static {
    fn id(&self) -> u64;
    fn connection_id(&self) -> &str;
}

/// Builds the user for a freshly assigned id and its connection.
pub trait UserFactory<U> {
    fn create(&self, user_id: u64, connection_id: &str) -> U;
}

impl<U, F> UserFactory<U> for F
where
    F: Fn(u64, &str) -> U,
{
    fn create(&self, user_id: u64, connection_id: &str) -> U {
        self(user_id, connection_id)
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct DefaultUser {
    pub id: u64,
    /// only meaningful to this process
    #[serde(skip)]
    pub connection_id: String,
}

impl User for DefaultUser {
    fn id(&self) -> u64 {
        self.id
    }

    fn connection_id(&self) -> &str {
        &self.connection_id
    }
}

#[derive(Copy, Clone, Default, Debug)]
pub struct DefaultUserFactory;

impl UserFactory<DefaultUser> for DefaultUserFactory {
    fn create(&self, user_id: u64, connection_id: &str) -> DefaultUser {
        DefaultUser {
            id: user_id,
            connection_id: connection_id.to_string(),
        }
    }
}

/// Thread safe connection id to user map. User ids start at 1 and are never
/// reused by the same manager.
pub struct UserManager<U = DefaultUser, F = DefaultUserFactory> {
    users: RwLock<HashMap<String, Arc<U>>>,
    last_user_id: AtomicU64,
    factory: F,
}

impl UserManager {
    pub fn new() -> UserManager {
        UserManager::with_factory(DefaultUserFactory)
    }
}

impl Default for UserManager {
    fn default() -> Self {
        Self::new()
    }
}

impl<U: User, F: UserFactory<U>> UserManager<U, F> {
    pub fn with_factory(factory: F) -> UserManager<U, F> {
        UserManager {
            users: RwLock::new(HashMap::new()),
            last_user_id: AtomicU64::new(0),
            factory,
        }
    }

    /// Creates a user for `connection_id`. A connection that already has a
    /// user keeps it and gets it back.
    pub fn new_user(&self, connection_id: &str) -> Arc<U> {
        let mut users = self.users.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(existing) = users.get(connection_id) {
            return existing.clone();
        }
        let id = self.last_user_id.fetch_add(1, Ordering::Relaxed) + 1;
        let user = Arc::new(self.factory.create(id, connection_id));
        users.insert(connection_id.to_string(), user.clone());
        debug!(user = id, connection = connection_id, "user added");
        user
    }

    pub fn get(&self, connection_id: &str) -> Option<Arc<U>> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(connection_id)
            .cloned()
    }

    pub fn remove_user(&self, connection_id: &str) -> Option<Arc<U>> {
        let removed = self
            .users
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(connection_id);
        if let Some(user) = removed.as_ref() {
            debug!(user = user.id(), connection = connection_id, "user removed");
        }
        removed
    }

    /// snapshot of every current user, in no particular order
    pub fn users(&self) -> Vec<Arc<U>> {
        self.users
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.users.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<U, F> fmt::Debug for UserManager<U, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let users = self.users.read().unwrap_or_else(PoisonError::into_inner);
        f.debug_struct("UserManager")
            .field("users", &users.len())
            .field("last_user_id", &self.last_user_id.load(Ordering::Relaxed))
            .finish()
    }
}
