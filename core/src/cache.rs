//! Single-key caches for server-owned data.
//!
//! A slot holds the last successful fetch for one well-known key and is only
//! ever replaced whole or cleared. There is no background refresh; callers
//! invalidate at mutation points and refetch.

use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::types::{Todo, User};

pub const SESSION_KEY: &str = "me";
pub const TODOS_KEY: &str = "todos";

/// One cached value under a fixed key. Clones share the same slot.
#[derive(Debug)]
pub struct CacheSlot<T> {
    key: &'static str,
    value: Arc<RwLock<Option<T>>>,
}

impl<T> Clone for CacheSlot<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key,
            value: Arc::clone(&self.value),
        }
    }
}

impl<T: Clone> CacheSlot<T> {
    pub fn new(key: &'static str) -> Self {
        Self {
            key,
            value: Arc::new(RwLock::new(None)),
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    pub async fn get(&self) -> Option<T> {
        self.value.read().await.clone()
    }

    pub async fn set(&self, value: T) {
        *self.value.write().await = Some(value);
        debug!(key = self.key, "cache entry replaced");
    }

    pub async fn invalidate(&self) {
        if self.value.write().await.take().is_some() {
            debug!(key = self.key, "cache entry invalidated");
        }
    }

    pub async fn is_empty(&self) -> bool {
        self.value.read().await.is_none()
    }
}

/// The signed-in identity, keyed `me`.
pub type SessionCache = CacheSlot<User>;

/// The last fetched todo list, keyed `todos`.
pub type TodoListCache = CacheSlot<Vec<Todo>>;

pub fn session_cache() -> SessionCache {
    CacheSlot::new(SESSION_KEY)
}

pub fn todo_list_cache() -> TodoListCache {
    CacheSlot::new(TODOS_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_replaces_and_invalidate_clears() {
        let slot: CacheSlot<Vec<u32>> = CacheSlot::new("numbers");
        assert!(slot.get().await.is_none());

        slot.set(vec![1, 2]).await;
        slot.set(vec![3]).await;
        assert_eq!(slot.get().await, Some(vec![3]));

        slot.invalidate().await;
        assert!(slot.is_empty().await);
    }

    #[tokio::test]
    async fn clones_share_one_slot() {
        let cache = session_cache();
        let other = cache.clone();
        assert_eq!(other.key(), SESSION_KEY);

        cache.set(serde_json::from_value(crate::test_support::user_json(1, "a@b.c")).unwrap()).await;
        assert_eq!(other.get().await.map(|u| u.email), Some("a@b.c".to_string()));
    }
}
