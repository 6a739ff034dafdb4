//! Per-conversation async locks.
//!
//! Every read-modify-write of one conversation's state runs under its lock,
//! so turns, profile edits, attachments and job write-backs for the same
//! conversation never interleave. Different conversations proceed in
//! parallel.
//!
//! Store-wide resets take the exclusive side of a shared gate: they wait for
//! every held conversation guard to drop, and no new guard is handed out
//! until the reset finishes.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::{
    Mutex as AsyncMutex, OwnedMutexGuard, OwnedRwLockReadGuard, OwnedRwLockWriteGuard, RwLock,
};

use crate::domain::foundation::ConversationId;

/// Exclusive access to one conversation.
#[derive(Debug)]
pub struct ConversationGuard {
    // Field order matters: the conversation lock is released before the gate.
    _conversation: OwnedMutexGuard<()>,
    _gate: OwnedRwLockReadGuard<()>,
}

/// Exclusive access to every conversation.
pub type ExclusiveGuard = OwnedRwLockWriteGuard<()>;

#[derive(Debug, Clone, Default)]
pub struct ConversationLocks {
    locks: Arc<Mutex<HashMap<ConversationId, Arc<AsyncMutex<()>>>>>,
    gate: Arc<RwLock<()>>,
}

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits for exclusive access to `id`. Released when the guard drops.
    ///
    /// Must not be called while already holding a guard from the same set.
    pub async fn acquire(&self, id: &ConversationId) -> ConversationGuard {
        let gate = Arc::clone(&self.gate).read_owned().await;
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Entries referenced only by the map are idle.
            locks.retain(|_, lock| Arc::strong_count(lock) > 1);
            locks
                .entry(id.clone())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        ConversationGuard {
            _conversation: lock.lock_owned().await,
            _gate: gate,
        }
    }

    /// Waits until no conversation guard is held and blocks new ones until
    /// the returned guard drops.
    pub async fn acquire_all(&self) -> ExclusiveGuard {
        Arc::clone(&self.gate).write_owned().await
    }

    /// Number of conversations with a live lock entry.
    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn id(raw: &str) -> ConversationId {
        ConversationId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn same_conversation_is_serialized() {
        let locks = ConversationLocks::new();
        let guard = locks.acquire(&id("1")).await;

        let waiting = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&id("1"))).await;
        assert!(waiting.is_err());

        drop(guard);
        let reacquired = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&id("1"))).await;
        assert!(reacquired.is_ok());
    }

    #[tokio::test]
    async fn different_conversations_do_not_block() {
        let locks = ConversationLocks::new();
        let _first = locks.acquire(&id("1")).await;

        let second = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&id("2"))).await;

        assert!(second.is_ok());
    }

    #[tokio::test]
    async fn idle_entries_are_pruned() {
        let locks = ConversationLocks::new();
        drop(locks.acquire(&id("1")).await);
        drop(locks.acquire(&id("2")).await);

        let _held = locks.acquire(&id("3")).await;

        assert_eq!(locks.len(), 1);
    }

    #[tokio::test]
    async fn exclusive_guard_waits_for_held_conversations() {
        let locks = ConversationLocks::new();
        let held = locks.acquire(&id("1")).await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire_all()).await;
        assert!(blocked.is_err());

        drop(held);
        let exclusive = tokio::time::timeout(Duration::from_millis(50), locks.acquire_all()).await;
        assert!(exclusive.is_ok());
    }

    #[tokio::test]
    async fn exclusive_guard_blocks_new_conversations() {
        let locks = ConversationLocks::new();
        let exclusive = locks.acquire_all().await;

        let blocked = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&id("2"))).await;
        assert!(blocked.is_err());

        drop(exclusive);
        let acquired = tokio::time::timeout(Duration::from_millis(50), locks.acquire(&id("2"))).await;
        assert!(acquired.is_ok());
    }
}
