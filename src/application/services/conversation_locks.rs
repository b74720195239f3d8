use std::collections::HashMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::domain::ConversationId;

/// Advisory per-conversation locks so at most one relay streams into a
/// conversation at a time.
///
/// Entries hold weak references; a lock disappears once its last guard is
/// dropped and is pruned on the next acquisition.
#[derive(Default)]
pub struct ConversationLocks {
    locks: Mutex<HashMap<ConversationId, Weak<AsyncMutex<()>>>>,
}

pub type ConversationGuard = OwnedMutexGuard<()>;

impl ConversationLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `None` when another relay already holds the conversation.
    pub fn try_acquire(&self, id: ConversationId) -> Option<ConversationGuard> {
        let lock = {
            let mut locks = self.locks.lock();
            locks.retain(|_, weak| weak.strong_count() > 0);

            match locks.get(&id).and_then(Weak::upgrade) {
                Some(existing) => existing,
                None => {
                    let created = Arc::new(AsyncMutex::new(()));
                    locks.insert(id, Arc::downgrade(&created));
                    created
                }
            }
        };

        lock.try_lock_owned().ok()
    }

    pub fn held(&self) -> usize {
        self.locks
            .lock()
            .values()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}
