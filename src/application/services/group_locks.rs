//! Per-group mutual exclusion

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

use crate::application::errors::BotError;

/// One async lock per group id, created on first use.
///
/// Holding the guard serializes read-modify-write sequences on that group's
/// state. Different groups never contend. Entries nobody holds or waits on
/// are dropped on the next `lock` call, so the map stays as small as the set
/// of groups in flight.
#[derive(Default)]
pub struct GroupLocks {
    locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

impl GroupLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, group_id: &str) -> Result<OwnedMutexGuard<()>, BotError> {
        let lock = {
            let mut locks = self.locks.lock()
                .map_err(|_| BotError::Internal("Lock poisoned".to_string()))?;
            locks.retain(|_, l| Arc::strong_count(l) > 1);
            locks.entry(group_id.to_string())
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };
        Ok(lock.lock_owned().await)
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.lock().map(|l| l.len()).unwrap_or(0)
    }
}
