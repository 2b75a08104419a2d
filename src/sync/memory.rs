use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam::channel::{Sender, TrySendError};
use serde_json::Value;
use tracing::debug;

use super::{RemoteStore, Subscription, SyncError};

/// In-process realtime store. Clones share the same documents and subscribers.
#[derive(Clone, Default)]
pub struct MemoryRemote {
    inner: Arc<Mutex<MemoryState>>,
}

#[derive(Default)]
struct MemoryState {
    documents: HashMap<String, Value>,
    next_subscriber_id: u64,
    subscribers: BTreeMap<u64, Subscriber>,
    offline: bool,
}

struct Subscriber {
    path: String,
    sender: Sender<Value>,
}

impl MemoryRemote {
    pub fn new() -> Self {
        Self::default()
    }

    /// While offline every push and fetch fails with [`SyncError::Unavailable`].
    pub fn set_offline(&self, offline: bool) -> Result<(), SyncError> {
        self.lock_state()?.offline = offline;
        Ok(())
    }

    pub fn subscriber_count(&self) -> Result<usize, SyncError> {
        Ok(self.lock_state()?.subscribers.len())
    }

    fn lock_state(&self) -> Result<MutexGuard<'_, MemoryState>, SyncError> {
        self.inner.lock().map_err(|_| SyncError::LockPoisoned)
    }
}

impl RemoteStore for MemoryRemote {
    fn push(&self, path: &str, document: &Value) -> Result<(), SyncError> {
        let mut state = self.lock_state()?;
        if state.offline {
            return Err(SyncError::Unavailable("memory remote is offline".into()));
        }
        state.documents.insert(path.to_string(), document.clone());

        let mut dropped = Vec::new();
        for (id, subscriber) in &state.subscribers {
            if subscriber.path != path {
                continue;
            }
            match subscriber.sender.try_send(document.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) | Err(TrySendError::Disconnected(_)) => {
                    dropped.push(*id);
                }
            }
        }
        for id in dropped {
            state.subscribers.remove(&id);
        }
        debug!(path, subscribers = state.subscribers.len(), "pushed remote document");
        Ok(())
    }

    fn fetch(&self, path: &str) -> Result<Option<Value>, SyncError> {
        let state = self.lock_state()?;
        if state.offline {
            return Err(SyncError::Unavailable("memory remote is offline".into()));
        }
        Ok(state.documents.get(path).cloned())
    }

    fn subscribe(&self, path: &str) -> Result<Subscription, SyncError> {
        let mut state = self.lock_state()?;
        let (sender, receiver) = crossbeam::channel::unbounded();
        if let Some(current) = state.documents.get(path) {
            // The receiver is still held here, so this cannot disconnect.
            let _ = sender.send(current.clone());
        }
        let id = state.next_subscriber_id;
        state.next_subscriber_id = state.next_subscriber_id.saturating_add(1);
        state.subscribers.insert(
            id,
            Subscriber {
                path: path.to_string(),
                sender,
            },
        );
        Ok(Subscription::new(receiver))
    }
}
