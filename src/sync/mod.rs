//! Remote mirrors of the ledger document.
//!
//! A [`RemoteStore`] holds whole JSON documents at string paths and delivers
//! every new version of a path to its subscribers over a channel. Nothing is
//! merged: each delivery is a full snapshot.

pub mod file;
pub mod memory;

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use crossbeam::channel::{Receiver, RecvTimeoutError, TryRecvError};
use serde_json::Value;
use thiserror::Error;

pub use file::FileRemote;
pub use memory::MemoryRemote;

/// Default document path used when none is configured.
pub const DEFAULT_DOCUMENT_PATH: &str = "fee-ledger/state";

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("remote IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("remote document is not valid JSON: {0}")]
    Serde(#[from] serde_json::Error),
    #[error("remote store unavailable: {0}")]
    Unavailable(String),
    #[error("remote state lock poisoned")]
    LockPoisoned,
}

pub trait RemoteStore: Send + Sync {
    /// Replaces the document at `path`.
    fn push(&self, path: &str, document: &Value) -> Result<(), SyncError>;

    fn fetch(&self, path: &str) -> Result<Option<Value>, SyncError>;

    /// Streams the current document (when present) and every later version of it.
    fn subscribe(&self, path: &str) -> Result<Subscription, SyncError>;
}

/// Receiving end of a remote subscription. Dropping it raises the closed flag
/// so producers that only observe the document can stop.
#[derive(Debug)]
pub struct Subscription {
    receiver: Receiver<Value>,
    closed: Arc<AtomicBool>,
}

impl Subscription {
    pub fn new(receiver: Receiver<Value>) -> Self {
        Self {
            receiver,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Shared flag that turns `true` once this subscription is dropped.
    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    pub fn try_recv(&self) -> Result<Value, TryRecvError> {
        self.receiver.try_recv()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Result<Value, RecvTimeoutError> {
        self.receiver.recv_timeout(timeout)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.closed.store(true, Ordering::Release);
    }
}
