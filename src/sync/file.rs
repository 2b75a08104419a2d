use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::atomic::{AtomicBool, Ordering},
    thread,
    time::Duration,
};

use crossbeam::channel::Sender;
use serde_json::Value;
use tracing::{debug, warn};

use crate::utils::paths::write_atomic;

use super::{RemoteStore, Subscription, SyncError};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// Remote mirror kept as JSON files under a shared directory, such as a
/// folder replicated by a file-sync tool.
///
/// Subscriptions poll on a background thread, which exits within one poll
/// interval of the [`Subscription`] being dropped.
#[derive(Debug, Clone)]
pub struct FileRemote {
    root: PathBuf,
    poll_interval: Duration,
}

impl FileRemote {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn document_path(&self, path: &str) -> PathBuf {
        let mut file = self.root.clone();
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            file.push(sanitize_segment(segment));
        }
        file.set_extension("json");
        file
    }
}

impl RemoteStore for FileRemote {
    fn push(&self, path: &str, document: &Value) -> Result<(), SyncError> {
        let target = self.document_path(path);
        let json = serde_json::to_string_pretty(document)?;
        write_atomic(&target, &json)?;
        debug!(path = %target.display(), "pushed remote document");
        Ok(())
    }

    fn fetch(&self, path: &str) -> Result<Option<Value>, SyncError> {
        match read_document(&self.document_path(path))? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    fn subscribe(&self, path: &str) -> Result<Subscription, SyncError> {
        let target = self.document_path(path);
        let interval = self.poll_interval;
        let (sender, receiver) = crossbeam::channel::unbounded();
        let subscription = Subscription::new(receiver);
        let closed = subscription.closed_flag();

        thread::Builder::new()
            .name("fee-ledger-remote-poll".into())
            .spawn(move || poll_document(&target, interval, &sender, &closed))?;

        Ok(subscription)
    }
}

/// Sends every distinct version of `target` until the subscription is dropped.
fn poll_document(target: &Path, interval: Duration, sender: &Sender<Value>, closed: &AtomicBool) {
    let mut last_seen: Option<String> = None;
    while !closed.load(Ordering::Acquire) {
        match read_document(target) {
            Ok(Some(raw)) if last_seen.as_deref() != Some(raw.as_str()) => {
                match serde_json::from_str::<Value>(&raw) {
                    Ok(document) => {
                        if sender.send(document).is_err() {
                            break;
                        }
                    }
                    Err(err) => warn!(
                        path = %target.display(),
                        error = %err,
                        "ignoring unparsable remote document"
                    ),
                }
                last_seen = Some(raw);
            }
            Ok(_) => {}
            Err(err) => warn!(path = %target.display(), error = %err, "remote poll failed"),
        }
        thread::sleep(interval);
    }
    debug!(path = %target.display(), "remote poller stopped");
}

fn read_document(path: &Path) -> io::Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(raw) => Ok(Some(raw)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

fn sanitize_segment(segment: &str) -> String {
    let cleaned: String = segment
        .chars()
        .map(|c| match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' => c,
            _ => '_',
        })
        .collect();
    if cleaned.trim_matches('_').is_empty() {
        "document".into()
    } else {
        cleaned
    }
}
