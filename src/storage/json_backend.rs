use std::{
    fs, io,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::utils::paths::{ensure_dir, write_atomic};

use super::{LocalStore, Result};

const DOCUMENT_EXTENSION: &str = "json";

/// Directory-backed store writing one `<key>.json` file per key.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn document_path(&self, key: &str) -> PathBuf {
        self.root
            .join(format!("{}.{}", canonical_name(key), DOCUMENT_EXTENSION))
    }
}

impl LocalStore for JsonFileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match fs::read_to_string(self.document_path(key)) {
            Ok(data) => Ok(Some(data)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(err.into()),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<()> {
        let path = self.document_path(key);
        write_atomic(&path, value)?;
        debug!(path = %path.display(), bytes = value.len(), "wrote document");
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        match fs::remove_file(self.document_path(key)) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(err.into()),
        }
    }
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' | '-' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "document".into()
    } else {
        sanitized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_with_temp_dir() -> (JsonFileStore, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let store = JsonFileStore::new(temp.path().join("store")).expect("json store");
        (store, temp)
    }

    #[test]
    fn put_get_remove_roundtrip() {
        let (store, _guard) = store_with_temp_dir();
        assert_eq!(store.get("fee_ledger_state").unwrap(), None);
        store.put("fee_ledger_state", "{\"lists\":[]}").unwrap();
        assert_eq!(
            store.get("fee_ledger_state").unwrap().as_deref(),
            Some("{\"lists\":[]}")
        );
        store.remove("fee_ledger_state").unwrap();
        store.remove("fee_ledger_state").unwrap();
        assert_eq!(store.get("fee_ledger_state").unwrap(), None);
    }

    #[test]
    fn keys_are_sanitized_into_file_names() {
        let (store, _guard) = store_with_temp_dir();
        let path = store.document_path("../Lists Backup");
        assert_eq!(path.parent(), Some(store.root()));
        assert_eq!(
            path.file_name().and_then(|name| name.to_str()),
            Some("___lists_backup.json")
        );
    }
}
