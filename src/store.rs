//! Record store adapter: the narrow key/value surface the pipelines touch
use super::error::StoreError;
use super::key::CompositeKey;
use super::selector::Selector;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Outcome of [`StateStore::insert_if_absent`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insert {
    Inserted,
    AlreadyExists,
}

/// One document produced by a query cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryHit {
    pub key: String,
    pub value: Vec<u8>,
}

/// Sequential cursor over query results. Dropping it releases it.
pub type Cursor<'a> = Box<dyn Iterator<Item = Result<QueryHit, StoreError>> + 'a>;

pub trait StateStore {
    fn get_state(&self, key: &CompositeKey) -> Result<Option<Vec<u8>>, StoreError>;

    fn exists(&self, key: &CompositeKey) -> Result<bool, StoreError> {
        Ok(self.get_state(key)?.is_some())
    }

    /// Writes `value` only when nothing is stored under `key`. The check and
    /// the write are a single atomic step.
    fn insert_if_absent(&self, key: &CompositeKey, value: &[u8]) -> Result<Insert, StoreError>;

    /// Runs a `{"selector": ...}` query over the keys of one object type,
    /// yielding matches in key order.
    fn query(&self, object_type: &str, query: &str) -> Result<Cursor<'_>, StoreError>;
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn get_state(&self, key: &CompositeKey) -> Result<Option<Vec<u8>>, StoreError> {
        (**self).get_state(key)
    }

    fn insert_if_absent(&self, key: &CompositeKey, value: &[u8]) -> Result<Insert, StoreError> {
        (**self).insert_if_absent(key, value)
    }

    fn query(&self, object_type: &str, query: &str) -> Result<Cursor<'_>, StoreError> {
        (**self).query(object_type, query)
    }
}

/// Evaluates one stored document against `selector`.
pub(crate) fn evaluate(
    selector: &Selector,
    key: &[u8],
    value: &[u8],
) -> Result<Option<QueryHit>, StoreError> {
    let key = String::from_utf8_lossy(key).into_owned();
    let document: Value =
        serde_json::from_slice(value).map_err(|_| StoreError::CorruptValue { key: key.clone() })?;

    if !selector.matches(&document) {
        return Ok(None);
    }
    Ok(Some(QueryHit {
        key,
        value: value.to_vec(),
    }))
}

/// In-process store over a sorted map. Each query snapshots the namespace.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, Vec<u8>>>,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Cursors handed out by [`StateStore::query`] and not yet dropped.
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }
}

impl StateStore for MemoryStore {
    fn get_state(&self, key: &CompositeKey) -> Result<Option<Vec<u8>>, StoreError> {
        let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(entries.get(key.as_str()).cloned())
    }

    fn insert_if_absent(&self, key: &CompositeKey, value: &[u8]) -> Result<Insert, StoreError> {
        let mut entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
        if entries.contains_key(key.as_str()) {
            return Ok(Insert::AlreadyExists);
        }
        entries.insert(key.as_str().to_string(), value.to_vec());
        Ok(Insert::Inserted)
    }

    fn query(&self, object_type: &str, query: &str) -> Result<Cursor<'_>, StoreError> {
        let selector = Selector::parse(query)?;
        let prefix = CompositeKey::prefix(object_type)
            .map_err(|e| StoreError::MalformedQuery(e.to_string()))?;

        let snapshot: Vec<(String, Vec<u8>)> = {
            let entries = self.entries.lock().map_err(|_| StoreError::Poisoned)?;
            entries
                .range(prefix.clone()..)
                .take_while(|(k, _)| k.starts_with(&prefix))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect()
        };

        self.open_cursors.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MemoryCursor {
            rows: snapshot.into_iter(),
            selector,
            open_cursors: Arc::clone(&self.open_cursors),
        }))
    }
}

struct MemoryCursor {
    rows: std::vec::IntoIter<(String, Vec<u8>)>,
    selector: Selector,
    open_cursors: Arc<AtomicUsize>,
}

impl Iterator for MemoryCursor {
    type Item = Result<QueryHit, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (key, value) = self.rows.next()?;
            match evaluate(&self.selector, key.as_bytes(), &value) {
                Ok(Some(hit)) => return Some(Ok(hit)),
                Ok(None) => continue, // skip non-matching
                Err(e) => return Some(Err(e)),
            }
        }
    }
}

impl Drop for MemoryCursor {
    fn drop(&mut self) {
        self.open_cursors.fetch_sub(1, Ordering::SeqCst);
    }
}
