//! sled-backed state store
use super::error::StoreError;
use super::key::CompositeKey;
use super::selector::Selector;
use super::store::{Cursor, Insert, QueryHit, StateStore, evaluate};
use std::path::Path;

pub struct SledStore {
    instance: sled::Db,
}

impl SledStore {
    pub fn new(instance: sled::Db) -> Self {
        Self { instance }
    }

    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, StoreError> {
        Ok(Self::new(sled::open(path)?))
    }

    /// Database removed from disk once the store is dropped.
    pub fn temporary() -> Result<Self, StoreError> {
        Ok(Self::new(sled::Config::new().temporary(true).open()?))
    }

    pub fn flush(&self) -> Result<usize, StoreError> {
        Ok(self.instance.flush()?)
    }

    pub fn len(&self) -> usize {
        self.instance.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instance.is_empty()
    }
}

impl StateStore for SledStore {
    fn get_state(&self, key: &CompositeKey) -> Result<Option<Vec<u8>>, StoreError> {
        Ok(self.instance.get(key.as_str())?.map(|v| v.to_vec()))
    }

    fn insert_if_absent(&self, key: &CompositeKey, value: &[u8]) -> Result<Insert, StoreError> {
        // swap from "absent" so concurrent creators cannot both win
        let swapped = self
            .instance
            .compare_and_swap(key.as_str(), None::<&[u8]>, Some(value))?;

        match swapped {
            Ok(()) => Ok(Insert::Inserted),
            Err(_) => Ok(Insert::AlreadyExists),
        }
    }

    fn query(&self, object_type: &str, query: &str) -> Result<Cursor<'_>, StoreError> {
        let selector = Selector::parse(query)?;
        let prefix = CompositeKey::prefix(object_type)
            .map_err(|e| StoreError::MalformedQuery(e.to_string()))?;

        Ok(Box::new(SledCursor {
            iter: self.instance.scan_prefix(prefix),
            selector,
        }))
    }
}

struct SledCursor {
    iter: sled::Iter,
    selector: Selector,
}

impl Iterator for SledCursor {
    type Item = Result<QueryHit, StoreError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (key, value) = match self.iter.next()? {
                Ok(entry) => entry,
                Err(e) => return Some(Err(e.into())),
            };
            match evaluate(&self.selector, &key, &value) {
                Ok(Some(hit)) => return Some(Ok(hit)),
                Ok(None) => continue,
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
