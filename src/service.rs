//! Service layer: the create and query pipelines shared by every record type
use super::error::InvokeError;
use super::key::CompositeKey;
use super::query;
use super::schema::{Filter, Record, RecordKind};
use super::store::{Insert, StateStore};
use serde::de::Error as _;
use serde_json::Value;
use tracing::{debug, info};

/// Payload returned by every successful create.
pub const ACK: &[u8] = b"invoke successfully";

pub struct RecordService<S> {
    store: S,
}

impl<S: StateStore> RecordService<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validate, key and persist one record. Nothing is written unless the
    /// record is valid and its key is still free.
    pub fn create<R: Record>(&self, args: &[String]) -> Result<Vec<u8>, InvokeError> {
        let kind = R::KIND;
        let value = decode_object(kind, single_argument(args)?)?;
        let record: R = serde_json::from_value(value)
            .map_err(|source| InvokeError::Decode { kind, source })?;
        record
            .validate()
            .map_err(|source| InvokeError::Validation { kind, source })?;

        let natural_key = record.natural_key();
        let key = CompositeKey::new(kind.namespace(), &natural_key)?;
        let bytes = record
            .encode()
            .map_err(|source| InvokeError::Encode { kind, source })?;

        match self.store.insert_if_absent(&key, &bytes)? {
            Insert::Inserted => {
                info!(%kind, %key, "record created");
                Ok(ACK.to_vec())
            }
            Insert::AlreadyExists => Err(InvokeError::Duplicate {
                kind,
                natural_key: natural_key.join(","),
            }),
        }
    }

    /// Validate a filter over `R`, run it as a selector query and return the
    /// matching documents as one JSON array.
    pub fn query<R: Record>(&self, args: &[String]) -> Result<Vec<u8>, InvokeError> {
        let kind = R::KIND;
        let value = decode_object(kind, single_argument(args)?)?;
        let filter: R::Filter = serde_json::from_value(value.clone())
            .map_err(|source| InvokeError::Decode { kind, source })?;
        filter
            .validate()
            .map_err(|source| InvokeError::Validation { kind, source })?;

        let query = query::selector_query(value);
        debug!(%kind, %query, "running selector query");

        let cursor = self.store.query(kind.namespace(), &query)?;
        let results = query::drain(cursor)?;

        info!(%kind, matches = results.count, "query complete");
        Ok(results.payload)
    }
}

fn single_argument(args: &[String]) -> Result<&str, InvokeError> {
    match args {
        [arg] => Ok(arg.as_str()),
        _ => Err(InvokeError::ArgumentCount(args.len())),
    }
}

fn decode_object(kind: RecordKind, arg: &str) -> Result<Value, InvokeError> {
    let value: Value =
        serde_json::from_str(arg).map_err(|source| InvokeError::Decode { kind, source })?;
    if !value.is_object() {
        return Err(InvokeError::Decode {
            kind,
            source: serde_json::Error::custom("argument must be a JSON object"),
        });
    }
    Ok(value)
}
