//! Query translation: filter object to selector query, cursor to JSON array
use super::error::StoreError;
use super::store::Cursor;
use serde_json::{Value, json};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResults {
    /// JSON array of the matching documents, in cursor order.
    pub payload: Vec<u8>,
    pub count: usize,
}

/// Wraps the caller's filter object as the selector body.
pub fn selector_query(filter: Value) -> String {
    json!({ "selector": filter }).to_string()
}

/// Concatenates every document the cursor yields into one JSON array.
///
/// The cursor is consumed; on an error it is dropped (and so released) before
/// the error is returned.
pub fn drain(cursor: Cursor<'_>) -> Result<QueryResults, StoreError> {
    let mut payload = vec![b'['];
    let mut count = 0;

    for hit in cursor {
        let hit = hit?;
        // comma before every member but the first
        if count > 0 {
            payload.push(b',');
        }
        payload.extend_from_slice(&hit.value);
        count += 1;
    }
    payload.push(b']');

    Ok(QueryResults { payload, count })
}
