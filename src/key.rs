//! Composite keys: `\0<namespace>\0<part>\0[<part>\0...]`
use super::error::KeyError;
use std::fmt;

const DELIMITER: char = '\u{0}';

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeKey(String);

impl CompositeKey {
    pub fn new<S: AsRef<str>>(object_type: &str, parts: &[S]) -> Result<Self, KeyError> {
        let mut key = Self::prefix(object_type)?;
        for part in parts {
            let part = part.as_ref();
            if part.contains(DELIMITER) {
                return Err(KeyError::ReservedDelimiter(part.to_string()));
            }
            key.push_str(part);
            key.push(DELIMITER);
        }
        Ok(Self(key))
    }

    /// Leading bytes shared by every key of `object_type`.
    pub fn prefix(object_type: &str) -> Result<String, KeyError> {
        if object_type.is_empty() {
            return Err(KeyError::EmptyObjectType);
        }
        if object_type.contains(DELIMITER) {
            return Err(KeyError::ReservedDelimiter(object_type.to_string()));
        }
        Ok(format!("{DELIMITER}{object_type}{DELIMITER}"))
    }

    /// Splits the key back into its object type and parts.
    pub fn split(&self) -> (&str, Vec<&str>) {
        let mut pieces = self.0.split(DELIMITER).skip(1);
        let object_type = pieces.next().unwrap_or_default();
        let mut parts: Vec<&str> = pieces.collect();
        // trailing delimiter leaves one empty piece
        parts.pop();
        (object_type, parts)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<[u8]> for CompositeKey {
    fn as_ref(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Display for CompositeKey {
    // printable form for logs and error messages
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (object_type, parts) = self.split();
        write!(f, "{}[{}]", object_type, parts.join(","))
    }
}
