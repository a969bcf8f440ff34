//! Invocation envelope: what arrives from the hosting platform and what goes back
use super::error::InvokeError;
use super::utils;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt;

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

#[derive(Debug, PartialEq, Eq, Clone)]
pub struct TimeStamp<T: TimeZone>(DateTime<T>);

impl TimeStamp<Utc> {
    pub fn new() -> Self {
        Self(Utc::now())
    }
    pub fn to_datetime_utc(&self) -> DateTime<Utc> {
        self.0
    }
}

impl Default for TimeStamp<Utc> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeStamp<T> {
    fn from(value: DateTime<T>) -> Self {
        TimeStamp(value)
    }
}

impl fmt::Display for TimeStamp<Utc> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

/// One call into the engine: operation name plus its string arguments,
/// stamped with a transaction id and time.
#[derive(Debug, Clone)]
pub struct Invocation {
    pub tx_id: String,
    pub timestamp: TimeStamp<Utc>,
    pub function: String,
    pub args: Vec<String>,
}

impl Invocation {
    pub fn new(function: impl Into<String>, args: Vec<String>) -> anyhow::Result<Self> {
        Ok(Self::new_with(utils::new_tx_id()?, function, args))
    }

    pub fn new_with(tx_id: String, function: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            tx_id,
            timestamp: TimeStamp::new(),
            function: function.into(),
            args,
        }
    }

    /// Splits `[function, args...]` the way the platform delivers it.
    pub fn from_parts(mut parts: Vec<String>) -> anyhow::Result<Self> {
        if parts.is_empty() {
            return Err(anyhow::anyhow!("invocation has no function name"));
        }
        let function = parts.remove(0);
        Self::new(function, parts)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    pub status: u16,
    pub message: String,
    pub payload: Vec<u8>,
}

impl Response {
    pub fn success(payload: Vec<u8>) -> Self {
        Self {
            status: STATUS_OK,
            message: String::new(),
            payload,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: STATUS_ERROR,
            message: message.into(),
            payload: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status < 400
    }
}

impl From<Result<Vec<u8>, InvokeError>> for Response {
    fn from(result: Result<Vec<u8>, InvokeError>) -> Self {
        match result {
            Ok(payload) => Self::success(payload),
            Err(e) => Self::error(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_parts_splits_function_and_args() {
        let inv = Invocation::from_parts(vec!["Apply".into(), "{}".into()]).unwrap();
        assert_eq!(inv.function, "Apply");
        assert_eq!(inv.args, vec!["{}".to_string()]);
        assert!(inv.tx_id.starts_with("tx_"));
    }

    #[test]
    fn from_parts_needs_a_function() {
        assert!(Invocation::from_parts(vec![]).is_err());
    }

    #[test]
    fn error_result_maps_to_error_response() {
        let res: Response = Err(InvokeError::ArgumentCount(0)).into();
        assert!(!res.is_success());
        assert_eq!(res.status, STATUS_ERROR);
        assert!(res.message.contains("Expecting 1"));
    }
}
