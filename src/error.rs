use crate::schema::RecordKind;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("argument({field}) is missing or holds the unset sentinel -1")]
    Missing { field: &'static str },
    #[error("argument({field}) must be legal (>= 0), got {value}")]
    Negative { field: &'static str, value: i64 },
    #[error("argument({field}) must be greater than 0, got {value}")]
    NotPositive { field: &'static str, value: i64 },
    #[error("argument({field}) must be one of {allowed:?}, got {value}")]
    NotInSet {
        field: &'static str,
        value: i64,
        allowed: &'static [i64],
    },
    #[error("{later} must be later than {earlier}")]
    Ordering {
        earlier: &'static str,
        later: &'static str,
    },
    #[error("argument({field}) must be a non-empty string")]
    Empty { field: &'static str },
}

impl ValidationError {
    /// Name of the field the rule was evaluated against.
    pub fn field(&self) -> &'static str {
        match self {
            Self::Missing { field }
            | Self::Negative { field, .. }
            | Self::NotPositive { field, .. }
            | Self::NotInSet { field, .. }
            | Self::Empty { field } => field,
            Self::Ordering { later, .. } => later,
        }
    }
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum KeyError {
    #[error("composite key object type must not be empty")]
    EmptyObjectType,
    #[error("composite key part {0:?} contains a reserved delimiter")]
    ReservedDelimiter(String),
}

#[derive(thiserror::Error, Debug)]
pub enum StoreError {
    #[error("sled backend failure: {0}")]
    Backend(#[from] sled::Error),
    #[error("store lock was poisoned by a panicking writer")]
    Poisoned,
    #[error("malformed query: {0}")]
    MalformedQuery(String),
    #[error("value stored under {key:?} is not a JSON document")]
    CorruptValue { key: String },
}

impl StoreError {
    /// Backend I/O may succeed on a later attempt; a bad selector or a corrupt
    /// document never will.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Backend(_) | Self::Poisoned)
    }
}

#[derive(thiserror::Error, Debug)]
pub enum InvokeError {
    #[error("Incorrect number of arguments. Expecting 1, got {0}")]
    ArgumentCount(usize),
    #[error("failed to decode {kind} argument: {source}")]
    Decode {
        kind: RecordKind,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid {kind}: {source}")]
    Validation {
        kind: RecordKind,
        #[source]
        source: ValidationError,
    },
    #[error("the {kind} record {natural_key} already exists")]
    Duplicate { kind: RecordKind, natural_key: String },
    #[error("Function {0} doesn't exist, make sure the function is right")]
    UnknownOperation(String),
    #[error(transparent)]
    Key(#[from] KeyError),
    #[error("failed to encode {kind} record: {source}")]
    Encode {
        kind: RecordKind,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl InvokeError {
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Store(e) => e.is_retryable(),
            _ => false,
        }
    }
}
