//! Record capabilities and the field rules every record type is validated with
use super::error::ValidationError;
use serde::{Deserialize, Deserializer, Serialize, de::DeserializeOwned};
use std::fmt;

/// Sentinel a required integer field holds when the argument omitted it.
pub const UNSET: i64 = -1;

pub(crate) fn unset() -> i64 {
    UNSET
}

/// Text fields read `null` as the empty string.
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    Application,
    Settlement,
    Transfer,
    Financing,
    RepaymentHistory,
    ScfUserCompany,
    ScfFinance,
    ScfLoan,
    ScfContract,
    ScfLoanRepayment,
}

impl RecordKind {
    pub const ALL: [RecordKind; 10] = [
        Self::Application,
        Self::Settlement,
        Self::Transfer,
        Self::Financing,
        Self::RepaymentHistory,
        Self::ScfUserCompany,
        Self::ScfFinance,
        Self::ScfLoan,
        Self::ScfContract,
        Self::ScfLoanRepayment,
    ];

    /// Key namespace the records of this type live under.
    pub fn namespace(&self) -> &'static str {
        match self {
            Self::Application => "application",
            Self::Settlement => "settlement",
            Self::Transfer => "transfer",
            Self::Financing => "financing",
            Self::RepaymentHistory => "repayment-history",
            Self::ScfUserCompany => "scf-user-company",
            Self::ScfFinance => "scf-finance",
            Self::ScfLoan => "scf-loan",
            Self::ScfContract => "scf-contract",
            Self::ScfLoanRepayment => "scf-loan-repayment",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.namespace())
    }
}

/// A record type the engine can validate, key and persist.
///
/// Decoding goes through serde: required integer fields default to [`UNSET`]
/// so an omitted field survives decoding and is reported by [`Record::validate`].
pub trait Record: Serialize + DeserializeOwned {
    const KIND: RecordKind;
    /// Partial shape accepted by the query pipeline for this record type.
    type Filter: Filter;

    fn validate(&self) -> Result<(), ValidationError>;

    /// Natural key values in key order, rendered as decimal strings.
    fn natural_key(&self) -> Vec<String>;

    fn encode(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

/// A structured filter over one record type. Every field is optional and the
/// rules only apply to the fields present.
pub trait Filter: DeserializeOwned {
    fn validate(&self) -> Result<(), ValidationError>;
}

/// `>= 0`, and not the unset sentinel.
pub fn legal(field: &'static str, value: i64) -> Result<(), ValidationError> {
    match value {
        UNSET => Err(ValidationError::Missing { field }),
        v if v < 0 => Err(ValidationError::Negative { field, value }),
        _ => Ok(()),
    }
}

/// `> 0`, and not the unset sentinel.
pub fn positive(field: &'static str, value: i64) -> Result<(), ValidationError> {
    match value {
        UNSET => Err(ValidationError::Missing { field }),
        v if v <= 0 => Err(ValidationError::NotPositive { field, value }),
        _ => Ok(()),
    }
}

pub fn one_of(
    field: &'static str,
    value: i64,
    allowed: &'static [i64],
) -> Result<(), ValidationError> {
    if value == UNSET {
        return Err(ValidationError::Missing { field });
    }
    if !allowed.contains(&value) {
        return Err(ValidationError::NotInSet {
            field,
            value,
            allowed,
        });
    }
    Ok(())
}

/// Checks that `later` is strictly greater than `earlier`.
pub fn later(
    earlier: (&'static str, i64),
    later: (&'static str, i64),
) -> Result<(), ValidationError> {
    if earlier.1 >= later.1 {
        return Err(ValidationError::Ordering {
            earlier: earlier.0,
            later: later.0,
        });
    }
    Ok(())
}

pub fn non_empty(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}

/// Applies `rule` only when the filter supplied the field.
pub fn present<T>(
    value: Option<T>,
    rule: impl FnOnce(T) -> Result<(), ValidationError>,
) -> Result<(), ValidationError> {
    match value {
        Some(v) => rule(v),
        None => Ok(()),
    }
}

/// Ordering rule for filters, checked only when both sides were supplied.
pub fn later_if_both(
    earlier: (&'static str, Option<i64>),
    after: (&'static str, Option<i64>),
) -> Result<(), ValidationError> {
    match (earlier.1, after.1) {
        (Some(a), Some(b)) => later((earlier.0, a), (after.0, b)),
        _ => Ok(()),
    }
}
