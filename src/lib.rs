//! Validated keyed-record engine for supply-chain-finance events.
//!
//! Each business event is submitted as one JSON argument to a named
//! operation, validated against its record type, stored once under a
//! composite key and read back through selector queries.

pub mod config;
pub mod context;
pub mod dispatch;
pub mod error;
pub mod key;
pub mod kingmi;
pub mod query;
pub mod schema;
pub mod scf;
pub mod selector;
pub mod service;
pub mod sled_store;
pub mod store;
pub mod utils;

pub use dispatch::{Dispatcher, Operation};
pub use error::{InvokeError, KeyError, StoreError, ValidationError};
pub use schema::{Record, RecordKind};
pub use service::{ACK, RecordService};
pub use sled_store::SledStore;
pub use store::{MemoryStore, StateStore};
