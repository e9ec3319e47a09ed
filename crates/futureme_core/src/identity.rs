//! crates/futureme_core/src/identity.rs
//!
//! Identity and timestamp assignment for stored records.
//!
//! Every record receives a `DocumentId` when it is inserted. The id is opaque on
//! the wire (its hyphenated string form) and parses back into the exact same
//! lookup key, so a client can hand it to any later find/update/delete call.

use crate::document::{Fields, Value};
use crate::ports::StoreError;
use chrono::{DateTime, SubsecRound, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// The system-assigned identity of a stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DocumentId(Uuid);

impl DocumentId {
    /// Generates a fresh, globally unique identity.
    pub fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses the wire form of an identity back into a lookup key.
    pub fn parse(raw: &str) -> Result<Self, StoreError> {
        Uuid::parse_str(raw.trim())
            .map(Self)
            .map_err(|_| StoreError::MalformedId(raw.to_string()))
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl FromStr for DocumentId {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// The current UTC time at microsecond resolution.
///
/// Postgres `timestamptz` and the RFC 3339 strings used on the wire both keep
/// microseconds, so truncating here makes a stored timestamp read back equal
/// to the one that was written.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Sets both lifecycle timestamps on a record that is about to be inserted.
pub fn stamp_created(fields: &mut Fields, at: DateTime<Utc>) {
    fields.insert(CREATED_AT.to_string(), Value::Timestamp(at));
    fields.insert(UPDATED_AT.to_string(), Value::Timestamp(at));
}

/// Prepares merge fields for an update: `created_at` is never writable after
/// insertion and `updated_at` is always refreshed.
pub fn stamp_modified(fields: &mut Fields, at: DateTime<Utc>) {
    fields.remove(CREATED_AT);
    fields.insert(UPDATED_AT.to_string(), Value::Timestamp(at));
}
