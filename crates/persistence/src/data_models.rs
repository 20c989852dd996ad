// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Stored representations and column conversions.
//!
//! Timestamps are stored as fixed-width UTC RFC 3339 text with nanosecond
//! precision, so text order is time order. Money is stored as decimal text,
//! flags as `0`/`1` integers and sequence orders as 32-bit integers.

use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::error::PersistenceError;

/// Serializable representation of an Actor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub id: String,
    pub actor_type: String,
}

/// Serializable representation of a Cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CauseData {
    pub id: String,
    pub description: String,
}

/// Serializable representation of an Action.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionData {
    pub name: String,
    pub details: Option<String>,
}

/// Serializable representation of a `StateSnapshot`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateSnapshotData {
    pub data: String,
}

/// Formats a timestamp for storage: always UTC, always nine subsecond digits.
pub fn format_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(format_description!(
            "[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z"
        ))
        .map_err(|e| PersistenceError::SerializationError(e.to_string()))
}

/// Formats an optional timestamp for storage.
pub fn format_optional_timestamp(
    value: Option<OffsetDateTime>,
) -> Result<Option<String>, PersistenceError> {
    value.map(format_timestamp).transpose()
}

/// Parses a stored timestamp.
pub fn parse_timestamp(
    table: &'static str,
    value: &str,
) -> Result<OffsetDateTime, PersistenceError> {
    OffsetDateTime::parse(value, &Rfc3339).map_err(|e| PersistenceError::corrupt(table, e))
}

/// Parses an optional stored timestamp.
pub fn parse_optional_timestamp(
    table: &'static str,
    value: Option<&str>,
) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(|v| parse_timestamp(table, v)).transpose()
}

/// Parses a stored decimal amount.
pub fn parse_decimal(table: &'static str, value: &str) -> Result<Decimal, PersistenceError> {
    Decimal::from_str(value).map_err(|e| PersistenceError::corrupt(table, e))
}

/// Converts a flag to its stored form.
pub fn flag(value: bool) -> i32 {
    i32::from(value)
}

/// Converts a sequence order to its stored form.
pub fn sequence_to_column(sequence_order: u32) -> Result<i32, PersistenceError> {
    sequence_order.to_i32().ok_or_else(|| {
        PersistenceError::SerializationError(format!(
            "sequence order {sequence_order} out of range"
        ))
    })
}

/// Converts a stored sequence order back.
pub fn sequence_from_column(value: i32) -> Result<u32, PersistenceError> {
    value
        .to_u32()
        .ok_or_else(|| {
            PersistenceError::corrupt("maintenance_intervals", "negative sequence order")
        })
}

/// Parses a stored enum value through its `FromStr` implementation.
pub fn parse_column<T>(table: &'static str, value: &str) -> Result<T, PersistenceError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.parse::<T>().map_err(|e| PersistenceError::corrupt(table, e))
}
