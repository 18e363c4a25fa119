//! `UserHealth` event decoding for the DorkFi lending pool.
//!
//! The pool contract emits one `UserHealth` log per position change. The
//! events indexer returns each log as a positional JSON tuple:
//!
//! ```text
//! [txid, round, timestamp, user_id, health_factor_raw, collateral_raw, borrow_raw]
//! ```
//!
//! Collateral and borrow values are fixed-point integers scaled by 10^12
//! (two compounded 10^6 scalings applied by the contract). Decoding descales
//! them into USD-denominated `f64` values.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Fixed-point scale on `total_collateral_value` / `total_borrow_value`.
pub const VALUE_SCALE: f64 = 1e12;

/// Number of fields in a `UserHealth` event tuple.
pub const USER_HEALTH_ARITY: usize = 7;

// Tuple positions. Index 0 is the emitting txid and index 4 the contract's
// own health factor; neither participates in risk computation.
const IDX_ROUND: usize = 1;
const IDX_TIMESTAMP: usize = 2;
const IDX_USER_ID: usize = 3;
const IDX_COLLATERAL: usize = 5;
const IDX_BORROW: usize = 6;

/// Error decoding a raw event tuple.
///
/// Decoding fails on the first malformed field rather than letting a `NaN`
/// propagate into health math.
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("event tuple has {actual} fields, expected {USER_HEALTH_ARITY}")]
    WrongArity { actual: usize },

    #[error("field {index} ({name}): expected unsigned integer, got `{got}`")]
    NotUnsigned {
        index: usize,
        name: &'static str,
        got: String,
    },

    #[error("field {index}: expected address string, got `{got}`")]
    NotAddress { index: usize, got: String },
}

/// One observation of a user's position, decoded from a `UserHealth` log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserHealthEvent {
    /// Block round the event was confirmed in (audit/ordering only)
    pub round: u64,
    /// Event timestamp, seconds since epoch
    pub timestamp: u64,
    /// On-chain account address of the position owner
    pub user_id: String,
    /// Total collateral value in USD, descaled from fixed point
    pub total_collateral_value: f64,
    /// Total borrow value in USD, descaled from fixed point
    pub total_borrow_value: f64,
}

/// Decode one raw `UserHealth` tuple.
pub fn decode_user_health(raw: &[Value]) -> Result<UserHealthEvent, DecodeError> {
    if raw.len() != USER_HEALTH_ARITY {
        return Err(DecodeError::WrongArity { actual: raw.len() });
    }

    let round = uint_field(raw, IDX_ROUND, "round")?;
    let timestamp = uint_field(raw, IDX_TIMESTAMP, "timestamp")?;
    let user_id = match &raw[IDX_USER_ID] {
        Value::String(s) if !s.is_empty() => s.clone(),
        other => {
            return Err(DecodeError::NotAddress {
                index: IDX_USER_ID,
                got: other.to_string(),
            })
        }
    };
    let collateral_raw = wide_uint_field(raw, IDX_COLLATERAL, "total_collateral_value")?;
    let borrow_raw = wide_uint_field(raw, IDX_BORROW, "total_borrow_value")?;

    Ok(UserHealthEvent {
        round,
        timestamp,
        user_id,
        total_collateral_value: descale(collateral_raw),
        total_borrow_value: descale(borrow_raw),
    })
}

/// Descale a raw fixed-point value into USD.
#[inline]
pub fn descale(raw: u128) -> f64 {
    raw as f64 / VALUE_SCALE
}

/// Read a u64 field (round, timestamp). The indexer emits these as plain
/// JSON numbers.
fn uint_field(raw: &[Value], index: usize, name: &'static str) -> Result<u64, DecodeError> {
    raw[index].as_u64().ok_or_else(|| DecodeError::NotUnsigned {
        index,
        name,
        got: raw[index].to_string(),
    })
}

/// Read a wide uint field (collateral/borrow at 10^12 scale).
///
/// Values past 2^53 lose precision as JSON numbers, so the indexer emits
/// them as decimal strings; both encodings are accepted.
fn wide_uint_field(raw: &[Value], index: usize, name: &'static str) -> Result<u128, DecodeError> {
    let err = || DecodeError::NotUnsigned {
        index,
        name,
        got: raw[index].to_string(),
    };

    match &raw[index] {
        Value::Number(n) => n.as_u64().map(u128::from).ok_or_else(err),
        Value::String(s) => s.parse::<u128>().map_err(|_| err()),
        _ => Err(err()),
    }
}
