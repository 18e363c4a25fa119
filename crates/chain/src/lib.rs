//! DorkFi chain access layer for the Voi network.
//!
//! This crate provides:
//! - `UserHealth` event decoding with fixed-point descaling
//! - An events indexer REST client (round status + paginated event queries)
//! - The `EventSource` trait consumed by the risk pipeline
//!
//! Everything on-chain (interest accrual, collateral accounting, liquidation
//! execution) lives in the pool contract; this crate only reads its emitted
//! state.

mod events;
mod indexer;

pub use events::{
    decode_user_health, descale, DecodeError, UserHealthEvent, USER_HEALTH_ARITY, VALUE_SCALE,
};
pub use indexer::{EventSource, FetchError, IndexerClient, USER_HEALTH_EVENT};
