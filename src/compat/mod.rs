//! Field compatibility between the legacy traffic classifier and channel identifiers
//!
//! Older interaction documents carry only a coarse `TrafficType` code. Newer
//! documents carry a `ChannelId`. This module holds the pure mapping between
//! the two so it can be tested without a store.
//!
//! # Invariants
//!
//! - The mapping is total: every `i64` either maps or yields `None`
//! - The mapping never changes at runtime

mod channel;

pub use channel::{channels, map_legacy_code_to_identifier, LegacyTrafficType};

/// Collection whose rows take part in channel reconciliation
pub const INTERACTIONS_COLLECTION: &str = "Interactions";

/// Identifier field superseding the legacy classifier
pub const CHANNEL_ID_FIELD: &str = "ChannelId";

/// Legacy classifier field
pub const TRAFFIC_TYPE_FIELD: &str = "TrafficType";
