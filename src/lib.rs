//! reportsource - report data retrieval over document stores
//!
//! Translates report queries into store-native queries, injects report
//! filters, runs them against a document store and reconciles the legacy
//! `TrafficType` classifier into `ChannelId` identifiers.

pub mod cli;
pub mod compat;
pub mod config;
pub mod filters;
pub mod observability;
pub mod query;
pub mod retrieval;
pub mod store;
pub mod table;
