//! Report filters
//!
//! A filter spec names a kind; the `FilterRegistry` resolves the kind to a
//! `QueryFilter` which adds its predicate to the native filter document.
//! New kinds are added by registering a factory, not by editing a match.

mod builtin;
mod errors;
mod registry;
mod spec;

pub use builtin::{
    ChannelFilter, DateRangeFilter, EqualsFilter, CHANNEL_KIND, DATE_RANGE_KIND, EQUALS_KIND,
};
pub use errors::{FilterError, FilterResult};
pub use registry::{FilterFactory, FilterRegistry, QueryFilter};
pub use spec::FilterSpec;
