//! Report queries and their store-native form
//!
//! - `ReportQuery`: what the caller asks for
//! - `NativeQuery`: what the store executes, owned by one retrieval call
//! - `QueryTranslator`: the boundary between the two

mod errors;
mod native;
mod request;
mod translator;

pub use errors::{TranslateError, TranslateResult};
pub use native::{
    FilterDocument, NativeQuery, SortDirection, SortKey, SortSpec, UNBOUNDED_LIMIT,
};
pub use request::{is_valid_parameter_name, QueryParameter, ReportQuery};
pub use translator::{JsonQueryTranslator, QueryTranslator};
