//! Kind-keyed filter resolution and injection

use std::collections::HashMap;
use std::fmt;

use crate::observability::{log_event_with_fields, Event};
use crate::query::FilterDocument;

use super::builtin;
use super::errors::{FilterError, FilterResult};
use super::spec::FilterSpec;

/// A resolved filter that can add its predicate to a filter document
pub trait QueryFilter: Send + Sync {
    /// Adds this filter's predicate to `document`
    fn inject_into(&self, document: &mut FilterDocument);
}

/// Builds a filter from its spec, validating the spec's parameters
pub type FilterFactory = Box<dyn Fn(&FilterSpec) -> FilterResult<Box<dyn QueryFilter>> + Send + Sync>;

/// Registry mapping filter kinds to factories.
///
/// Shared read-only between retrievals once built.
#[derive(Default)]
pub struct FilterRegistry {
    factories: HashMap<String, FilterFactory>,
}

impl FilterRegistry {
    /// Creates an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in kinds registered
    pub fn with_builtin() -> Self {
        let mut registry = Self::new();
        builtin::register_all(&mut registry);
        registry
    }

    /// Registers a factory for `kind`, replacing any previous one
    pub fn register<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&FilterSpec) -> FilterResult<Box<dyn QueryFilter>> + Send + Sync + 'static,
    {
        self.factories.insert(kind.into(), Box::new(factory));
    }

    /// Registered kinds, sorted
    pub fn kinds(&self) -> Vec<&str> {
        let mut kinds: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        kinds.sort_unstable();
        kinds
    }

    /// Resolves one spec to its implementation
    pub fn resolve(&self, spec: &FilterSpec) -> FilterResult<Box<dyn QueryFilter>> {
        let factory = self
            .factories
            .get(&spec.kind)
            .ok_or_else(|| FilterError::UnsupportedFilterKind(spec.kind.clone()))?;
        factory(spec)
    }

    /// Resolves every spec, then injects them in order.
    ///
    /// Nothing is injected unless all specs resolve. Returns the number of
    /// filters injected.
    pub fn inject_all(
        &self,
        specs: &[FilterSpec],
        document: &mut FilterDocument,
    ) -> FilterResult<usize> {
        let resolved = specs
            .iter()
            .map(|spec| self.resolve(spec).map(|filter| (spec, filter)))
            .collect::<FilterResult<Vec<_>>>()?;

        // Overwrites are reported, not prevented.
        document.take_overwritten();
        for (spec, filter) in &resolved {
            filter.inject_into(document);
            for key in document.take_overwritten() {
                log_event_with_fields(
                    Event::FilterKeyOverwritten,
                    &[("filter", spec.name.as_str()), ("key", key.as_str())],
                );
            }
        }

        Ok(resolved.len())
    }
}

impl fmt::Debug for FilterRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterRegistry")
            .field("kinds", &self.kinds())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::capture_lines;
    use serde_json::{json, Value};

    struct SetKey(&'static str, Value);

    impl QueryFilter for SetKey {
        fn inject_into(&self, document: &mut FilterDocument) {
            document.insert(self.0, self.1.clone());
        }
    }

    fn registry() -> FilterRegistry {
        let mut registry = FilterRegistry::new();
        registry.register("set_a", |_spec: &FilterSpec| {
            Ok(Box::new(SetKey("a", json!(1))) as Box<dyn QueryFilter>)
        });
        registry.register("set_a_again", |_spec: &FilterSpec| {
            Ok(Box::new(SetKey("a", json!(2))) as Box<dyn QueryFilter>)
        });
        registry.register("set_b", |spec: &FilterSpec| {
            let value = spec
                .param("value")
                .cloned()
                .ok_or_else(|| FilterError::invalid(spec, "value is required"))?;
            Ok(Box::new(SetKey("b", value)) as Box<dyn QueryFilter>)
        });
        registry
    }

    #[test]
    fn test_unknown_kind() {
        let err = registry()
            .resolve(&FilterSpec::new("f", "nope", Value::Null))
            .err()
            .unwrap();
        assert_eq!(err, FilterError::UnsupportedFilterKind("nope".to_string()));
    }

    #[test]
    fn test_inject_in_order() {
        let specs = vec![
            FilterSpec::new("first", "set_a", Value::Null),
            FilterSpec::new("second", "set_b", json!({"value": "x"})),
        ];
        let mut doc = FilterDocument::new();
        assert_eq!(registry().inject_all(&specs, &mut doc).unwrap(), 2);
        assert_eq!(doc.get("a"), Some(&json!(1)));
        assert_eq!(doc.get("b"), Some(&json!("x")));
    }

    #[test]
    fn test_nothing_injected_when_any_spec_fails() {
        let specs = vec![
            FilterSpec::new("first", "set_a", Value::Null),
            FilterSpec::new("second", "missing", Value::Null),
        ];
        let mut doc = FilterDocument::new();
        assert!(registry().inject_all(&specs, &mut doc).is_err());
        assert!(doc.is_empty());
    }

    #[test]
    fn test_invalid_parameters() {
        let specs = vec![FilterSpec::new("b", "set_b", json!({}))];
        let mut doc = FilterDocument::new();
        let err = registry().inject_all(&specs, &mut doc).unwrap_err();
        assert!(matches!(err, FilterError::InvalidParameters { .. }));
        assert_eq!(err.kind(), "set_b");
    }

    #[test]
    fn test_later_filter_overwrites_key() {
        let specs = vec![
            FilterSpec::new("first", "set_a", Value::Null),
            FilterSpec::new("second", "set_a_again", Value::Null),
        ];
        let mut doc = FilterDocument::new();
        let lines = capture_lines(|| {
            registry().inject_all(&specs, &mut doc).unwrap();
        });
        assert_eq!(doc.get("a"), Some(&json!(2)));
        assert!(doc.take_overwritten().is_empty());

        assert_eq!(lines.len(), 1);
        let logged: Value = serde_json::from_str(&lines[0]).unwrap();
        assert_eq!(logged["event"], "FILTER_KEY_OVERWRITTEN");
        assert_eq!(logged["severity"], "WARN");
        assert_eq!(logged["filter"], "second");
        assert_eq!(logged["key"], "a");
    }

    #[test]
    fn test_builtin_kinds() {
        let registry = FilterRegistry::with_builtin();
        assert_eq!(registry.kinds(), vec!["channel", "date_range", "equals"]);
    }
}
