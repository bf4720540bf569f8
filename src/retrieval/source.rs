//! Report data source
//!
//! `get_data` runs one retrieval end to end:
//! 1. Validate the request
//! 2. Translate the query text into a native query
//! 3. Inject the request's filters
//! 4. Augment the projection for channel reconciliation
//! 5. Execute and materialize
//! 6. Reconcile channel identifiers
//!
//! A data source holds no per-call state. Concurrent calls share only the
//! store, translator, registry, materializer and counters, all of which are
//! `Send + Sync`.

use std::sync::Arc;

use crate::compat::{CHANNEL_ID_FIELD, TRAFFIC_TYPE_FIELD};
use crate::config::RetrievalConfig;
use crate::filters::FilterRegistry;
use crate::observability::{
    log_event_with_fields, Event, Logger, MetricsRegistry, ObservationScope, Severity,
};
use crate::query::{JsonQueryTranslator, NativeQuery, QueryTranslator, ReportQuery};
use crate::store::DocumentStore;
use crate::table::{JsonTableMaterializer, ResultTable, TableMaterializer};

use super::augment::augment;
use super::errors::{RetrievalError, RetrievalResult};
use super::executor::QueryExecutor;
use super::reconcile::reconcile;

/// Retrieves report tables from a document store
pub struct ReportDataSource {
    store: Arc<dyn DocumentStore>,
    translator: Arc<dyn QueryTranslator>,
    filters: Arc<FilterRegistry>,
    materializer: Arc<dyn TableMaterializer>,
    config: RetrievalConfig,
    metrics: Arc<MetricsRegistry>,
}

impl ReportDataSource {
    /// Data source with the JSON translator, built-in filters and default config
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            translator: Arc::new(JsonQueryTranslator),
            filters: Arc::new(FilterRegistry::with_builtin()),
            materializer: Arc::new(JsonTableMaterializer),
            config: RetrievalConfig::default(),
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn QueryTranslator>) -> Self {
        self.translator = translator;
        self
    }

    pub fn with_filters(mut self, filters: Arc<FilterRegistry>) -> Self {
        self.filters = filters;
        self
    }

    pub fn with_materializer(mut self, materializer: Arc<dyn TableMaterializer>) -> Self {
        self.materializer = materializer;
        self
    }

    pub fn with_config(mut self, config: RetrievalConfig) -> Self {
        self.config = config;
        self
    }

    /// Shares a counter registry, e.g. across several data sources
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Runs a report query and returns its result table.
    ///
    /// On error no table is returned and any cursor opened for the call has
    /// been released.
    pub fn get_data(&self, request: &ReportQuery) -> RetrievalResult<ResultTable> {
        let scope = ObservationScope::new("RETRIEVAL");

        match self.retrieve(request) {
            Ok(table) => {
                self.metrics.increment_retrievals_executed();
                self.metrics.add_rows_returned(table.len() as u64);
                let rows = table.len().to_string();
                scope.complete_with_fields(&[("rows", rows.as_str()), ("table", table.name())]);
                Ok(table)
            }
            Err(err) => {
                self.metrics.increment_retrievals_failed();
                scope.fail(err.code(), &err.to_string());
                Err(err)
            }
        }
    }

    fn retrieve(&self, request: &ReportQuery) -> RetrievalResult<ResultTable> {
        request
            .validate()
            .map_err(|e| RetrievalError::invalid_request(e.to_string()))?;
        if request.filters.len() > self.config.max_filters {
            return Err(RetrievalError::invalid_request(format!(
                "{} filters exceed the maximum of {}",
                request.filters.len(),
                self.config.max_filters
            )));
        }

        let mut query = self
            .translator
            .parse(&request.query_text, &request.parameters)?;
        query
            .validate()
            .map_err(|e| RetrievalError::invalid_request(e.to_string()))?;
        self.log_translated(&query);

        // Filters resolve before anything reaches the store.
        let injected = self
            .filters
            .inject_all(&request.filters, &mut query.filter_document)?;
        let injected = injected.to_string();
        log_event_with_fields(
            Event::FiltersInjected,
            &[
                ("collection", query.collection_name.as_str()),
                ("count", injected.as_str()),
            ],
        );

        let did_request_channel_id = query.requests(CHANNEL_ID_FIELD);
        let did_request_traffic_type = query.requests(TRAFFIC_TYPE_FIELD);

        let augmented = augment(&query.collection_name, &query.fields);
        if augmented.did_augment {
            self.metrics.increment_fields_augmented();
            log_event_with_fields(
                Event::FieldsAugmented,
                &[
                    ("collection", query.collection_name.as_str()),
                    ("field", TRAFFIC_TYPE_FIELD),
                ],
            );
        }
        query.fields = augmented.fields;

        let mut table = {
            let mut cursor = QueryExecutor::execute(
                self.store.as_ref(),
                &query.collection_name,
                &query.filter_document,
                &query.fields,
                query.sort_spec.as_ref(),
                query.skip,
                query.limit,
            )?;
            let fields = query.fields.join(",");
            log_event_with_fields(
                Event::QueryExecuted,
                &[
                    ("collection", query.collection_name.as_str()),
                    ("fields", fields.as_str()),
                ],
            );

            let table_name = self.config.table_name(&query.collection_name);
            self.materializer
                .to_table(&table_name, &query.fields, cursor.as_mut())?
        };
        let rows = table.len().to_string();
        log_event_with_fields(
            Event::RowsMaterialized,
            &[("rows", rows.as_str()), ("table", table.name())],
        );

        let stats = reconcile(&mut table, did_request_channel_id, did_request_traffic_type);
        if did_request_channel_id {
            self.metrics.add_identifiers_inferred(stats.inferred as u64);
            self.metrics.add_identifiers_defaulted(stats.defaulted as u64);
            let inferred = stats.inferred.to_string();
            let defaulted = stats.defaulted.to_string();
            log_event_with_fields(
                Event::RowsReconciled,
                &[
                    ("defaulted", defaulted.as_str()),
                    ("inferred", inferred.as_str()),
                    ("table", table.name()),
                ],
            );
        }

        Ok(table)
    }

    fn log_translated(&self, query: &NativeQuery) {
        if !Logger::enabled(Severity::Trace) {
            return;
        }
        let skip = query.skip.to_string();
        let limit = query.limit.to_string();
        let filter = query.filter_document.to_value().to_string();
        let mut fields = vec![
            ("collection", query.collection_name.as_str()),
            ("limit", limit.as_str()),
            ("skip", skip.as_str()),
        ];
        if self.config.log_native_queries {
            fields.push(("filter", filter.as_str()));
        }
        log_event_with_fields(Event::QueryTranslated, &fields);
    }
}
