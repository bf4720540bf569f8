//! Channel Reconciliation Tests
//!
//! Legacy `TrafficType` codes fill in missing `ChannelId` values:
//! - Empty identifiers are inferred from the code, or set to the nil identifier
//! - Non-empty identifiers are never overwritten
//! - The augmented `TrafficType` column never reaches the caller
//! - Reconciling twice changes nothing

use std::sync::Arc;

use reportsource::compat::{channels, map_legacy_code_to_identifier, LegacyTrafficType};
use reportsource::query::ReportQuery;
use reportsource::retrieval::{reconcile, ReportDataSource};
use reportsource::store::extended::uuid_value;
use reportsource::store::MemoryStore;
use reportsource::table::{CellValue, ResultTable};
use serde_json::{json, Value};
use uuid::Uuid;

// =============================================================================
// Test Utilities
// =============================================================================

fn y_channel() -> Uuid {
    Uuid::parse_str("5d0b8f0e-1c2a-4e57-8a36-0f4b9e2d6c10").unwrap()
}

fn source_with(documents: Vec<Value>) -> ReportDataSource {
    let store = MemoryStore::new();
    store.insert_many("Interactions", documents).unwrap();
    ReportDataSource::new(Arc::new(store))
}

fn channel_request() -> ReportQuery {
    ReportQuery::new(
        json!({
            "collection": "Interactions",
            "fields": ["ChannelId"],
            "sort": [{"field": "_id"}]
        })
        .to_string(),
    )
}

// =============================================================================
// Scenarios
// =============================================================================

/// Row A has no channel and code 3; row B already has channel Y.
#[test]
fn test_inferred_and_existing_channels() {
    let source = source_with(vec![
        json!({"_id": "A", "ChannelId": null, "TrafficType": 3}),
        json!({"_id": "B", "ChannelId": uuid_value(y_channel()), "TrafficType": 1}),
    ]);

    let table = source.get_data(&channel_request()).unwrap();

    assert_eq!(table.columns(), &["ChannelId".to_string()]);
    assert_eq!(table.len(), 2);
    assert_eq!(
        table.get(0, "ChannelId"),
        Some(&CellValue::Identifier(channels::PAID_SEARCH))
    );
    assert_eq!(table.get(1, "ChannelId"), Some(&CellValue::Identifier(y_channel())));
}

/// Code 9 has no mapping: the identifier becomes nil, not null and not 9.
#[test]
fn test_unmapped_code_becomes_nil_identifier() {
    let source = source_with(vec![json!({"_id": "A", "ChannelId": null, "TrafficType": 9})]);

    let table = source.get_data(&channel_request()).unwrap();

    assert_eq!(table.get(0, "ChannelId"), Some(&CellValue::Identifier(Uuid::nil())));
    assert_eq!(source.metrics().snapshot().identifiers_defaulted, 1);
}

/// Missing, null, nil and blank identifiers are all treated as empty.
#[test]
fn test_empty_identifier_forms() {
    let source = source_with(vec![
        json!({"_id": 1, "TrafficType": 1}),
        json!({"_id": 2, "ChannelId": null, "TrafficType": 2}),
        json!({"_id": 3, "ChannelId": uuid_value(Uuid::nil()), "TrafficType": 4}),
        json!({"_id": 4, "ChannelId": "", "TrafficType": 5}),
    ]);

    let table = source.get_data(&channel_request()).unwrap();

    let expected = [
        channels::DIRECT,
        channels::ORGANIC_SEARCH,
        channels::REFERRAL,
        channels::EMAIL,
    ];
    for (row, id) in expected.iter().enumerate() {
        assert_eq!(table.get(row, "ChannelId"), Some(&CellValue::Identifier(*id)));
    }
    assert_eq!(source.metrics().snapshot().identifiers_inferred, 4);
}

/// Stored codes may be floats or numeric strings; anything else is a miss.
#[test]
fn test_traffic_type_conversion() {
    let source = source_with(vec![
        json!({"_id": 1, "ChannelId": null, "TrafficType": 6.0}),
        json!({"_id": 2, "ChannelId": null, "TrafficType": "7"}),
        json!({"_id": 3, "ChannelId": null, "TrafficType": "paid"}),
        json!({"_id": 4, "ChannelId": null, "TrafficType": 3.5}),
        json!({"_id": 5, "ChannelId": null, "TrafficType": true}),
    ]);

    let table = source.get_data(&channel_request()).unwrap();

    assert_eq!(table.get(0, "ChannelId"), Some(&CellValue::Identifier(channels::SOCIAL)));
    assert_eq!(table.get(1, "ChannelId"), Some(&CellValue::Identifier(channels::DISPLAY)));
    for row in 2..5 {
        assert_eq!(table.get(row, "ChannelId"), Some(&CellValue::Identifier(Uuid::nil())));
    }
}

/// A non-identifier ChannelId value is not empty and is left as stored.
#[test]
fn test_non_empty_text_identifier_untouched() {
    let source = source_with(vec![json!({"_id": 1, "ChannelId": "Y", "TrafficType": 3})]);
    let table = source.get_data(&channel_request()).unwrap();
    assert_eq!(table.get(0, "ChannelId"), Some(&CellValue::Text("Y".to_string())));
}

/// Requests without ChannelId are returned exactly as read.
#[test]
fn test_no_reconciliation_without_channel() {
    let source = source_with(vec![json!({"_id": 1, "ChannelId": null, "TrafficType": 3})]);
    let request = ReportQuery::new(
        json!({"collection": "Interactions", "fields": ["_id", "TrafficType"]}).to_string(),
    );

    let table = source.get_data(&request).unwrap();

    assert_eq!(table.to_json_rows(), vec![json!({"_id": 1, "TrafficType": 3})]);
    let snapshot = source.metrics().snapshot();
    assert_eq!(snapshot.identifiers_inferred, 0);
    assert_eq!(snapshot.identifiers_defaulted, 0);
}

// =============================================================================
// Properties
// =============================================================================

/// Reconciling a reconciled table yields the same table.
#[test]
fn test_reconcile_idempotent() {
    let source = source_with(vec![
        json!({"_id": 1, "ChannelId": null, "TrafficType": 3}),
        json!({"_id": 2, "ChannelId": null, "TrafficType": 9}),
        json!({"_id": 3, "ChannelId": uuid_value(y_channel()), "TrafficType": 2}),
        json!({"_id": 4, "ChannelId": null}),
    ]);
    let request = ReportQuery::new(
        json!({
            "collection": "Interactions",
            "fields": ["ChannelId", "TrafficType"],
            "sort": [{"field": "_id"}]
        })
        .to_string(),
    );

    let mut table = source.get_data(&request).unwrap();
    let once: ResultTable = table.clone();
    let stats = reconcile(&mut table, true, true);

    assert_eq!(table, once);
    assert_eq!(stats.inferred + stats.defaulted, 0);
}

/// Every known code maps deterministically; codes outside the enumeration
/// never map.
#[test]
fn test_mapping_totality() {
    for traffic_type in LegacyTrafficType::ALL {
        let code = traffic_type.code();
        let first = map_legacy_code_to_identifier(code);
        assert_eq!(first, map_legacy_code_to_identifier(code));
        assert_eq!(first, traffic_type.channel_id());
    }
    for code in [-1, 9, 10, 100, i64::MAX, i64::MIN] {
        assert_eq!(map_legacy_code_to_identifier(code), None);
    }
}
