//! Channel identifier reconciliation
//!
//! Rows with an empty `ChannelId` get one inferred from `TrafficType`; rows
//! that cannot be inferred get the nil identifier, never null. Non-empty
//! identifiers are never touched. All changes are computed first and then
//! committed together, after which an unrequested `TrafficType` column is
//! dropped.
//!
//! Reconciling an already reconciled table changes nothing.

use uuid::Uuid;

use crate::compat::{map_legacy_code_to_identifier, CHANNEL_ID_FIELD, TRAFFIC_TYPE_FIELD};
use crate::observability::{log_event_with_fields, Event};
use crate::table::{CellValue, ResultTable};

/// What reconciliation did to a table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileStats {
    /// Rows whose channel was inferred from a traffic type
    pub inferred: usize,
    /// Rows whose channel was set to the nil identifier
    pub defaulted: usize,
    /// Traffic type values that were not readable as a code
    pub unconvertible: usize,
    /// Whether the `TrafficType` column was removed
    pub dropped_traffic_type: bool,
}

/// Resolved channel for a row whose identifier is empty
fn resolve_channel(traffic_type: Option<&CellValue>, unconvertible: &mut usize) -> Option<Uuid> {
    let traffic_type = traffic_type.filter(|v| !v.is_null())?;
    match traffic_type.as_integer_code() {
        Some(code) => map_legacy_code_to_identifier(code),
        None => {
            *unconvertible += 1;
            None
        }
    }
}

/// Fills empty channel identifiers and strips augmentation plumbing.
///
/// Does nothing unless the caller requested `ChannelId`.
pub fn reconcile(
    table: &mut ResultTable,
    did_request_channel_id: bool,
    did_request_traffic_type: bool,
) -> ReconcileStats {
    let mut stats = ReconcileStats::default();
    if !did_request_channel_id {
        return stats;
    }
    if let Some(channel_col) = table.column_index(CHANNEL_ID_FIELD) {
        fill_channels(table, channel_col, &mut stats);
    }

    if !did_request_traffic_type {
        stats.dropped_traffic_type = table.drop_column(TRAFFIC_TYPE_FIELD);
    }

    stats
}

fn fill_channels(table: &mut ResultTable, channel_col: usize, stats: &mut ReconcileStats) {
    let traffic_col = table.column_index(TRAFFIC_TYPE_FIELD);

    let mut updates: Vec<(usize, CellValue)> = Vec::new();
    for (index, row) in table.rows().iter().enumerate() {
        let values = row.values();
        if !values[channel_col].is_empty_identifier() {
            continue;
        }

        let traffic_type = traffic_col.map(|col| &values[col]);
        let resolved = match resolve_channel(traffic_type, &mut stats.unconvertible) {
            Some(id) => {
                stats.inferred += 1;
                CellValue::Identifier(id)
            }
            None => CellValue::Identifier(Uuid::nil()),
        };

        if resolved != values[channel_col] {
            if resolved == CellValue::Identifier(Uuid::nil()) {
                stats.defaulted += 1;
            }
            updates.push((index, resolved));
        }
    }

    for (index, value) in updates {
        table.set(index, channel_col, value);
    }

    if stats.unconvertible > 0 {
        let count = stats.unconvertible.to_string();
        log_event_with_fields(
            Event::TrafficTypeUnconvertible,
            &[("rows", count.as_str()), ("table", table.name())],
        );
    }
}
