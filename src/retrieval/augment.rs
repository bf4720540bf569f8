//! Projection augmentation for channel reconciliation
//!
//! Interactions requested with `ChannelId` but without `TrafficType` need the
//! classifier read as well, so a missing channel can be inferred. The extra
//! field is appended last and removed again after reconciliation.

use crate::compat::{CHANNEL_ID_FIELD, INTERACTIONS_COLLECTION, TRAFFIC_TYPE_FIELD};

/// Field list to project, and whether it differs from the request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AugmentedFields {
    pub fields: Vec<String>,
    pub did_augment: bool,
}

/// Adds `TrafficType` to an Interactions projection that has `ChannelId`
/// but not `TrafficType`; returns the request unchanged otherwise.
pub fn augment(collection_name: &str, fields: &[String]) -> AugmentedFields {
    let has = |name: &str| fields.iter().any(|f| f == name);
    let needs_classifier = collection_name == INTERACTIONS_COLLECTION
        && has(CHANNEL_ID_FIELD)
        && !has(TRAFFIC_TYPE_FIELD);

    let mut out = fields.to_vec();
    if needs_classifier {
        out.push(TRAFFIC_TYPE_FIELD.to_string());
    }
    AugmentedFields {
        fields: out,
        did_augment: needs_classifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_appends_traffic_type_last() {
        let requested = fields(&["Started", "ChannelId", "Queue"]);
        let result = augment("Interactions", &requested);
        assert!(result.did_augment);
        assert_eq!(result.fields.len(), requested.len() + 1);
        assert_eq!(&result.fields[..3], requested.as_slice());
        assert_eq!(result.fields.last().map(String::as_str), Some("TrafficType"));
    }

    #[test]
    fn test_no_augment_when_both_requested() {
        let requested = fields(&["TrafficType", "ChannelId"]);
        let result = augment("Interactions", &requested);
        assert!(!result.did_augment);
        assert_eq!(result.fields, requested);
    }

    #[test]
    fn test_no_augment_without_channel() {
        let requested = fields(&["Started"]);
        assert!(!augment("Interactions", &requested).did_augment);
    }

    #[test]
    fn test_no_augment_other_collections() {
        for collection in ["Calls", "interactions", "Interactions2", ""] {
            let requested = fields(&["ChannelId"]);
            let result = augment(collection, &requested);
            assert!(!result.did_augment);
            assert_eq!(result.fields, requested);
        }
    }
}
