use serde::{Deserialize, Serialize};

/// One supported object type, as advertised by `list_objects`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectDescriptor {
    pub object_api_name: String,
    pub label: String
}

impl ObjectDescriptor {
    /// The catalog labels objects with their API name.
    pub fn from_api_name(object_api_name: &str) -> Self {
        Self {
            object_api_name: object_api_name.to_string(),
            label: object_api_name.to_string()
        }
    }
}

/// One field of an object type, as advertised by `list_fields`.
///
/// The policy flags (`identifier`, `required`, `createable`, `updateable`)
/// are constants of the catalog entry, not computed from data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDescriptor {
    pub field_api_name: String,
    pub label: String,
    pub identifier: bool,
    pub required: bool,
    pub createable: bool,
    pub updateable: bool,
    #[serde(rename = "type")]
    pub field_type: String,
    pub array: bool
}

/// Throughput limits reported by `get_sync_speed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncSpeed {
    pub maximum_batch_size: u32,
    pub maximum_parallel_batches: u32,
    pub maximum_records_per_second: u32
}

impl Default for SyncSpeed {
    fn default() -> Self {
        Self {
            maximum_batch_size: 1,
            maximum_parallel_batches: 1,
            maximum_records_per_second: 1
        }
    }
}

/// Per-record outcome of a batch sync, in input order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordResult {
    pub identifier: String,
    pub success: bool
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_object_descriptor_labels_with_api_name() {
        let desc = ObjectDescriptor::from_api_name("campaign-event");
        assert_eq!(desc.object_api_name, "campaign-event");
        assert_eq!(desc.label, "campaign-event");
    }

    #[test]
    fn test_field_descriptor_type_rename() {
        let field = FieldDescriptor {
            field_api_name: "email".to_string(),
            label: "email".to_string(),
            identifier: false,
            required: true,
            createable: true,
            updateable: true,
            field_type: "string".to_string(),
            array: false
        };

        let json = serde_json::to_value(&field).unwrap();
        assert_eq!(json["type"], "string");
        assert!(json.get("field_type").is_none());
    }

    #[test]
    fn test_sync_speed_defaults_to_one() {
        let speed = SyncSpeed::default();
        assert_eq!(speed.maximum_batch_size, 1);
        assert_eq!(speed.maximum_parallel_batches, 1);
        assert_eq!(speed.maximum_records_per_second, 1);
    }
}
