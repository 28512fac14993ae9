use crate::types::{FieldDescriptor, ObjectDescriptor, SyncSpeed};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A field as configured in the catalog. Expanded to a full
/// [`FieldDescriptor`] when advertised to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: String
}

impl FieldSpec {
    pub fn new(name: &str, field_type: &str) -> Self {
        Self {
            name: name.to_string(),
            field_type: field_type.to_string()
        }
    }
}

/// The read-only object catalog the connector serves.
///
/// Injected through application state, never read from process-wide
/// globals. The mappings stay open (keyed by object name): additional
/// object types are a configuration change, not a code change.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    pub objects: Vec<String>,
    pub operations: HashMap<String, Vec<String>>,
    pub fields: HashMap<String, Vec<FieldSpec>>,
    #[serde(default)]
    pub sync_speed: SyncSpeed
}

impl Catalog {
    /// The compiled-in deployment catalog: a single `campaign-event`
    /// object with one string `email` field and `append` as its only
    /// operation.
    pub fn campaign_event() -> Self {
        let object = "campaign-event".to_string();

        let mut operations = HashMap::new();
        operations.insert(object.clone(), vec!["append".to_string()]);

        let mut fields = HashMap::new();
        fields.insert(object.clone(), vec![FieldSpec::new("email", "string")]);

        Self {
            objects: vec![object],
            operations,
            fields,
            sync_speed: SyncSpeed::default()
        }
    }

    pub fn object_descriptors(&self) -> Vec<ObjectDescriptor> {
        self.objects
            .iter()
            .map(|name| ObjectDescriptor::from_api_name(name))
            .collect()
    }

    pub fn operations_for(&self, object_api_name: &str) -> Option<&[String]> {
        self.operations.get(object_api_name).map(Vec::as_slice)
    }

    /// Expands the configured field specs for `object_api_name` into the
    /// descriptors advertised by `list_fields`. The policy flags match the
    /// deployment's object implementation: fields are required, writable
    /// both ways, scalar, and none doubles as the identifier.
    pub fn fields_for(&self, object_api_name: &str) -> Option<Vec<FieldDescriptor>> {
        let specs = self.fields.get(object_api_name)?;
        let descriptors = specs
            .iter()
            .map(|spec| FieldDescriptor {
                field_api_name: spec.name.clone(),
                label: spec.name.clone(),
                identifier: false,
                required: true,
                createable: true,
                updateable: true,
                field_type: spec.field_type.clone(),
                array: false
            })
            .collect();
        Some(descriptors)
    }
}
