//! Index mapping compiler
//!
//! Turns an [`IndexSchema`] into the engine's `properties` mapping body.

use crate::hooks::Hooks;
use crate::schema::{FieldSchema, FieldType, IndexSchema, RESERVED_FIELDS};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Date formats accepted for date fields
pub const DATE_FORMAT: &str = "strict_date_optional_time||epoch_second";

/// Longest text value indexed into the `keyword` sub-field
pub const KEYWORD_IGNORE_ABOVE: u32 = 256;

/// Mapping request for one index
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MappingRequest {
    pub index: String,
    pub body: MappingBody,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MappingBody {
    pub properties: BTreeMap<String, FieldMapping>,
}

/// Mapping of a single field
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct FieldMapping {
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub field_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boost: Option<f32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ignore_above: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fields: Option<BTreeMap<String, FieldMapping>>,
}

impl FieldMapping {
    pub fn of_type(field_type: impl Into<String>) -> Self {
        Self {
            field_type: Some(field_type.into()),
            ..Default::default()
        }
    }
}

pub struct FieldMapper;

impl FieldMapper {
    /// Build the mapping body for an index
    pub fn map_field_params(index: &str, schema: &IndexSchema, hooks: &Hooks) -> MappingRequest {
        let mut properties = BTreeMap::new();
        properties.insert(
            "id".to_string(),
            FieldMapping {
                index: Some(true),
                ..FieldMapping::of_type("keyword")
            },
        );

        for field in &schema.fields {
            properties.insert(field.id.clone(), Self::map_field_property(field, hooks));
        }

        // Reserved fields never override a declared field of the same name
        for id in RESERVED_FIELDS {
            if !properties.contains_key(id) {
                let field = FieldSchema::new(id, FieldType::Token);
                properties.insert(id.to_string(), Self::map_field_property(&field, hooks));
            }
        }

        tracing::debug!(
            index = %index,
            properties = properties.len(),
            "Compiled field mapping"
        );

        MappingRequest {
            index: index.to_string(),
            body: MappingBody { properties },
        }
    }

    /// Map one field, then run the field-mapping hook on the result
    pub fn map_field_property(field: &FieldSchema, hooks: &Hooks) -> FieldMapping {
        let mapping = match field.field_type {
            FieldType::Text => {
                let mut keyword = BTreeMap::new();
                keyword.insert(
                    "keyword".to_string(),
                    FieldMapping {
                        ignore_above: Some(KEYWORD_IGNORE_ABOVE),
                        ..FieldMapping::of_type("keyword")
                    },
                );
                FieldMapping {
                    boost: Some(field.boost),
                    fields: Some(keyword),
                    ..FieldMapping::of_type("text")
                }
            }
            FieldType::Token => FieldMapping::of_type("keyword"),
            FieldType::Integer => FieldMapping::of_type("integer"),
            FieldType::Boolean => FieldMapping::of_type("boolean"),
            FieldType::Decimal => FieldMapping::of_type("float"),
            FieldType::Date => FieldMapping {
                format: Some(DATE_FORMAT.to_string()),
                ..FieldMapping::of_type("date")
            },
            FieldType::Nested => FieldMapping::of_type("nested"),
            FieldType::GeoPoint => FieldMapping::of_type("geo_point"),
            FieldType::Attachment => FieldMapping::of_type("attachment"),
            FieldType::Unknown => {
                tracing::debug!(field = %field.id, "Leaving field type to the engine");
                FieldMapping::default()
            }
        };

        hooks.apply_field_mapping(field, mapping)
    }
}
