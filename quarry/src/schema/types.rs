use serde::{Deserialize, Serialize};

/// Item id pseudo-field, always queryable
pub const ITEM_ID_FIELD: &str = "search_api_id";
/// Datasource pseudo-field, always queryable
pub const DATASOURCE_FIELD: &str = "search_api_datasource";
/// Language pseudo-field, always queryable
pub const LANGUAGE_FIELD: &str = "search_api_language";

/// Fields every index carries regardless of its declared schema
pub const RESERVED_FIELDS: [&str; 3] = [ITEM_ID_FIELD, DATASOURCE_FIELD, LANGUAGE_FIELD];

/// Field definitions for one index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexSchema {
    pub index: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldSchema>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSchema {
    pub id: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Query-time weight for full-text fields (default: 1.0)
    #[serde(default = "default_boost")]
    pub boost: f32,
}

fn default_boost() -> f32 {
    1.0
}

/// Semantic field types.
///
/// Parsed from the type names used by index definitions; several names
/// collapse onto one variant (`string`/`uri`/`token`, `integer`/`duration`,
/// `object`/`nested`, `location`/`geo_point`). Unrecognised names become
/// [`FieldType::Unknown`] and are left to the engine to auto-detect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    Text,
    Token,
    Integer,
    Boolean,
    Decimal,
    Date,
    Nested,
    GeoPoint,
    Attachment,
    Unknown,
}

impl FieldType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Token => "string",
            FieldType::Integer => "integer",
            FieldType::Boolean => "boolean",
            FieldType::Decimal => "decimal",
            FieldType::Date => "date",
            FieldType::Nested => "object",
            FieldType::GeoPoint => "location",
            FieldType::Attachment => "attachment",
            FieldType::Unknown => "unknown",
        }
    }
}

impl From<&str> for FieldType {
    fn from(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "text" => FieldType::Text,
            "string" | "token" | "uri" => FieldType::Token,
            "integer" | "duration" => FieldType::Integer,
            "boolean" => FieldType::Boolean,
            "decimal" => FieldType::Decimal,
            "date" => FieldType::Date,
            "object" | "nested" => FieldType::Nested,
            "location" | "geo_point" => FieldType::GeoPoint,
            "attachment" => FieldType::Attachment,
            _ => FieldType::Unknown,
        }
    }
}

impl From<String> for FieldType {
    fn from(name: String) -> Self {
        FieldType::from(name.as_str())
    }
}

impl From<FieldType> for String {
    fn from(field_type: FieldType) -> Self {
        field_type.as_str().to_string()
    }
}

impl FieldSchema {
    pub fn new(id: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            field_type,
            boost: default_boost(),
        }
    }

    pub fn with_boost(mut self, boost: f32) -> Self {
        self.boost = boost;
        self
    }

    pub fn is_fulltext(&self) -> bool {
        self.field_type == FieldType::Text
    }
}

impl IndexSchema {
    pub fn new(index: impl Into<String>, fields: Vec<FieldSchema>) -> Self {
        Self {
            index: index.into(),
            description: None,
            fields,
        }
    }

    /// Look up a declared field
    pub fn field(&self, id: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.id == id)
    }

    pub fn is_reserved(id: &str) -> bool {
        RESERVED_FIELDS.contains(&id)
    }

    /// True for declared fields and the reserved pseudo-fields
    pub fn resolves(&self, id: &str) -> bool {
        Self::is_reserved(id) || self.field(id).is_some()
    }

    /// Full-text fields in declaration order
    pub fn fulltext_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.is_fulltext())
    }

    pub fn is_fulltext(&self, id: &str) -> bool {
        self.field(id).is_some_and(FieldSchema::is_fulltext)
    }
}
