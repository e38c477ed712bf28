use mongodb::bson::oid::ObjectId;
use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{CatalogError, CatalogResult};

/// A product's pointer into another collection.
///
/// Stored and accepted thin (id only); expanded with `name` and `slug` when
/// a product is read back for a caller. The expanded form is never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityRef {
    pub id: ObjectId,
    pub name: Option<String>,
    pub slug: Option<String>,
}

impl EntityRef {
    pub fn thin(id: ObjectId) -> Self {
        Self {
            id,
            name: None,
            slug: None,
        }
    }

    pub fn enriched(id: ObjectId, name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            id,
            name: Some(name.into()),
            slug: Some(slug.into()),
        }
    }

    pub fn is_enriched(&self) -> bool {
        self.name.is_some() && self.slug.is_some()
    }
}

/// Embedded reference as returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct EntityRefResponse {
    /// Referenced document id
    #[schema(example = "65f1c0ffee0000000000abcd")]
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

impl From<EntityRef> for EntityRefResponse {
    fn from(reference: EntityRef) -> Self {
        Self {
            id: reference.id.to_hex(),
            name: reference.name,
            slug: reference.slug,
        }
    }
}

/// Parse a 24-character hex id taken from a request body
pub fn parse_object_id(raw: &str) -> CatalogResult<ObjectId> {
    ObjectId::parse_str(raw).map_err(|_| CatalogError::InvalidId(raw.to_string()))
}

/// Validator hook for body fields that must hold an ObjectId
pub fn validate_object_id(raw: &str) -> Result<(), validator::ValidationError> {
    ObjectId::parse_str(raw).map(|_| ()).map_err(|_| {
        validator::ValidationError::new("object_id")
            .with_message(std::borrow::Cow::Borrowed("Invalid MongoDB ID"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thin_and_enriched() {
        let id = ObjectId::new();
        assert!(!EntityRef::thin(id).is_enriched());

        let enriched = EntityRef::enriched(id, "Shoes", "shoes");
        assert!(enriched.is_enriched());
        assert_eq!(enriched.id, id);
    }

    #[test]
    fn test_response_skips_missing_fields() {
        let id = ObjectId::new();
        let json = serde_json::to_value(EntityRefResponse::from(EntityRef::thin(id))).unwrap();
        assert_eq!(json, serde_json::json!({ "id": id.to_hex() }));
    }

    #[test]
    fn test_parse_object_id() {
        let id = ObjectId::new();
        assert_eq!(parse_object_id(&id.to_hex()).unwrap(), id);
        assert!(matches!(
            parse_object_id("not-an-id"),
            Err(CatalogError::InvalidId(raw)) if raw == "not-an-id"
        ));
        assert!(validate_object_id("123").is_err());
    }
}
