use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::reference::validate_object_id;
use crate::slug::slugify;
use crate::timestamps::{from_bson, to_bson};

/// Sub-category entity; always filed under one category
#[derive(Debug, Clone, PartialEq)]
pub struct SubCategory {
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    /// Absent only when a projection left it out
    pub category: Option<ObjectId>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubCategoryDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

/// DTO for creating a sub-category.
///
/// `category` may be omitted when the route names the category.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateSubCategory {
    #[validate(length(min = 3, max = 32))]
    #[schema(example = "Running Shoes")]
    pub name: String,
    #[validate(custom(function = "validate_object_id"))]
    #[schema(example = "65f1c0ffee0000000000abcd")]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateSubCategory {
    #[validate(length(min = 3, max = 32))]
    pub name: Option<String>,
    #[validate(custom(function = "validate_object_id"))]
    pub category: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SubCategoryPatch {
    pub name: Option<String>,
    pub category: Option<ObjectId>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct SubCategoryResponse {
    #[schema(example = "65f1c0ffee0000000000beef")]
    pub id: String,
    pub name: String,
    pub slug: String,
    /// Parent category id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

impl SubCategory {
    pub fn new(name: String, category: ObjectId) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            slug: slugify(&name),
            name,
            category: Some(category),
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

impl SubCategoryPatch {
    pub fn to_set(&self, now: DateTime<Utc>) -> Document {
        let mut set = doc! { "updatedAt": to_bson(now) };
        if let Some(name) = &self.name {
            set.insert("name", name);
            set.insert("slug", slugify(name));
        }
        if let Some(category) = self.category {
            set.insert("category", category);
        }
        set
    }
}

impl From<SubCategoryDocument> for SubCategory {
    fn from(document: SubCategoryDocument) -> Self {
        Self {
            id: document.id,
            name: document.name,
            slug: document.slug,
            category: document.category,
            created_at: document.created_at.and_then(from_bson),
            updated_at: document.updated_at.and_then(from_bson),
        }
    }
}

impl From<&SubCategory> for SubCategoryDocument {
    fn from(sub_category: &SubCategory) -> Self {
        Self {
            id: sub_category.id,
            name: sub_category.name.clone(),
            slug: sub_category.slug.clone(),
            category: sub_category.category,
            created_at: sub_category.created_at.map(to_bson),
            updated_at: sub_category.updated_at.map(to_bson),
        }
    }
}

impl From<SubCategory> for SubCategoryResponse {
    fn from(sub_category: SubCategory) -> Self {
        Self {
            id: sub_category.id.to_hex(),
            name: sub_category.name,
            slug: sub_category.slug,
            category: sub_category.category.map(|id| id.to_hex()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_round_trip() {
        let sub_category = SubCategory::new("Trail Running".to_string(), ObjectId::new());
        let document = SubCategoryDocument::from(&sub_category);

        let stored = bson::to_document(&document).unwrap();
        assert!(stored.get_object_id("category").is_ok());
        assert!(stored.get_datetime("createdAt").is_ok());

        let back = SubCategory::from(bson::from_document::<SubCategoryDocument>(stored).unwrap());
        assert_eq!(SubCategoryDocument::from(&back), document);
        assert_eq!(back.slug, "trail-running");
    }

    #[test]
    fn test_patch_moves_category() {
        let target = ObjectId::new();
        let set = SubCategoryPatch {
            name: None,
            category: Some(target),
        }
        .to_set(Utc::now());

        assert_eq!(set.get_object_id("category").unwrap(), target);
        assert!(!set.contains_key("slug"));
    }

    #[test]
    fn test_create_validation() {
        let bad_ref = CreateSubCategory {
            name: "Sneakers".to_string(),
            category: Some("nope".to_string()),
        };
        assert!(bad_ref.validate().is_err());

        let nested = CreateSubCategory {
            name: "Sneakers".to_string(),
            category: None,
        };
        assert!(nested.validate().is_ok());
    }

    #[test]
    fn test_response_hex_ids() {
        let category = ObjectId::new();
        let response = SubCategoryResponse::from(SubCategory::new("Boots".to_string(), category));
        assert_eq!(response.category, Some(category.to_hex()));
    }
}
