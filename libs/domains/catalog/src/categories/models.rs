use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::slug::slugify;
use crate::storage::{CATEGORY_IMAGES, ImageStorage};
use crate::timestamps::{from_bson, to_bson};

/// Category entity
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    /// Stored file name, not a URL
    pub image: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Shape of a category in the `categories` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

/// DTO for creating a new category
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateCategory {
    #[validate(length(min = 3, max = 32))]
    #[schema(example = "Shoes")]
    pub name: String,
}

/// DTO for updating an existing category
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategory {
    #[validate(length(min = 3, max = 32))]
    pub name: Option<String>,
}

/// Fields an update may touch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CategoryPatch {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CategoryResponse {
    #[schema(example = "65f1c0ffee0000000000abcd")]
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "http://localhost:8080/uploads/categories/categories-1.jpeg")]
    pub image: Option<String>,
}

impl Category {
    pub fn new(input: CreateCategory) -> Self {
        let now = Utc::now();
        Self {
            id: ObjectId::new(),
            slug: slugify(&input.name),
            name: input.name,
            image: None,
            created_at: Some(now),
            updated_at: Some(now),
        }
    }
}

impl From<UpdateCategory> for CategoryPatch {
    fn from(input: UpdateCategory) -> Self {
        Self {
            name: input.name,
            image: None,
        }
    }
}

impl CategoryPatch {
    pub fn image(file: String) -> Self {
        Self {
            name: None,
            image: Some(file),
        }
    }

    /// `$set` body; the slug follows the name
    pub fn to_set(&self, now: DateTime<Utc>) -> Document {
        let mut set = doc! { "updatedAt": to_bson(now) };
        if let Some(name) = &self.name {
            set.insert("name", name);
            set.insert("slug", slugify(name));
        }
        if let Some(image) = &self.image {
            set.insert("image", image);
        }
        set
    }
}

impl From<CategoryDocument> for Category {
    fn from(document: CategoryDocument) -> Self {
        Self {
            id: document.id,
            name: document.name,
            slug: document.slug,
            image: document.image,
            created_at: document.created_at.and_then(from_bson),
            updated_at: document.updated_at.and_then(from_bson),
        }
    }
}

impl From<&Category> for CategoryDocument {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id,
            name: category.name.clone(),
            slug: category.slug.clone(),
            image: category.image.clone(),
            created_at: category.created_at.map(to_bson),
            updated_at: category.updated_at.map(to_bson),
        }
    }
}

impl CategoryResponse {
    pub fn new(category: Category, storage: &dyn ImageStorage) -> Self {
        Self {
            id: category.id.to_hex(),
            name: category.name,
            slug: category.slug,
            image: category
                .image
                .map(|file| storage.public_url(CATEGORY_IMAGES.dir, &file)),
        }
    }
}
