use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::slug::slugify;
use crate::storage::{BRAND_IMAGES, ImageStorage};
use crate::timestamps::{from_bson, to_bson};

/// Brand entity
#[derive(Debug, Clone, PartialEq)]
pub struct Brand {
    pub id: ObjectId,
    pub name: String,
    pub slug: String,
    /// Stored file name, not a URL
    pub image: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Shape of a brand in the `brands` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrandDocument {
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

/// DTO for creating a new brand
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct CreateBrand {
    #[validate(length(min = 3, max = 32))]
    #[schema(example = "Nike")]
    pub name: String,
}

/// DTO for updating an existing brand
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateBrand {
    #[validate(length(min = 3, max = 32))]
    pub name: Option<String>,
}

/// Fields an update may touch
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BrandPatch {
    pub name: Option<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BrandResponse {
    #[schema(example = "65f1c0ffee0000000000abcd")]
    pub id: String,
    pub name: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "http://localhost:8080/uploads/brands/brands-1.jpeg")]
    pub image: Option<String>,
}

impl Brand {
    pub fn new(input: CreateBrand) -> Self {
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

impl From<UpdateBrand> for BrandPatch {
    fn from(input: UpdateBrand) -> Self {
        Self {
            name: input.name,
            image: None,
        }
    }
}

impl BrandPatch {
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

impl From<BrandDocument> for Brand {
    fn from(document: BrandDocument) -> Self {
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

impl From<&Brand> for BrandDocument {
    fn from(brand: &Brand) -> Self {
        Self {
            id: brand.id,
            name: brand.name.clone(),
            slug: brand.slug.clone(),
            image: brand.image.clone(),
            created_at: brand.created_at.map(to_bson),
            updated_at: brand.updated_at.map(to_bson),
        }
    }
}

impl BrandResponse {
    pub fn new(brand: Brand, storage: &dyn ImageStorage) -> Self {
        Self {
            id: brand.id.to_hex(),
            name: brand.name,
            slug: brand.slug,
            image: brand
                .image
                .map(|file| storage.public_url(BRAND_IMAGES.dir, &file)),
        }
    }
}
