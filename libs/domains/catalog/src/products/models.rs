use chrono::{DateTime, Utc};
use mongodb::bson::{self, Document, doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError};

use crate::error::CatalogResult;
use crate::reference::{EntityRef, EntityRefResponse, parse_object_id, validate_object_id};
use crate::slug::slugify;
use crate::storage::{ImageStorage, PRODUCT_IMAGES};
use crate::timestamps::{from_bson, to_bson};

/// Product entity.
///
/// References come back from the repository thin (id only) and are
/// filled in by the `ReferenceEnricher` before reaching a caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ObjectId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub quantity: i64,
    pub sold: i64,
    pub price: f64,
    pub price_after_discount: Option<f64>,
    pub colors: Vec<String>,
    /// Stored file name
    pub image_cover: Option<String>,
    pub images: Vec<String>,
    pub category: Option<EntityRef>,
    pub sub_categories: Vec<EntityRef>,
    pub brand: Option<EntityRef>,
    pub ratings_average: Option<f64>,
    pub ratings_quantity: i64,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Shape of a product in the `products` collection; references are bare ids
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    #[serde(rename = "_id")]
    pub id: ObjectId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub quantity: i64,
    #[serde(default)]
    pub sold: i64,
    #[serde(default)]
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_after_discount: Option<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_cover: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ObjectId>,
    #[serde(default)]
    pub sub_categories: Vec<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<ObjectId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ratings_average: Option<f64>,
    #[serde(default)]
    pub ratings_quantity: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<bson::DateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<bson::DateTime>,
}

/// DTO for creating a new product
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    #[validate(length(min = 3, max = 100))]
    #[schema(example = "Red Running Shoe")]
    pub title: String,
    #[validate(length(min = 20, max = 500))]
    pub description: String,
    #[validate(range(min = 0))]
    pub quantity: i64,
    #[validate(range(min = 0))]
    pub sold: Option<i64>,
    #[validate(range(min = 0.0, max = 500000.0))]
    pub price: f64,
    #[validate(range(min = 0.0, max = 500000.0))]
    pub price_after_discount: Option<f64>,
    #[serde(default)]
    pub colors: Vec<String>,
    pub image_cover: Option<String>,
    #[serde(default)]
    pub images: Vec<String>,
    #[validate(custom(function = "validate_object_id"))]
    #[schema(example = "65f1c0ffee0000000000abcd")]
    pub category: String,
    #[serde(default)]
    #[validate(custom(function = "validate_object_ids"))]
    pub sub_categories: Vec<String>,
    #[validate(custom(function = "validate_object_id"))]
    pub brand: Option<String>,
    #[validate(range(min = 1.0, max = 5.0))]
    pub ratings_average: Option<f64>,
    #[validate(range(min = 0))]
    pub ratings_quantity: Option<i64>,
}

/// DTO for updating an existing product
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[validate(length(min = 3, max = 100))]
    pub title: Option<String>,
    #[validate(length(min = 20, max = 500))]
    pub description: Option<String>,
    #[validate(range(min = 0))]
    pub quantity: Option<i64>,
    #[validate(range(min = 0))]
    pub sold: Option<i64>,
    #[validate(range(min = 0.0, max = 500000.0))]
    pub price: Option<f64>,
    #[validate(range(min = 0.0, max = 500000.0))]
    pub price_after_discount: Option<f64>,
    pub colors: Option<Vec<String>>,
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
    #[validate(custom(function = "validate_object_id"))]
    pub category: Option<String>,
    #[validate(custom(function = "validate_object_ids"))]
    pub sub_categories: Option<Vec<String>>,
    #[validate(custom(function = "validate_object_id"))]
    pub brand: Option<String>,
    #[validate(range(min = 1.0, max = 5.0))]
    pub ratings_average: Option<f64>,
    #[validate(range(min = 0))]
    pub ratings_quantity: Option<i64>,
}

/// Fields an update may touch, with references already parsed
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub quantity: Option<i64>,
    pub sold: Option<i64>,
    pub price: Option<f64>,
    pub price_after_discount: Option<f64>,
    pub colors: Option<Vec<String>>,
    pub image_cover: Option<String>,
    pub images: Option<Vec<String>>,
    pub category: Option<ObjectId>,
    pub sub_categories: Option<Vec<ObjectId>>,
    pub brand: Option<ObjectId>,
    pub ratings_average: Option<f64>,
    pub ratings_quantity: Option<i64>,
}

/// The ids a product points at
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductReferences {
    pub category: Option<ObjectId>,
    pub sub_categories: Vec<ObjectId>,
    pub brand: Option<ObjectId>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[schema(example = "65f1c0ffee0000000000f00d")]
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub quantity: i64,
    pub sold: i64,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_after_discount: Option<f64>,
    pub colors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_cover: Option<String>,
    pub images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityRefResponse>,
    pub sub_categories: Vec<EntityRefResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<EntityRefResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ratings_average: Option<f64>,
    pub ratings_quantity: i64,
}

fn validate_object_ids(ids: &[String]) -> Result<(), ValidationError> {
    ids.iter().try_for_each(|id| validate_object_id(id))
}

fn parse_object_ids(ids: &[String]) -> CatalogResult<Vec<ObjectId>> {
    ids.iter().map(|id| parse_object_id(id)).collect()
}

impl TryFrom<CreateProduct> for Product {
    type Error = crate::error::CatalogError;

    fn try_from(input: CreateProduct) -> CatalogResult<Self> {
        let category = parse_object_id(&input.category)?;
        let sub_categories = parse_object_ids(&input.sub_categories)?;
        let brand = input.brand.as_deref().map(parse_object_id).transpose()?;
        let now = Utc::now();

        Ok(Self {
            id: ObjectId::new(),
            slug: slugify(&input.title),
            title: input.title,
            description: input.description,
            quantity: input.quantity,
            sold: input.sold.unwrap_or(0),
            price: input.price,
            price_after_discount: input.price_after_discount,
            colors: input.colors,
            image_cover: input.image_cover,
            images: input.images,
            category: Some(EntityRef::thin(category)),
            sub_categories: sub_categories.into_iter().map(EntityRef::thin).collect(),
            brand: brand.map(EntityRef::thin),
            ratings_average: input.ratings_average,
            ratings_quantity: input.ratings_quantity.unwrap_or(0),
            created_at: Some(now),
            updated_at: Some(now),
        })
    }
}

impl TryFrom<UpdateProduct> for ProductPatch {
    type Error = crate::error::CatalogError;

    fn try_from(input: UpdateProduct) -> CatalogResult<Self> {
        Ok(Self {
            category: input.category.as_deref().map(parse_object_id).transpose()?,
            sub_categories: input
                .sub_categories
                .as_deref()
                .map(parse_object_ids)
                .transpose()?,
            brand: input.brand.as_deref().map(parse_object_id).transpose()?,
            title: input.title,
            description: input.description,
            quantity: input.quantity,
            sold: input.sold,
            price: input.price,
            price_after_discount: input.price_after_discount,
            colors: input.colors,
            image_cover: input.image_cover,
            images: input.images,
            ratings_average: input.ratings_average,
            ratings_quantity: input.ratings_quantity,
        })
    }
}

impl ProductPatch {
    pub fn image_cover(file: String) -> Self {
        Self {
            image_cover: Some(file),
            ..Self::default()
        }
    }

    /// Only the references this patch changes
    pub fn references(&self) -> ProductReferences {
        ProductReferences {
            category: self.category,
            sub_categories: self.sub_categories.clone().unwrap_or_default(),
            brand: self.brand,
        }
    }

    /// `$set` body; the slug follows the title
    pub fn to_set(&self, now: DateTime<Utc>) -> Document {
        let mut set = doc! { "updatedAt": to_bson(now) };

        if let Some(title) = &self.title {
            set.insert("title", title);
            set.insert("slug", slugify(title));
        }
        if let Some(description) = &self.description {
            set.insert("description", description);
        }
        if let Some(quantity) = self.quantity {
            set.insert("quantity", quantity);
        }
        if let Some(sold) = self.sold {
            set.insert("sold", sold);
        }
        if let Some(price) = self.price {
            set.insert("price", price);
        }
        if let Some(price_after_discount) = self.price_after_discount {
            set.insert("priceAfterDiscount", price_after_discount);
        }
        if let Some(colors) = &self.colors {
            set.insert("colors", colors.clone());
        }
        if let Some(image_cover) = &self.image_cover {
            set.insert("imageCover", image_cover);
        }
        if let Some(images) = &self.images {
            set.insert("images", images.clone());
        }
        if let Some(category) = self.category {
            set.insert("category", category);
        }
        if let Some(sub_categories) = &self.sub_categories {
            set.insert("subCategories", sub_categories.clone());
        }
        if let Some(brand) = self.brand {
            set.insert("brand", brand);
        }
        if let Some(ratings_average) = self.ratings_average {
            set.insert("ratingsAverage", ratings_average);
        }
        if let Some(ratings_quantity) = self.ratings_quantity {
            set.insert("ratingsQuantity", ratings_quantity);
        }

        set
    }
}

impl ProductReferences {
    pub fn of(product: &Product) -> Self {
        Self {
            category: product.category.as_ref().map(|r| r.id),
            sub_categories: product.sub_categories.iter().map(|r| r.id).collect(),
            brand: product.brand.as_ref().map(|r| r.id),
        }
    }
}

impl From<ProductDocument> for Product {
    fn from(document: ProductDocument) -> Self {
        Self {
            id: document.id,
            title: document.title,
            slug: document.slug,
            description: document.description,
            quantity: document.quantity,
            sold: document.sold,
            price: document.price,
            price_after_discount: document.price_after_discount,
            colors: document.colors,
            image_cover: document.image_cover,
            images: document.images,
            category: document.category.map(EntityRef::thin),
            sub_categories: document
                .sub_categories
                .into_iter()
                .map(EntityRef::thin)
                .collect(),
            brand: document.brand.map(EntityRef::thin),
            ratings_average: document.ratings_average,
            ratings_quantity: document.ratings_quantity,
            created_at: document.created_at.and_then(from_bson),
            updated_at: document.updated_at.and_then(from_bson),
        }
    }
}

/// Enriched names and slugs are dropped: only ids are persisted
impl From<&Product> for ProductDocument {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            title: product.title.clone(),
            slug: product.slug.clone(),
            description: product.description.clone(),
            quantity: product.quantity,
            sold: product.sold,
            price: product.price,
            price_after_discount: product.price_after_discount,
            colors: product.colors.clone(),
            image_cover: product.image_cover.clone(),
            images: product.images.clone(),
            category: product.category.as_ref().map(|r| r.id),
            sub_categories: product.sub_categories.iter().map(|r| r.id).collect(),
            brand: product.brand.as_ref().map(|r| r.id),
            ratings_average: product.ratings_average,
            ratings_quantity: product.ratings_quantity,
            created_at: product.created_at.map(to_bson),
            updated_at: product.updated_at.map(to_bson),
        }
    }
}

impl ProductResponse {
    pub fn new(product: Product, storage: &dyn ImageStorage) -> Self {
        let url = |file: &str| storage.public_url(PRODUCT_IMAGES.dir, file);

        Self {
            id: product.id.to_hex(),
            title: product.title,
            slug: product.slug,
            description: product.description,
            quantity: product.quantity,
            sold: product.sold,
            price: product.price,
            price_after_discount: product.price_after_discount,
            colors: product.colors,
            image_cover: product.image_cover.as_deref().map(&url),
            images: product.images.iter().map(|file| url(file)).collect(),
            category: product.category.map(EntityRefResponse::from),
            sub_categories: product
                .sub_categories
                .into_iter()
                .map(EntityRefResponse::from)
                .collect(),
            brand: product.brand.map(EntityRefResponse::from),
            ratings_average: product.ratings_average,
            ratings_quantity: product.ratings_quantity,
        }
    }
}
