//! Collection access shared by the four Mongo repositories.

use list_query::{EntityKind, ListQuery, ListResult, QuerySpec};
use mongodb::{
    Collection, Database, IndexModel,
    bson::{Document, doc, oid::ObjectId},
    options::{IndexOptions, ReturnDocument},
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::instrument;

use crate::error::{CatalogError, CatalogResult};

/// One collection plus the facts the repositories need about it: which
/// field is unique and how keyword search applies to it.
#[derive(Debug)]
pub struct DocumentStore<D: Send + Sync> {
    collection: Collection<D>,
    unique_field: &'static str,
    kind: EntityKind,
    label: &'static str,
}

impl<D: Send + Sync> Clone for DocumentStore<D> {
    fn clone(&self) -> Self {
        Self {
            collection: self.collection.clone(),
            unique_field: self.unique_field,
            kind: self.kind,
            label: self.label,
        }
    }
}

impl<D> DocumentStore<D>
where
    D: Serialize + DeserializeOwned + Send + Sync,
{
    pub fn new(
        db: &Database,
        collection_name: &str,
        unique_field: &'static str,
        kind: EntityKind,
        label: &'static str,
    ) -> Self {
        Self {
            collection: db.collection::<D>(collection_name),
            unique_field,
            kind,
            label,
        }
    }

    pub fn collection(&self) -> &Collection<D> {
        &self.collection
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    /// Unique index on the name-like field; catches inserts that race past
    /// [`exists_by`](Self::exists_by).
    pub async fn init_unique_index(&self) -> CatalogResult<()> {
        let field = self.unique_field;
        let index = IndexModel::builder()
            .keys(doc! { field: 1 })
            .options(
                IndexOptions::builder()
                    .unique(true)
                    .name(format!("idx_{field}_unique"))
                    .build(),
            )
            .build();

        self.collection.create_index(index).await?;
        tracing::info!(
            collection = self.collection.name(),
            field,
            "Unique index ensured"
        );
        Ok(())
    }

    /// Whether any document other than `excluding` holds `value` in `field`.
    ///
    /// An empty value is never a collision.
    #[instrument(skip(self), fields(collection = self.collection.name()))]
    pub async fn exists_by(
        &self,
        field: &str,
        value: &str,
        excluding: Option<ObjectId>,
    ) -> CatalogResult<bool> {
        if value.is_empty() {
            return Ok(false);
        }

        let mut filter = doc! { field: value };
        if let Some(id) = excluding {
            filter.insert("_id", doc! { "$ne": id });
        }

        let matches = self.collection.count_documents(filter).limit(1).await?;
        Ok(matches > 0)
    }

    pub async fn exists_by_unique(&self, value: &str) -> CatalogResult<bool> {
        self.exists_by(self.unique_field, value, None).await
    }

    pub async fn exists_by_id(&self, id: ObjectId) -> CatalogResult<bool> {
        let matches = self
            .collection
            .count_documents(doc! { "_id": id })
            .limit(1)
            .await?;
        Ok(matches > 0)
    }

    pub async fn count(&self, scope: Document) -> CatalogResult<u64> {
        Ok(self.collection.count_documents(scope).await?)
    }

    /// Count the scope, then run the list query against that count
    #[instrument(skip(self, spec), fields(collection = self.collection.name()))]
    pub async fn list(&self, scope: Document, spec: &QuerySpec) -> CatalogResult<ListResult<D>> {
        let total = self.count(scope.clone()).await?;
        let (items, pagination) = ListQuery::new(scope, spec, self.kind.search_policy())
            .run(&self.collection, total)
            .await?;

        Ok(ListResult::new(items, pagination))
    }

    pub async fn find_by_id(&self, id: ObjectId) -> CatalogResult<Option<D>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    pub async fn get_by_id(&self, id: ObjectId) -> CatalogResult<D> {
        self.find_by_id(id)
            .await?
            .ok_or_else(|| CatalogError::not_found(self.label))
    }

    /// Insert after a uniqueness check on `unique_value`
    #[instrument(skip(self, document), fields(collection = self.collection.name()))]
    pub async fn insert(&self, unique_value: &str, document: &D) -> CatalogResult<()> {
        if self.exists_by_unique(unique_value).await? {
            return Err(self.conflict());
        }

        match self.collection.insert_one(document).await {
            Ok(_) => Ok(()),
            Err(e) if database::mongodb::is_duplicate_key(&e) => Err(self.conflict()),
            Err(e) => Err(e.into()),
        }
    }

    /// Apply `set` as a `$set` and return the updated document.
    ///
    /// When `set` carries the unique field, the new value must not belong to
    /// another document. Keeping one's own value is fine.
    #[instrument(skip(self, set), fields(collection = self.collection.name()))]
    pub async fn update(&self, id: ObjectId, set: Document) -> CatalogResult<D> {
        if let Ok(value) = set.get_str(self.unique_field) {
            if self.exists_by(self.unique_field, value, Some(id)).await? {
                return Err(self.conflict());
            }
        }

        let updated = self
            .collection
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
            .return_document(ReturnDocument::After)
            .await;

        match updated {
            Ok(Some(document)) => Ok(document),
            Ok(None) => Err(CatalogError::NotFound(format!(
                "{} ID not found, failed to update",
                self.label
            ))),
            Err(e) if database::mongodb::is_duplicate_key(&e) => Err(self.conflict()),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove by id; a missing id is not an error
    pub async fn delete(&self, id: ObjectId) -> CatalogResult<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    fn conflict(&self) -> CatalogError {
        CatalogError::Conflict(format!(
            "{} with this {} already exists",
            self.label, self.unique_field
        ))
    }
}
