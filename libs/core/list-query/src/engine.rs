use futures_util::TryStreamExt;
use mongodb::{
    Collection,
    bson::{Bson, Document, doc},
    options::FindOptions,
};
use serde::de::DeserializeOwned;

use crate::pagination::{PageWindow, Pagination};
use crate::spec::QuerySpec;

/// The four catalog collections
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    Category,
    SubCategory,
    Brand,
    Product,
}

impl EntityKind {
    pub fn search_policy(self) -> SearchPolicy {
        match self {
            EntityKind::Product => SearchPolicy::TitleOrDescription,
            EntityKind::Category | EntityKind::SubCategory | EntityKind::Brand => {
                SearchPolicy::Name
            }
        }
    }
}

/// Which fields a keyword is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchPolicy {
    Name,
    TitleOrDescription,
}

impl SearchPolicy {
    /// Case-insensitive literal substring match on the policy's fields
    pub fn filter(self, keyword: &str) -> Document {
        let pattern = doc! { "$regex": regex::escape(keyword), "$options": "i" };
        match self {
            SearchPolicy::Name => doc! { "name": pattern },
            SearchPolicy::TitleOrDescription => doc! {
                "$or": [
                    { "title": pattern.clone() },
                    { "description": pattern },
                ]
            },
        }
    }
}

/// Everything needed to execute one page of a list request
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    pub filter: Document,
    pub options: FindOptions,
    pub window: PageWindow,
    pub pagination: Pagination,
}

/// A list request bound to a scope and a search policy.
///
/// `scope` narrows the collection before anything else (e.g. sub-categories
/// of one category) and must be the same filter the caller counted with.
#[derive(Debug, Clone)]
pub struct ListQuery<'a> {
    scope: Document,
    spec: &'a QuerySpec,
    policy: SearchPolicy,
}

impl<'a> ListQuery<'a> {
    pub fn new(scope: Document, spec: &'a QuerySpec, policy: SearchPolicy) -> Self {
        Self {
            scope,
            spec,
            policy,
        }
    }

    /// Compose search, projection, sort and pagination.
    ///
    /// `total` is the scoped count before the keyword is applied, so
    /// `numberOfPages` and `nextPage` ignore how many rows the keyword drops.
    pub fn build(&self, total: u64) -> BuiltQuery {
        let filter = self.filter();
        let (window, pagination) = Pagination::compute(self.spec.page(), self.spec.limit(), total);

        let options = FindOptions::builder()
            .projection(self.projection())
            .sort(self.sort())
            .skip(window.skip)
            .limit(window.limit)
            .build();

        BuiltQuery {
            filter,
            options,
            window,
            pagination,
        }
    }

    /// Run the query and decode every document on the page
    pub async fn run<T>(
        &self,
        collection: &Collection<T>,
        total: u64,
    ) -> mongodb::error::Result<(Vec<T>, Pagination)>
    where
        T: DeserializeOwned + Send + Sync,
    {
        let built = self.build(total);
        tracing::debug!(
            collection = collection.name(),
            filter = %built.filter,
            skip = built.window.skip,
            limit = built.window.limit,
            "Running list query"
        );

        let items: Vec<T> = collection
            .find(built.filter)
            .with_options(built.options)
            .await?
            .try_collect()
            .await?;

        Ok((items, built.pagination))
    }

    fn filter(&self) -> Document {
        let Some(keyword) = self.spec.keyword() else {
            return self.scope.clone();
        };

        let search = self.policy.filter(keyword);
        if self.scope.is_empty() {
            search
        } else {
            doc! { "$and": [self.scope.clone(), search] }
        }
    }

    fn projection(&self) -> Document {
        let fields = self.spec.projected_fields();
        if fields.is_empty() {
            return doc! { "__v": 0 };
        }

        fields
            .into_iter()
            .map(|f| (f.to_string(), Bson::Int32(1)))
            .collect()
    }

    fn sort(&self) -> Document {
        let keys = self.spec.sort_keys();
        if keys.is_empty() {
            return doc! { "createdAt": -1 };
        }

        keys.into_iter()
            .map(|(field, direction)| (field.to_string(), Bson::Int32(direction)))
            .collect()
    }
}
