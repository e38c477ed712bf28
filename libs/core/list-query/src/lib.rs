//! Paginated, searchable list queries over MongoDB collections.
//!
//! ```text
//! query string ─► QuerySpec ─► ListQuery ─► (filter, FindOptions, Pagination)
//!                                   │
//!                                   └─► run(collection, total) ─► ListResult<T>
//! ```
//!
//! The total passed to [`ListQuery::build`] is counted by the caller, before
//! any keyword narrowing, so pagination always describes the scoped
//! collection rather than the search hits.

pub mod engine;
pub mod pagination;
pub mod result;
pub mod spec;

pub use engine::{BuiltQuery, EntityKind, ListQuery, SearchPolicy};
pub use pagination::{PageWindow, Pagination};
pub use result::{ListResponse, ListResult};
pub use spec::{DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, MAX_PAGE, QuerySpec, SORTABLE_FIELDS};
