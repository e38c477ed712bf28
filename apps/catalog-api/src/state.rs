//! Application state management.
//!
//! This module defines the shared state the API routers are built from.

use std::sync::Arc;

use domain_catalog::LocalImageStorage;
use mongodb::{Client, Database};

/// Shared application state.
///
/// Cloning is cheap: the client, database and storage are all handles.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// MongoDB client (cloneable, shares underlying connection pool)
    pub mongo_client: Client,
    /// MongoDB database instance
    pub db: Database,
    /// Image files written by the upload endpoints
    pub storage: Arc<LocalImageStorage>,
}
