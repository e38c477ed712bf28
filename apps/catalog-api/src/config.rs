use std::path::PathBuf;

use core_config::{AppInfo, ConfigError, FromEnv, app_info, env_or_default, server::ServerConfig};

// Import MongoDB config from the database library
use database::mongodb::MongoConfig;

// Re-export Environment for use in other modules
pub use core_config::Environment;

/// Where uploaded images live and how clients reach them
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MediaConfig {
    /// Prefix for image URLs in responses, e.g. `https://cdn.example.com`
    pub base_url: String,
    /// Directory served at `/uploads`
    pub upload_dir: PathBuf,
}

/// Environment variables:
/// - `MEDIA_BASE_URL` (default `http://localhost:8080`)
/// - `UPLOAD_DIR` (default `uploads`)
impl FromEnv for MediaConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            base_url: env_or_default("MEDIA_BASE_URL", "http://localhost:8080"),
            upload_dir: PathBuf::from(env_or_default("UPLOAD_DIR", "uploads")),
        })
    }
}

/// Application-specific configuration
/// Composes shared config components from the `config` library
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub mongodb: MongoConfig,
    pub server: ServerConfig,
    pub media: MediaConfig,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let mongodb = MongoConfig::from_env()?;
        let server = ServerConfig::from_env()?;
        let media = MediaConfig::from_env()?;

        Ok(Self {
            app: app_info!(),
            mongodb,
            server,
            media,
            environment,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_defaults() {
        temp_env::with_vars_unset(["MEDIA_BASE_URL", "UPLOAD_DIR"], || {
            let media = MediaConfig::from_env().unwrap();
            assert_eq!(media.base_url, "http://localhost:8080");
            assert_eq!(media.upload_dir, PathBuf::from("uploads"));
        });
    }

    #[test]
    fn test_media_from_env() {
        temp_env::with_vars(
            [
                ("MEDIA_BASE_URL", Some("https://cdn.example.com")),
                ("UPLOAD_DIR", Some("/var/lib/catalog/uploads")),
            ],
            || {
                let media = MediaConfig::from_env().unwrap();
                assert_eq!(media.base_url, "https://cdn.example.com");
                assert_eq!(media.upload_dir, PathBuf::from("/var/lib/catalog/uploads"));
            },
        );
    }

    #[test]
    fn test_missing_mongodb_url_fails() {
        temp_env::with_vars_unset(
            ["MONGODB_URL", "MONGO_URL", "MONGODB_DATABASE", "MONGO_DATABASE"],
            || {
                let err = Config::from_env().unwrap_err();
                assert!(err.to_string().contains("MONGODB_URL"));
            },
        );
    }
}
