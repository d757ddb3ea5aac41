use crate::error::ConfigError;
use crate::services::db::store::StorageVariant;
use std::env;
use std::str::FromStr;

/// Which backend the issue routes talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Mongo,
    Memory,
}

impl FromStr for StoreBackend {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "mongo" | "mongodb" => Ok(StoreBackend::Mongo),
            "memory" => Ok(StoreBackend::Memory),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub mongo_uri: Option<String>,
    pub database_name: String,
    pub port: u16,
    pub variant: StorageVariant,
    pub backend: StoreBackend,
    pub log_dir: String,
}

impl AppConfig {
    /**
     * read config from the process environment
     * call after dotenv so .env values are visible
     */
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mongo_uri = lookup("MONGO_URI").or_else(|| lookup("MONGODB_URI"));

        let database_name = lookup("DB_NAME").unwrap_or_else(|| "issueTracker".to_string());

        let port = match lookup("PORT") {
            Some(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "PORT",
                value: raw,
            })?,
            None => 3000,
        };

        let variant = match lookup("STORAGE_VARIANT") {
            Some(raw) => raw.parse::<StorageVariant>().map_err(|_| ConfigError::Invalid {
                key: "STORAGE_VARIANT",
                value: raw,
            })?,
            None => StorageVariant::Embedded,
        };

        let backend = match lookup("ISSUE_STORE") {
            Some(raw) => raw.parse::<StoreBackend>().map_err(|_| ConfigError::Invalid {
                key: "ISSUE_STORE",
                value: raw,
            })?,
            None => StoreBackend::Mongo,
        };

        if backend == StoreBackend::Mongo && mongo_uri.is_none() {
            return Err(ConfigError::Missing("MONGO_URI"));
        }

        let log_dir = lookup("LOG_DIR").unwrap_or_else(|| "logs".to_string());

        Ok(AppConfig {
            mongo_uri,
            database_name,
            port,
            variant,
            backend,
            log_dir,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_uri_is_set() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("MONGO_URI", "mongodb://localhost")])).unwrap();

        assert_eq!(config.mongo_uri.as_deref(), Some("mongodb://localhost"));
        assert_eq!(config.database_name, "issueTracker");
        assert_eq!(config.port, 3000);
        assert_eq!(config.variant, StorageVariant::Embedded);
        assert_eq!(config.backend, StoreBackend::Mongo);
        assert_eq!(config.log_dir, "logs");
        assert_eq!(config.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn falls_back_to_mongodb_uri() {
        let config =
            AppConfig::from_lookup(lookup_from(&[("MONGODB_URI", "mongodb://db:27017")])).unwrap();
        assert_eq!(config.mongo_uri.as_deref(), Some("mongodb://db:27017"));
    }

    #[test]
    fn mongo_backend_requires_uri() {
        let err = AppConfig::from_lookup(lookup_from(&[])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("MONGO_URI"));
    }

    #[test]
    fn memory_backend_runs_without_uri() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ISSUE_STORE", "memory"),
            ("STORAGE_VARIANT", "flat"),
            ("PORT", "8080"),
        ]))
        .unwrap();

        assert_eq!(config.backend, StoreBackend::Memory);
        assert_eq!(config.variant, StorageVariant::Flat);
        assert_eq!(config.port, 8080);
        assert!(config.mongo_uri.is_none());
    }

    #[test]
    fn rejects_unknown_variant_and_bad_port() {
        let err = AppConfig::from_lookup(lookup_from(&[
            ("ISSUE_STORE", "memory"),
            ("STORAGE_VARIANT", "nested"),
        ]))
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Invalid {
                key: "STORAGE_VARIANT",
                value: "nested".to_string()
            }
        );

        let err = AppConfig::from_lookup(lookup_from(&[
            ("ISSUE_STORE", "memory"),
            ("PORT", "http"),
        ]))
        .unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { key: "PORT", .. }));
    }
}
