use std::env;

/// Which backing store holds the tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreKind {
    Sqlite { path: String },
    Mongo { uri: String, database_name: String },
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_address: String,
    pub store: StoreKind,
    pub frontend_origin: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("unknown TASK_STORE {0:?}, expected sqlite, mongo or memory")]
    UnknownStore(String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let store = match get("TASK_STORE").as_deref().unwrap_or("sqlite") {
            "sqlite" => StoreKind::Sqlite {
                path: get("DATABASE_PATH").unwrap_or_else(|| "tasks.db".to_string()),
            },
            "mongo" => StoreKind::Mongo {
                uri: get("MONGO_URI").ok_or(ConfigError::Missing("MONGO_URI"))?,
                database_name: get("DATABASE_NAME").unwrap_or_else(|| "task_db".to_string()),
            },
            "memory" => StoreKind::Memory,
            other => return Err(ConfigError::UnknownStore(other.to_string())),
        };

        Ok(Self {
            bind_address: get("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8080".to_string()),
            store,
            frontend_origin: get("FRONTEND_ORIGIN")
                .unwrap_or_else(|| "http://localhost:3000".to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn defaults_to_sqlite_file() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind_address, "0.0.0.0:8080");
        assert_eq!(config.frontend_origin, "http://localhost:3000");
        assert_eq!(
            config.store,
            StoreKind::Sqlite {
                path: "tasks.db".to_string()
            }
        );
    }

    #[test]
    fn mongo_requires_uri() {
        let err = Config::from_lookup(lookup(&[("TASK_STORE", "mongo")])).unwrap_err();
        assert_eq!(err, ConfigError::Missing("MONGO_URI"));

        let config = Config::from_lookup(lookup(&[
            ("TASK_STORE", "mongo"),
            ("MONGO_URI", "mongodb://localhost:27017"),
        ]))
        .unwrap();
        assert_eq!(
            config.store,
            StoreKind::Mongo {
                uri: "mongodb://localhost:27017".to_string(),
                database_name: "task_db".to_string(),
            }
        );
    }

    #[test]
    fn unknown_store_is_rejected() {
        let err = Config::from_lookup(lookup(&[("TASK_STORE", "postgres")])).unwrap_err();
        assert_eq!(err, ConfigError::UnknownStore("postgres".to_string()));
    }
}
