use super::error::{CouchDaoError, CouchResult};

const DEFAULT_DATABASE: &str = "game_ratings";

/// Server location, ratings database and optional basic-auth credentials.
#[derive(Debug, Clone)]
pub struct CouchConfig {
    pub base_url: String,
    pub database: String,
    pub credentials: Option<(String, String)>,
}

impl CouchConfig {
    pub fn from_url(base_url: &str, database: Option<&str>) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            database: database.unwrap_or(DEFAULT_DATABASE).to_owned(),
            credentials: None,
        }
    }

    /// Read `COUCH_BASE_URL` (required), `COUCH_DB` (optional) and the
    /// `COUCH_USERNAME`/`COUCH_PASSWORD` pair.
    pub fn from_env() -> CouchResult<Self> {
        let base_url = std::env::var("COUCH_BASE_URL").map_err(|_| {
            CouchDaoError::MissingEnvVar {
                var: "COUCH_BASE_URL",
            }
        })?;
        let database = std::env::var("COUCH_DB").ok();

        let mut config = Self::from_url(&base_url, database.as_deref());
        config.credentials = std::env::var("COUCH_USERNAME")
            .ok()
            .zip(std::env::var("COUCH_PASSWORD").ok());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_defaults_to_game_ratings() {
        let config = CouchConfig::from_url("http://localhost:5984/", None);
        assert_eq!(config.base_url, "http://localhost:5984");
        assert_eq!(config.database, "game_ratings");
        assert!(config.credentials.is_none());
    }

    #[test]
    fn explicit_database_wins() {
        let config = CouchConfig::from_url("http://couch:5984", Some("ratings_test"));
        assert_eq!(config.database, "ratings_test");
    }
}
