use std::time::Duration;

use log::{error, info, warn};
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::{
    mongodb::MongoScores,
    store::{MemoryScores, Scores},
};

/// Configuration for the score store, derived from `Rocket.toml` and
/// `ROCKET_*` environment variables.
#[derive(Deserialize)]
struct StoreConfig {
    // secrets
    /// Without a URI, scores live in memory and are lost on shutdown.
    #[serde(default)]
    db_uri: Option<String>,
    // non-secrets
    #[serde(default = "default_db_name")]
    db_name: String,
}

fn default_db_name() -> String {
    "quizz".to_string()
}

/// A fairing that loads the store config, connects to MongoDB if configured,
/// and places the resulting [`Scores`] into managed state.
pub struct StoreFairing;

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> Info {
        Info {
            name: "Score store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<StoreConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load score store config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let Some(db_uri) = config.db_uri else {
            warn!("No `db_uri` configured, keeping scores in memory");
            let scores: Scores = Box::new(MemoryScores::default());
            return Ok(rocket.manage(scores));
        };

        info!("Loaded database config, connecting...");
        let client = match MongoClient::with_uri_str(db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(&config.db_name);

        // Ensure the score ID counter exists.
        let scores: Scores = match MongoScores::open(&db).await {
            Ok(scores) => Box::new(scores),
            Err(e) => {
                error!("Failed to prepare database: {e}");
                return Err(rocket);
            }
        };
        info!("...database '{}' online!", config.db_name);

        Ok(rocket.manage(scores))
    }
}

/// Where the client finds its collaborators, passed explicitly when the
/// client is built.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Source of the question set. Defaults to `http://localhost:5173`.
    pub data_url: String,
    /// Base URL of the score service. Defaults to `http://localhost:3000`.
    pub service_url: String,
    /// Per-request timeout in seconds. Defaults to 10.
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_url: "http://localhost:5173".to_string(),
            service_url: "http://localhost:3000".to_string(),
            timeout_secs: 10,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Full URL of a score service endpoint.
    pub fn service_endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.service_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use rocket::{
        figment::{providers::Serialized, Figment},
        serde::json::serde_json::{self, json},
    };

    use super::*;

    #[test]
    fn client_config_defaults() {
        let config: ClientConfig = serde_json::from_value(json!({})).unwrap();
        assert_eq!(config, ClientConfig::default());
        assert_eq!(config.timeout(), Duration::from_secs(10));

        let config: ClientConfig =
            serde_json::from_value(json!({ "service_url": "https://quiz.example/" })).unwrap();
        assert_eq!(config.data_url, "http://localhost:5173");
        assert_eq!(
            config.service_endpoint("/addScore"),
            "https://quiz.example/addScore"
        );
    }

    #[test]
    fn store_config_defaults() {
        let figment = Figment::from(Serialized::default("port", 3000));
        let config = figment.extract::<StoreConfig>().unwrap();
        assert_eq!(config.db_uri, None);
        assert_eq!(config.db_name, "quizz");

        let figment = figment
            .merge(Serialized::default("db_uri", "mongodb://localhost:27017"))
            .merge(Serialized::default("db_name", "scores"));
        let config = figment.extract::<StoreConfig>().unwrap();
        assert_eq!(config.db_uri.as_deref(), Some("mongodb://localhost:27017"));
        assert_eq!(config.db_name, "scores");
    }

    #[rocket::async_test]
    async fn memory_store_without_uri() {
        let figment = Figment::from(rocket::Config::default());
        let rocket = rocket::custom(figment)
            .attach(StoreFairing)
            .ignite()
            .await
            .unwrap();
        assert!(rocket.state::<Scores>().is_some());
    }
}
