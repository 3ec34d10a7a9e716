use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::services::recommender::{KeywordHeadPolicy, RecommenderOptions};

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Directory holding the precomputed catalog and similarity artifacts
    #[serde(default = "default_artifacts_dir")]
    pub artifacts_dir: PathBuf,

    /// TMDB API key
    pub tmdb_api_key: String,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Image CDN prefix that poster paths are appended to
    #[serde(default = "default_poster_base_url")]
    pub poster_base_url: String,

    /// Image shown when a poster cannot be fetched
    #[serde(default = "default_poster_placeholder_url")]
    pub poster_placeholder_url: String,

    /// Per-request timeout for poster lookups, in seconds
    #[serde(default = "default_poster_timeout_secs")]
    pub poster_timeout_secs: u64,

    /// Redis connection URL. Poster paths are not cached when unset.
    #[serde(default)]
    pub redis_url: Option<String>,

    /// Number of recommendations returned per query
    #[serde(default = "default_recommendation_count")]
    pub recommendation_count: usize,

    /// Discard the best keyword match, as the original app did
    #[serde(default = "default_keyword_skip_top_match")]
    pub keyword_skip_top_match: bool,

    /// Keyword text used when a keyword request carries none
    #[serde(default = "default_keywords")]
    pub default_keywords: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_artifacts_dir() -> PathBuf {
    PathBuf::from("models")
}

fn default_tmdb_api_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_poster_base_url() -> String {
    "https://image.tmdb.org/t/p/w500/".to_string()
}

fn default_poster_placeholder_url() -> String {
    "https://via.placeholder.com/500x750?text=No+Poster".to_string()
}

fn default_poster_timeout_secs() -> u64 {
    10
}

fn default_recommendation_count() -> usize {
    5
}

fn default_keyword_skip_top_match() -> bool {
    true
}

fn default_keywords() -> String {
    "Christopher Nolan".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn head_policy(&self) -> KeywordHeadPolicy {
        if self.keyword_skip_top_match {
            KeywordHeadPolicy::SkipTopMatch
        } else {
            KeywordHeadPolicy::KeepAll
        }
    }

    pub fn recommender_options(&self) -> RecommenderOptions {
        RecommenderOptions {
            count: self.recommendation_count,
            keyword_head: self.head_policy(),
        }
    }

    pub fn poster_timeout(&self) -> Duration {
        Duration::from_secs(self.poster_timeout_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
