use std::path::PathBuf;

use anyhow::{Context, Result};
use reqwest::Url;

pub const DEFAULT_BASE_URL: &str = "https://www.10000recipe.com";
pub const DEFAULT_CHECKPOINT: &str = "crawling.json";
pub const DEFAULT_NEO4J_URI: &str = "bolt://localhost";
pub const DEFAULT_NEO4J_USER: &str = "neo4j";
pub const DEFAULT_NEO4J_PASSWORD: &str = "saveplate";
pub const DEFAULT_NEO4J_DB: &str = "neo4j";

/// Upper bound on recipe pages crawled per food.
pub const MAX_CANDIDATES: usize = 10;

/// Everything the orchestrator needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub site: SiteConfig,
    pub graph: GraphConfig,
    pub checkpoint_path: PathBuf,
    pub max_candidates: usize,
}

#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub uri: String,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: DEFAULT_NEO4J_URI.into(),
            user: DEFAULT_NEO4J_USER.into(),
            password: DEFAULT_NEO4J_PASSWORD.into(),
            database: DEFAULT_NEO4J_DB.into(),
        }
    }
}

/// URL layout of the recipe site. Listing, category and search pages all
/// share `recipe/list.html` and differ only in the query string.
#[derive(Debug, Clone)]
pub struct SiteConfig {
    base: String,
    list_url: Url,
}

impl SiteConfig {
    pub fn new(base: &str) -> Result<Self> {
        let base = base.trim_end_matches('/').to_string();
        let list_url = Url::parse(&format!("{}/recipe/list.html", base))
            .with_context(|| format!("Invalid base URL: {}", base))?;
        Ok(Self { base, list_url })
    }

    pub fn listing_url(&self) -> String {
        self.list_url.to_string()
    }

    pub fn category_url(&self, code: &str) -> String {
        self.list_with_query("cat3", code)
    }

    pub fn search_url(&self, food: &str) -> String {
        self.list_with_query("q", food)
    }

    pub fn recipe_url(&self, id: &str) -> String {
        format!("{}/recipe/{}", self.base, id)
    }

    fn list_with_query(&self, key: &str, value: &str) -> String {
        let mut url = self.list_url.clone();
        url.query_pairs_mut().append_pair(key, value);
        url.to_string()
    }
}

impl Config {
    pub fn clamp_candidates(n: usize) -> usize {
        n.clamp(1, MAX_CANDIDATES)
    }
}
