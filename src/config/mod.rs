//! Environment-backed configuration.
//!
//! Most settings have defaults. Override with `CLAIMLENS_*` environment variables.

pub mod error;


pub use error::ConfigError;

use std::env;
use std::path::PathBuf;

use crate::matching::DEFAULT_MATCH_THRESHOLD;

/// Default Qdrant URL used when `CLAIMLENS_QDRANT_URL` is not set.
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";

/// Default semantic-index collection holding ingredient-origin documents.
pub const DEFAULT_COLLECTION_NAME: &str = "ingredient_docs";

/// Pipeline configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `CLAIMLENS_*` overrides on top of defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ingredient-keyed efficacy table. Default: `./data/ingredients.csv`.
    pub ingredient_table: PathBuf,

    /// Product-name-keyed efficacy table. Default: `./data/products.csv`.
    pub product_table: PathBuf,

    /// Composite `(product, ingredient)`-keyed table. Default: `./data/claims.csv`.
    pub composite_table: PathBuf,

    /// Qdrant endpoint URL. Default: `http://localhost:6334`.
    pub qdrant_url: String,

    /// Qdrant collection name. Default: `ingredient_docs`.
    pub qdrant_collection: String,

    /// Text-generation model name. Default: `gpt-4o-mini`.
    pub text_model: String,

    /// Fuzzy-match threshold (0-100). Default: `70`.
    pub match_threshold: u8,

    /// Documents passed to summarization per ingredient. Default: `5`.
    pub retrieval_top_k: usize,

    /// Oversampled candidate pool for diverse retrieval. Default: `20`.
    pub retrieval_fetch_k: usize,

    /// Relevance lambda for diverse retrieval (0.0-1.0). Default: `0.7`.
    pub diversity_weight: f32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            ingredient_table: PathBuf::from("./data/ingredients.csv"),
            product_table: PathBuf::from("./data/products.csv"),
            composite_table: PathBuf::from("./data/claims.csv"),
            qdrant_url: DEFAULT_QDRANT_URL.to_string(),
            qdrant_collection: DEFAULT_COLLECTION_NAME.to_string(),
            text_model: "gpt-4o-mini".to_string(),
            match_threshold: DEFAULT_MATCH_THRESHOLD,
            retrieval_top_k: 5,
            retrieval_fetch_k: 20,
            diversity_weight: 0.7,
        }
    }
}

impl Config {
    const ENV_INGREDIENT_TABLE: &'static str = "CLAIMLENS_INGREDIENT_TABLE";
    const ENV_PRODUCT_TABLE: &'static str = "CLAIMLENS_PRODUCT_TABLE";
    const ENV_COMPOSITE_TABLE: &'static str = "CLAIMLENS_COMPOSITE_TABLE";
    const ENV_QDRANT_URL: &'static str = "CLAIMLENS_QDRANT_URL";
    const ENV_QDRANT_COLLECTION: &'static str = "CLAIMLENS_QDRANT_COLLECTION";
    const ENV_TEXT_MODEL: &'static str = "CLAIMLENS_TEXT_MODEL";
    const ENV_MATCH_THRESHOLD: &'static str = "CLAIMLENS_MATCH_THRESHOLD";
    const ENV_RETRIEVAL_TOP_K: &'static str = "CLAIMLENS_RETRIEVAL_TOP_K";
    const ENV_RETRIEVAL_FETCH_K: &'static str = "CLAIMLENS_RETRIEVAL_FETCH_K";
    const ENV_DIVERSITY_WEIGHT: &'static str = "CLAIMLENS_DIVERSITY_WEIGHT";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            ingredient_table: Self::parse_path_from_env(
                Self::ENV_INGREDIENT_TABLE,
                defaults.ingredient_table,
            ),
            product_table: Self::parse_path_from_env(
                Self::ENV_PRODUCT_TABLE,
                defaults.product_table,
            ),
            composite_table: Self::parse_path_from_env(
                Self::ENV_COMPOSITE_TABLE,
                defaults.composite_table,
            ),
            qdrant_url: Self::parse_string_from_env(Self::ENV_QDRANT_URL, defaults.qdrant_url),
            qdrant_collection: Self::parse_string_from_env(
                Self::ENV_QDRANT_COLLECTION,
                defaults.qdrant_collection,
            ),
            text_model: Self::parse_string_from_env(Self::ENV_TEXT_MODEL, defaults.text_model),
            match_threshold: Self::parse_threshold_from_env(defaults.match_threshold)?,
            retrieval_top_k: Self::parse_usize_from_env(
                Self::ENV_RETRIEVAL_TOP_K,
                defaults.retrieval_top_k,
            )?,
            retrieval_fetch_k: Self::parse_usize_from_env(
                Self::ENV_RETRIEVAL_FETCH_K,
                defaults.retrieval_fetch_k,
            )?,
            diversity_weight: Self::parse_diversity_from_env(defaults.diversity_weight)?,
        })
    }

    /// Validates that the three table files exist and are files.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for path in [
            &self.ingredient_table,
            &self.product_table,
            &self.composite_table,
        ] {
            if !path.exists() {
                return Err(ConfigError::PathNotFound { path: path.clone() });
            }
            if !path.is_file() {
                return Err(ConfigError::NotAFile { path: path.clone() });
            }
        }
        Ok(())
    }

    fn parse_path_from_env(var_name: &str, default: PathBuf) -> PathBuf {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .map(PathBuf::from)
            .unwrap_or(default)
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name).unwrap_or(default)
    }

    fn parse_threshold_from_env(default: u8) -> Result<u8, ConfigError> {
        match env::var(Self::ENV_MATCH_THRESHOLD) {
            Ok(value) => {
                let threshold: u8 =
                    value
                        .parse()
                        .map_err(|source| ConfigError::NumberParseError {
                            name: Self::ENV_MATCH_THRESHOLD,
                            value: value.clone(),
                            source,
                        })?;
                if threshold > 100 {
                    return Err(ConfigError::InvalidThreshold { value });
                }
                Ok(threshold)
            }
            Err(_) => Ok(default),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        match env::var(var_name) {
            Ok(value) => value.parse().map_err(|source| ConfigError::NumberParseError {
                name: var_name,
                value,
                source,
            }),
            Err(_) => Ok(default),
        }
    }

    fn parse_diversity_from_env(default: f32) -> Result<f32, ConfigError> {
        match env::var(Self::ENV_DIVERSITY_WEIGHT) {
            Ok(value) => {
                let weight: f32 = value
                    .parse()
                    .map_err(|_| ConfigError::InvalidDiversityWeight {
                        value: value.clone(),
                    })?;
                if !(0.0..=1.0).contains(&weight) {
                    return Err(ConfigError::InvalidDiversityWeight { value });
                }
                Ok(weight)
            }
            Err(_) => Ok(default),
        }
    }
}
