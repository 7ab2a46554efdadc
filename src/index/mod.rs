//! Exact-key efficacy lookup tables.
//!
//! Three read-only maps built once at startup: ingredient-keyed, composite
//! `(product, ingredient)`-keyed, and product-name-keyed. Lookups are pure key
//! equality; fuzzy comparison happens later in [`crate::matching`]. Absence is
//! an expected outcome (`no_info`), never an error.

pub mod error;


pub use error::IndexError;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use tracing::{info, warn};

/// Which table an efficacy text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceTag {
    /// Ingredient-keyed functional-materials table (tier 1).
    IngredientDb,
    /// Composite `(product, ingredient)`-keyed claims table (tier 2).
    CompositeDb,
    /// Product-name-keyed table used for the whole-product fallback (tier 3).
    ProductDb,
}

impl SourceTag {
    /// Short label used in composed reports.
    pub fn label(&self) -> &'static str {
        match self {
            SourceTag::IngredientDb => "ingredient table",
            SourceTag::CompositeDb => "product+ingredient table",
            SourceTag::ProductDb => "product table",
        }
    }
}

/// Column contracts for the three tabular sources.
pub const INGREDIENT_NAME_COL: &str = "raw_material_name";
pub const INGREDIENT_EFFICACY_COL: &str = "functionality_text";
pub const PRODUCT_NAME_COL: &str = "item_name";
pub const PRODUCT_EFFICACY_COL: &str = "efficacy_text";
pub const COMPOSITE_PRODUCT_COL: &str = "product_name";
pub const COMPOSITE_INGREDIENT_COL: &str = "ingredient_label";
pub const COMPOSITE_EFFICACY_COL: &str = "functionality_text";

/// File paths for the three tables.
#[derive(Debug, Clone)]
pub struct TableSources {
    pub ingredient_table: PathBuf,
    pub product_table: PathBuf,
    pub composite_table: PathBuf,
}

/// Immutable efficacy lookup index.
///
/// Built once, never mutated afterward; safe to share behind an `Arc` across
/// concurrent readers. Duplicate keys are last-write-wins, matching the
/// upstream dataset semantics.
#[derive(Debug, Default)]
pub struct EfficacyIndex {
    ingredient: HashMap<String, String>,
    product: HashMap<String, String>,
    composite: HashMap<(String, String), String>,
}

impl EfficacyIndex {
    /// Builds an index from in-memory rows. Composite keys are trimmed.
    ///
    /// Test fixtures and non-CSV loaders go through here; the CSV loader
    /// ([`EfficacyIndex::load`]) reduces to this after column resolution.
    pub fn from_rows(
        ingredient_rows: impl IntoIterator<Item = (String, String)>,
        product_rows: impl IntoIterator<Item = (String, String)>,
        composite_rows: impl IntoIterator<Item = (String, String, String)>,
    ) -> Self {
        let ingredient: HashMap<String, String> = ingredient_rows.into_iter().collect();
        let product: HashMap<String, String> = product_rows.into_iter().collect();

        let mut composite = HashMap::new();
        for (product_name, ingredient_label, efficacy) in composite_rows {
            let product_key = product_name.trim().to_string();
            let ingredient_key = ingredient_label.trim().to_string();
            if product_key.is_empty() || ingredient_key.is_empty() {
                continue;
            }
            composite.insert((product_key, ingredient_key), efficacy);
        }

        Self {
            ingredient,
            product,
            composite,
        }
    }

    /// Loads the three CSV tables described by `sources`.
    ///
    /// A composite table with missing columns degrades to an empty composite
    /// map with a warning; the ingredient and product tables must carry their
    /// contracted columns.
    pub fn load(sources: &TableSources) -> Result<Self, IndexError> {
        let ingredient = load_two_column_table(
            &sources.ingredient_table,
            INGREDIENT_NAME_COL,
            INGREDIENT_EFFICACY_COL,
        )?;
        let product = load_two_column_table(
            &sources.product_table,
            PRODUCT_NAME_COL,
            PRODUCT_EFFICACY_COL,
        )?;
        let composite_rows = load_composite_table(&sources.composite_table)?;

        let index = Self::from_rows(ingredient, product, composite_rows);
        info!(
            ingredient_entries = index.ingredient.len(),
            product_entries = index.product.len(),
            composite_entries = index.composite.len(),
            "Efficacy index loaded"
        );
        Ok(index)
    }

    /// Tier 1: ingredient-only key.
    pub fn lookup_ingredient(&self, ingredient: &str) -> Option<&str> {
        self.ingredient.get(ingredient).map(String::as_str)
    }

    /// Tier 2: composite `(product, ingredient)` key. Both parts are trimmed
    /// the same way the table keys were.
    pub fn lookup_composite(&self, product: &str, ingredient: &str) -> Option<&str> {
        self.composite
            .get(&(product.trim().to_string(), ingredient.trim().to_string()))
            .map(String::as_str)
    }

    /// Tier 3: product-name key.
    pub fn lookup_product(&self, product: &str) -> Option<&str> {
        self.product.get(product).map(String::as_str)
    }

    /// Entry counts `(ingredient, composite, product)`, used by startup logs.
    pub fn entry_counts(&self) -> (usize, usize, usize) {
        (
            self.ingredient.len(),
            self.composite.len(),
            self.product.len(),
        )
    }

    /// Returns `true` when all three maps are empty.
    pub fn is_empty(&self) -> bool {
        self.ingredient.is_empty() && self.composite.is_empty() && self.product.is_empty()
    }
}

fn column_position(headers: &csv::StringRecord, name: &str) -> Option<usize> {
    headers.iter().position(|h| h.trim() == name)
}

fn load_two_column_table(
    path: &Path,
    key_col: &'static str,
    value_col: &'static str,
) -> Result<Vec<(String, String)>, IndexError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| IndexError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let headers = reader
        .headers()
        .map_err(|source| IndexError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let key_idx = column_position(&headers, key_col).ok_or(IndexError::MissingColumn {
        path: path.to_path_buf(),
        column: key_col,
    })?;
    let value_idx = column_position(&headers, value_col).ok_or(IndexError::MissingColumn {
        path: path.to_path_buf(),
        column: value_col,
    })?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IndexError::MalformedRecord {
            path: path.to_path_buf(),
            source,
        })?;
        let key = record.get(key_idx).unwrap_or_default();
        let value = record.get(value_idx).unwrap_or_default();
        if key.is_empty() {
            continue;
        }
        rows.push((key.to_string(), value.to_string()));
    }

    Ok(rows)
}

fn load_composite_table(path: &Path) -> Result<Vec<(String, String, String)>, IndexError> {
    let mut reader = csv::Reader::from_path(path).map_err(|source| IndexError::ReadFailed {
        path: path.to_path_buf(),
        source,
    })?;

    let headers = reader
        .headers()
        .map_err(|source| IndexError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?
        .clone();

    let positions = (
        column_position(&headers, COMPOSITE_PRODUCT_COL),
        column_position(&headers, COMPOSITE_INGREDIENT_COL),
        column_position(&headers, COMPOSITE_EFFICACY_COL),
    );

    // Degrade-not-fail: a schema drift in the composite source must not block
    // startup, only empty out tier 2.
    let (Some(product_idx), Some(ingredient_idx), Some(efficacy_idx)) = positions else {
        warn!(
            path = %path.display(),
            "composite table is missing required columns; composite lookups will be empty"
        );
        return Ok(Vec::new());
    };

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|source| IndexError::MalformedRecord {
            path: path.to_path_buf(),
            source,
        })?;
        rows.push((
            record.get(product_idx).unwrap_or_default().to_string(),
            record.get(ingredient_idx).unwrap_or_default().to_string(),
            record.get(efficacy_idx).unwrap_or_default().to_string(),
        ));
    }

    Ok(rows)
}
