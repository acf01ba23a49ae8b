//! Catalog and history sources.
//!
//! The engine only needs a snapshot of products and a history map; where
//! they come from is up to the caller. File-backed sources read the JSON
//! the product and posts services return.

use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

use crate::history::History;
use crate::types::Product;

/// Provides a read-only product snapshot for one planning run.
pub trait CatalogSource {
    fn snapshot(&self) -> anyhow::Result<Vec<Product>>;
}

/// Provides per-product last-activity timestamps from published posts.
pub trait HistorySource {
    fn history(&self) -> anyhow::Result<History>;
}

/// In-memory catalog, mostly for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    products: Vec<Product>,
}

impl StaticCatalog {
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }
}

impl CatalogSource for StaticCatalog {
    fn snapshot(&self) -> anyhow::Result<Vec<Product>> {
        Ok(self.products.clone())
    }
}

impl HistorySource for History {
    fn history(&self) -> anyhow::Result<History> {
        Ok(self.clone())
    }
}

/// The product service returns either a bare array or a page.
#[derive(Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    Page { data: Vec<Product> },
    List(Vec<Product>),
}

#[derive(Debug, Clone)]
pub struct JsonFileCatalog {
    path: PathBuf,
}

impl JsonFileCatalog {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl CatalogSource for JsonFileCatalog {
    fn snapshot(&self) -> anyhow::Result<Vec<Product>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading catalog {}", self.path.display()))?;
        let file: CatalogFile = serde_json::from_str(&content)
            .with_context(|| format!("parsing catalog {}", self.path.display()))?;
        Ok(match file {
            CatalogFile::Page { data } => data,
            CatalogFile::List(products) => products,
        })
    }
}

#[derive(Debug, Clone)]
pub struct JsonFileHistory {
    path: PathBuf,
}

impl JsonFileHistory {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self { path: path.as_ref().to_path_buf() }
    }
}

impl HistorySource for JsonFileHistory {
    fn history(&self) -> anyhow::Result<History> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("reading history {}", self.path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("parsing history {}", self.path.display()))
    }
}
