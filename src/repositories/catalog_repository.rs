use crate::config::config::CatalogConfig;
use crate::model::{CatalogMetadata, GpuSku};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

const BUNDLED_SKUS: &str = include_str!("../../data/pricing/catalog.usd.json");
const BUNDLED_META: &str = include_str!("../../data/pricing/catalog.meta.json");

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Unable to read {path}: {source}")]
    Io { path: PathBuf, source: io::Error },
    #[error("Invalid pricing catalog: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid pricing catalog: skus must not be empty")]
    Empty,
    #[error("Invalid pricing catalog: SKU {id} has an invalid {field}")]
    InvalidSku { id: String, field: &'static str },
    #[error("Invalid pricing catalog: duplicate SKU id {0}")]
    DuplicateSku(String),
    #[error("Invalid catalog metadata: {0} must not be empty")]
    InvalidMetadata(&'static str),
}

#[derive(Deserialize)]
struct CatalogFile {
    skus: Vec<GpuSku>,
}

/// Validated pricing catalog. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct Catalog {
    meta: CatalogMetadata,
    skus: Vec<GpuSku>,
}

impl Catalog {
    /// Parse and validate a catalog from its two JSON documents.
    pub fn from_json(skus_json: &str, meta_json: &str) -> Result<Catalog, CatalogError> {
        let file: CatalogFile = serde_json::from_str(skus_json)?;
        let meta: CatalogMetadata = serde_json::from_str(meta_json)?;
        validate_skus(&file.skus)?;
        validate_meta(&meta)?;
        Ok(Catalog {
            meta,
            skus: file.skus,
        })
    }

    pub fn meta(&self) -> &CatalogMetadata {
        &self.meta
    }

    pub fn skus(&self) -> &[GpuSku] {
        &self.skus
    }

    pub fn has_region(&self, region: &str) -> bool {
        self.skus.iter().any(|sku| sku.region == region)
    }
}

fn validate_skus(skus: &[GpuSku]) -> Result<(), CatalogError> {
    if skus.is_empty() {
        return Err(CatalogError::Empty);
    }

    let mut seen = HashSet::new();
    for sku in skus {
        let invalid = |field| CatalogError::InvalidSku {
            id: sku.id.clone(),
            field,
        };
        if sku.id.trim().is_empty() {
            return Err(invalid("id"));
        }
        if sku.gpu_count == 0 {
            return Err(invalid("gpuCount"));
        }
        if !sku.hourly_usd.is_finite() || sku.hourly_usd <= 0.0 {
            return Err(invalid("hourlyUsd"));
        }
        if !sku.fp16_tflops_per_gpu.is_finite() || sku.fp16_tflops_per_gpu <= 0.0 {
            return Err(invalid("fp16TflopsPerGpu"));
        }
        if !seen.insert(sku.id.as_str()) {
            return Err(CatalogError::DuplicateSku(sku.id.clone()));
        }
    }
    Ok(())
}

fn validate_meta(meta: &CatalogMetadata) -> Result<(), CatalogError> {
    if meta.catalog_version.trim().is_empty() {
        return Err(CatalogError::InvalidMetadata("catalogVersion"));
    }
    if meta.refreshed_at.trim().is_empty() {
        return Err(CatalogError::InvalidMetadata("refreshedAt"));
    }
    Ok(())
}

pub struct CatalogRepository {
    config: CatalogConfig,
}

impl CatalogRepository {
    pub fn new(config: CatalogConfig) -> CatalogRepository {
        Self { config }
    }

    /// Load the catalog, preferring override files from the config and
    /// falling back to the bundled dataset.
    pub fn load(&self) -> Result<Catalog, CatalogError> {
        let skus_json = read_or_bundled(self.config.skus_path(), BUNDLED_SKUS)?;
        let meta_json = read_or_bundled(self.config.meta_path(), BUNDLED_META)?;
        let catalog = Catalog::from_json(&skus_json, &meta_json)?;
        info!(
            "Loaded pricing catalog {} with {} SKUs",
            catalog.meta().catalog_version,
            catalog.skus().len()
        );
        Ok(catalog)
    }
}

fn read_or_bundled(path: Option<&Path>, bundled: &str) -> Result<String, CatalogError> {
    match path {
        Some(path) => fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(bundled.to_string()),
    }
}
