use crate::config::tradeoff::Tradeoff;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::error;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct GpuTypeConfig {
    fp16_tflops_per_gpu: f64,
    tradeoff: Tradeoff,
}

impl GpuTypeConfig {
    pub fn new(fp16_tflops_per_gpu: f64, tradeoff: Tradeoff) -> Self {
        Self {
            fp16_tflops_per_gpu,
            tradeoff,
        }
    }
}

/// An accelerator class the sizer builds a recommendation for.
#[derive(Clone, Debug, PartialEq)]
pub struct GpuType {
    pub gpu_model: String,
    pub fp16_tflops_per_gpu: f64,
    pub tradeoff: Tradeoff,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ServerConfig {
    host: String,
    port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 4000,
        }
    }
}

/// Override files for the pricing catalog. Unset paths fall back to the
/// dataset bundled in the binary.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct CatalogConfig {
    skus_path: Option<PathBuf>,
    meta_path: Option<PathBuf>,
}

impl CatalogConfig {
    #[cfg(test)]
    pub fn new(skus_path: Option<PathBuf>, meta_path: Option<PathBuf>) -> Self {
        Self {
            skus_path,
            meta_path,
        }
    }

    pub fn skus_path(&self) -> Option<&Path> {
        self.skus_path.as_deref()
    }

    pub fn meta_path(&self) -> Option<&Path> {
        self.meta_path.as_deref()
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Config {
    server: ServerConfig,
    catalog: CatalogConfig,
    gpu_types: BTreeMap<String, GpuTypeConfig>,
}

impl Default for Config {
    fn default() -> Self {
        let mut gpu_types = BTreeMap::new();
        gpu_types.insert(
            "B200".to_string(),
            GpuTypeConfig::new(4500.0, Tradeoff::SpeedOptimized),
        );
        gpu_types.insert(
            "H100".to_string(),
            GpuTypeConfig::new(1979.0, Tradeoff::SpeedOptimized),
        );
        gpu_types.insert(
            "A100".to_string(),
            GpuTypeConfig::new(312.0, Tradeoff::Balanced),
        );
        gpu_types.insert(
            "L40S".to_string(),
            GpuTypeConfig::new(181.0, Tradeoff::CostOptimized),
        );
        Self {
            server: ServerConfig::default(),
            catalog: CatalogConfig::default(),
            gpu_types,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Error reading config: {0}")]
    Confy(#[from] confy::ConfyError),
    #[error("GPU type {0} must have a positive FP16 throughput")]
    InvalidGpuType(String),
    #[error("At least one GPU type must be configured")]
    NoGpuTypes,
}

impl Config {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Option<Config> {
        match Config::load_or_create(path) {
            Ok(cfg) => Some(cfg),
            Err(err) => {
                error!("Failed to load configuration: {}", err);
                None
            }
        }
    }

    fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Config, ConfigError> {
        let path = path.as_ref();

        let cfg = if path.exists() {
            confy::load_path(path)?
        } else {
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir)?;
            }
            let cfg = Config::default();
            confy::store_path(path, &cfg)?;
            cfg
        };
        cfg.validate()?;
        Ok(cfg)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.gpu_types.is_empty() {
            return Err(ConfigError::NoGpuTypes);
        }
        for (name, gpu_type) in &self.gpu_types {
            let tflops = gpu_type.fp16_tflops_per_gpu;
            if !tflops.is_finite() || tflops <= 0.0 {
                return Err(ConfigError::InvalidGpuType(name.clone()));
            }
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn set_port(&mut self, port: u16) {
        self.server.port = port;
    }

    pub fn catalog(&self) -> &CatalogConfig {
        &self.catalog
    }

    pub fn get_all_gpu_types(&self) -> Vec<GpuType> {
        self.gpu_types
            .iter()
            .map(|(name, gpu_config)| Self::get_gpu_type_from_config(name, gpu_config))
            .collect()
    }

    fn get_gpu_type_from_config(gpu_model: &str, gpu_config: &GpuTypeConfig) -> GpuType {
        GpuType {
            gpu_model: gpu_model.to_string(),
            fp16_tflops_per_gpu: gpu_config.fp16_tflops_per_gpu,
            tradeoff: gpu_config.tradeoff,
        }
    }
}
