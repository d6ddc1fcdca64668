use crate::config::tradeoff::Tradeoff;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingWorkloadInput {
    pub model_params_b: f64,
    pub training_tokens_b: f64,
    pub target_days: f64,
    pub utilization: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferred_region: Option<String>,
}

impl TrainingWorkloadInput {
    /// The preferred region, ignoring blank strings.
    pub fn preferred_region(&self) -> Option<&str> {
        self.preferred_region
            .as_deref()
            .map(str::trim)
            .filter(|region| !region.is_empty())
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrainingEstimate {
    pub total_flops: f64,
    pub gpu_hours_required: f64,
    pub effective_pf_days: f64,
    pub utilization: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HardwareRecommendation {
    pub profile_id: String,
    pub title: String,
    pub gpu_model: String,
    pub gpu_count: u32,
    pub estimated_days: f64,
    pub rationale: String,
    pub tradeoff: Tradeoff,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Aws,
    Gcp,
    Coreweave,
    Runpod,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GpuSku {
    pub id: String,
    pub provider: Provider,
    pub display_name: String,
    pub gpu_model: String,
    pub gpu_count: u32,
    pub region: String,
    /// Price of one node (all `gpu_count` GPUs) per hour.
    pub hourly_usd: f64,
    pub fp16_tflops_per_gpu: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Currency {
    #[serde(rename = "USD")]
    Usd,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogMetadata {
    pub catalog_version: String,
    pub currency: Currency,
    pub refreshed_at: String,
    #[serde(default)]
    pub source_notes: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProviderCostBreakdown {
    pub provider: Provider,
    pub sku_id: String,
    pub region: String,
    pub gpu_model: String,
    pub gpu_count: u32,
    pub hourly_usd: f64,
    pub estimated_days: f64,
    pub total_usd: f64,
    pub effective_usd_per_gpu_hour: f64,
    pub assumptions: Vec<String>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    pub catalog_version: String,
    pub refreshed_at: String,
    pub currency: Currency,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct EstimateScenarioResponse {
    pub assumptions: TrainingWorkloadInput,
    pub estimate: TrainingEstimate,
    pub recommendations: Vec<HardwareRecommendation>,
    pub provider_comparison: Vec<ProviderCostBreakdown>,
    pub catalog: CatalogSummary,
    pub caveats: Vec<String>,
}
