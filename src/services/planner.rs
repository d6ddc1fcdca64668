use crate::config::config::GpuType;
use crate::model::{CatalogSummary, EstimateScenarioResponse, TrainingWorkloadInput};
use crate::repositories::catalog_repository::Catalog;
use crate::services::hardware_profiles::{fits_cluster_limit, recommend_hardware_profiles};
use crate::services::provider_comparator::compare_provider_costs;
use crate::services::training_estimator::estimate_training;
use std::sync::Arc;
use tracing::{debug, warn};

const CAVEATS: [&str; 2] = [
    "Pricing excludes storage, networking, and support plan charges.",
    "Training throughput assumptions are approximate and should be validated with pilot runs.",
];

/// Process-wide planning state. Built once at startup and never mutated.
pub struct Planner {
    catalog: Catalog,
    gpu_types: Vec<GpuType>,
}

pub type PlannerState = Arc<Planner>;

impl Planner {
    pub fn new(catalog: Catalog, gpu_types: Vec<GpuType>) -> Self {
        Self { catalog, gpu_types }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    fn slowest_tflops_per_gpu(&self) -> f64 {
        self.gpu_types
            .iter()
            .map(|gpu| gpu.fp16_tflops_per_gpu)
            .chain(self.catalog.skus().iter().map(|sku| sku.fp16_tflops_per_gpu))
            .fold(f64::INFINITY, f64::min)
    }

    /// Whether every GPU type and SKU can be sized for `workload` without
    /// exceeding the cluster limit. Expects the field ranges to be valid.
    pub fn within_cluster_limit(&self, workload: &TrainingWorkloadInput) -> bool {
        let estimate = estimate_training(workload);
        fits_cluster_limit(
            &estimate,
            self.slowest_tflops_per_gpu(),
            workload.target_days,
        )
    }

    /// Run the estimate → sizing → pricing pipeline for a validated workload.
    pub fn plan(&self, workload: TrainingWorkloadInput) -> EstimateScenarioResponse {
        let estimate = estimate_training(&workload);
        let recommendations =
            recommend_hardware_profiles(&estimate, workload.target_days, &self.gpu_types);
        let provider_comparison =
            compare_provider_costs(&estimate, &workload, self.catalog.skus());
        debug!(
            "Estimated {:.3e} FLOPs, {} profiles, {} priced SKUs",
            estimate.total_flops,
            recommendations.len(),
            provider_comparison.len()
        );
        for recommendation in &recommendations {
            debug!(
                "{} ({}): {:.1} days",
                recommendation.title, recommendation.tradeoff, recommendation.estimated_days
            );
        }

        let mut caveats: Vec<String> = CAVEATS.iter().map(|c| c.to_string()).collect();
        if let Some(region) = workload.preferred_region()
            && !self.catalog.has_region(region)
        {
            warn!("No catalog entries in region {}, comparing all regions", region);
            caveats.push(format!(
                "No catalog entries in region '{}'; showing all regions.",
                region
            ));
        }

        let meta = self.catalog.meta();
        EstimateScenarioResponse {
            assumptions: workload,
            estimate,
            recommendations,
            provider_comparison,
            catalog: CatalogSummary {
                catalog_version: meta.catalog_version.clone(),
                refreshed_at: meta.refreshed_at.clone(),
                currency: meta.currency,
            },
            caveats,
        }
    }
}
