use crate::model::{GpuSku, ProviderCostBreakdown, TrainingEstimate, TrainingWorkloadInput};
use crate::services::hardware_profiles::{estimate_days_for_gpu_count, gpu_count_for_target_days};

/// Price every candidate SKU for the workload, cheapest first.
///
/// Candidates are the SKUs in `workload`'s preferred region, or the whole
/// catalog when no region is preferred or none match it. Each SKU is sized
/// for the workload's deadline at its own throughput, then rounded up to
/// whole nodes, so the reported runtime is what that node count achieves.
pub fn compare_provider_costs(
    estimate: &TrainingEstimate,
    workload: &TrainingWorkloadInput,
    skus: &[GpuSku],
) -> Vec<ProviderCostBreakdown> {
    let in_region: Vec<&GpuSku> = match workload.preferred_region() {
        Some(region) => skus.iter().filter(|sku| sku.region == region).collect(),
        None => Vec::new(),
    };
    let candidates: Vec<&GpuSku> = if in_region.is_empty() {
        skus.iter().collect()
    } else {
        in_region
    };

    let utilization_note = format!(
        "Utilization set to {:.0}%.",
        workload.utilization * 100.0
    );

    let mut rows: Vec<ProviderCostBreakdown> = candidates
        .into_iter()
        .map(|sku| price_sku(estimate, workload.target_days, sku, &utilization_note))
        .collect();
    rows.sort_by(|a, b| a.total_usd.total_cmp(&b.total_usd));
    rows
}

fn price_sku(
    estimate: &TrainingEstimate,
    target_days: f64,
    sku: &GpuSku,
    utilization_note: &str,
) -> ProviderCostBreakdown {
    let required_gpus =
        gpu_count_for_target_days(estimate, sku.fp16_tflops_per_gpu, target_days);
    let nodes_needed = required_gpus.div_ceil(sku.gpu_count);
    let actual_gpus = nodes_needed.saturating_mul(sku.gpu_count);

    let runtime_days =
        estimate_days_for_gpu_count(estimate, actual_gpus, sku.fp16_tflops_per_gpu);
    let total_hours = runtime_days * 24.0;
    let nodes = f64::from(nodes_needed);
    let total_usd = total_hours * nodes * sku.hourly_usd;

    ProviderCostBreakdown {
        provider: sku.provider,
        sku_id: sku.id.clone(),
        region: sku.region.clone(),
        gpu_model: sku.gpu_model.clone(),
        gpu_count: actual_gpus,
        hourly_usd: sku.hourly_usd * nodes,
        estimated_days: runtime_days,
        total_usd,
        effective_usd_per_gpu_hour: total_usd / (total_hours * f64::from(actual_gpus)),
        assumptions: vec![
            utilization_note.to_string(),
            "Includes compute hourly pricing only.".to_string(),
        ],
    }
}
