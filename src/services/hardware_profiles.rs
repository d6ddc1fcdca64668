use crate::config::config::GpuType;
use crate::model::{HardwareRecommendation, TrainingEstimate};
use crate::services::training_estimator::PFLOP_TO_FLOP;

/// Clusters are provisioned in node-sized steps of this many GPUs.
pub const GPU_INCREMENT: u32 = 8;
/// Largest cluster the sizer reports. Leaves headroom in `u32` for rounding
/// up to the increment and to whole catalog nodes.
pub const MAX_GPU_COUNT: u32 = 1 << 30;
const HOURS_PER_DAY: f64 = 24.0;

/// A rating of `T` TFLOPS is credited with `T / 1000` petaFLOP per hour.
fn pf_per_hour_per_gpu(fp16_tflops_per_gpu: f64) -> f64 {
    fp16_tflops_per_gpu / 1000.0
}

fn round_up_to_increment(n: f64, increment: u32) -> u32 {
    let steps = (n / f64::from(increment)).ceil() as u32;
    steps.max(1).saturating_mul(increment)
}

/// Fractional GPU count that finishes `estimate` in exactly `target_days`.
pub fn raw_gpu_count(
    estimate: &TrainingEstimate,
    fp16_tflops_per_gpu: f64,
    target_days: f64,
) -> f64 {
    let total_pf = estimate.total_flops / PFLOP_TO_FLOP;
    total_pf
        / (target_days
            * HOURS_PER_DAY
            * pf_per_hour_per_gpu(fp16_tflops_per_gpu)
            * estimate.utilization)
}

/// Whether `estimate` can be met within `target_days` by at most
/// [`MAX_GPU_COUNT`] GPUs of the given throughput. False for non-finite
/// compute volumes.
pub fn fits_cluster_limit(
    estimate: &TrainingEstimate,
    fp16_tflops_per_gpu: f64,
    target_days: f64,
) -> bool {
    let raw = raw_gpu_count(estimate, fp16_tflops_per_gpu, target_days);
    raw.is_finite() && raw <= f64::from(MAX_GPU_COUNT)
}

/// GPUs needed to meet `target_days`, rounded up to a whole number of
/// [`GPU_INCREMENT`]s. Never less than one increment. Callers are expected
/// to have checked [`fits_cluster_limit`].
pub fn gpu_count_for_target_days(
    estimate: &TrainingEstimate,
    fp16_tflops_per_gpu: f64,
    target_days: f64,
) -> u32 {
    round_up_to_increment(
        raw_gpu_count(estimate, fp16_tflops_per_gpu, target_days),
        GPU_INCREMENT,
    )
}

fn days_for_fractional_gpus(
    estimate: &TrainingEstimate,
    gpus: f64,
    fp16_tflops_per_gpu: f64,
) -> f64 {
    let total_pf = estimate.total_flops / PFLOP_TO_FLOP;
    let pf_per_hour = pf_per_hour_per_gpu(fp16_tflops_per_gpu) * gpus;
    total_pf / (pf_per_hour * HOURS_PER_DAY * estimate.utilization)
}

/// Days `gpu_count` accelerators need to work through `estimate`.
pub fn estimate_days_for_gpu_count(
    estimate: &TrainingEstimate,
    gpu_count: u32,
    fp16_tflops_per_gpu: f64,
) -> f64 {
    days_for_fractional_gpus(estimate, f64::from(gpu_count), fp16_tflops_per_gpu)
}

/// Size every GPU type for `target_days`. Fewest GPUs first; equal counts
/// put the faster card first.
pub fn recommend_hardware_profiles(
    estimate: &TrainingEstimate,
    target_days: f64,
    gpu_types: &[GpuType],
) -> Vec<HardwareRecommendation> {
    let mut sized: Vec<(&GpuType, HardwareRecommendation)> = gpu_types
        .iter()
        .map(|gpu| {
            let gpu_count =
                gpu_count_for_target_days(estimate, gpu.fp16_tflops_per_gpu, target_days);
            let estimated_days =
                estimate_days_for_gpu_count(estimate, gpu_count, gpu.fp16_tflops_per_gpu);
            let delta = estimated_days - target_days;

            let rationale = if delta <= 0.0 {
                format!(
                    "Meets target timeline with ~{:.1} days of buffer.",
                    delta.abs()
                )
            } else {
                format!(
                    "Slightly over target by ~{:.1} days (GPU count rounded to {}s).",
                    delta, GPU_INCREMENT
                )
            };

            let recommendation = HardwareRecommendation {
                profile_id: format!("{}x{}", gpu.gpu_model.to_lowercase(), gpu_count),
                title: format!("{}x {} cluster", gpu_count, gpu.gpu_model),
                gpu_model: gpu.gpu_model.clone(),
                gpu_count,
                estimated_days,
                rationale,
                tradeoff: gpu.tradeoff,
            };
            (gpu, recommendation)
        })
        .collect();

    sized.sort_by(|(gpu_a, a), (gpu_b, b)| {
        a.gpu_count
            .cmp(&b.gpu_count)
            .then_with(|| gpu_b.fp16_tflops_per_gpu.total_cmp(&gpu_a.fp16_tflops_per_gpu))
            .then_with(|| a.gpu_model.cmp(&b.gpu_model))
    });
    sized
        .into_iter()
        .map(|(_, recommendation)| recommendation)
        .collect()
}
