use crate::model::{TrainingEstimate, TrainingWorkloadInput};

/// Forward plus backward pass cost per parameter per token.
const FLOPS_PER_PARAM_TOKEN: f64 = 6.0;
/// FLOPs in one petaFLOP.
pub const PFLOP_TO_FLOP: f64 = 1e15;
/// Reference accelerator throughput (A100, dense FP16) used for GPU-hours.
const REFERENCE_TFLOPS: f64 = 312.0;
const BILLION: f64 = 1e9;

/// Convert a workload into the compute volume it needs.
///
/// * `total_flops` – `6 × params × tokens`.
/// * `gpu_hours_required` – the volume expressed against the reference
///   accelerator, which is credited with `312e12 / 1e15` petaFLOP per hour.
/// * `effective_pf_days` – petaFLOP per day the cluster must sustain to finish
///   on time, inflated by `1 / utilization`.
///
/// The input is expected to be validated already (positive values,
/// utilization in `[0.2, 1]`).
pub fn estimate_training(input: &TrainingWorkloadInput) -> TrainingEstimate {
    let total_flops = FLOPS_PER_PARAM_TOKEN
        * input.model_params_b
        * BILLION
        * input.training_tokens_b
        * BILLION;
    let total_pf = total_flops / PFLOP_TO_FLOP;

    let pf_per_day_target = total_pf / input.target_days;
    let effective_pf_days = pf_per_day_target / input.utilization;

    let reference_pf_per_hour = REFERENCE_TFLOPS * 1e12 / PFLOP_TO_FLOP;
    let gpu_hours_required = total_pf / reference_pf_per_hour;

    TrainingEstimate {
        total_flops,
        gpu_hours_required,
        effective_pf_days,
        utilization: input.utilization,
    }
}
