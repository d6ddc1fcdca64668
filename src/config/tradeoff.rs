use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Qualitative label attached to a hardware profile.
#[derive(Serialize, Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Tradeoff {
    SpeedOptimized,
    #[default]
    Balanced,
    CostOptimized,
}

impl Display for Tradeoff {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let str = match self {
            Tradeoff::SpeedOptimized => "speed_optimized",
            Tradeoff::Balanced => "balanced",
            Tradeoff::CostOptimized => "cost_optimized",
        };
        write!(f, "{}", str)
    }
}
