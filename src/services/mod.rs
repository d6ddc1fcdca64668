pub mod hardware_profiles;
pub mod planner;
pub mod provider_comparator;
pub mod training_estimator;
