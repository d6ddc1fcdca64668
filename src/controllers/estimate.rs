use crate::app_error::{AppError, ValidationIssue};
use crate::model::{EstimateScenarioResponse, TrainingWorkloadInput};
use crate::services::hardware_profiles::MAX_GPU_COUNT;
use crate::services::planner::{Planner, PlannerState};
use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;

const MIN_UTILIZATION: f64 = 0.2;
const MAX_UTILIZATION: f64 = 1.0;

pub async fn post_estimate(
    State(planner): State<PlannerState>,
    payload: Result<Json<TrainingWorkloadInput>, JsonRejection>,
) -> Result<Json<EstimateScenarioResponse>, AppError> {
    let Json(workload) =
        payload.map_err(|rejection| AppError::InvalidPayload(rejection.body_text()))?;
    validate_workload(&workload, &planner)?;
    Ok(Json(planner.plan(workload)))
}

/// Collect every field that is out of range rather than stopping at the first.
/// Workloads with valid fields are then checked against the cluster limit.
fn validate_workload(workload: &TrainingWorkloadInput, planner: &Planner) -> Result<(), AppError> {
    let mut issues = Vec::new();

    let positive_fields = [
        ("modelParamsB", workload.model_params_b),
        ("trainingTokensB", workload.training_tokens_b),
        ("targetDays", workload.target_days),
    ];
    for (field, value) in positive_fields {
        if !value.is_finite() || value <= 0.0 {
            issues.push(ValidationIssue::new(field, "must be a number greater than 0"));
        }
    }

    let utilization = workload.utilization;
    if !(MIN_UTILIZATION..=MAX_UTILIZATION).contains(&utilization) {
        issues.push(ValidationIssue::new(
            "utilization",
            format!(
                "must be between {} and {}",
                MIN_UTILIZATION, MAX_UTILIZATION
            ),
        ));
    }

    if issues.is_empty() && !planner.within_cluster_limit(workload) {
        issues.push(ValidationIssue::new(
            "targetDays",
            format!(
                "workload needs more than {} GPUs to finish in time; extend targetDays or reduce the workload",
                MAX_GPU_COUNT
            ),
        ));
    }

    if issues.is_empty() {
        Ok(())
    } else {
        Err(AppError::InvalidWorkload(issues))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::config::Config;
    use crate::controllers::tests::send;
    use crate::repositories::catalog_repository::tests::bundled;
    use crate::services::training_estimator::tests::small;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};

    async fn post(body: String) -> (StatusCode, Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/api/estimate")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        send(request).await
    }

    fn planner() -> Planner {
        Planner::new(bundled(), Config::default().get_all_gpu_types())
    }

    fn issue_fields(body: &Value) -> Vec<&str> {
        body["issues"]
            .as_array()
            .unwrap()
            .iter()
            .map(|issue| issue["field"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn accepts_boundary_utilization() {
        for utilization in [0.2, 1.0] {
            let workload = TrainingWorkloadInput {
                utilization,
                ..small()
            };
            assert!(validate_workload(&workload, &planner()).is_ok());
        }
    }

    #[test]
    fn reports_every_invalid_field() {
        let workload = TrainingWorkloadInput {
            model_params_b: 0.0,
            training_tokens_b: -5.0,
            target_days: 10.0,
            utilization: 0.1,
            preferred_region: None,
        };
        let Err(AppError::InvalidWorkload(issues)) = validate_workload(&workload, &planner()) else {
            panic!("expected validation failure");
        };
        let fields: Vec<&str> = issues.iter().map(|issue| issue.field.as_str()).collect();
        assert_eq!(fields, vec!["modelParamsB", "trainingTokensB", "utilization"]);
    }

    #[tokio::test]
    async fn estimate_returns_full_scenario() {
        let (status, body) = post(
            json!({
                "modelParamsB": 7,
                "trainingTokensB": 300,
                "targetDays": 10,
                "utilization": 0.5,
                "preferredRegion": "us-east-1"
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["assumptions"]["preferredRegion"], "us-east-1");
        assert_eq!(body["estimate"]["totalFlops"].as_f64(), Some(1.26e22));
        assert_eq!(body["recommendations"].as_array().unwrap().len(), 4);
        assert_eq!(body["recommendations"][0]["tradeoff"], "speed_optimized");

        let rows = body["providerComparison"].as_array().unwrap();
        assert!(!rows.is_empty());
        assert!(rows.iter().all(|row| row["region"] == "us-east-1"));
        let totals: Vec<f64> = rows
            .iter()
            .map(|row| row["totalUsd"].as_f64().unwrap())
            .collect();
        assert!(totals.windows(2).all(|pair| pair[0] <= pair[1]));

        assert_eq!(body["catalog"]["currency"], "USD");
        assert_eq!(body["caveats"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn out_of_range_input_is_rejected_with_issues() {
        let (status, body) = post(
            json!({
                "modelParamsB": 7,
                "trainingTokensB": 300,
                "targetDays": 0,
                "utilization": 1.5
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid workload input");
        assert_eq!(issue_fields(&body), vec!["targetDays", "utilization"]);
    }

    #[test]
    fn overflowing_compute_is_rejected() {
        let workload = TrainingWorkloadInput {
            model_params_b: 1e200,
            training_tokens_b: 1e200,
            ..small()
        };
        let Err(AppError::InvalidWorkload(issues)) = validate_workload(&workload, &planner()) else {
            panic!("expected validation failure");
        };
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].field, "targetDays");
    }

    #[tokio::test]
    async fn oversized_cluster_is_rejected_at_the_boundary() {
        let (status, body) = post(
            json!({
                "modelParamsB": 1e6,
                "trainingTokensB": 1e6,
                "targetDays": 0.001,
                "utilization": 0.2
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(issue_fields(&body), vec!["targetDays"]);
    }

    #[tokio::test]
    async fn accepted_counts_are_multiples_of_eight() {
        let (status, body) = post(
            json!({
                "modelParamsB": 180,
                "trainingTokensB": 20000,
                "targetDays": 60,
                "utilization": 0.4
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        for recommendation in body["recommendations"].as_array().unwrap() {
            let count = recommendation["gpuCount"].as_u64().unwrap();
            assert_eq!(count % 8, 0);
            assert!(count <= u64::from(MAX_GPU_COUNT));
            assert!(
                recommendation["rationale"]
                    .as_str()
                    .unwrap()
                    .starts_with("Meets target timeline")
            );
        }
        assert!(body["estimate"]["totalFlops"].is_f64());
    }

    #[tokio::test]
    async fn wrong_types_are_rejected_as_body_issue() {
        let (status, body) = post(
            json!({
                "modelParamsB": "seven",
                "trainingTokensB": 300,
                "targetDays": 10,
                "utilization": 0.5
            })
            .to_string(),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(issue_fields(&body), vec!["body"]);
    }

    #[tokio::test]
    async fn malformed_json_is_rejected() {
        let (status, body) = post("{not json".to_string()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(issue_fields(&body), vec!["body"]);
    }
}
