use crate::model::{CatalogMetadata, GpuSku};
use crate::services::planner::PlannerState;
use axum::Json;
use axum::extract::State;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct PricingCatalogResponse {
    meta: CatalogMetadata,
    skus: Vec<GpuSku>,
}

pub async fn get_catalog(State(planner): State<PlannerState>) -> Json<PricingCatalogResponse> {
    let catalog = planner.catalog();
    Json(PricingCatalogResponse {
        meta: catalog.meta().clone(),
        skus: catalog.skus().to_vec(),
    })
}

pub async fn get_catalog_meta(State(planner): State<PlannerState>) -> Json<CatalogMetadata> {
    Json(planner.catalog().meta().clone())
}
