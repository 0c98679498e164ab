//! Model info handler

use axum::{extract::State, Json};
use nids_core::{top_features, Classifier, FeatureImportance};
use serde::Serialize;

use crate::AppState;

const TOP_FEATURES: usize = 5;

#[derive(Debug, Serialize)]
pub struct ModelInfoResponse {
    trees: usize,
    features: usize,
    pool_rows: usize,
    top_features: Vec<FeatureImportance>,
}

pub async fn info(State(state): State<AppState>) -> Json<ModelInfoResponse> {
    Json(ModelInfoResponse {
        trees: state.model.n_trees(),
        features: state.model.n_features(),
        pool_rows: state.simulator.pool().len(),
        top_features: top_features(&state.model, TOP_FEATURES),
    })
}
