use crate::app::CafeService;
use crate::domain::cafe::Cafe;
use crate::infra::ApiDocumentation;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<CafeService>,
    pub documentation: Arc<ApiDocumentation>,
}

/// Body of every failed JSON request.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct ErrorEnvelope {
    /// Error kind slug, e.g. `invalid value`.
    pub error: String,
    pub message: String,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct CafesResponse {
    pub cafes: Vec<Cafe>,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct CafeResponse {
    pub cafe: Cafe,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct SuccessResponse {
    pub success: String,
}

impl SuccessResponse {
    pub fn new(message: &str) -> Self {
        Self {
            success: message.to_string(),
        }
    }
}

/// `POST /cafe/add` nests its success message one level deeper than the other writes.
#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct AddCafeResponse {
    pub response: SuccessResponse,
}

#[derive(Serialize, Deserialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
