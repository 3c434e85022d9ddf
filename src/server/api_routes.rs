//! Method-call routes: inbound query parameters in, vendor JSON out.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::api::plant_request::PlantInfo;
use crate::error::OssError;
use crate::server::server::AppState;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantQuery {
    pub plant_id: Option<String>,
    pub account_name: Option<String>,
    pub server_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SerialQuery {
    pub serial_number: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/active-equipment", get(active_equipment))
        .route("/api/serial-number", get(serial_number))
        .route("/api/devices", get(devices))
        .route("/api/first-active-equipment", get(first_active_equipment))
        .route("/api/plant-info", get(plant_info))
}

async fn active_equipment(
    State(state): State<AppState>,
    Query(query): Query<PlantQuery>,
) -> Result<Json<Value>, OssError> {
    let plant_id = query.plant_id.unwrap_or_default();
    let account_name = query.account_name.unwrap_or_default();
    state
        .client
        .active_equipment(&plant_id, &account_name)
        .await
        .map(Json)
}

async fn serial_number(
    State(state): State<AppState>,
    Query(query): Query<SerialQuery>,
) -> Result<Json<Value>, OssError> {
    let serial_number = query.serial_number.unwrap_or_default();
    state.client.search_serial_number(&serial_number).await.map(Json)
}

async fn devices(
    State(state): State<AppState>,
    Query(query): Query<PlantQuery>,
) -> Result<Json<Value>, OssError> {
    let plant_id = query.plant_id.unwrap_or_default();
    let account_name = query.account_name.unwrap_or_default();
    let server_id = query.server_id.unwrap_or_default();
    state
        .client
        .devices_by_plant_query(&plant_id, &account_name, &server_id)
        .await
        .map(Json)
}

async fn first_active_equipment(
    State(state): State<AppState>,
    Query(query): Query<SerialQuery>,
) -> Result<Json<Vec<Value>>, OssError> {
    let serial_number = query.serial_number.unwrap_or_default();
    state.client.first_active_equipment(&serial_number).await.map(Json)
}

async fn plant_info(
    State(state): State<AppState>,
    Query(query): Query<SerialQuery>,
) -> Result<Json<PlantInfo>, OssError> {
    let serial_number = query.serial_number.unwrap_or_default();
    state.client.plant_info(&serial_number).await.map(Json)
}

impl IntoResponse for OssError {
    fn into_response(self) -> Response {
        let status = match &self {
            OssError::MissingParameter(_) | OssError::InvalidParameter { .. } => {
                StatusCode::BAD_REQUEST
            }
            OssError::NotFound(_) => StatusCode::NOT_FOUND,
            OssError::Http { .. } | OssError::TokenAbsent | OssError::Decode { .. } => {
                StatusCode::BAD_GATEWAY
            }
        };
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
