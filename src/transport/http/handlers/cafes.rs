use crate::app::cafe_service::parse_new_price;
use crate::domain::cafe::{CafeError, RawParams};
use crate::transport::http::handlers::common::{cafe_id, query_params, FormFields};
use crate::transport::http::types::{
    AddCafeResponse, AppState, CafeResponse, CafesResponse, ErrorEnvelope, SuccessResponse,
};
use axum::extract::rejection::{PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;

#[utoipa::path(
    get,
    path = "/cafe/all",
    responses(
        (status = 200, description = "Every cafe", body = CafesResponse),
        (status = 500, description = "Internal server error", body = ErrorEnvelope)
    )
)]
pub async fn all_cafes_handler(
    State(state): State<AppState>,
) -> Result<Json<CafesResponse>, CafeError> {
    let cafes = state.service.list_all().await?;
    Ok(Json(CafesResponse { cafes }))
}

#[utoipa::path(
    get,
    path = "/cafe/random",
    responses(
        (status = 200, description = "One cafe chosen at random", body = CafeResponse),
        (status = 404, description = "The table is empty", body = ErrorEnvelope)
    )
)]
pub async fn random_cafe_handler(
    State(state): State<AppState>,
) -> Result<Json<CafeResponse>, CafeError> {
    let cafe = state.service.random().await?;
    Ok(Json(CafeResponse { cafe }))
}

#[utoipa::path(
    get,
    path = "/cafe/search",
    params(
        ("loc" = String, Query, description = "Location to match exactly")
    ),
    responses(
        (status = 200, description = "Cafes at the location", body = CafesResponse),
        (status = 400, description = "Missing 'loc' parameter", body = ErrorEnvelope),
        (status = 404, description = "No cafe at the location", body = ErrorEnvelope)
    )
)]
pub async fn search_cafes_handler(
    State(state): State<AppState>,
    query: Result<Query<RawParams>, QueryRejection>,
) -> Result<Json<CafesResponse>, CafeError> {
    let params = query_params(query)?;
    let cafes = state
        .service
        .search_by_location(params.get("loc").map(String::as_str))
        .await?;
    Ok(Json(CafesResponse { cafes }))
}

#[utoipa::path(
    post,
    path = "/cafe/add",
    request_body(
        content = String,
        content_type = "application/x-www-form-urlencoded",
        description = "name, map_url, img_url, location, seats, has_toilet, has_wifi, has_sockets, can_take_calls, coffee_price (multipart/form-data is accepted too)"
    ),
    responses(
        (status = 200, description = "Cafe added", body = AddCafeResponse),
        (status = 400, description = "Invalid, missing or incorrect parameters", body = ErrorEnvelope)
    )
)]
pub async fn add_cafe_handler(
    State(state): State<AppState>,
    FormFields(params): FormFields,
) -> Result<Json<AddCafeResponse>, CafeError> {
    state.service.create_strict(&params).await?;
    Ok(Json(AddCafeResponse {
        response: SuccessResponse::new("Successfully added the new cafe."),
    }))
}

#[utoipa::path(
    patch,
    path = "/cafe/update-price/{id}",
    params(
        ("id" = i32, Path, description = "Cafe id"),
        ("new_price" = String, Query, description = "Non-negative number")
    ),
    responses(
        (status = 200, description = "Price updated", body = SuccessResponse),
        (status = 400, description = "Invalid price", body = ErrorEnvelope),
        (status = 404, description = "No cafe with that id", body = ErrorEnvelope)
    )
)]
pub async fn update_price_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    query: Result<Query<RawParams>, QueryRejection>,
) -> Result<Json<SuccessResponse>, CafeError> {
    let params = query_params(query)?;
    let new_price = params.get("new_price").map(String::as_str);
    let id = match cafe_id(path) {
        Ok(id) => id,
        Err(not_found) => {
            // An invalid price is still reported first.
            parse_new_price(new_price)?;
            return Err(not_found);
        }
    };
    state.service.update_price(id, new_price).await?;
    Ok(Json(SuccessResponse::new("Successfully updated the price.")))
}

#[utoipa::path(
    delete,
    path = "/cafe/report-closed/{id}",
    params(
        ("id" = i32, Path, description = "Cafe id"),
        ("api-key" = String, Query, description = "Shared secret")
    ),
    responses(
        (status = 200, description = "Cafe deleted", body = SuccessResponse),
        (status = 403, description = "Wrong api key", body = ErrorEnvelope),
        (status = 404, description = "No cafe with that id", body = ErrorEnvelope)
    )
)]
pub async fn delete_cafe_handler(
    State(state): State<AppState>,
    path: Result<Path<i32>, PathRejection>,
    query: Result<Query<RawParams>, QueryRejection>,
) -> Result<Json<SuccessResponse>, CafeError> {
    let params = query_params(query)?;
    let api_key = params.get("api-key").map(String::as_str);
    let id = match cafe_id(path) {
        Ok(id) => id,
        Err(not_found) => {
            state.service.authorize(api_key)?;
            return Err(not_found);
        }
    };
    state.service.delete(id, api_key).await?;
    Ok(Json(SuccessResponse::new("this cafe was successfully deleted.")))
}
