use crate::app::cafe_service::CAFE_NOT_FOUND;
use crate::domain::cafe::{CafeError, RawParams};
use crate::transport::http::types::ErrorEnvelope;
use axum::async_trait;
use axum::extract::rejection::{FormRejection, PathRejection, QueryRejection};
use axum::extract::{Form, FromRequest, Multipart, Path, Query, Request};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

impl IntoResponse for CafeError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        if let CafeError::Internal(source) = &self {
            tracing::error!(error = ?source, "request failed on a backend error");
        } else {
            tracing::debug!(kind = kind.slug(), message = %self, "request rejected");
        }
        let status =
            StatusCode::from_u16(kind.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            Json(ErrorEnvelope {
                error: kind.slug().to_string(),
                message: self.message(),
            }),
        )
            .into_response()
    }
}

/// Malformed query strings are reported as invalid values rather than axum's plain-text 400.
pub fn query_params(query: Result<Query<RawParams>, QueryRejection>) -> Result<RawParams, CafeError> {
    query
        .map(|Query(params)| params)
        .map_err(|e| CafeError::InvalidValue(format!("the query string could not be parsed: {}", e)))
}

fn form_params(form: Result<Form<RawParams>, FormRejection>) -> Result<RawParams, CafeError> {
    form.map(|Form(params)| params).map_err(unreadable_form)
}

fn unreadable_form(e: impl std::fmt::Display) -> CafeError {
    CafeError::IncorrectParameters(format!(
        "The parameters must be sent as a form-encoded body: {}",
        e
    ))
}

/// Form fields of a request body, read from either `application/x-www-form-urlencoded` or
/// `multipart/form-data`. A repeated field keeps its last value.
pub struct FormFields(pub RawParams);

#[async_trait]
impl<S> FromRequest<S> for FormFields
where
    S: Send + Sync,
{
    type Rejection = CafeError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.to_ascii_lowercase().starts_with("multipart/form-data"));
        if !is_multipart {
            return form_params(Form::<RawParams>::from_request(req, state).await).map(FormFields);
        }

        let mut multipart = Multipart::from_request(req, state)
            .await
            .map_err(unreadable_form)?;
        let mut params = RawParams::new();
        while let Some(field) = multipart.next_field().await.map_err(unreadable_form)? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            let value = field.text().await.map_err(unreadable_form)?;
            params.insert(name, value);
        }
        Ok(FormFields(params))
    }
}

/// A non-integer id cannot name any cafe.
pub fn cafe_id(path: Result<Path<i32>, PathRejection>) -> Result<i32, CafeError> {
    path.map(|Path(id)| id)
        .map_err(|_| CafeError::NotFound(CAFE_NOT_FOUND.to_string()))
}
