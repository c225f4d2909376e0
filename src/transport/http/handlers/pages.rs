use crate::app::{CafeForm, FormErrors, LenientCreateError};
use crate::domain::cafe::CafeError;
use crate::transport::http::html;
use crate::transport::http::types::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Form, State};
use axum::response::{Html, IntoResponse, Redirect, Response};

pub async fn home_handler(State(state): State<AppState>) -> Result<Html<String>, CafeError> {
    let cafes = state.service.list_all().await?;
    Ok(Html(html::render_home(&cafes)))
}

pub async fn add_form_handler() -> Html<String> {
    Html(html::render_add_form(&CafeForm::default(), &FormErrors::default()))
}

/// Interactive create: redirects to the listing on success, re-renders the form otherwise.
pub async fn add_submit_handler(
    State(state): State<AppState>,
    form: Result<Form<CafeForm>, FormRejection>,
) -> Response {
    // An unreadable body is treated as an empty submission, which fails every required field.
    let form = form.map(|Form(form)| form).unwrap_or_default();

    match state.service.create_lenient(&form).await {
        Ok(_) => Redirect::to("/").into_response(),
        Err(LenientCreateError::Form(errors)) => {
            Html(html::render_add_form(&form, &errors)).into_response()
        }
        Err(LenientCreateError::Service(err)) => err.into_response(),
    }
}

pub async fn documentation_handler(State(state): State<AppState>) -> Html<String> {
    Html(html::render_documentation(&state.documentation))
}
