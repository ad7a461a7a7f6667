use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Form, Json,
};
use serde::Serialize;
use serde_json::json;

use sectorboard_core::accuracy::{self, AccuracySummary};
use sectorboard_core::chart::{self, ChartDocument};
use sectorboard_core::editor::{self, EditForm};
use sectorboard_core::error::DashboardError;

use crate::page;
use crate::AppState;

#[derive(Debug, Serialize)]
struct EditResponse {
    success: bool,
    message: String,
}

pub(crate) async fn index() -> Html<String> {
    Html(page::index())
}

pub(crate) async fn get_chart_data(State(state): State<AppState>) -> Response {
    match load_chart(&state).await {
        Ok(doc) => Json(doc).into_response(),
        Err(err) => json_error(&err),
    }
}

pub(crate) async fn get_strike_summary(State(state): State<AppState>) -> Response {
    match load_summary(&state).await {
        Ok(summary) => Json(summary).into_response(),
        Err(err) => json_error(&err),
    }
}

pub(crate) async fn get_stock(
    State(state): State<AppState>,
    Path(stock_name): Path<String>,
) -> Response {
    let table = match state.store.load().await {
        Ok(table) => table,
        Err(err) => {
            let status = status_for(&err);
            log_failure(&err, status);
            let body = match DashboardError::find(&err) {
                Some(e @ DashboardError::FileNotFound { .. }) => {
                    page::message("Data file not found", &e.to_string())
                }
                _ => page::message("Error loading data", &format!("{err:#}")),
            };
            return (status, Html(body)).into_response();
        }
    };

    match editor::stock_view(&table, &stock_name) {
        Some(view) => Html(page::stock(&view)).into_response(),
        None => {
            tracing::debug!(stock = %stock_name, "stock not found");
            (StatusCode::NOT_FOUND, Html(page::stock_missing(&stock_name))).into_response()
        }
    }
}

pub(crate) async fn post_stock(
    State(state): State<AppState>,
    Path(stock_name): Path<String>,
    Form(form): Form<EditForm>,
) -> Response {
    let edit = match form.into_edit() {
        Ok(edit) => edit,
        Err(err) => {
            tracing::warn!(stock = %stock_name, error = %err, "rejected stock edit");
            return edit_response(StatusCode::BAD_REQUEST, false, err.to_string());
        }
    };

    match editor::edit_and_persist(state.store.as_ref(), &state.gate, &stock_name, &edit).await {
        Ok(_) => edit_response(StatusCode::OK, true, edit.confirmation().to_string()),
        Err(err) => {
            let status = status_for(&err);
            log_failure(&err, status);
            let message = if status.is_server_error() {
                format!("Error saving: {err:#}")
            } else {
                format!("{err:#}")
            };
            edit_response(status, false, message)
        }
    }
}

async fn load_chart(state: &AppState) -> anyhow::Result<ChartDocument> {
    let table = state.store.load().await?;
    chart::build_chart(&table)
}

async fn load_summary(state: &AppState) -> anyhow::Result<AccuracySummary> {
    let table = state.store.load().await?;
    accuracy::summarize(&table)
}

fn status_for(err: &anyhow::Error) -> StatusCode {
    match DashboardError::find(err) {
        Some(DashboardError::FileNotFound { .. } | DashboardError::StockNotFound { .. }) => {
            StatusCode::NOT_FOUND
        }
        Some(DashboardError::MissingColumns { .. } | DashboardError::InvalidEdit { .. }) => {
            StatusCode::BAD_REQUEST
        }
        None => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn log_failure(err: &anyhow::Error, status: StatusCode) {
    if status.is_server_error() {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(%status, error = %format!("{err:#}"), "request failed");
    } else {
        tracing::warn!(%status, error = %err, "request rejected");
    }
}

fn json_error(err: &anyhow::Error) -> Response {
    let status = status_for(err);
    log_failure(err, status);
    (status, Json(json!({ "error": format!("{err:#}") }))).into_response()
}

fn edit_response(status: StatusCode, success: bool, message: String) -> Response {
    (status, Json(EditResponse { success, message })).into_response()
}
