use crate::infra::{AllocationContext, AppState};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use faculty_allocation::error::AppError;
use faculty_allocation::workflows::allocation::export::{render_table, ExportTable};
use faculty_allocation::workflows::allocation::AllocationReport;
use faculty_allocation::workflows::roster::CapacityPlan;
use serde::Deserialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::io::Cursor;
use tracing::info;

#[derive(Debug, Deserialize)]
pub(crate) struct AllocationRequest {
    pub(crate) roster_csv: String,
    #[serde(default)]
    pub(crate) default_capacity: Option<i64>,
    #[serde(default)]
    pub(crate) capacities: BTreeMap<String, i64>,
}

pub(crate) fn allocation_router() -> Router {
    Router::new()
        .route("/health", get(healthcheck))
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
        .route("/api/v1/allocations", post(allocation_endpoint))
        .route("/api/v1/allocations/export/:table", post(export_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn allocation_endpoint(
    Extension(context): Extension<AllocationContext>,
    Json(payload): Json<AllocationRequest>,
) -> Result<Json<AllocationReport>, AppError> {
    let report = allocate(&context, payload)?;
    Ok(Json(report))
}

pub(crate) async fn export_endpoint(
    Extension(context): Extension<AllocationContext>,
    Path(table): Path<ExportTable>,
    Json(payload): Json<AllocationRequest>,
) -> Result<impl IntoResponse, AppError> {
    let report = allocate(&context, payload)?;
    let body = render_table(&report, table)?;
    let disposition = format!("attachment; filename=\"{}\"", table.file_name());

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, mime::TEXT_CSV_UTF_8.to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    ))
}

fn allocate(
    context: &AllocationContext,
    request: AllocationRequest,
) -> Result<AllocationReport, AppError> {
    let AllocationRequest {
        roster_csv,
        default_capacity,
        capacities,
    } = request;

    let service = &context.service;
    let default_capacity = default_capacity.or(context.default_capacity.map(i64::from));
    let plan = CapacityPlan::from_signed(default_capacity, capacities, service.directory())?;
    let roster = service.import_reader(Cursor::new(roster_csv.into_bytes()))?;
    let report = service.report(&roster, &plan)?;

    info!(
        students = report.totals.students,
        allocated = report.totals.allocated,
        unallocated = report.totals.unallocated,
        rejected = report.totals.rejected,
        "allocation request served"
    );
    Ok(report)
}
