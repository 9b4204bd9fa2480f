//! Route handlers.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use shared_types::{current_draw_date, DrawId, UserId};

use super::{ApiError, AppState};

const PROMETHEUS_CONTENT_TYPE: &str = "text/plain; version=0.0.4";

#[derive(Debug, Deserialize)]
pub struct DrawQuery {
    date: Option<String>,
}

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
    }))
}

pub async fn today_draw(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let today = state.lottery.today_draw().await?;
    Ok(Json(today))
}

pub async fn draw_for_date(
    State(state): State<AppState>,
    Query(query): Query<DrawQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let today = current_draw_date(state.clock.now());
    let date = match query.date.as_deref() {
        None => today,
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map_err(|_| ApiError::InvalidDate(raw.to_string()))?,
    };
    if date > today {
        return Err(ApiError::FutureDate(date));
    }

    let draw = state.lottery.draw_for_date(date).await?;
    Ok(Json(draw))
}

pub async fn tickets_for_user(
    State(state): State<AppState>,
    Path(user): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = state.lottery.tickets_for_user(UserId(user)).await?;
    Ok(Json(tickets))
}

pub async fn active_tickets_for_user(
    State(state): State<AppState>,
    Path(user): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let tickets = state.lottery.active_tickets_for_user(UserId(user)).await?;
    Ok(Json(tickets))
}

pub async fn create_ticket(
    State(state): State<AppState>,
    Path(user): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let ticket = state.lottery.create_ticket_for_user(UserId(user)).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

pub async fn verify_draw(
    State(state): State<AppState>,
    Path(draw): Path<u64>,
) -> Result<impl IntoResponse, ApiError> {
    let result = state.verifier.verify_detailed(DrawId(draw)).await;
    let label = match &result {
        Ok(report) if report.is_valid() => "valid",
        Ok(_) => "mismatch",
        Err(_) => "error",
    };
    state.metrics.verifications.with_label_values(&[label]).inc();

    Ok(Json(result?))
}

pub async fn metrics(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let body = state
        .metrics
        .encode()
        .map_err(|e| ApiError::Metrics(e.to_string()))?;
    Ok(([(header::CONTENT_TYPE, PROMETHEUS_CONTENT_TYPE)], body))
}
