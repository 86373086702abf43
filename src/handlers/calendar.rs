use std::sync::Arc;

use axum::extract::{Query, State};
use axum::Json;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::errors::AppError;
use crate::services::calendar::{month_grid, MonthGrid};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MonthQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

// GET /api/widget/calendar
pub async fn month(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<MonthGrid>, AppError> {
    let tz = state.config.business_timezone;
    let now = Utc::now();
    let today = now.with_timezone(&tz).date_naive();

    let year = query.year.unwrap_or(today.year());
    let month = query.month.unwrap_or(today.month());

    month_grid(year, month, tz, now)
        .map(Json)
        .ok_or_else(|| AppError::BadRequest(format!("invalid month: {year}-{month}")))
}
