use crate::{
    errors::{AppError, RequestError},
    services::route_assignment::assign_weekly_routes,
    state::AppState,
    structs::weekly_routes::{GenerateRoutesRequest, WeeklyRouteRecord, WeeklyRoutes},
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDate};
use uuid::Uuid;

const WEEK_NUMBERS: std::ops::RangeInclusive<u32> = 1..=53;

pub fn new() -> Router<AppState> {
    Router::new()
        .route("/", post(generate_weekly_routes))
        .route("/{week_start_date}", get(get_weekly_routes))
}

/// 產生指定週的排線並存起來, 同一週重跑會覆蓋
async fn generate_weekly_routes(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    payload: Result<Json<GenerateRoutesRequest>, JsonRejection>,
) -> Result<Json<WeeklyRoutes>, AppError> {
    let Json(payload) = payload?;
    if !WEEK_NUMBERS.contains(&payload.week_number) {
        return Err(RequestError::InvalidWeekNumber(payload.week_number).into());
    }
    let week_start_date = parse_week_start_date(&payload.week_start_date)?;

    let origin_address = payload
        .origin_address
        .filter(|address| !address.trim().is_empty())
        .unwrap_or_else(|| state.config.default_origin_address.clone());

    let accounts = state.accounts.list_active_accounts(user_id).await?;
    let routes = assign_weekly_routes(
        &accounts,
        payload.week_number,
        week_start_date,
        &origin_address,
    );

    let record = WeeklyRouteRecord {
        user_id,
        week_number: payload.week_number,
        week_start_date,
        origin_address,
        routes,
    };
    state.weekly_routes.upsert_weekly_routes(&record).await?;

    tracing::info!(
        "user {} week {} ({}): {} accounts, {} stops",
        user_id,
        record.week_number,
        week_start_date,
        accounts.len(),
        record.routes.total_stops()
    );

    Ok(Json(record.routes))
}

/// 取之前存下來的排線
async fn get_weekly_routes(
    State(state): State<AppState>,
    Path((user_id, week_start_date)): Path<(Uuid, String)>,
) -> Result<Json<WeeklyRouteRecord>, AppError> {
    let week_start_date = parse_week_start_date(&week_start_date)?;

    state
        .weekly_routes
        .get_weekly_routes(user_id, week_start_date)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("weekly routes for {week_start_date}")))
}

/// 接受 `YYYY-MM-DD`, 或 RFC 3339 時間字串 (只取日期)
fn parse_week_start_date(raw: &str) -> Result<NaiveDate, RequestError> {
    let raw = raw.trim();

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|_| RequestError::InvalidDate(raw.to_string()))
}
