use crate::calendar::{GridCell, grid_bounds, month_grid};
use crate::day_id::{DayId, check_year, date_of};
use crate::errors::AppError;
use crate::models::{CheckInRequest, CheckInResponse, DayView, RangeQuery, Room};
use crate::notify::check_in_notice;
use crate::review::{YearSummary, summarize_year};
use crate::state::AppState;
use crate::storage::persist_data;
use crate::streak::{StreakResult, compute_streaks};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{Local, NaiveDate};
use rand::SeedableRng;
use rand::rngs::StdRng;
use tracing::{debug, info};

const MAX_ROOM_LEN: usize = 64;

pub async fn get_today(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<Json<DayView>, AppError> {
    check_room(&room)?;
    let date = DayId::from_date(today());
    let data = state.data.lock().await;
    Ok(Json(view_of(data.rooms.get(&room), &date)))
}

pub async fn get_day(
    State(state): State<AppState>,
    Path((room, day_id)): Path<(String, String)>,
) -> Result<Json<DayView>, AppError> {
    check_room(&room)?;
    let date = DayId::parse(&day_id)?;
    let data = state.data.lock().await;
    Ok(Json(view_of(data.rooms.get(&room), &date)))
}

pub async fn list_days(
    State(state): State<AppState>,
    Path(room): Path<String>,
    Query(range): Query<RangeQuery>,
) -> Result<Json<Vec<DayView>>, AppError> {
    check_room(&room)?;
    let start = DayId::parse(&range.start)?;
    let end = DayId::parse(&range.end)?;
    if start > end {
        return Err(AppError::bad_request("start must not be after end"));
    }

    let data = state.data.lock().await;
    Ok(Json(days_between(data.rooms.get(&room), &start, &end)))
}

/// Stored days covered by the month's 42-cell grid.
pub async fn get_month(
    State(state): State<AppState>,
    Path((room, year, month)): Path<(String, i32, u32)>,
) -> Result<Json<Vec<DayView>>, AppError> {
    check_room(&room)?;
    let (start, end) = grid_bounds(year, month)?;
    let data = state.data.lock().await;
    Ok(Json(days_between(data.rooms.get(&room), &start, &end)))
}

pub async fn check_in(
    State(state): State<AppState>,
    Path((room, day_id)): Path<(String, String)>,
    Json(payload): Json<CheckInRequest>,
) -> Result<Json<CheckInResponse>, AppError> {
    check_room(&room)?;
    let date = DayId::parse(&day_id)?;
    if payload.update.is_empty() {
        return Err(AppError::bad_request("nothing to update"));
    }

    let mut data = state.data.lock().await;
    let (before, after) = {
        let entry = data
            .rooms
            .entry(room.clone())
            .or_default()
            .days
            .entry(date.to_string())
            .or_default();
        let before = entry.clone();
        entry.apply(payload.role, payload.update);
        entry.day_id = Some(date.to_string());
        (before, entry.clone())
    };

    persist_data(&state.data_path, &data).await?;

    let notice = check_in_notice(&date, today(), Some(&before), &after);
    if let Some(notice) = &notice {
        info!(
            room = %room,
            day = %date,
            recipient = notice.recipient.label(),
            "check-in notice: {}",
            notice.title
        );
    }

    Ok(Json(CheckInResponse {
        day: DayView::new(&date, after),
        notice,
    }))
}

pub async fn get_streak(
    State(state): State<AppState>,
    Path(room): Path<String>,
) -> Result<Json<StreakResult>, AppError> {
    check_room(&room)?;
    let snapshot = state.room_snapshot(&room).await;
    Ok(Json(compute_streaks(today(), &snapshot.days)))
}

pub async fn get_review(
    State(state): State<AppState>,
    Path((room, year)): Path<(String, i32)>,
) -> Result<Json<YearSummary>, AppError> {
    check_room(&room)?;
    check_year(year)?;

    let snapshot = state.room_snapshot(&room).await;
    let summary = summarize_year(year, &snapshot.days, &mut StdRng::from_entropy());
    Ok(Json(summary))
}

pub async fn get_calendar(Path((year, month)): Path<(i32, u32)>) -> Result<Json<Vec<GridCell>>, AppError> {
    Ok(Json(month_grid(year, month)?))
}

fn days_between(room: Option<&Room>, start: &DayId, end: &DayId) -> Vec<DayView> {
    let Some(existing) = room else {
        return Vec::new();
    };

    existing
        .days
        .range(start.to_string()..=end.to_string())
        .filter_map(|(key, record)| match date_of(key) {
            Some(date) => Some(DayView::new(&DayId::from_date(date), record.clone())),
            None => {
                debug!("skipping non-canonical stored key {key}");
                None
            }
        })
        .collect()
}

fn view_of(room: Option<&Room>, date: &DayId) -> DayView {
    let record = room
        .and_then(|existing| existing.days.get(date.as_str()))
        .cloned()
        .unwrap_or_default();
    DayView::new(date, record)
}

fn check_room(room: &str) -> Result<(), AppError> {
    let valid = !room.is_empty()
        && room.len() <= MAX_ROOM_LEN
        && room
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(AppError::bad_request("room must be 1-64 characters of [A-Za-z0-9_-]"))
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
