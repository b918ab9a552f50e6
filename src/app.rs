use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/rooms/:room/today", get(handlers::get_today))
        .route("/api/rooms/:room/days", get(handlers::list_days))
        .route(
            "/api/rooms/:room/days/:day_id",
            get(handlers::get_day).post(handlers::check_in),
        )
        .route("/api/rooms/:room/month/:year/:month", get(handlers::get_month))
        .route("/api/rooms/:room/streak", get(handlers::get_streak))
        .route("/api/rooms/:room/review/:year", get(handlers::get_review))
        .route("/api/calendar/:year/:month", get(handlers::get_calendar))
        .with_state(state)
}
