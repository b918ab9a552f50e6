pub mod app;
pub mod calendar;
pub mod config;
pub mod day_id;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod notify;
pub mod review;
pub mod state;
pub mod storage;
pub mod streak;

pub use app::router;
pub use config::Config;
pub use state::AppState;
pub use storage::load_data;
