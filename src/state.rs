use crate::models::{AppData, Room};
use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub data_path: PathBuf,
    pub data: Arc<Mutex<AppData>>,
}

impl AppState {
    pub fn new(data_path: PathBuf, data: AppData) -> Self {
        Self {
            data_path,
            data: Arc::new(Mutex::new(data)),
        }
    }

    /// Copies one room out of the store so computations run without the lock.
    /// An unknown room is an empty snapshot.
    pub async fn room_snapshot(&self, room: &str) -> Room {
        let data = self.data.lock().await;
        data.rooms.get(room).cloned().unwrap_or_default()
    }
}
