use std::{env, path::PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub data_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: port_from(env::var("PORT").ok()),
            data_path: env::var("APP_DATA_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH)),
        }
    }
}

fn port_from(value: Option<String>) -> u16 {
    match value {
        Some(raw) => raw.trim().parse().unwrap_or_else(|err| {
            warn!("invalid PORT '{raw}': {err}, using {DEFAULT_PORT}");
            DEFAULT_PORT
        }),
        None => DEFAULT_PORT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_falls_back_on_missing_or_invalid() {
        assert_eq!(port_from(None), DEFAULT_PORT);
        assert_eq!(port_from(Some("not a port".into())), DEFAULT_PORT);
        assert_eq!(port_from(Some(" 9090 ".into())), 9090);
    }
}
