pub mod accuracy;
pub mod chart;
pub mod domain;
pub mod editor;
pub mod error;
pub mod storage;
pub mod time;

#[cfg(test)]
mod fixtures;

pub mod config {
    use std::path::PathBuf;

    pub const DEFAULT_DATA_FILE: &str = "daily_stocks.csv";

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub data_file: PathBuf,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let data_file = std::env::var("DATA_FILE")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());

            Ok(Self {
                data_file: PathBuf::from(data_file),
                sentry_dsn: std::env::var("SENTRY_DSN")
                    .ok()
                    .filter(|s| !s.trim().is_empty()),
            })
        }

        pub fn with_data_file(mut self, path: Option<PathBuf>) -> Self {
            if let Some(path) = path {
                self.data_file = path;
            }
            self
        }
    }
}
