use crate::domain::observation::ObservationTable;

pub mod csv_file;
pub mod lock;
pub mod memory;

/// Where the observation table lives. Handlers get one injected instead of reaching for a
/// global file path.
#[async_trait::async_trait]
pub trait TabularStore: std::fmt::Debug + Send + Sync {
    /// Human-readable location, used in not-found messages.
    fn location(&self) -> String;

    async fn exists(&self) -> bool;

    /// Fails with [`crate::error::DashboardError::FileNotFound`] when there is nothing to load.
    async fn load(&self) -> anyhow::Result<ObservationTable>;

    async fn save(&self, table: &ObservationTable) -> anyhow::Result<()>;
}
