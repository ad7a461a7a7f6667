use crate::domain::observation::ObservationTable;
use crate::error::DashboardError;
use crate::storage::TabularStore;
use std::sync::Mutex;

/// Store held entirely in memory for editor and router tests. `fail_saves` simulates a
/// locked or read-only backing file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: Mutex<Option<ObservationTable>>,
    fail_saves: bool,
}

impl MemoryStore {
    pub fn new(table: ObservationTable) -> Self {
        Self {
            table: Mutex::new(Some(table)),
            fail_saves: false,
        }
    }

    /// A store whose backing file does not exist.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    pub fn snapshot(&self) -> Option<ObservationTable> {
        self.table.lock().ok().and_then(|t| t.clone())
    }
}

#[async_trait::async_trait]
impl TabularStore for MemoryStore {
    fn location(&self) -> String {
        "memory".to_string()
    }

    async fn exists(&self) -> bool {
        self.table.lock().map(|t| t.is_some()).unwrap_or(false)
    }

    async fn load(&self) -> anyhow::Result<ObservationTable> {
        let guard = self
            .table
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        guard.clone().ok_or_else(|| {
            DashboardError::FileNotFound {
                path: self.location(),
            }
            .into()
        })
    }

    async fn save(&self, table: &ObservationTable) -> anyhow::Result<()> {
        anyhow::ensure!(!self.fail_saves, "permission denied (file is locked)");
        let mut guard = self
            .table
            .lock()
            .map_err(|_| anyhow::anyhow!("memory store poisoned"))?;
        *guard = Some(table.clone());
        Ok(())
    }
}
