use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

// Serializes load-mutate-save cycles inside one process. Nothing coordinates with other
// processes writing the same file.
#[derive(Debug, Clone, Default)]
pub struct WriteGate {
    inner: Arc<Mutex<()>>,
}

impl WriteGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self) -> MutexGuard<'_, ()> {
        self.inner.lock().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn second_writer_waits_for_the_first() {
        let gate = WriteGate::new();
        let clone = gate.clone();

        let guard = gate.acquire().await;
        let blocked = tokio::time::timeout(Duration::from_millis(50), clone.acquire()).await;
        assert!(blocked.is_err());

        drop(guard);
        let released = tokio::time::timeout(Duration::from_secs(1), clone.acquire()).await;
        assert!(released.is_ok());
    }
}
