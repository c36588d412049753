use std::future::Future;

use portfolio_models::delivery::BackupEntry;

/// Append-only log of every accepted submission.
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait BackupRepository: Send + Sync + 'static {
    /// Appends `entry` after all previously appended entries.
    fn append(&self, entry: &BackupEntry) -> impl Future<Output = anyhow::Result<()>> + Send;

    /// Returns all entries in the order they were appended.
    fn read_all(&self) -> impl Future<Output = anyhow::Result<Vec<BackupEntry>>> + Send;

    /// Verify that the backing store is writable.
    fn ping(&self) -> impl Future<Output = anyhow::Result<()>> + Send;
}

#[cfg(feature = "mock")]
impl MockBackupRepository {
    pub fn with_append(mut self, entry: BackupEntry, result: bool) -> Self {
        self.expect_append()
            .once()
            .with(mockall::predicate::eq(entry))
            .return_once(move |_| {
                Box::pin(std::future::ready(if result {
                    Ok(())
                } else {
                    Err(anyhow::anyhow!("backup store is not writable"))
                }))
            });
        self
    }

    pub fn with_ping(mut self, result: bool) -> Self {
        self.expect_ping().once().return_once(move || {
            Box::pin(std::future::ready(if result {
                Ok(())
            } else {
                Err(anyhow::anyhow!("backup store is not writable"))
            }))
        });
        self
    }
}
