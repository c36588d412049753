use std::{
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::Context;
use portfolio_models::delivery::BackupEntry;
use portfolio_persistence_contracts::backup::BackupRepository;
use tokio::{fs, io::AsyncWriteExt, sync::Mutex};
use tracing::{debug, trace};

/// Backup log stored as a JSON Lines file, one [`BackupEntry`] per line.
#[derive(Debug, Clone)]
pub struct FileBackupRepository {
    path: Arc<PathBuf>,
    lock: Arc<Mutex<()>>,
}

impl FileBackupRepository {
    /// Opens the backup log at `path`, creating missing parent directories.
    /// The file itself is created on the first append.
    pub async fn open(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        Ok(Self {
            path: path.into(),
            lock: Default::default(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn open_for_append(&self) -> anyhow::Result<fs::File> {
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&*self.path)
            .await
            .with_context(|| format!("Failed to open {}", self.path.display()))
    }
}

impl BackupRepository for FileBackupRepository {
    async fn append(&self, entry: &BackupEntry) -> anyhow::Result<()> {
        let mut line = serde_json::to_vec(entry)?;
        line.push(b'\n');

        let _guard = self.lock.lock().await;
        let mut file = self.open_for_append().await?;
        file.write_all(&line).await?;
        file.sync_data().await?;

        trace!(path = %self.path.display(), "appended backup entry");
        Ok(())
    }

    async fn read_all(&self) -> anyhow::Result<Vec<BackupEntry>> {
        let content = {
            let _guard = self.lock.lock().await;
            match fs::read_to_string(&*self.path).await {
                Ok(content) => content,
                Err(err) if err.kind() == ErrorKind::NotFound => {
                    debug!(path = %self.path.display(), "backup log does not exist yet");
                    return Ok(Vec::new());
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("Failed to read {}", self.path.display()))
                }
            }
        };

        content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                serde_json::from_str(line).with_context(|| {
                    format!(
                        "Failed to parse backup entry on line {} of {}",
                        i + 1,
                        self.path.display()
                    )
                })
            })
            .collect()
    }

    async fn ping(&self) -> anyhow::Result<()> {
        let _guard = self.lock.lock().await;
        self.open_for_append().await.map(drop)
    }
}
