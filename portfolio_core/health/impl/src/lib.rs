use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use portfolio_core_health_contracts::{HealthFeatureService, HealthStatus};
use portfolio_email_contracts::EmailService;
use portfolio_persistence_contracts::backup::BackupRepository;
use portfolio_shared_contracts::time::TimeService;
use tokio::sync::RwLock;
use tracing::error;

#[derive(Debug, Clone)]
pub struct HealthFeatureServiceImpl<Time, Email, Backup> {
    time: Time,
    email: Email,
    backup: Backup,
    config: HealthFeatureConfig,
    state: Arc<State>,
}

#[derive(Debug, Clone)]
pub struct HealthFeatureConfig {
    pub cache_ttl: Duration,
}

#[derive(Debug, Default)]
struct State {
    cache: RwLock<Option<CachedStatus>>,
}

#[derive(Debug)]
struct CachedStatus {
    status: HealthStatus,
    timestamp: DateTime<Utc>,
}

impl<Time, Email, Backup> HealthFeatureServiceImpl<Time, Email, Backup> {
    pub fn new(time: Time, email: Email, backup: Backup, config: HealthFeatureConfig) -> Self {
        Self {
            time,
            email,
            backup,
            config,
            state: Default::default(),
        }
    }
}

impl<Time, Email, Backup> HealthFeatureService for HealthFeatureServiceImpl<Time, Email, Backup>
where
    Time: TimeService,
    Email: EmailService,
    Backup: BackupRepository,
{
    async fn get_status(&self) -> HealthStatus {
        let now = self.time.now();
        let cache_guard = self.state.cache.read().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }
        drop(cache_guard);

        let mut cache_guard = self.state.cache.write().await;
        if let Some(cached) = cache_guard
            .as_ref()
            .filter(|c| now < c.timestamp + self.config.cache_ttl)
        {
            return cached.status;
        }

        let (email, backup) = tokio::join!(self.email.ping(), self.backup.ping());

        let status = HealthStatus {
            email: email
                .inspect_err(|err| error!("Failed to ping smtp server: {err:#}"))
                .is_ok(),
            backup: backup
                .inspect_err(|err| error!("Backup log is not writable: {err:#}"))
                .is_ok(),
        };

        cache_guard
            .insert(CachedStatus {
                status,
                timestamp: now,
            })
            .status
    }
}

#[cfg(test)]
mod tests {
    use portfolio_email_contracts::MockEmailService;
    use portfolio_persistence_contracts::backup::MockBackupRepository;
    use portfolio_shared_contracts::time::MockTimeService;
    use pretty_assertions::assert_eq;

    use super::*;

    type Sut = HealthFeatureServiceImpl<MockTimeService, MockEmailService, MockBackupRepository>;

    fn config() -> HealthFeatureConfig {
        HealthFeatureConfig {
            cache_ttl: Duration::from_secs(2),
        }
    }

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_714_564_800 + secs, 0).unwrap()
    }

    #[tokio::test]
    async fn healthy() {
        // Arrange
        let time = MockTimeService::new().with_now(at(0));
        let email = MockEmailService::new().with_ping(true);
        let backup = MockBackupRepository::new().with_ping(true);

        let sut = Sut::new(time, email, backup, config());

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(
            result,
            HealthStatus {
                email: true,
                backup: true
            }
        );
        assert!(result.healthy());
    }

    #[tokio::test]
    async fn unhealthy() {
        // Arrange
        let time = MockTimeService::new().with_now(at(0));
        let email = MockEmailService::new().with_ping(false);
        let backup = MockBackupRepository::new().with_ping(true);

        let sut = Sut::new(time, email, backup, config());

        // Act
        let result = sut.get_status().await;

        // Assert
        assert_eq!(
            result,
            HealthStatus {
                email: false,
                backup: true
            }
        );
        assert!(!result.healthy());
    }

    #[tokio::test]
    async fn cached() {
        // Arrange
        let mut time = MockTimeService::new();
        let mut seq = mockall::Sequence::new();
        for secs in [0, 1, 3] {
            time.expect_now()
                .once()
                .in_sequence(&mut seq)
                .return_const(at(secs));
        }

        let mut email = MockEmailService::new();
        email
            .expect_ping()
            .times(2)
            .returning(|| Box::pin(std::future::ready(Ok(()))));
        let mut backup = MockBackupRepository::new();
        backup
            .expect_ping()
            .times(2)
            .returning(|| Box::pin(std::future::ready(Ok(()))));

        let sut = Sut::new(time, email, backup, config());

        // Act
        let first = sut.get_status().await;
        let second = sut.get_status().await;
        let third = sut.get_status().await;

        // Assert
        assert_eq!(first, second);
        assert_eq!(second, third);
    }
}
