use portfolio_config::Config;
use portfolio_email_contracts::EmailService;
use portfolio_persistence_contracts::backup::BackupRepository;
use tracing::{info, warn};

use crate::environment;

pub async fn serve(config: Config) -> anyhow::Result<()> {
    info!("Connecting to smtp server");
    let email = environment::email(&config.email).await?;
    if let Err(err) = email.ping().await {
        warn!("SMTP server is not reachable, mail delivery will fail: {err:#}");
    }

    info!("Opening backup log at {}", config.backup.path.display());
    let backup = environment::backup(&config.backup).await?;
    backup.ping().await?;

    let server = environment::rest_server(&config, email, backup)?;
    info!("Starting http server on {}", config.http.address);
    server.serve().await
}
