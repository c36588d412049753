use clap::Subcommand;
use portfolio_config::Config;
use portfolio_models::delivery::BackupEntry;
use portfolio_persistence_contracts::backup::BackupRepository;

use crate::environment;

#[derive(Debug, Subcommand)]
pub enum BackupCommand {
    /// List all backed up contact messages
    #[command(aliases(["ls"]))]
    List {
        /// Print one JSON object per line
        #[arg(long)]
        json: bool,
    },
}

impl BackupCommand {
    pub async fn invoke(self, config: Config) -> anyhow::Result<()> {
        match self {
            BackupCommand::List { json } => list(config, json).await,
        }
    }
}

async fn list(config: Config, json: bool) -> anyhow::Result<()> {
    let backup = environment::backup(&config.backup).await?;

    for entry in backup.read_all().await? {
        if json {
            println!("{}", serde_json::to_string(&entry)?);
        } else {
            println!("{}", format_entry(&entry));
        }
    }

    Ok(())
}

fn format_entry(entry: &BackupEntry) -> String {
    let flag = |ok| if ok { "ok" } else { "failed" };
    let channels = entry.channel_results;
    format!(
        "{} {} <{}> [{}] mail={} relay={}\n    {}",
        entry.submitted_at.format("%Y-%m-%d %H:%M:%S"),
        *entry.name,
        entry.email,
        entry.subject_label,
        flag(channels.mail),
        flag(channels.relay),
        entry.message.replace('\n', "\n    "),
    )
}

#[cfg(test)]
mod tests {
    use portfolio_models::{
        contact::{Submission, SubmissionAuthor},
        delivery::ChannelResults,
    };

    use super::*;

    #[test]
    fn format() {
        let submission = Submission {
            author: SubmissionAuthor {
                name: "Ada".try_into().unwrap(),
                email: "ada@x.com".parse().unwrap(),
                phone: None,
            },
            subject: "job".try_into().unwrap(),
            message: "Hi\nthere".try_into().unwrap(),
            copy_requested: false,
            submitted_at: "2024-05-01T12:00:00Z".parse().unwrap(),
        };
        let entry = BackupEntry::new(
            &submission,
            ChannelResults {
                mail: true,
                relay: false,
                backup: true,
            },
        );

        assert_eq!(
            format_entry(&entry),
            "2024-05-01 12:00:00 Ada <ada@x.com> [Job Opportunity] mail=ok relay=failed\n    \
             Hi\n    there"
        );
    }
}
