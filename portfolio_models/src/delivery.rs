use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    contact::{
        Submission, SubmissionAuthorName, SubmissionAuthorPhone, SubmissionMessage,
        SubmissionSubject,
    },
    email_address::EmailAddress,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    /// Email sent through the configured mail transport.
    Mail,
    /// Third party email relay reached over HTTP.
    Relay,
    /// Local append-only log of all submissions.
    Backup,
    /// Prefilled `mailto:` link for the user's own mail client.
    Manual,
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mail => "mail",
            Self::Relay => "relay",
            Self::Backup => "backup",
            Self::Manual => "manual",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeliveryResult {
    pub channel: Channel,
    pub success: bool,
    pub detail: Option<String>,
}

impl DeliveryResult {
    pub fn delivered(channel: Channel) -> Self {
        Self {
            channel,
            success: true,
            detail: None,
        }
    }

    pub fn failed(channel: Channel, detail: impl Into<String>) -> Self {
        Self {
            channel,
            success: false,
            detail: Some(detail.into()),
        }
    }
}

/// Per channel outcome of a single submission.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelResults {
    pub mail: bool,
    pub relay: bool,
    pub backup: bool,
}

impl ChannelResults {
    /// Collects the outcomes of `results`. Channels that do not appear in
    /// `results` were not attempted and are reported as `false`.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a DeliveryResult>) -> Self {
        results
            .into_iter()
            .fold(Self::default(), |mut acc, result| {
                match result.channel {
                    Channel::Mail => acc.mail |= result.success,
                    Channel::Relay => acc.relay |= result.success,
                    Channel::Backup => acc.backup |= result.success,
                    Channel::Manual => {}
                }
                acc
            })
    }

    /// At least one primary channel (mail or relay) confirmed delivery. The
    /// backup log alone does not count.
    pub fn delivered(&self) -> bool {
        self.mail || self.relay
    }
}

/// One line of the backup log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackupEntry {
    pub submitted_at: DateTime<Utc>,
    pub name: SubmissionAuthorName,
    pub email: EmailAddress,
    pub phone: Option<SubmissionAuthorPhone>,
    pub subject: SubmissionSubject,
    pub subject_label: String,
    pub message: SubmissionMessage,
    pub copy_requested: bool,
    pub channel_results: ChannelResults,
}

impl BackupEntry {
    pub fn new(submission: &Submission, channel_results: ChannelResults) -> Self {
        Self {
            submitted_at: submission.submitted_at,
            name: submission.author.name.clone(),
            email: submission.author.email.clone(),
            phone: submission.author.phone.clone(),
            subject: submission.subject.clone(),
            subject_label: submission.subject.label().into(),
            message: submission.message.clone(),
            copy_requested: submission.copy_requested,
            channel_results,
        }
    }
}
