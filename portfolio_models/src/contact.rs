use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{email_address::EmailAddress, macros::nutype_string};

/// Label used for subjects that are not one of the known category codes.
pub const DEFAULT_SUBJECT_LABEL: &str = "General Inquiry";

/// Contact form fields exactly as they were received, before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub copy_requested: bool,
}

/// A validated and sanitized contact form submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub author: SubmissionAuthor,
    pub subject: SubmissionSubject,
    pub message: SubmissionMessage,
    pub copy_requested: bool,
    pub submitted_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAuthor {
    pub name: SubmissionAuthorName,
    pub email: EmailAddress,
    pub phone: Option<SubmissionAuthorPhone>,
}

nutype_string!(SubmissionAuthorName(
    sanitize(trim),
    validate(not_empty, len_char_max = 256)
));

nutype_string!(SubmissionAuthorPhone(
    sanitize(trim),
    validate(not_empty, len_char_max = 64)
));

nutype_string!(SubmissionSubject(
    sanitize(trim),
    validate(not_empty, len_char_max = 256)
));

nutype_string!(SubmissionMessage(
    sanitize(trim),
    validate(not_empty, len_char_max = 4096)
));

impl SubmissionSubject {
    pub fn category(&self) -> Option<SubjectCategory> {
        SubjectCategory::from_code(self)
    }

    /// Human readable label used in delivered messages.
    pub fn label(&self) -> &'static str {
        self.category()
            .map(SubjectCategory::label)
            .unwrap_or(DEFAULT_SUBJECT_LABEL)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubjectCategory {
    Project,
    Job,
    Freelance,
    Partnership,
    Question,
    Other,
}

impl SubjectCategory {
    pub const ALL: [Self; 6] = [
        Self::Project,
        Self::Job,
        Self::Freelance,
        Self::Partnership,
        Self::Question,
        Self::Other,
    ];

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.code() == code)
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::Job => "job",
            Self::Freelance => "freelance",
            Self::Partnership => "partnership",
            Self::Question => "question",
            Self::Other => "other",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Project => "Project Collaboration Inquiry",
            Self::Job => "Job Opportunity",
            Self::Freelance => "Freelance Work Request",
            Self::Partnership => "Business Partnership Inquiry",
            Self::Question => "Technical Question",
            Self::Other => DEFAULT_SUBJECT_LABEL,
        }
    }
}

/// Required and length-limited fields of a [`ContactRequest`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactField {
    Name,
    Email,
    Phone,
    Subject,
    Message,
}

impl ContactField {
    /// Required fields in the order they are checked.
    pub const REQUIRED: [Self; 4] = [Self::Name, Self::Email, Self::Subject, Self::Message];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Email => "email",
            Self::Phone => "phone",
            Self::Subject => "subject",
            Self::Message => "message",
        }
    }
}

impl fmt::Display for ContactField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ContactRequest {
    pub fn field(&self, field: ContactField) -> Option<&str> {
        match field {
            ContactField::Name => self.name.as_deref(),
            ContactField::Email => self.email.as_deref(),
            ContactField::Phone => self.phone.as_deref(),
            ContactField::Subject => self.subject.as_deref(),
            ContactField::Message => self.message.as_deref(),
        }
    }
}
