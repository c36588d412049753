use chrono::{DateTime, Utc};
use portfolio_core_contact_contracts::ValidationError;
use portfolio_models::{
    contact::{
        ContactField, ContactRequest, Submission, SubmissionAuthor, SubmissionAuthorName,
        SubmissionAuthorPhone, SubmissionMessage, SubmissionSubject,
    },
    email_address::EmailAddress,
};

/// Checks the required fields and the email address and sanitizes all free
/// text fields.
pub(crate) fn validate(
    request: ContactRequest,
    submitted_at: DateTime<Utc>,
) -> Result<Submission, ValidationError> {
    if let Some(field) = ContactField::REQUIRED
        .into_iter()
        .find(|&field| is_blank(request.field(field)))
    {
        return Err(ValidationError::Missing(field));
    }

    let ContactRequest {
        name,
        email,
        phone,
        subject,
        message,
        copy_requested,
    } = request;

    let email = email.unwrap_or_default();
    let email = email.trim();
    if !EmailAddress::has_valid_shape(email) {
        return Err(ValidationError::InvalidEmail);
    }
    let email = email
        .parse::<EmailAddress>()
        .map_err(|_| ValidationError::InvalidEmail)?;

    let name = SubmissionAuthorName::try_new(sanitize(name))
        .map_err(|_| ValidationError::TooLong(ContactField::Name))?;

    let phone = phone
        .filter(|phone| !phone.trim().is_empty())
        .map(|phone| SubmissionAuthorPhone::try_new(escape_html(&phone)))
        .transpose()
        .map_err(|_| ValidationError::TooLong(ContactField::Phone))?;

    let subject = SubmissionSubject::try_new(sanitize(subject))
        .map_err(|_| ValidationError::TooLong(ContactField::Subject))?;

    let message = SubmissionMessage::try_new(sanitize(message))
        .map_err(|_| ValidationError::TooLong(ContactField::Message))?;

    Ok(Submission {
        author: SubmissionAuthor { name, email, phone },
        subject,
        message,
        copy_requested,
        submitted_at,
    })
}

fn is_blank(value: Option<&str>) -> bool {
    value.map(str::trim).unwrap_or_default().is_empty()
}

fn sanitize(value: Option<String>) -> String {
    escape_html(value.as_deref().unwrap_or_default())
}

/// Replaces the characters that are significant in HTML with entities.
pub(crate) fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            c => out.push(c),
        }
    }
    out
}
