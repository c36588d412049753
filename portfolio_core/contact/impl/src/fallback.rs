use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use portfolio_models::email_address::EmailAddress;
use url::Url;

const MAILTO_QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Returns the `mailto:` link for `recipient` without any header fields.
pub fn mailto_base(recipient: &EmailAddress) -> Result<Url, url::ParseError> {
    Url::parse(&format!("mailto:{}", recipient.as_str()))
}

/// Adds a prefilled subject and body to a `mailto:` link.
pub(crate) fn mailto_link(base: &Url, subject: &str, body: &str) -> Url {
    let mut link = base.clone();
    link.set_query(Some(&format!(
        "subject={}&body={}",
        utf8_percent_encode(subject, MAILTO_QUERY),
        utf8_percent_encode(body, MAILTO_QUERY)
    )));
    link
}
