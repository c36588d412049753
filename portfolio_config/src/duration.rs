use std::{ops::Deref, sync::LazyLock};

use regex::Regex;
use serde::Deserialize;

static PART_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d+)(ms|s|m|h|d)$").unwrap());

/// A duration written as whitespace separated parts, e.g. `1m 30s` or
/// `500ms`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration(pub std::time::Duration);

impl From<Duration> for std::time::Duration {
    fn from(value: Duration) -> Self {
        value.0
    }
}

impl Deref for Duration {
    type Target = std::time::Duration;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::str::FromStr for Duration {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split_whitespace()
            .try_fold(std::time::Duration::ZERO, |acc, part| -> Result<_, String> {
                let captures = PART_REGEX
                    .captures(part)
                    .ok_or_else(|| format!("Invalid duration: {part:?}"))?;
                let value = captures[1]
                    .parse::<u64>()
                    .map_err(|err| format!("Invalid duration {part:?}: {err}"))?;
                let part = match &captures[2] {
                    "ms" => std::time::Duration::from_millis(value),
                    "s" => std::time::Duration::from_secs(value),
                    "m" => std::time::Duration::from_secs(value.saturating_mul(60)),
                    "h" => std::time::Duration::from_secs(value.saturating_mul(60 * 60)),
                    _ => std::time::Duration::from_secs(value.saturating_mul(24 * 60 * 60)),
                };
                Ok(acc.saturating_add(part))
            })
            .map(Self)
    }
}

impl<'de> Deserialize<'de> for Duration {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        String::deserialize(deserializer)?
            .parse()
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_duration() {
        for (input, expected) in [
            ("5s", Some(5_000)),
            ("250ms", Some(250)),
            ("42m", Some(42 * 60_000)),
            ("7h", Some(7 * 60 * 60_000)),
            ("2d", Some(2 * 24 * 60 * 60_000)),
            ("", Some(0)),
            ("1m 30s", Some(90_000)),
            ("1h 2m 3s 4ms", Some(((60 + 2) * 60 + 3) * 1000 + 4)),
            ("xyz", None),
            ("7ss", None),
            ("s", None),
            ("-5s", None),
        ] {
            let input = serde_json::Value::String(input.into());
            let output = serde_json::from_value::<Duration>(input.clone())
                .ok()
                .map(|x| x.0.as_millis());
            assert_eq!(output, expected, "{input}");
        }
    }
}
