use portfolio_models::{contact::ContactRequest, delivery::ChannelResults};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ApiContactMessage {
    /// Full name of the sender
    pub name: Option<String>,
    /// Email address of the sender
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    /// Category code like `job`, or free text
    pub subject: Option<String>,
    pub message: Option<String>,
    /// Whether the sender wants a copy of the message
    #[serde(
        default,
        rename = "copyMe",
        alias = "copyRequested",
        deserialize_with = "deserialize_flag"
    )]
    pub copy_me: bool,
}

impl From<ApiContactMessage> for ContactRequest {
    fn from(value: ApiContactMessage) -> Self {
        Self {
            name: value.name,
            email: value.email,
            phone: value.phone,
            subject: value.subject,
            message: value.message,
            copy_requested: value.copy_me,
        }
    }
}

/// Accepts JSON booleans as well as the strings `"true"` and `"on"` sent by
/// HTML checkboxes.
fn deserialize_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Flag {
        Bool(bool),
        Text(String),
    }

    Ok(match Option::<Flag>::deserialize(deserializer)? {
        Some(Flag::Bool(value)) => value,
        Some(Flag::Text(value)) => matches!(value.as_str(), "true" | "on"),
        None => false,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiContactResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_channel: Option<ChannelResults>,
    /// Prefilled `mailto:` link, only present if every channel failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<String>,
}
