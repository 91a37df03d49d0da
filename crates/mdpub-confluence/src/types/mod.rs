//! Confluence API types.
//!
//! Only fields that are actually used are declared; serde ignores the rest.

mod attachment;
mod page;

pub use attachment::Attachment;
pub(crate) use attachment::AttachmentUpload;
pub use page::{Page, Space, Version};

use serde::{Deserialize, Deserializer};

/// List endpoint response.
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct Results<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Ids are strings in some endpoints and numbers in others.
pub(crate) fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(u64),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Text(s) => s,
        Id::Number(n) => n.to_string(),
    })
}
