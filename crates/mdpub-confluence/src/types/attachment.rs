//! Confluence attachment types.

use serde::Deserialize;

use super::{Results, string_or_number};

/// Confluence attachment.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Attachment {
    /// Attachment id.
    #[serde(deserialize_with = "string_or_number")]
    pub id: String,
    /// Attachment title (its filename).
    pub title: String,
}

/// Upload response: a single object when updating data, a result list when
/// creating.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum AttachmentUpload {
    Single(Attachment),
    List(Results<Attachment>),
}

impl AttachmentUpload {
    pub fn into_attachment(self) -> Option<Attachment> {
        match self {
            Self::Single(attachment) => Some(attachment),
            Self::List(list) => list.results.into_iter().next(),
        }
    }
}
