//! Confluence Cloud integration for mdpub.
//!
//! - [`ConfluenceClient`]: blocking REST client (v2 pages API, v1 labels and
//!   attachments) with HTTP Basic authentication
//! - [`PageService`]: the operations reconciliation needs, implemented by
//!   the client and by `MockPageService` (behind the `mock` feature)
//! - [`Publisher`]: reconciles one [`Document`](mdpub_document::Document)
//!   with its remote page and reports a [`PublishOutcome`]

mod client;
mod error;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod publisher;
mod service;
mod types;

pub use client::ConfluenceClient;
pub use error::ConfluenceError;
#[cfg(any(test, feature = "mock"))]
pub use mock::{MockAttachment, MockCall, MockPage, MockPageService};
pub use publisher::{PublishAction, PublishError, PublishOptions, PublishOutcome, Publisher};
pub use service::{CreatePage, PageService, UpdatePage};
pub use types::{Attachment, Page, Space, Version};
