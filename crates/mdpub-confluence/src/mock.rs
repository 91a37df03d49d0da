//! In-memory page service for testing.
//!
//! Provides [`MockPageService`] for exercising reconciliation and batch
//! publishing without network access.

use std::sync::RwLock;

use crate::error::ConfluenceError;
use crate::service::{CreatePage, PageService, UpdatePage};
use crate::types::{Attachment, Page, Space, Version};

/// A remote call recorded by [`MockPageService`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// Space lookup by key.
    GetSpace(String),
    /// Title search.
    FindPage(String),
    /// Page fetch by id.
    GetPage(String),
    /// Page creation, by title.
    CreatePage(String),
    /// Page update: id and new version.
    UpdatePage(String, u32),
    /// Labels attached to a page.
    AddLabels(String, Vec<String>),
    /// Attachment upload: page id and filename.
    UploadAttachment(String, String),
}

/// A page stored by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockPage {
    /// Page id.
    pub id: String,
    /// Space id.
    pub space_id: String,
    /// Title.
    pub title: String,
    /// Current version.
    pub version: u32,
    /// Storage-format body.
    pub body: String,
    /// Parent page id.
    pub parent_id: Option<String>,
    /// Version comment of the last update.
    pub message: Option<String>,
    /// Attached labels.
    pub labels: Vec<String>,
}

/// An attachment stored by the mock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockAttachment {
    /// Attachment id.
    pub id: String,
    /// Owning page id.
    pub page_id: String,
    /// Filename.
    pub filename: String,
    /// Uploaded bytes, replaced on re-upload.
    pub data: Vec<u8>,
    /// Content type of the last upload.
    pub content_type: String,
}

#[derive(Debug, Default)]
struct State {
    spaces: Vec<Space>,
    pages: Vec<MockPage>,
    attachments: Vec<MockAttachment>,
    calls: Vec<MockCall>,
    next_id: u64,
}

impl State {
    fn allocate_id(&mut self) -> String {
        self.next_id += 1;
        (90_000 + self.next_id).to_string()
    }

    fn page_mut(&mut self, page_id: &str) -> Result<&mut MockPage, ConfluenceError> {
        self.pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| ConfluenceError::NotFound {
                page_id: page_id.to_owned(),
            })
    }
}

/// Mock page service for testing.
///
/// Stores spaces, pages and attachments in memory and records every call.
/// Use the builder methods to seed it with test data.
///
/// # Example
///
/// ```ignore
/// use mdpub_confluence::{MockPageService, PageService};
///
/// let service = MockPageService::new()
///     .with_space("DOCS", "100")
///     .with_page("100", "42", "User Guide", 3);
///
/// let page = service.find_page_by_title("100", "User Guide").unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockPageService {
    state: RwLock<State>,
    search_omits_version: bool,
}

impl MockPageService {
    /// Create an empty mock service.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a space.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_space(self, key: impl Into<String>, id: impl Into<String>) -> Self {
        self.state.write().unwrap().spaces.push(Space {
            id: id.into(),
            key: key.into(),
        });
        self
    }

    /// Add a page at `version`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_page(
        self,
        space_id: impl Into<String>,
        id: impl Into<String>,
        title: impl Into<String>,
        version: u32,
    ) -> Self {
        self.state.write().unwrap().pages.push(MockPage {
            id: id.into(),
            space_id: space_id.into(),
            title: title.into(),
            version,
            body: String::new(),
            parent_id: None,
            message: None,
            labels: Vec::new(),
        });
        self
    }

    /// Add an attachment to a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_attachment(self, page_id: impl Into<String>, filename: impl Into<String>) -> Self {
        {
            let mut state = self.state.write().unwrap();
            let id = format!("att{}", state.allocate_id());
            state.attachments.push(MockAttachment {
                id,
                page_id: page_id.into(),
                filename: filename.into(),
                data: Vec::new(),
                content_type: String::new(),
            });
        }
        self
    }

    /// Return title search results without version information, forcing a
    /// refetch by id.
    #[must_use]
    pub fn search_omits_version(mut self) -> Self {
        self.search_omits_version = true;
        self
    }

    /// Calls recorded so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.state.read().unwrap().calls.clone()
    }

    /// Whether any recorded call changed remote state.
    #[must_use]
    pub fn has_mutations(&self) -> bool {
        self.calls().iter().any(|c| {
            matches!(
                c,
                MockCall::CreatePage(_)
                    | MockCall::UpdatePage(..)
                    | MockCall::AddLabels(..)
                    | MockCall::UploadAttachment(..)
            )
        })
    }

    /// Current state of a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn page(&self, page_id: &str) -> Option<MockPage> {
        self.state
            .read()
            .unwrap()
            .pages
            .iter()
            .find(|p| p.id == page_id)
            .cloned()
    }

    /// Pages with the given title.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn pages_titled(&self, title: &str) -> Vec<MockPage> {
        self.state
            .read()
            .unwrap()
            .pages
            .iter()
            .filter(|p| p.title == title)
            .cloned()
            .collect()
    }

    /// Attachments on a page.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn attachments(&self, page_id: &str) -> Vec<MockAttachment> {
        self.state
            .read()
            .unwrap()
            .attachments
            .iter()
            .filter(|a| a.page_id == page_id)
            .cloned()
            .collect()
    }

    fn record(&self, call: MockCall) {
        self.state.write().unwrap().calls.push(call);
    }
}

fn to_page(page: &MockPage, with_version: bool) -> Page {
    Page {
        id: page.id.clone(),
        title: page.title.clone(),
        version: with_version.then_some(Version {
            number: page.version,
        }),
    }
}

impl PageService for MockPageService {
    fn get_space_by_key(&self, key: &str) -> Result<Space, ConfluenceError> {
        self.record(MockCall::GetSpace(key.to_owned()));
        self.state
            .read()
            .unwrap()
            .spaces
            .iter()
            .find(|s| s.key == key)
            .cloned()
            .ok_or_else(|| ConfluenceError::SpaceNotFound(key.to_owned()))
    }

    fn find_page_by_title(
        &self,
        space_id: &str,
        title: &str,
    ) -> Result<Option<Page>, ConfluenceError> {
        self.record(MockCall::FindPage(title.to_owned()));
        let state = self.state.read().unwrap();
        Ok(state
            .pages
            .iter()
            .find(|p| p.space_id == space_id && p.title == title)
            .map(|p| to_page(p, !self.search_omits_version)))
    }

    fn get_page(&self, page_id: &str) -> Result<Page, ConfluenceError> {
        self.record(MockCall::GetPage(page_id.to_owned()));
        let mut state = self.state.write().unwrap();
        let page = state.page_mut(page_id)?;
        Ok(to_page(page, true))
    }

    fn create_page(&self, request: &CreatePage<'_>) -> Result<Page, ConfluenceError> {
        self.record(MockCall::CreatePage(request.title.to_owned()));
        let mut state = self.state.write().unwrap();
        let page = MockPage {
            id: state.allocate_id(),
            space_id: request.space_id.to_owned(),
            title: request.title.to_owned(),
            version: 1,
            body: request.body.to_owned(),
            parent_id: request.parent_id.map(str::to_owned),
            message: None,
            labels: Vec::new(),
        };
        let result = to_page(&page, true);
        state.pages.push(page);
        Ok(result)
    }

    fn update_page(&self, request: &UpdatePage<'_>) -> Result<Page, ConfluenceError> {
        self.record(MockCall::UpdatePage(
            request.page_id.to_owned(),
            request.version,
        ));
        let mut state = self.state.write().unwrap();
        let page = state.page_mut(request.page_id)?;
        if request.version != page.version + 1 {
            return Err(ConfluenceError::HttpResponse {
                method: "PUT".to_owned(),
                path: format!("/wiki/api/v2/pages/{}", request.page_id),
                status: 409,
                body: format!(
                    "Version must be incremented (current {}, got {})",
                    page.version, request.version
                ),
            });
        }
        page.title = request.title.to_owned();
        page.body = request.body.to_owned();
        page.version = request.version;
        page.message = Some(request.message.to_owned());
        if let Some(parent_id) = request.parent_id {
            page.parent_id = Some(parent_id.to_owned());
        }
        Ok(to_page(page, true))
    }

    fn add_labels(&self, page_id: &str, labels: &[String]) -> Result<(), ConfluenceError> {
        if labels.is_empty() {
            return Ok(());
        }
        self.record(MockCall::AddLabels(page_id.to_owned(), labels.to_vec()));
        let mut state = self.state.write().unwrap();
        let page = state.page_mut(page_id)?;
        for label in labels {
            if !page.labels.contains(label) {
                page.labels.push(label.clone());
            }
        }
        Ok(())
    }

    fn upload_attachment(
        &self,
        page_id: &str,
        filename: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<Attachment, ConfluenceError> {
        self.record(MockCall::UploadAttachment(
            page_id.to_owned(),
            filename.to_owned(),
        ));
        let mut state = self.state.write().unwrap();
        state.page_mut(page_id)?;

        if let Some(existing) = state
            .attachments
            .iter_mut()
            .find(|a| a.page_id == page_id && a.filename == filename)
        {
            existing.data = data.to_vec();
            existing.content_type = content_type.to_owned();
            return Ok(Attachment {
                id: existing.id.clone(),
                title: existing.filename.clone(),
            });
        }

        let id = format!("att{}", state.allocate_id());
        state.attachments.push(MockAttachment {
            id: id.clone(),
            page_id: page_id.to_owned(),
            filename: filename.to_owned(),
            data: data.to_vec(),
            content_type: content_type.to_owned(),
        });
        Ok(Attachment {
            id,
            title: filename.to_owned(),
        })
    }
}
