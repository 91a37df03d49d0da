//! Reconciliation of one document with its remote page.

use mdpub_diagrams::DiagramRasterizer;
use mdpub_document::{Document, merge_labels};
use mdpub_renderer::{DiagramOptions, PlannedDiagram, StorageRenderer};
use tracing::{debug, info};

use super::PublishOptions;
use super::error::PublishError;
use super::outcome::{PublishAction, PublishOutcome};
use crate::service::{CreatePage, PageService, UpdatePage};
use crate::types::Page;

/// Publishes documents to one space through a [`PageService`].
pub struct Publisher<'a, S: PageService + ?Sized> {
    service: &'a S,
    rasterizer: &'a DiagramRasterizer,
    options: PublishOptions,
}

/// Rendered body plus everything derived from the document up front.
struct Prepared<'d> {
    doc: &'d Document,
    body: String,
    diagrams: Vec<PlannedDiagram>,
    labels: Vec<String>,
    parent_id: Option<&'d str>,
}

impl<'a, S: PageService + ?Sized> Publisher<'a, S> {
    /// Create a publisher.
    #[must_use]
    pub fn new(service: &'a S, rasterizer: &'a DiagramRasterizer, options: PublishOptions) -> Self {
        Self {
            service,
            rasterizer,
            options,
        }
    }

    /// Publishing options.
    #[must_use]
    pub fn options(&self) -> &PublishOptions {
        &self.options
    }

    /// Reconcile `doc` with its remote page.
    ///
    /// # Errors
    ///
    /// Returns an error if a remote call fails, including a page id named in
    /// front matter that does not exist.
    pub fn publish(&self, doc: &Document) -> Result<PublishOutcome, PublishError> {
        let prepared = self.prepare(doc);

        let existing = if let Some(page_id) = &doc.page_id {
            Some(self.service.get_page(page_id)?)
        } else if self.options.update_if_title_match {
            self.service
                .find_page_by_title(&self.options.space_id, &doc.title)?
        } else {
            None
        };

        match existing {
            Some(page) => self.update_existing(&prepared, page),
            None => self.create_missing(&prepared),
        }
    }

    fn prepare<'d>(&'d self, doc: &'d Document) -> Prepared<'d> {
        let renderer = StorageRenderer::new()
            .engine(self.options.markdown_engine)
            .diagrams(DiagramOptions {
                mode: self.options.diagram_mode,
                image_width: self.options.image_width,
                filename_prefix: doc.title.clone(),
            });
        let conversion = renderer.render(&doc.body);
        debug!(
            path = %doc.path.display(),
            diagrams = conversion.diagrams.len(),
            "Rendered document"
        );

        Prepared {
            doc,
            body: conversion.html,
            diagrams: conversion.diagrams,
            labels: merge_labels(&self.options.default_labels, &doc.labels),
            parent_id: doc
                .parent_id
                .as_deref()
                .or(self.options.default_parent_id.as_deref()),
        }
    }

    fn update_existing(
        &self,
        prepared: &Prepared<'_>,
        page: Page,
    ) -> Result<PublishOutcome, PublishError> {
        let doc = prepared.doc;
        if doc.page_id.is_none() && !self.options.update_if_title_match {
            return Ok(outcome(
                PublishAction::Skipped,
                Some(page.id),
                doc,
                Some("exists and update disabled".to_owned()),
            ));
        }

        let current = if page.version.is_some() {
            page
        } else {
            self.service.get_page(&page.id)?
        };
        let current_version = current.current_version();
        let next_version = current_version
            .checked_add(1)
            .ok_or_else(|| PublishError::VersionOverflow {
                page_id: current.id.clone(),
                version: current_version,
            })?;

        if self.options.dry_run {
            let note = format!(
                "would update version {current_version} -> {next_version}{}",
                diagram_suffix(&prepared.diagrams)
            );
            return Ok(outcome(
                PublishAction::DryRunUpdate,
                Some(current.id),
                doc,
                Some(note),
            ));
        }

        self.upload_diagrams(&current.id, &prepared.diagrams)?;

        let updated = self.service.update_page(&UpdatePage {
            page_id: &current.id,
            title: &doc.title,
            body: &prepared.body,
            version: next_version,
            message: &self.options.version_message,
            parent_id: prepared.parent_id,
        })?;
        if !prepared.labels.is_empty() {
            self.service.add_labels(&updated.id, &prepared.labels)?;
        }

        info!("Updated page {} to version {}", updated.id, next_version);
        Ok(outcome(PublishAction::Updated, Some(updated.id), doc, None))
    }

    fn create_missing(&self, prepared: &Prepared<'_>) -> Result<PublishOutcome, PublishError> {
        let doc = prepared.doc;
        if !self.options.create_if_missing {
            return Ok(outcome(
                PublishAction::Skipped,
                None,
                doc,
                Some("not found and create disabled".to_owned()),
            ));
        }

        if self.options.dry_run {
            let note = format!("would create new page{}", diagram_suffix(&prepared.diagrams));
            return Ok(outcome(PublishAction::DryRunCreate, None, doc, Some(note)));
        }

        let created = self.service.create_page(&CreatePage {
            space_id: &self.options.space_id,
            title: &doc.title,
            body: &prepared.body,
            parent_id: prepared.parent_id,
        })?;
        self.upload_diagrams(&created.id, &prepared.diagrams)?;
        if !prepared.labels.is_empty() {
            self.service.add_labels(&created.id, &prepared.labels)?;
        }

        Ok(outcome(PublishAction::Created, Some(created.id), doc, None))
    }

    /// Render and upload every planned diagram, in document order.
    fn upload_diagrams(
        &self,
        page_id: &str,
        diagrams: &[PlannedDiagram],
    ) -> Result<(), PublishError> {
        for diagram in diagrams {
            let image = self.rasterizer.rasterize(&diagram.source);
            self.service.upload_attachment(
                page_id,
                &diagram.filename,
                &image.data,
                image.content_type(),
            )?;
        }
        Ok(())
    }
}

fn outcome(
    action: PublishAction,
    page_id: Option<String>,
    doc: &Document,
    note: Option<String>,
) -> PublishOutcome {
    PublishOutcome {
        action,
        page_id,
        title: doc.title.clone(),
        path: doc.path.clone(),
        note,
    }
}

fn diagram_suffix(diagrams: &[PlannedDiagram]) -> String {
    if diagrams.is_empty() {
        String::new()
    } else {
        format!("; diagram images={}", diagrams.len())
    }
}
