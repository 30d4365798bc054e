//! Walks a tradition's sections and writes one SVG per section that has
//! lemma text.

use std::path::PathBuf;

use crate::client::RepositoryClient;
use crate::error::ExportError;
use crate::output::{OutputError, OutputLayout};
use crate::renderer::GraphRenderer;
use crate::section::Section;

/// What to do when fetching, rendering or saving one section's graph fails.
/// Listing sections and checking lemma text are always fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    #[default]
    Abort,
    Skip,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExportSummary {
    pub listed: usize,
    pub rendered: usize,
    pub without_lemma: usize,
    pub failed: usize,
}

pub struct Exporter {
    client: RepositoryClient,
    renderer: GraphRenderer,
    layout: OutputLayout,
    policy: FailurePolicy,
}

impl Exporter {
    pub fn new(client: RepositoryClient, renderer: GraphRenderer, layout: OutputLayout) -> Self {
        Self {
            client,
            renderer,
            layout,
            policy: FailurePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FailurePolicy) -> Self {
        self.policy = policy;
        self
    }

    /// List sections and export them.
    pub async fn run(&self) -> Result<ExportSummary, ExportError> {
        let sections = self.sections().await?;
        self.export_sections(&sections).await
    }

    pub async fn sections(&self) -> Result<Vec<Section>, ExportError> {
        self.client
            .sections()
            .await
            .map_err(ExportError::ListSections)
    }

    /// Check each section's lemma text, in order, and render those that have
    /// some.
    pub async fn export_sections(
        &self,
        sections: &[Section],
    ) -> Result<ExportSummary, ExportError> {
        let mut summary = ExportSummary {
            listed: sections.len(),
            ..ExportSummary::default()
        };

        for section in sections {
            let lemma = self
                .client
                .lemma_text(&section.id)
                .await
                .map_err(|source| ExportError::LemmaText {
                    section: section.id.clone(),
                    source,
                })?;
            if lemma.is_empty() {
                tracing::debug!(section = %section.id, "no lemma text, skipping");
                summary.without_lemma += 1;
                continue;
            }

            tracing::info!("Collecting data for section {}", section.name);
            match self.render_section(section).await {
                Ok(_) => summary.rendered += 1,
                Err(e) if self.policy == FailurePolicy::Skip => {
                    tracing::warn!("{e}");
                    summary.failed += 1;
                }
                Err(e) => return Err(e),
            }
        }

        if summary.failed > 0 {
            tracing::warn!(
                listed = summary.listed,
                rendered = summary.rendered,
                without_lemma = summary.without_lemma,
                failed = summary.failed,
                "export finished with failures"
            );
        } else {
            tracing::info!(
                listed = summary.listed,
                rendered = summary.rendered,
                without_lemma = summary.without_lemma,
                "export finished"
            );
        }
        Ok(summary)
    }

    /// Fetch, render and save one section's graph, returning the file written.
    /// The section directory exists even if a later step fails.
    pub async fn render_section(&self, section: &Section) -> Result<PathBuf, ExportError> {
        let id = &section.id;
        let output_err = |source: OutputError| ExportError::Output {
            section: id.clone(),
            source,
        };
        self.layout.ensure_section_dir(id).map_err(output_err)?;

        let dot = self
            .client
            .dot(id)
            .await
            .map_err(|source| ExportError::Graph {
                section: id.clone(),
                source,
            })?;
        let svg = self
            .renderer
            .render(&dot)
            .await
            .map_err(|source| ExportError::Render {
                section: id.clone(),
                source,
            })?;
        self.layout.write_graph(id, &svg).map_err(output_err)
    }
}
