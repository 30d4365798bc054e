use crate::client::RepositoryError;
use crate::output::OutputError;
use crate::renderer::RenderError;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to list sections: {0}")]
    ListSections(#[source] RepositoryError),

    #[error("failed to fetch lemma text for section {section}: {source}")]
    LemmaText {
        section: String,
        source: RepositoryError,
    },

    #[error("failed to fetch graph for section {section}: {source}")]
    Graph {
        section: String,
        source: RepositoryError,
    },

    #[error("failed to render graph for section {section}: {source}")]
    Render {
        section: String,
        source: RenderError,
    },

    #[error("failed to save graph for section {section}: {source}")]
    Output {
        section: String,
        source: OutputError,
    },
}

impl ExportError {
    /// The section the failure belongs to, if any.
    pub fn section(&self) -> Option<&str> {
        match self {
            ExportError::ListSections(_) => None,
            ExportError::LemmaText { section, .. }
            | ExportError::Graph { section, .. }
            | ExportError::Render { section, .. }
            | ExportError::Output { section, .. } => Some(section),
        }
    }
}
