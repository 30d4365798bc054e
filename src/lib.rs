pub mod client;
pub mod error;
pub mod export;
pub mod output;
pub mod renderer;
pub mod section;

pub use client::{Credentials, RepositoryClient, RepositoryError};
pub use error::ExportError;
pub use export::{ExportSummary, Exporter, FailurePolicy};
pub use output::{OutputError, OutputLayout};
pub use renderer::{GraphRenderer, RenderError};
pub use section::{LemmaText, Section};
