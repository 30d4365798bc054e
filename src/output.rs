use std::path::{Component, Path, PathBuf};

pub const GRAPH_FILE: &str = "graph.svg";

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("cannot locate the running executable: {0}")]
    ExecutableDir(std::io::Error),

    #[error("section id `{0}` is not a single directory name")]
    InvalidSectionId(String),

    #[error("failed to create {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Where one run writes its files: `<base>/data_<timestamp>/<section>/graph.svg`.
#[derive(Debug, Clone, PartialEq)]
pub struct OutputLayout {
    run_dir: PathBuf,
}

impl OutputLayout {
    pub fn new(base: impl AsRef<Path>, timestamp: &str) -> Self {
        Self {
            run_dir: base.as_ref().join(format!("data_{timestamp}")),
        }
    }

    /// `<dir of the running executable>/../public/data`, left unnormalised.
    pub fn default_base() -> Result<PathBuf, OutputError> {
        let exe = std::env::current_exe().map_err(OutputError::ExecutableDir)?;
        let dir = exe.parent().unwrap_or_else(|| Path::new("."));
        Ok(dir.join("..").join("public").join("data"))
    }

    pub fn run_dir(&self) -> &Path {
        &self.run_dir
    }

    /// The section's directory directly under the run directory. Ids that
    /// would resolve anywhere else (`..`, absolute paths, nested paths) are
    /// rejected.
    pub fn section_dir(&self, section_id: &str) -> Result<PathBuf, OutputError> {
        let mut components = Path::new(section_id).components();
        match (components.next(), components.next()) {
            (Some(Component::Normal(name)), None) => Ok(self.run_dir.join(name)),
            _ => Err(OutputError::InvalidSectionId(section_id.to_string())),
        }
    }

    pub fn graph_path(&self, section_id: &str) -> Result<PathBuf, OutputError> {
        Ok(self.section_dir(section_id)?.join(GRAPH_FILE))
    }

    /// Create the section directory (and the run directory above it). An
    /// existing directory is fine.
    pub fn ensure_section_dir(&self, section_id: &str) -> Result<PathBuf, OutputError> {
        let dir = self.section_dir(section_id)?;
        std::fs::create_dir_all(&dir).map_err(|source| OutputError::CreateDir {
            path: dir.clone(),
            source,
        })?;
        Ok(dir)
    }

    /// Write `svg` over any previous `graph.svg` for the section.
    pub fn write_graph(&self, section_id: &str, svg: &str) -> Result<PathBuf, OutputError> {
        let path = self.ensure_section_dir(section_id)?.join(GRAPH_FILE);
        std::fs::write(&path, svg).map_err(|source| OutputError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
