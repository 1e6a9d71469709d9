use std::fmt;
use std::path::{Path, PathBuf};

use dockci_core::DeploymentMode;

/// One generated workflow document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    /// File name relative to the workflows directory.
    pub name: &'static str,
    pub contents: String,
}

impl RenderedFile {
    pub fn new(name: &'static str, contents: String) -> Self {
        Self { name, contents }
    }
}

/// Something the renderer changed about the input and wants the user told.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    ImageNameLowercased { original: String, normalized: String },
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ImageNameLowercased {
                original,
                normalized,
            } => write!(
                f,
                "image name '{original}' converted to '{normalized}' (Docker image names must be lowercase)"
            ),
        }
    }
}

/// The full output of one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedWorkflows {
    pub mode: DeploymentMode,
    pub files: Vec<RenderedFile>,
    pub notices: Vec<Notice>,
}

/// A file written by [`RenderedWorkflows::write_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenFile {
    pub path: PathBuf,
    /// A file already existed at `path` and was overwritten.
    pub replaced: bool,
}

impl RenderedWorkflows {
    pub fn file(&self, name: &str) -> Option<&RenderedFile> {
        self.files.iter().find(|f| f.name == name)
    }

    pub fn file_names(&self) -> Vec<&'static str> {
        self.files.iter().map(|f| f.name).collect()
    }

    /// Write every document into `dir`, creating it if needed.
    ///
    /// Only the files of the rendered mode are touched; other workflow files
    /// in `dir` are left alone.
    pub fn write_to(&self, dir: &Path) -> Result<Vec<WrittenFile>, WriteError> {
        std::fs::create_dir_all(dir).map_err(|e| WriteError::CreateDir {
            path: dir.to_path_buf(),
            source: e,
        })?;

        let mut written = Vec::with_capacity(self.files.len());
        for file in &self.files {
            let path = dir.join(file.name);
            let replaced = path.exists();
            std::fs::write(&path, &file.contents).map_err(|e| WriteError::Write {
                path: path.clone(),
                source: e,
            })?;
            tracing::debug!(path = %path.display(), replaced, "wrote workflow");
            written.push(WrittenFile { path, replaced });
        }

        Ok(written)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum WriteError {
    #[error("failed to create workflows directory at {path}")]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to write {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
