use std::fmt;
use std::path::PathBuf;

use dockci_core::{DOCKERHUB_SECRET_NAMES, WorkflowConfig};

use crate::output::RenderedWorkflows;
use crate::workflow::remote_target;

/// Human-readable account of what a run produced.
///
/// Built from the config and render output only, so the Docker Hub token
/// cannot appear in it.
pub struct Summary<'a> {
    config: &'a WorkflowConfig,
    rendered: &'a RenderedWorkflows,
    written: Vec<PathBuf>,
}

impl<'a> Summary<'a> {
    pub fn new(config: &'a WorkflowConfig, rendered: &'a RenderedWorkflows) -> Self {
        Self {
            config,
            rendered,
            written: Vec::new(),
        }
    }

    /// List these paths under "Files" instead of the bare file names.
    pub fn with_written(mut self, paths: impl IntoIterator<Item = PathBuf>) -> Self {
        self.written = paths.into_iter().collect();
        self
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mode = self.rendered.mode;
        let image = self.config.image();

        writeln!(f, "Workflow summary")?;
        writeln!(f, "  Mode:        {mode} ({})", mode.description())?;
        if image.was_lowercased() {
            writeln!(
                f,
                "  Image:       {image} (converted from '{}')",
                image.original()
            )?;
        } else {
            writeln!(f, "  Image:       {image}")?;
        }
        writeln!(f, "  Docker Hub:  {}", self.config.dockerhub_username())?;
        writeln!(f, "  Dockerfile:  {}", self.config.dockerfile())?;
        writeln!(f, "  Context:     {}", self.config.context())?;
        writeln!(f, "  Platforms:   {}", self.config.platforms())?;
        if let Some(shared) = self.config.shared() {
            writeln!(f, "  Shared:      {}", remote_target(shared))?;
        }

        writeln!(f, "  Files:")?;
        if self.written.is_empty() {
            for name in self.rendered.file_names() {
                writeln!(f, "    {name}")?;
            }
        } else {
            for path in &self.written {
                writeln!(f, "    {}", path.display())?;
            }
        }

        writeln!(f, "  Secrets required:")?;
        for name in DOCKERHUB_SECRET_NAMES {
            writeln!(f, "    {name}")?;
        }

        for notice in &self.rendered.notices {
            writeln!(f, "  Note: {notice}")?;
        }

        Ok(())
    }
}
