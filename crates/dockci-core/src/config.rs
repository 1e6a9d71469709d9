use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::workflow::DeploymentMode;
use crate::{DEFAULT_COMMIT_MESSAGE, DEFAULT_WORKFLOWS_DIR};

/// Name of the optional per-repository config file.
pub const CONFIG_FILE: &str = "dockci.toml";

/// dockci.toml configuration
///
/// Every value here is a default for the interactive flow; command-line
/// flags take precedence.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfig {
    #[serde(default)]
    pub workflow: WorkflowSection,
    #[serde(default)]
    pub image: ImageSection,
    #[serde(default)]
    pub shared: SharedSection,
    #[serde(default)]
    pub publish: PublishSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowSection {
    /// Preselected deployment mode
    pub mode: Option<DeploymentMode>,
    /// Directory the workflow files are written to
    #[serde(default = "default_workflows_dir")]
    pub dir: PathBuf,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageSection {
    /// Image repository name (defaults to the GitHub repository name)
    pub name: Option<String>,
    pub dockerfile: Option<String>,
    pub context: Option<String>,
    pub platforms: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SharedSection {
    /// `owner/repo` hosting the shared reusable workflow
    pub repo: Option<String>,
    /// Branch or tag to pin the shared workflow to
    #[serde(rename = "ref")]
    pub git_ref: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishSection {
    #[serde(default = "default_commit_message")]
    pub commit_message: String,
}

impl Default for WorkflowSection {
    fn default() -> Self {
        Self {
            mode: None,
            dir: default_workflows_dir(),
        }
    }
}

impl Default for PublishSection {
    fn default() -> Self {
        Self {
            commit_message: default_commit_message(),
        }
    }
}

impl ImageSection {
    /// Configured platforms joined into the comma-separated prompt form.
    pub fn platforms_joined(&self) -> Option<String> {
        self.platforms.as_ref().map(|list| list.join(","))
    }
}

impl ProjectConfig {
    /// Load from dockci.toml in the given directory, or return defaults if not found.
    pub fn load(project_dir: &Path) -> crate::Result<Self> {
        let config_path = project_dir.join(CONFIG_FILE);
        if config_path.exists() {
            tracing::debug!(path = %config_path.display(), "loading project config");
            let content =
                std::fs::read_to_string(&config_path).map_err(|e| crate::Error::ConfigLoad {
                    path: config_path.clone(),
                    source: e,
                })?;
            toml::from_str(&content).map_err(|e| crate::Error::ConfigParse {
                path: config_path,
                source: e,
            })
        } else {
            Ok(Self::default())
        }
    }

    /// Whether a config file exists in the given directory.
    pub fn exists(project_dir: &Path) -> bool {
        project_dir.join(CONFIG_FILE).exists()
    }
}

fn default_workflows_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WORKFLOWS_DIR)
}

fn default_commit_message() -> String {
    DEFAULT_COMMIT_MESSAGE.to_owned()
}
