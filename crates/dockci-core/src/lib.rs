//! Core types and configuration for dockci.
//!
//! This crate defines the per-run [`WorkflowConfig`] record consumed by the
//! renderer, the `dockci.toml` schema ([`ProjectConfig`]), GitHub remote
//! parsing ([`GitHubRepo`]), and shared error types.

pub mod config;
pub mod error;
pub mod repo;
pub mod workflow;

pub use config::{ImageSection, ProjectConfig, PublishSection, SharedSection, WorkflowSection};
pub use error::{Error, Result};
pub use repo::GitHubRepo;
pub use workflow::{
    DeploymentMode, ImageName, Platforms, SharedWorkflow, WorkflowConfig, WorkflowConfigBuilder,
};

/// File name of the caller workflow, written in every mode.
pub const CALLER_WORKFLOW_FILE: &str = "ci.yml";

/// File name of the reusable build-and-push workflow.
pub const REUSABLE_WORKFLOW_FILE: &str = "docker-build-push.yml";

/// Repository secret holding the Docker Hub username.
pub const SECRET_DOCKERHUB_USERNAME: &str = "DOCKERHUB_USERNAME";

/// Repository secret holding the Docker Hub access token.
pub const SECRET_DOCKERHUB_TOKEN: &str = "DOCKERHUB_TOKEN";

/// Both repository secrets the generated workflows authenticate with.
pub const DOCKERHUB_SECRET_NAMES: &[&str] = &[SECRET_DOCKERHUB_USERNAME, SECRET_DOCKERHUB_TOKEN];

pub const DEFAULT_DOCKERFILE: &str = "./Dockerfile";
pub const DEFAULT_CONTEXT: &str = ".";
pub const DEFAULT_PLATFORMS: &[&str] = &["linux/amd64", "linux/arm64"];
pub const DEFAULT_SHARED_REF: &str = "main";
pub const DEFAULT_WORKFLOWS_DIR: &str = ".github/workflows";
pub const DEFAULT_COMMIT_MESSAGE: &str = "ci: add Docker build and push workflow";
