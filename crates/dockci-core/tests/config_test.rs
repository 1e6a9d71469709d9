use std::path::Path;

use dockci_core::{DeploymentMode, ProjectConfig};
use tempfile::TempDir;

#[test]
fn load_returns_defaults_when_no_config_file() {
    let tmp = TempDir::new().unwrap();
    let config = ProjectConfig::load(tmp.path()).unwrap();

    assert!(config.workflow.mode.is_none());
    assert_eq!(config.workflow.dir, Path::new(".github/workflows"));
    assert!(config.image.name.is_none());
    assert!(config.image.dockerfile.is_none());
    assert!(config.image.context.is_none());
    assert!(config.image.platforms.is_none());
    assert!(config.shared.repo.is_none());
    assert!(config.shared.git_ref.is_none());
    assert_eq!(
        config.publish.commit_message,
        "ci: add Docker build and push workflow"
    );
    assert!(!ProjectConfig::exists(tmp.path()));
}

#[test]
fn load_parses_full_config() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[workflow]
mode = "remote-shared"
dir = "ci/workflows"

[image]
name = "Widget-API"
dockerfile = "docker/Dockerfile.prod"
context = "services/api"
platforms = ["linux/amd64", "linux/arm64", "linux/arm/v7"]

[shared]
repo = "acme/shared-workflows"
ref = "v2.0.0"

[publish]
commit_message = "chore: wire up image publishing"
"#;
    std::fs::write(tmp.path().join("dockci.toml"), toml).unwrap();

    let config = ProjectConfig::load(tmp.path()).unwrap();

    assert_eq!(config.workflow.mode, Some(DeploymentMode::RemoteShared));
    assert_eq!(config.workflow.dir, Path::new("ci/workflows"));
    assert_eq!(config.image.name.as_deref(), Some("Widget-API"));
    assert_eq!(
        config.image.dockerfile.as_deref(),
        Some("docker/Dockerfile.prod")
    );
    assert_eq!(config.image.context.as_deref(), Some("services/api"));
    assert_eq!(
        config.image.platforms_joined().as_deref(),
        Some("linux/amd64,linux/arm64,linux/arm/v7")
    );
    assert_eq!(config.shared.repo.as_deref(), Some("acme/shared-workflows"));
    assert_eq!(config.shared.git_ref.as_deref(), Some("v2.0.0"));
    assert_eq!(config.publish.commit_message, "chore: wire up image publishing");
    assert!(ProjectConfig::exists(tmp.path()));
}

#[test]
fn load_partial_config_fills_defaults() {
    let tmp = TempDir::new().unwrap();
    let toml = r#"
[workflow]
mode = "inline"
"#;
    std::fs::write(tmp.path().join("dockci.toml"), toml).unwrap();

    let config = ProjectConfig::load(tmp.path()).unwrap();

    assert_eq!(config.workflow.mode, Some(DeploymentMode::Inline));
    assert_eq!(config.workflow.dir, Path::new(".github/workflows"));
    assert!(config.image.name.is_none());
    assert_eq!(
        config.publish.commit_message,
        "ci: add Docker build and push workflow"
    );
}

#[test]
fn load_empty_file_returns_defaults() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("dockci.toml"), "").unwrap();

    let config = ProjectConfig::load(tmp.path()).unwrap();

    assert!(config.workflow.mode.is_none());
    assert_eq!(config.workflow.dir, Path::new(".github/workflows"));
}

#[test]
fn load_rejects_unknown_mode() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("dockci.toml"),
        "[workflow]\nmode = \"kubernetes\"\n",
    )
    .unwrap();

    let err = ProjectConfig::load(tmp.path()).unwrap_err();
    assert!(matches!(err, dockci_core::Error::ConfigParse { .. }));
}

#[test]
fn load_invalid_toml_reports_path() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("dockci.toml"), "[[[ broken").unwrap();

    let err = ProjectConfig::load(tmp.path()).unwrap_err();
    assert!(err.to_string().contains("dockci.toml"));
}
