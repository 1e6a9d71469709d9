use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::repo::GitHubRepo;
use crate::{DEFAULT_CONTEXT, DEFAULT_DOCKERFILE, DEFAULT_PLATFORMS, DEFAULT_SHARED_REF};

/// How the generated pipeline is laid out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeploymentMode {
    /// A single self-contained `ci.yml`.
    #[default]
    Inline,
    /// `ci.yml` calling a reusable workflow in the same repository.
    LocalReusable,
    /// `ci.yml` calling a reusable workflow in another repository.
    RemoteShared,
}

impl DeploymentMode {
    pub const ALL: [DeploymentMode; 3] = [Self::Inline, Self::LocalReusable, Self::RemoteShared];

    /// Menu letter used by the interactive selector.
    pub fn letter(self) -> char {
        match self {
            Self::Inline => 'A',
            Self::LocalReusable => 'B',
            Self::RemoteShared => 'C',
        }
    }

    pub fn from_letter(letter: char) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.letter().eq_ignore_ascii_case(&letter))
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::LocalReusable => "local-reusable",
            Self::RemoteShared => "remote-shared",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Inline => "Single workflow with all build steps inline",
            Self::LocalReusable => "Caller workflow plus a reusable workflow in this repository",
            Self::RemoteShared => "Caller workflow using a shared workflow from another repository",
        }
    }
}

impl fmt::Display for DeploymentMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DeploymentMode {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|mode| mode.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| crate::Error::InvalidMode(wanted.to_owned()))
    }
}

/// Docker image repository name, normalized to lowercase.
///
/// Registries reject uppercase repository names, so mixed-case input is
/// converted rather than refused. [`ImageName::was_lowercased`] tells the
/// caller whether a conversion happened so it can be reported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageName {
    normalized: String,
    original: String,
}

impl ImageName {
    pub fn new(raw: &str) -> crate::Result<Self> {
        let original = raw.trim();
        if original.is_empty() {
            return Err(crate::Error::EmptyField {
                field: "image name",
            });
        }
        Ok(Self {
            normalized: original.to_lowercase(),
            original: original.to_owned(),
        })
    }

    pub fn as_str(&self) -> &str {
        &self.normalized
    }

    /// The name as it was entered, before lowercasing.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn was_lowercased(&self) -> bool {
        self.original != self.normalized
    }
}

impl fmt::Display for ImageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// Non-empty list of target platforms such as `linux/amd64`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platforms(Vec<String>);

impl Platforms {
    /// Parse a comma-separated list, dropping blank entries.
    pub fn parse(raw: &str) -> crate::Result<Self> {
        Self::from_list(raw.split(','))
    }

    pub fn from_list<I, S>(items: I) -> crate::Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let list: Vec<String> = items
            .into_iter()
            .map(|s| s.as_ref().trim().to_owned())
            .filter(|s| !s.is_empty())
            .collect();
        if list.is_empty() {
            return Err(crate::Error::EmptyField { field: "platforms" });
        }
        Ok(Self(list))
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }
}

impl Default for Platforms {
    fn default() -> Self {
        Self(DEFAULT_PLATFORMS.iter().map(|p| (*p).to_owned()).collect())
    }
}

impl fmt::Display for Platforms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(","))
    }
}

/// Location of a reusable workflow hosted in another repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SharedWorkflow {
    pub repo: GitHubRepo,
    /// Branch or tag the caller pins to.
    pub git_ref: String,
}

/// Everything the renderer needs for one run.
///
/// Built once through [`WorkflowConfigBuilder`] and never mutated. The
/// Docker Hub token is not part of this record; it only travels to the
/// secret provisioning step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowConfig {
    mode: DeploymentMode,
    image: ImageName,
    dockerfile: String,
    context: String,
    platforms: Platforms,
    dockerhub_username: String,
    shared: Option<SharedWorkflow>,
}

impl WorkflowConfig {
    pub fn builder() -> WorkflowConfigBuilder {
        WorkflowConfigBuilder::default()
    }

    pub fn mode(&self) -> DeploymentMode {
        self.mode
    }

    pub fn image(&self) -> &ImageName {
        &self.image
    }

    pub fn dockerfile(&self) -> &str {
        &self.dockerfile
    }

    pub fn context(&self) -> &str {
        &self.context
    }

    pub fn platforms(&self) -> &Platforms {
        &self.platforms
    }

    pub fn dockerhub_username(&self) -> &str {
        &self.dockerhub_username
    }

    /// Present exactly when the mode is [`DeploymentMode::RemoteShared`].
    pub fn shared(&self) -> Option<&SharedWorkflow> {
        self.shared.as_ref()
    }
}

#[derive(Debug, Clone, Default)]
pub struct WorkflowConfigBuilder {
    mode: Option<DeploymentMode>,
    image: Option<String>,
    dockerfile: Option<String>,
    context: Option<String>,
    platforms: Option<String>,
    dockerhub_username: Option<String>,
    shared_repo: Option<String>,
    shared_ref: Option<String>,
}

impl WorkflowConfigBuilder {
    pub fn mode(mut self, mode: DeploymentMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    pub fn dockerfile(mut self, path: impl Into<String>) -> Self {
        self.dockerfile = Some(path.into());
        self
    }

    pub fn context(mut self, dir: impl Into<String>) -> Self {
        self.context = Some(dir.into());
        self
    }

    /// Comma-separated platform list.
    pub fn platforms(mut self, platforms: impl Into<String>) -> Self {
        self.platforms = Some(platforms.into());
        self
    }

    pub fn dockerhub_username(mut self, username: impl Into<String>) -> Self {
        self.dockerhub_username = Some(username.into());
        self
    }

    pub fn shared_repo(mut self, repo: impl Into<String>) -> Self {
        self.shared_repo = Some(repo.into());
        self
    }

    pub fn shared_ref(mut self, git_ref: impl Into<String>) -> Self {
        self.shared_ref = Some(git_ref.into());
        self
    }

    /// Validate and assemble the config.
    ///
    /// Unset optional fields take their defaults; fields that were set to a
    /// blank string are rejected. Shared-workflow fields are ignored unless
    /// the mode is [`DeploymentMode::RemoteShared`].
    pub fn build(self) -> crate::Result<WorkflowConfig> {
        let mode = self.mode.ok_or(crate::Error::MissingField {
            field: "deployment mode",
        })?;
        let image = ImageName::new(&self.image.ok_or(crate::Error::MissingField {
            field: "image name",
        })?)?;
        let dockerfile = non_empty_or(self.dockerfile, DEFAULT_DOCKERFILE, "Dockerfile path")?;
        let context = non_empty_or(self.context, DEFAULT_CONTEXT, "build context")?;
        let platforms = match self.platforms {
            Some(raw) => Platforms::parse(&raw)?,
            None => Platforms::default(),
        };
        let dockerhub_username = required(self.dockerhub_username, "Docker Hub username")?;

        let shared = match mode {
            DeploymentMode::RemoteShared => {
                let repo = required(self.shared_repo, "shared workflow repository")?;
                let git_ref =
                    non_empty_or(self.shared_ref, DEFAULT_SHARED_REF, "shared workflow ref")?;
                Some(SharedWorkflow {
                    repo: repo.parse()?,
                    git_ref,
                })
            }
            DeploymentMode::Inline | DeploymentMode::LocalReusable => None,
        };

        tracing::debug!(
            %mode,
            image = %image,
            platforms = %platforms,
            "workflow config assembled"
        );

        Ok(WorkflowConfig {
            mode,
            image,
            dockerfile,
            context,
            platforms,
            dockerhub_username,
            shared,
        })
    }
}

fn required(value: Option<String>, field: &'static str) -> crate::Result<String> {
    let value = value.ok_or(crate::Error::MissingField { field })?;
    let value = value.trim();
    if value.is_empty() {
        return Err(crate::Error::EmptyField { field });
    }
    Ok(value.to_owned())
}

fn non_empty_or(
    value: Option<String>,
    default: &str,
    field: &'static str,
) -> crate::Result<String> {
    match value {
        Some(v) => required(Some(v), field),
        None => Ok(default.to_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> WorkflowConfigBuilder {
        WorkflowConfig::builder()
            .mode(DeploymentMode::Inline)
            .image("app")
            .dockerhub_username("octocat")
    }

    #[test]
    fn mode_letters_are_case_insensitive() {
        assert_eq!(DeploymentMode::from_letter('a'), Some(DeploymentMode::Inline));
        assert_eq!(
            DeploymentMode::from_letter('B'),
            Some(DeploymentMode::LocalReusable)
        );
        assert_eq!(
            DeploymentMode::from_letter('c'),
            Some(DeploymentMode::RemoteShared)
        );
        assert_eq!(DeploymentMode::from_letter('d'), None);
    }

    #[test]
    fn mode_from_str_accepts_names() {
        assert_eq!(
            "Local-Reusable".parse::<DeploymentMode>().unwrap(),
            DeploymentMode::LocalReusable
        );
        assert!(matches!(
            "docker".parse::<DeploymentMode>(),
            Err(crate::Error::InvalidMode(_))
        ));
    }

    #[test]
    fn image_name_is_lowercased() {
        let image = ImageName::new("  My-App ").unwrap();
        assert_eq!(image.as_str(), "my-app");
        assert_eq!(image.original(), "My-App");
        assert!(image.was_lowercased());
    }

    #[test]
    fn lowercase_image_name_is_not_reported() {
        let image = ImageName::new("my-app").unwrap();
        assert!(!image.was_lowercased());
    }

    #[test]
    fn blank_image_name_is_rejected() {
        assert!(matches!(
            ImageName::new("   "),
            Err(crate::Error::EmptyField { .. })
        ));
    }

    #[test]
    fn platforms_parse_trims_and_drops_blanks() {
        let platforms = Platforms::parse(" linux/amd64 , ,linux/arm64/v8").unwrap();
        assert_eq!(platforms.as_slice(), ["linux/amd64", "linux/arm64/v8"]);
        assert_eq!(platforms.to_string(), "linux/amd64,linux/arm64/v8");
    }

    #[test]
    fn platforms_parse_rejects_empty() {
        assert!(Platforms::parse(" , ").is_err());
    }

    #[test]
    fn builder_applies_defaults() {
        let config = base().build().unwrap();
        assert_eq!(config.dockerfile(), "./Dockerfile");
        assert_eq!(config.context(), ".");
        assert_eq!(config.platforms().to_string(), "linux/amd64,linux/arm64");
        assert!(config.shared().is_none());
    }

    #[test]
    fn builder_rejects_blank_overrides() {
        let err = base().dockerfile("  ").build().unwrap_err();
        assert!(matches!(
            err,
            crate::Error::EmptyField {
                field: "Dockerfile path"
            }
        ));
    }

    #[test]
    fn builder_requires_username() {
        let err = WorkflowConfig::builder()
            .mode(DeploymentMode::Inline)
            .image("app")
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            crate::Error::MissingField {
                field: "Docker Hub username"
            }
        ));
    }

    #[test]
    fn remote_shared_requires_repo() {
        let err = base()
            .mode(DeploymentMode::RemoteShared)
            .build()
            .unwrap_err();
        assert!(matches!(err, crate::Error::MissingField { .. }));
    }

    #[test]
    fn remote_shared_defaults_ref_to_main() {
        let config = base()
            .mode(DeploymentMode::RemoteShared)
            .shared_repo("acme/shared")
            .build()
            .unwrap();
        let shared = config.shared().unwrap();
        assert_eq!(shared.repo.to_string(), "acme/shared");
        assert_eq!(shared.git_ref, "main");
    }

    #[test]
    fn shared_fields_ignored_outside_remote_mode() {
        let config = base()
            .mode(DeploymentMode::LocalReusable)
            .shared_repo("acme/shared")
            .shared_ref("v1")
            .build()
            .unwrap();
        assert!(config.shared().is_none());
    }
}
