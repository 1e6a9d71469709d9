use clap::Args;
use dockci_core::{
    DEFAULT_CONTEXT, DEFAULT_DOCKERFILE, DEFAULT_PLATFORMS, DEFAULT_SHARED_REF, DeploymentMode,
    GitHubRepo, Platforms, ProjectConfig, WorkflowConfig,
};
use secrecy::SecretString;

use crate::prompt::{ModeMenu, Prompter, ask, ask_required, ask_secret};

/// Environment variable consulted for the Docker Hub token before prompting.
pub const TOKEN_ENV: &str = "DOCKERHUB_TOKEN";

/// Name suggested for the shared workflow repository under the detected owner.
const SHARED_REPO_NAME: &str = "shared-workflows";

/// Workflow values that can be given on the command line.
#[derive(Args, Debug, Default, Clone)]
pub struct WorkflowArgs {
    /// Deployment mode: inline, local-reusable or remote-shared
    #[arg(long)]
    pub mode: Option<DeploymentMode>,
    /// Docker image name (lowercased automatically)
    #[arg(long)]
    pub image: Option<String>,
    /// Path to the Dockerfile
    #[arg(long)]
    pub dockerfile: Option<String>,
    /// Docker build context
    #[arg(long)]
    pub context: Option<String>,
    /// Comma-separated target platforms
    #[arg(long)]
    pub platforms: Option<String>,
    /// Repository holding the shared workflow (remote-shared mode)
    #[arg(long, value_name = "OWNER/REPO")]
    pub shared_repo: Option<String>,
    /// Git ref of the shared workflow (remote-shared mode)
    #[arg(long, value_name = "REF")]
    pub shared_ref: Option<String>,
    /// Docker Hub username
    #[arg(long)]
    pub username: Option<String>,
}

/// Collects a [`WorkflowConfig`] from flags, `dockci.toml`, the detected
/// remote and, for whatever is still missing, the prompter.
pub struct Wizard<'a, P: Prompter + ?Sized> {
    prompter: &'a mut P,
    config: &'a ProjectConfig,
    detected: Option<&'a GitHubRepo>,
    assume_yes: bool,
}

impl<'a, P: Prompter + ?Sized> Wizard<'a, P> {
    pub fn new(prompter: &'a mut P, config: &'a ProjectConfig) -> Self {
        Self {
            prompter,
            config,
            detected: None,
            assume_yes: false,
        }
    }

    /// Use the repository parsed from the git remote for owner-dependent defaults.
    pub fn detected(mut self, repo: Option<&'a GitHubRepo>) -> Self {
        self.detected = repo;
        self
    }

    /// Accept defaults instead of prompting.
    pub fn assume_yes(mut self, yes: bool) -> Self {
        self.assume_yes = yes;
        self
    }

    pub fn collect(&mut self, args: &WorkflowArgs) -> anyhow::Result<WorkflowConfig> {
        let mode = self.mode(args.mode)?;

        let image_default = self
            .config
            .image
            .name
            .clone()
            .or_else(|| self.detected.map(|r| r.name().to_owned()));
        let image = self.value("Docker image name", args.image.as_deref(), image_default)?;

        let dockerfile = self.value(
            "Dockerfile path",
            args.dockerfile.as_deref(),
            Some(configured_or(
                self.config.image.dockerfile.as_deref(),
                DEFAULT_DOCKERFILE,
            )),
        )?;

        let context = self.value(
            "Build context",
            args.context.as_deref(),
            Some(configured_or(
                self.config.image.context.as_deref(),
                DEFAULT_CONTEXT,
            )),
        )?;

        let platforms = self.platforms(args.platforms.as_deref())?;
        let username = self.value("Docker Hub username", args.username.as_deref(), None)?;

        let mut builder = WorkflowConfig::builder()
            .mode(mode)
            .image(image)
            .dockerfile(dockerfile)
            .context(context)
            .platforms(platforms)
            .dockerhub_username(username);

        if mode == DeploymentMode::RemoteShared {
            let (repo, git_ref) = self.shared(args)?;
            builder = builder.shared_repo(repo).shared_ref(git_ref);
        }

        Ok(builder.build()?)
    }

    fn mode(&mut self, flag: Option<DeploymentMode>) -> anyhow::Result<DeploymentMode> {
        if let Some(mode) = flag {
            return Ok(mode);
        }
        let default = match self.config.workflow.mode {
            Some(mode) => mode,
            None => DeploymentMode::default(),
        };
        if self.assume_yes {
            return Ok(default);
        }
        ModeMenu::standard(default).select(self.prompter)
    }

    fn platforms(&mut self, flag: Option<&str>) -> anyhow::Result<String> {
        if let Some(raw) = flag {
            return Ok(Platforms::parse(raw)?.to_string());
        }
        let default = match self.config.image.platforms_joined() {
            Some(joined) => joined,
            None => DEFAULT_PLATFORMS.join(","),
        };
        if self.assume_yes {
            return Ok(default);
        }
        ask(
            self.prompter,
            "Target platforms",
            Some(&default),
            |v| {
                Platforms::parse(v)
                    .map(|p| p.to_string())
                    .map_err(|e| e.to_string())
            },
        )
    }

    fn shared(&mut self, args: &WorkflowArgs) -> anyhow::Result<(String, String)> {
        let repo = match args.shared_repo.as_deref() {
            Some(repo) => repo.to_owned(),
            None => {
                let default = self.config.shared.repo.clone().or_else(|| {
                    self.detected
                        .map(|r| format!("{}/{SHARED_REPO_NAME}", r.owner()))
                });
                if self.assume_yes {
                    required_default("Shared workflow repository", "--shared-repo", default)?
                } else {
                    ask(
                        self.prompter,
                        "Shared workflow repository (owner/repo)",
                        default.as_deref(),
                        |v| {
                            v.parse::<GitHubRepo>()
                                .map(|r| r.to_string())
                                .map_err(|e| e.to_string())
                        },
                    )?
                }
            }
        };

        let git_ref = self.value(
            "Shared workflow ref",
            args.shared_ref.as_deref(),
            Some(configured_or(
                self.config.shared.git_ref.as_deref(),
                DEFAULT_SHARED_REF,
            )),
        )?;
        Ok((repo, git_ref))
    }

    /// Flag, then `default` under `--yes`, then a prompt.
    fn value(
        &mut self,
        label: &str,
        flag: Option<&str>,
        default: Option<String>,
    ) -> anyhow::Result<String> {
        if let Some(value) = flag {
            return Ok(value.to_owned());
        }
        if self.assume_yes {
            return required_default(label, &flag_name(label), default);
        }
        ask_required(self.prompter, label, default.as_deref())
    }
}

fn required_default(
    label: &str,
    flag: &str,
    default: Option<String>,
) -> anyhow::Result<String> {
    default.ok_or_else(|| anyhow::anyhow!("{label} has no default — pass {flag}"))
}

/// A value from dockci.toml, else the built-in default.
fn configured_or(configured: Option<&str>, fallback: &str) -> String {
    match configured {
        Some(value) => value.to_owned(),
        None => fallback.to_owned(),
    }
}

fn flag_name(label: &str) -> String {
    match label {
        "Docker image name" => "--image".to_owned(),
        "Dockerfile path" => "--dockerfile".to_owned(),
        "Build context" => "--context".to_owned(),
        "Docker Hub username" => "--username".to_owned(),
        "Shared workflow ref" => "--shared-ref".to_owned(),
        other => format!("a value for {other}"),
    }
}

/// Docker Hub access token: `DOCKERHUB_TOKEN` if set, otherwise a hidden prompt.
pub fn collect_token<P: Prompter + ?Sized>(
    prompter: &mut P,
    from_env: Option<SecretString>,
    assume_yes: bool,
) -> anyhow::Result<SecretString> {
    if let Some(token) = from_env {
        tracing::debug!("using Docker Hub token from {TOKEN_ENV}");
        return Ok(token);
    }
    if assume_yes {
        anyhow::bail!("{TOKEN_ENV} is not set — export it or run without --yes");
    }
    ask_secret(prompter, "Docker Hub access token")
}

/// Read [`TOKEN_ENV`], treating an empty value as unset.
pub fn token_from_env() -> anyhow::Result<Option<SecretString>> {
    match std::env::var(TOKEN_ENV) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => Ok(Some(SecretString::from(value))),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(anyhow::anyhow!("{TOKEN_ENV}: {e}")),
    }
}
