use std::path::PathBuf;

use crate::error::{CommandError, PublishError};
use crate::executor::{CommandExecutor, RealExecutor};

/// Local repository operations, parameterized over the executor for testability.
pub struct GitClient<E: CommandExecutor = RealExecutor> {
    executor: E,
}

impl GitClient<RealExecutor> {
    pub fn new() -> Self {
        Self {
            executor: RealExecutor::git(),
        }
    }
}

impl Default for GitClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

/// What [`GitClient::publish`] ended up doing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PublishOutcome {
    /// A commit was created and pushed.
    Pushed,
    /// A commit was created; pushing was not requested.
    Committed,
    /// The files matched HEAD already; nothing was committed or pushed.
    Unchanged,
}

impl<E: CommandExecutor> GitClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self { executor }
    }

    pub async fn version(&self) -> Result<String, CommandError> {
        let out = self.executor.exec(&args(["--version"])).await?;
        Ok(out.trim().to_owned())
    }

    /// Whether the working directory is inside a git work tree.
    ///
    /// A missing `git` binary is an error; "not a repository" is `Ok(false)`.
    pub async fn is_inside_work_tree(&self) -> Result<bool, CommandError> {
        match self
            .executor
            .exec(&args(["rev-parse", "--is-inside-work-tree"]))
            .await
        {
            Ok(out) => Ok(out.trim() == "true"),
            Err(CommandError::CommandFailed { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Absolute path of the repository root.
    pub async fn toplevel(&self) -> Result<PathBuf, CommandError> {
        let out = self
            .executor
            .exec(&args(["rev-parse", "--show-toplevel"]))
            .await?;
        Ok(PathBuf::from(out.trim()))
    }

    /// URL of the `origin` remote, or `None` when no such remote exists.
    pub async fn origin_url(&self) -> Result<Option<String>, CommandError> {
        let primary = self
            .executor
            .exec(&args(["remote", "get-url", "origin"]))
            .await;
        let url = match primary {
            Ok(url) => url,
            Err(CommandError::CommandFailed { .. }) => {
                tracing::debug!("`git remote get-url` failed, reading remote.origin.url");
                match self
                    .executor
                    .exec(&args(["config", "--get", "remote.origin.url"]))
                    .await
                {
                    Ok(url) => url,
                    Err(CommandError::CommandFailed { .. }) => return Ok(None),
                    Err(e) => return Err(e),
                }
            }
            Err(e) => return Err(e),
        };

        let url = url.trim();
        Ok((!url.is_empty()).then(|| url.to_owned()))
    }

    pub async fn current_branch(&self) -> Result<String, CommandError> {
        let out = self
            .executor
            .exec(&args(["branch", "--show-current"]))
            .await?;
        Ok(out.trim().to_owned())
    }

    pub async fn head_sha(&self) -> Result<String, CommandError> {
        let out = self.executor.exec(&args(["rev-parse", "HEAD"])).await?;
        Ok(out.trim().to_owned())
    }

    /// Stage `paths`, commit them with `message`, and optionally push.
    ///
    /// When the staged paths already match HEAD no commit is made. Nothing is
    /// rolled back on failure.
    pub async fn publish(
        &self,
        paths: &[PathBuf],
        message: &str,
        push: bool,
    ) -> Result<PublishOutcome, PublishError> {
        if paths.is_empty() {
            return Err(PublishError::NoPaths);
        }
        let path_args: Vec<String> = paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();

        let mut add = args(["add", "--"]);
        add.extend(path_args.iter().cloned());
        self.executor
            .exec(&add)
            .await
            .map_err(|e| PublishError::Add { source: e })?;

        if !self.has_staged_changes(&path_args).await? {
            tracing::info!("workflow files unchanged; skipping commit");
            return Ok(PublishOutcome::Unchanged);
        }

        let mut commit = args(["commit", "-m", message, "--"]);
        commit.extend(path_args);
        self.executor
            .exec(&commit)
            .await
            .map_err(|e| PublishError::Commit { source: e })?;

        if !push {
            return Ok(PublishOutcome::Committed);
        }

        self.executor
            .exec(&args(["push", "-u", "origin", "HEAD"]))
            .await
            .map_err(|e| PublishError::Push { source: e })?;

        Ok(PublishOutcome::Pushed)
    }

    /// `git diff --cached --quiet` exits 1 when the index differs from HEAD.
    async fn has_staged_changes(&self, path_args: &[String]) -> Result<bool, PublishError> {
        let mut diff = args(["diff", "--cached", "--quiet", "--"]);
        diff.extend(path_args.iter().cloned());
        match self.executor.exec(&diff).await {
            Ok(_) => Ok(false),
            Err(e) if e.exit_code() == Some(1) => Ok(true),
            Err(e) => Err(PublishError::Add { source: e }),
        }
    }
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
