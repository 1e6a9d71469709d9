use std::time::Duration;

use dockci_core::GitHubRepo;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use crate::error::{CommandError, RunError, SecretError};
use crate::executor::{CommandExecutor, RealExecutor};

/// GitHub operations through the `gh` CLI, parameterized over the executor for testability.
pub struct GhClient<E: CommandExecutor = RealExecutor> {
    executor: E,
    repo: Option<GitHubRepo>,
}

impl GhClient<RealExecutor> {
    pub fn new() -> Self {
        Self::with_executor(RealExecutor::gh())
    }
}

impl Default for GhClient<RealExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

/// Which run [`GhClient::latest_run_id`] should look for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunSelector {
    /// The run triggered by pushing this commit.
    Commit(String),
    /// The newest manually dispatched run on this branch.
    Dispatched { branch: String },
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RunListEntry {
    database_id: u64,
}

impl<E: CommandExecutor> GhClient<E> {
    pub fn with_executor(executor: E) -> Self {
        Self {
            executor,
            repo: None,
        }
    }

    /// Target `repo` explicitly instead of letting `gh` infer it from the
    /// working directory.
    pub fn for_repo(mut self, repo: GitHubRepo) -> Self {
        self.repo = Some(repo);
        self
    }

    /// First line of `gh --version`. Fails when `gh` is not installed.
    pub async fn version(&self) -> Result<String, CommandError> {
        let out = self.executor.exec(&args(["--version"])).await?;
        match out.lines().next() {
            Some(line) => Ok(line.trim().to_owned()),
            None => Ok("unknown version".to_owned()),
        }
    }

    pub async fn auth_status(&self) -> Result<(), CommandError> {
        self.executor.exec(&args(["auth", "status"])).await?;
        Ok(())
    }

    /// Set a GitHub Actions repository secret.
    ///
    /// The value is piped through stdin so it never appears in process
    /// arguments or logs.
    pub async fn set_secret(&self, name: &str, value: &SecretString) -> Result<(), SecretError> {
        let cmd = self.with_repo(args(["secret", "set", name]));
        tracing::debug!(secret = name, "setting repository secret");
        self.executor
            .exec_with_stdin(&cmd, value.expose_secret().as_bytes())
            .await
            .map_err(|e| SecretError::Set {
                name: name.to_owned(),
                source: e,
            })?;
        Ok(())
    }

    /// Trigger a `workflow_dispatch` run of `workflow` on `git_ref`.
    pub async fn dispatch_workflow(&self, workflow: &str, git_ref: &str) -> Result<(), RunError> {
        let cmd = self.with_repo(args(["workflow", "run", workflow, "--ref", git_ref]));
        self.executor
            .exec(&cmd)
            .await
            .map_err(|e| RunError::Dispatch {
                workflow: workflow.to_owned(),
                source: e,
            })?;
        Ok(())
    }

    /// Database id of the newest run of `workflow` matching `selector`.
    pub async fn latest_run_id(
        &self,
        workflow: &str,
        selector: &RunSelector,
    ) -> Result<Option<u64>, RunError> {
        let mut cmd = args(["run", "list", "--workflow", workflow]);
        match selector {
            RunSelector::Commit(sha) => cmd.extend(args(["--commit", sha])),
            RunSelector::Dispatched { branch } => cmd.extend(args([
                "--branch",
                branch,
                "--event",
                "workflow_dispatch",
            ])),
        }
        cmd.extend(args(["--limit", "1", "--json", "databaseId"]));
        let cmd = self.with_repo(cmd);

        let out = self
            .executor
            .exec(&cmd)
            .await
            .map_err(|e| RunError::List {
                workflow: workflow.to_owned(),
                source: e,
            })?;

        let runs: Vec<RunListEntry> =
            serde_json::from_str(out.trim()).map_err(|e| RunError::Parse { source: e })?;
        Ok(runs.first().map(|r| r.database_id))
    }

    /// Poll [`Self::latest_run_id`] until a run shows up.
    ///
    /// Runs take a moment to register after a push or dispatch.
    pub async fn wait_for_run(
        &self,
        workflow: &str,
        selector: &RunSelector,
        attempts: u32,
        delay: Duration,
    ) -> Result<u64, RunError> {
        for attempt in 1..=attempts {
            if let Some(id) = self.latest_run_id(workflow, selector).await? {
                tracing::debug!(run_id = id, attempt, "found workflow run");
                return Ok(id);
            }
            tracing::debug!(attempt, "workflow run not registered yet");
            if attempt < attempts {
                tokio::time::sleep(delay).await;
            }
        }
        Err(RunError::NotFound {
            workflow: workflow.to_owned(),
            attempts,
        })
    }

    /// Stream `gh run watch` until the run finishes.
    ///
    /// A failed or cancelled run surfaces as [`RunError::Failed`] carrying
    /// the exit code of `gh run watch --exit-status`.
    pub async fn watch_run(&self, run_id: u64) -> Result<(), RunError> {
        let id = run_id.to_string();
        let cmd = self.with_repo(args(["run", "watch", &id, "--exit-status"]));
        self.executor
            .exec_streaming(&cmd)
            .await
            .map_err(|e| RunError::Failed {
                run_id,
                code: e.exit_code(),
                source: e,
            })
    }

    fn with_repo(&self, mut cmd: Vec<String>) -> Vec<String> {
        if let Some(repo) = &self.repo {
            cmd.push("--repo".to_owned());
            cmd.push(repo.to_string());
        }
        cmd
    }
}

fn args<const N: usize>(a: [&str; N]) -> Vec<String> {
    a.iter().map(|s| (*s).to_owned()).collect()
}
