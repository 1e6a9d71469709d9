use dockci_github::{CommandExecutor, GhClient, GitClient, RunSelector};

use super::{RUN_POLL_ATTEMPTS, RUN_POLL_DELAY};

/// Dispatch the CI workflow and follow the run until it finishes.
pub async fn run(
    workflow: String,
    git_ref: Option<String>,
    repo: Option<String>,
) -> anyhow::Result<()> {
    let git = GitClient::new();
    let gh = match super::parse_repo_flag(repo.as_deref())? {
        Some(repo) => GhClient::new().for_repo(repo),
        None => GhClient::new(),
    };
    dispatch_and_watch(&git, &gh, &workflow, git_ref).await?;
    Ok(())
}

pub(crate) async fn dispatch_and_watch<G, H>(
    git: &GitClient<G>,
    gh: &GhClient<H>,
    workflow: &str,
    git_ref: Option<String>,
) -> anyhow::Result<u64>
where
    G: CommandExecutor,
    H: CommandExecutor,
{
    let branch = match git_ref {
        Some(branch) => branch,
        None => {
            let branch = git.current_branch().await?;
            if branch.is_empty() {
                anyhow::bail!("HEAD is detached — pass --ref <branch>");
            }
            branch
        }
    };

    println!("Dispatching {workflow} on {branch}...");
    gh.dispatch_workflow(workflow, &branch).await?;

    let id = gh
        .wait_for_run(
            workflow,
            &RunSelector::Dispatched {
                branch: branch.clone(),
            },
            RUN_POLL_ATTEMPTS,
            RUN_POLL_DELAY,
        )
        .await?;
    println!("Watching run {id}...");
    gh.watch_run(id).await?;
    println!("Run {id} succeeded");
    Ok(id)
}
