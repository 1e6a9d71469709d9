use std::path::PathBuf;

use dockci_core::{CALLER_WORKFLOW_FILE, ProjectConfig};
use dockci_github::{CommandExecutor, GhClient, GitClient, PublishOutcome, RunSelector};
use dockci_render::{Summary, WrittenFile};
use secrecy::SecretString;

use super::{RUN_POLL_ATTEMPTS, RUN_POLL_DELAY};
use crate::prompt::{Prompter, TerminalPrompter};
use crate::wizard::{Wizard, WorkflowArgs, collect_token, token_from_env};

#[derive(Debug, Default, Clone)]
pub struct InitOptions {
    pub workflow: WorkflowArgs,
    /// Accept defaults instead of prompting.
    pub yes: bool,
    pub skip_secrets: bool,
    /// Commit but do not push.
    pub no_push: bool,
    /// Follow the run triggered by the push.
    pub watch: bool,
}

/// What a completed `init` did.
#[derive(Debug)]
pub(crate) struct InitReport {
    pub written: Vec<WrittenFile>,
    /// The summary as printed.
    pub summary: String,
    pub secrets_set: bool,
    pub published: PublishOutcome,
    pub run_id: Option<u64>,
}

/// Scaffold the workflow files, provision secrets, and publish them.
pub async fn init(opts: InitOptions) -> anyhow::Result<()> {
    let git = GitClient::new();
    let gh = GhClient::new();
    let token = token_from_env()?;

    let report = scaffold(&git, &gh, &mut TerminalPrompter, &opts, token).await?;
    tracing::debug!(
        files = report.written.len(),
        secrets = report.secrets_set,
        published = ?report.published,
        run_id = ?report.run_id,
        summary = %report.summary,
        "init finished"
    );

    println!("Done.");
    Ok(())
}

pub(crate) async fn scaffold<G, H, P>(
    git: &GitClient<G>,
    gh: &GhClient<H>,
    prompter: &mut P,
    opts: &InitOptions,
    env_token: Option<SecretString>,
) -> anyhow::Result<InitReport>
where
    G: CommandExecutor,
    H: CommandExecutor,
    P: Prompter + ?Sized,
{
    // ── Repository ──

    if !git.is_inside_work_tree().await? {
        anyhow::bail!(
            "not inside a git repository — run `git init` or cd into your project first"
        );
    }
    let root = git.toplevel().await?;
    let config = ProjectConfig::load(&root)?;
    let detected = super::detect_github_repo(git).await?;
    if let Some(repo) = &detected {
        println!("Repository: {repo}");
    }

    // ── Settings ──

    let workflow = Wizard::new(prompter, &config)
        .detected(detected.as_ref())
        .assume_yes(opts.yes)
        .collect(&opts.workflow)?;
    let token = if opts.skip_secrets {
        None
    } else {
        Some(collect_token(prompter, env_token, opts.yes)?)
    };

    // ── Workflow files ──

    let rendered = dockci_render::render(&workflow);
    let written = rendered.write_to(&root.join(&config.workflow.dir))?;
    println!();
    for file in &written {
        let verb = if file.replaced { "Replaced" } else { "Created" };
        println!("{verb} {}", file.path.display());
    }
    let summary = Summary::new(&workflow, &rendered)
        .with_written(written.iter().map(|f| f.path.clone()))
        .to_string();
    println!();
    println!("{summary}");

    // ── Secrets ──

    let secrets_set = match &token {
        Some(token) => {
            super::secrets::provision(gh, detected.as_ref(), workflow.dockerhub_username(), token)
                .await?;
            true
        }
        None => {
            println!("Skipping repository secrets (--skip-secrets)");
            false
        }
    };

    // ── Publish ──

    let paths: Vec<PathBuf> = written.iter().map(|f| f.path.clone()).collect();
    let published = git
        .publish(&paths, &config.publish.commit_message, !opts.no_push)
        .await?;
    match published {
        PublishOutcome::Pushed => println!("Committed and pushed workflow files"),
        PublishOutcome::Committed => println!("Committed workflow files (push skipped)"),
        PublishOutcome::Unchanged => println!("Workflow files unchanged; nothing to commit"),
    }

    // ── Watch ──

    let mut run_id = None;
    if opts.watch {
        if published == PublishOutcome::Pushed {
            let sha = git.head_sha().await?;
            let id = gh
                .wait_for_run(
                    CALLER_WORKFLOW_FILE,
                    &RunSelector::Commit(sha),
                    RUN_POLL_ATTEMPTS,
                    RUN_POLL_DELAY,
                )
                .await?;
            println!("Watching run {id}...");
            gh.watch_run(id).await?;
            run_id = Some(id);
        } else {
            println!("Nothing was pushed; not watching");
        }
    }

    Ok(InitReport {
        written,
        summary,
        secrets_set,
        published,
        run_id,
    })
}
