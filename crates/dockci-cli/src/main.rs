mod commands;
mod prompt;
mod wizard;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use dockci_core::CALLER_WORKFLOW_FILE;
use dockci_github::RunError;

use crate::wizard::WorkflowArgs;

#[derive(Parser)]
#[command(
    name = "dockci",
    about = "Scaffold GitHub Actions workflows that build and push Docker images"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate workflows, set Docker Hub secrets, commit and push
    Init {
        #[command(flatten)]
        workflow: WorkflowArgs,
        /// Accept defaults instead of prompting
        #[arg(long, short = 'y')]
        yes: bool,
        /// Do not set repository secrets
        #[arg(long)]
        skip_secrets: bool,
        /// Commit the workflow files without pushing
        #[arg(long)]
        no_push: bool,
        /// Follow the workflow run triggered by the push
        #[arg(long, conflicts_with = "no_push")]
        watch: bool,
    },
    /// Print workflow files without touching git or GitHub
    Render {
        #[command(flatten)]
        workflow: WorkflowArgs,
        /// Write the files into this directory instead of stdout
        #[arg(long, value_name = "DIR")]
        output_dir: Option<PathBuf>,
    },
    /// Set the Docker Hub repository secrets
    Secrets {
        /// Docker Hub username
        #[arg(long)]
        username: Option<String>,
        /// Target repository instead of the one behind `origin`
        #[arg(long, value_name = "OWNER/REPO")]
        repo: Option<String>,
    },
    /// Dispatch the workflow and watch the run
    Run {
        /// Branch to run on (default: current branch)
        #[arg(long = "ref", value_name = "BRANCH")]
        git_ref: Option<String>,
        /// Workflow file to dispatch
        #[arg(long, default_value = CALLER_WORKFLOW_FILE)]
        workflow: String,
        /// Target repository instead of the one behind `origin`
        #[arg(long, value_name = "OWNER/REPO")]
        repo: Option<String>,
    },
    /// Check git, gh and repository readiness
    Doctor,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                // arch-lint: allow(no-silent-result-drop) reason="RUST_LOG unset or unparsable falls back to the info level"
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Init {
            workflow,
            yes,
            skip_secrets,
            no_push,
            watch,
        } => {
            commands::init(commands::InitOptions {
                workflow,
                yes,
                skip_secrets,
                no_push,
                watch,
            })
            .await
        }
        Commands::Render {
            workflow,
            output_dir,
        } => commands::render(workflow, output_dir).await,
        Commands::Secrets { username, repo } => commands::secrets(username, repo).await,
        Commands::Run {
            git_ref,
            workflow,
            repo,
        } => commands::run(workflow, git_ref, repo).await,
        Commands::Doctor => commands::doctor().await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:?}");
            exit_code(&e)
        }
    }
}

/// A watched run that failed exits with the code `gh run watch` reported.
fn exit_code(err: &anyhow::Error) -> ExitCode {
    match err.downcast_ref::<RunError>() {
        Some(RunError::Failed {
            code: Some(code @ 1..=255),
            ..
        }) => ExitCode::from(*code as u8),
        _ => ExitCode::FAILURE,
    }
}
