use dockci_core::{
    DOCKERHUB_SECRET_NAMES, GitHubRepo, SECRET_DOCKERHUB_TOKEN, SECRET_DOCKERHUB_USERNAME,
};
use dockci_github::{CommandExecutor, GhClient, GitClient};
use secrecy::SecretString;

use crate::prompt::{Prompter, TerminalPrompter, ask_required};
use crate::wizard::{collect_token, token_from_env};

/// Set the Docker Hub repository secrets without touching workflow files.
pub async fn secrets(username: Option<String>, repo: Option<String>) -> anyhow::Result<()> {
    let git = GitClient::new();
    let target = match super::parse_repo_flag(repo.as_deref())? {
        Some(repo) => Some(repo),
        None => super::detect_github_repo(&git).await?,
    };

    let mut prompter = TerminalPrompter;
    let username = username_or_prompt(&mut prompter, username.as_deref())?;
    let token = collect_token(&mut prompter, token_from_env()?, false)?;

    let gh = match target.clone() {
        Some(repo) => GhClient::new().for_repo(repo),
        None => GhClient::new(),
    };
    provision(&gh, target.as_ref(), &username, &token).await
}

/// Store both Docker Hub secrets in the repository.
///
/// Without `gh` nothing is attempted: manual instructions are printed and the
/// call fails. A `gh` that is present but broken fails with its own stderr.
pub(super) async fn provision<H: CommandExecutor>(
    gh: &GhClient<H>,
    repo: Option<&GitHubRepo>,
    username: &str,
    token: &SecretString,
) -> anyhow::Result<()> {
    match gh.version().await {
        Ok(version) => tracing::debug!(%version, "gh available"),
        Err(e) if e.is_not_found() => {
            tracing::debug!(error = %e, "gh --version failed");
            print_manual_instructions(repo);
            anyhow::bail!(
                "gh CLI not found — add the secrets above by hand, or install https://cli.github.com and re-run"
            );
        }
        Err(e) => return Err(anyhow::Error::new(e).context("gh is installed but not usable")),
    }

    println!("Setting repository secrets...");
    gh.set_secret(
        SECRET_DOCKERHUB_USERNAME,
        &SecretString::from(username.to_owned()),
    )
    .await?;
    println!("  {SECRET_DOCKERHUB_USERNAME}: set");
    gh.set_secret(SECRET_DOCKERHUB_TOKEN, token).await?;
    println!("  {SECRET_DOCKERHUB_TOKEN}: set");
    println!();
    Ok(())
}

fn print_manual_instructions(repo: Option<&GitHubRepo>) {
    println!();
    println!("gh CLI is not available. Add these repository secrets manually:");
    for name in DOCKERHUB_SECRET_NAMES {
        println!("  {name}");
    }
    match repo {
        Some(repo) => println!("at {}", repo.secrets_settings_url()),
        None => println!("under Settings > Secrets and variables > Actions"),
    }
    println!();
}

pub(super) fn username_or_prompt<P: Prompter + ?Sized>(
    prompter: &mut P,
    flag: Option<&str>,
) -> anyhow::Result<String> {
    match flag {
        Some(name) => Ok(name.to_owned()),
        None => ask_required(prompter, "Docker Hub username", None),
    }
}

#[cfg(test)]
mod tests {
    use super::super::testing::{MockExecutor, failed, is, not_found};
    use super::*;
    use crate::prompt::testing::ScriptedPrompter;

    #[tokio::test]
    async fn sets_both_secrets_through_stdin() {
        let mut mock = MockExecutor::new();
        mock.expect_exec()
            .withf(|args| is(args, &["--version"]))
            .returning(|_| Ok("gh version 2.60.0\n".to_owned()));
        mock.expect_exec_with_stdin()
            .withf(|args, stdin| {
                is(args, &["secret", "set", "DOCKERHUB_USERNAME", "--repo", "acme/app"])
                    && stdin == b"octo"
            })
            .times(1)
            .returning(|_, _| Ok(String::new()));
        mock.expect_exec_with_stdin()
            .withf(|args, stdin| {
                is(args, &["secret", "set", "DOCKERHUB_TOKEN", "--repo", "acme/app"])
                    && stdin == b"dckr_pat_x"
            })
            .times(1)
            .returning(|_, _| Ok(String::new()));

        let repo: GitHubRepo = "acme/app".parse().unwrap();
        let gh = GhClient::with_executor(mock).for_repo(repo.clone());
        provision(&gh, Some(&repo), "octo", &SecretString::from("dckr_pat_x"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn missing_gh_fails_without_setting() {
        let mut mock = MockExecutor::new();
        mock.expect_exec().returning(|_| Err(not_found("gh")));
        mock.expect_exec_with_stdin().never();

        let gh = GhClient::with_executor(mock);
        let err = provision(&gh, None, "octo", &SecretString::from("t"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("gh CLI not found"));
    }

    #[tokio::test]
    async fn broken_gh_surfaces_its_stderr() {
        let mut mock = MockExecutor::new();
        mock.expect_exec()
            .returning(|_| Err(failed("gh", 1, "could not read config.yml")));
        mock.expect_exec_with_stdin().never();

        let gh = GhClient::with_executor(mock);
        let err = provision(&gh, None, "octo", &SecretString::from("t"))
            .await
            .unwrap_err();
        let message = format!("{err:#}");
        assert!(!message.contains("gh CLI not found"));
        assert!(message.contains("could not read config.yml"));
    }

    #[test]
    fn username_flag_skips_prompt() {
        let mut prompter = ScriptedPrompter::default();
        assert_eq!(
            username_or_prompt(&mut prompter, Some("octo")).unwrap(),
            "octo"
        );
        assert!(prompter.asked.is_empty());
    }
}
