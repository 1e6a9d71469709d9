mod doctor;
mod init;
mod render;
mod run;
mod secrets;

use std::time::Duration;

use dockci_core::GitHubRepo;
use dockci_github::{CommandExecutor, GitClient};

pub use doctor::doctor;
pub use init::{InitOptions, init};
pub use render::render;
pub use run::run;
pub use secrets::secrets;

/// How often to look for a freshly triggered run before giving up.
pub(crate) const RUN_POLL_ATTEMPTS: u32 = 10;
pub(crate) const RUN_POLL_DELAY: Duration = Duration::from_secs(3);

/// GitHub repository behind `origin`, if it can be parsed.
///
/// Anything short of a spawn failure is a soft miss: defaults that depend on
/// the owner stay empty and the user types them instead.
pub(crate) async fn detect_github_repo<E: CommandExecutor>(
    git: &GitClient<E>,
) -> anyhow::Result<Option<GitHubRepo>> {
    let Some(url) = git.origin_url().await? else {
        tracing::warn!("no 'origin' remote; repository defaults unavailable");
        return Ok(None);
    };
    match GitHubRepo::from_remote_url(&url) {
        Some(repo) => Ok(Some(repo)),
        None => {
            tracing::warn!(%url, "origin is not a GitHub remote; repository defaults unavailable");
            Ok(None)
        }
    }
}

/// Parse an explicit `--repo owner/name` flag.
pub(crate) fn parse_repo_flag(repo: Option<&str>) -> anyhow::Result<Option<GitHubRepo>> {
    repo.map(str::parse::<GitHubRepo>)
        .transpose()
        .map_err(Into::into)
}


#[cfg(test)]
mod tests {
    use super::testing::{MockExecutor, failed, is};
    use super::*;

    #[tokio::test]
    async fn detects_github_origin() {
        let mut mock = MockExecutor::new();
        mock.expect_exec()
            .withf(|args| is(args, &["remote", "get-url", "origin"]))
            .returning(|_| Ok("git@github.com:acme/app.git\n".to_owned()));

        let repo = detect_github_repo(&GitClient::with_executor(mock))
            .await
            .unwrap();
        assert_eq!(repo.unwrap().to_string(), "acme/app");
    }

    #[tokio::test]
    async fn non_github_origin_is_soft_miss() {
        let mut mock = MockExecutor::new();
        mock.expect_exec()
            .withf(|args| is(args, &["remote", "get-url", "origin"]))
            .returning(|_| Ok("https://gitlab.com/acme/app.git\n".to_owned()));

        let repo = detect_github_repo(&GitClient::with_executor(mock))
            .await
            .unwrap();
        assert!(repo.is_none());
    }

    #[tokio::test]
    async fn missing_origin_is_soft_miss() {
        let mut mock = MockExecutor::new();
        mock.expect_exec()
            .returning(|_| Err(failed("git", 2, "error: No such remote 'origin'")));

        let repo = detect_github_repo(&GitClient::with_executor(mock))
            .await
            .unwrap();
        assert!(repo.is_none());
    }

    #[test]
    fn repo_flag_parsing() {
        assert!(parse_repo_flag(None).unwrap().is_none());
        assert_eq!(
            parse_repo_flag(Some("acme/app")).unwrap().unwrap().name(),
            "app"
        );
        assert!(parse_repo_flag(Some("acme")).is_err());
    }
}
