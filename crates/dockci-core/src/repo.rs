use std::fmt;
use std::str::FromStr;

const GITHUB_HOST: &str = "github.com";

/// A GitHub repository identified by `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GitHubRepo {
    owner: String,
    name: String,
}

impl GitHubRepo {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> crate::Result<Self> {
        let owner = owner.into();
        let name = name.into();
        if !is_valid_segment(&owner) || !is_valid_segment(&name) {
            return Err(crate::Error::InvalidRepo(format!("{owner}/{name}")));
        }
        Ok(Self { owner, name })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Parse the repository out of a git remote URL.
    ///
    /// Matches `github.com[:/]<owner>/<repo>[.git]` in the SSH
    /// (`git@github.com:o/r.git`, `ssh://git@github.com/o/r.git`) and
    /// HTTP(S) (`https://github.com/o/r`, `https://user@github.com/o/r`)
    /// forms. Returns `None` for any other host.
    pub fn from_remote_url(url: &str) -> Option<Self> {
        let url = url.trim();
        let host_at = url.find(GITHUB_HOST)?;

        // The host must stand on its own: `notgithub.com` is another host.
        let before = &url[..host_at];
        if !(before.is_empty() || before.ends_with('@') || before.ends_with("//")) {
            return None;
        }

        let rest = &url[host_at + GITHUB_HOST.len()..];
        let rest = rest.strip_prefix(':').or_else(|| rest.strip_prefix('/'))?;
        let rest = rest.trim_end_matches('/');
        let rest = match rest.strip_suffix(".git") {
            Some(stripped) => stripped,
            None => rest,
        };

        let (owner, name) = rest.split_once('/')?;
        // arch-lint: allow(no-silent-result-drop) reason="an owner/name that fails validation is simply not a GitHub remote"
        Self::new(owner, name).ok()
    }

    /// Browser URL of the repository's Actions secrets settings page.
    pub fn secrets_settings_url(&self) -> String {
        format!("https://{GITHUB_HOST}/{self}/settings/secrets/actions")
    }
}

impl fmt::Display for GitHubRepo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl FromStr for GitHubRepo {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (owner, name) = s
            .split_once('/')
            .ok_or_else(|| crate::Error::InvalidRepo(s.to_owned()))?;
        Self::new(owner, name).map_err(|_| crate::Error::InvalidRepo(s.to_owned()))
    }
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty() && !segment.contains('/') && !segment.chars().any(char::is_whitespace)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsed(url: &str) -> Option<String> {
        GitHubRepo::from_remote_url(url).map(|r| r.to_string())
    }

    #[test]
    fn remote_ssh() {
        assert_eq!(
            parsed("git@github.com:acme/widgets.git"),
            Some("acme/widgets".to_owned())
        );
    }

    #[test]
    fn remote_ssh_no_suffix() {
        assert_eq!(
            parsed("git@github.com:owner/repo"),
            Some("owner/repo".to_owned())
        );
    }

    #[test]
    fn remote_ssh_scheme() {
        assert_eq!(
            parsed("ssh://git@github.com/owner/repo.git"),
            Some("owner/repo".to_owned())
        );
    }

    #[test]
    fn remote_https() {
        assert_eq!(
            parsed("https://github.com/acme/widgets.git"),
            Some("acme/widgets".to_owned())
        );
    }

    #[test]
    fn remote_https_trailing_slash() {
        assert_eq!(
            parsed("https://github.com/owner/repo/"),
            Some("owner/repo".to_owned())
        );
    }

    #[test]
    fn remote_https_with_credentials() {
        assert_eq!(
            parsed("https://x-access-token@github.com/owner/repo.git"),
            Some("owner/repo".to_owned())
        );
    }

    #[test]
    fn remote_surrounding_whitespace() {
        assert_eq!(
            parsed("  git@github.com:owner/repo.git\n"),
            Some("owner/repo".to_owned())
        );
    }

    #[test]
    fn remote_non_github() {
        assert_eq!(parsed("git@gitlab.com:owner/repo.git"), None);
        assert_eq!(parsed("https://notgithub.com/owner/repo"), None);
    }

    #[test]
    fn remote_missing_repo_segment() {
        assert_eq!(parsed("https://github.com/owner"), None);
        assert_eq!(parsed("https://github.com/owner/repo/tree/main"), None);
    }

    #[test]
    fn remote_empty() {
        assert_eq!(parsed(""), None);
    }

    #[test]
    fn from_str_owner_repo() {
        let repo: GitHubRepo = "acme/shared".parse().unwrap();
        assert_eq!(repo.owner(), "acme");
        assert_eq!(repo.name(), "shared");
    }

    #[test]
    fn from_str_rejects_malformed() {
        for input in ["", "acme", "acme/", "/shared", "a/b/c", "acme/sha red"] {
            assert!(
                matches!(
                    input.parse::<GitHubRepo>(),
                    Err(crate::Error::InvalidRepo(_))
                ),
                "{input:?} should be rejected"
            );
        }
    }

    #[test]
    fn secrets_settings_url_points_at_actions_secrets() {
        let repo = GitHubRepo::new("acme", "widgets").unwrap();
        assert_eq!(
            repo.secrets_settings_url(),
            "https://github.com/acme/widgets/settings/secrets/actions"
        );
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn from_remote_url_never_panics(s in "\\PC*") {
                let _ = GitHubRepo::from_remote_url(&s);
            }

            #[test]
            fn ssh_roundtrip(
                owner in "[a-zA-Z0-9_-]{1,39}",
                repo in "[a-zA-Z0-9._-]{1,100}",
            ) {
                let url = format!("git@github.com:{owner}/{repo}.git");
                prop_assert_eq!(parsed(&url), Some(format!("{owner}/{repo}")));
            }

            #[test]
            fn https_roundtrip(
                owner in "[a-zA-Z0-9_-]{1,39}",
                repo in "[a-zA-Z0-9._-]{1,100}",
            ) {
                let url = format!("https://github.com/{owner}/{repo}.git");
                prop_assert_eq!(parsed(&url), Some(format!("{owner}/{repo}")));
            }

            #[test]
            fn non_github_returns_none(
                host in "[a-z]{3,10}\\.[a-z]{2,5}",
                path in "[a-zA-Z0-9_-]{1,20}/[a-zA-Z0-9_-]{1,20}",
            ) {
                prop_assume!(host != "github.com");
                let ssh = format!("git@{host}:{path}.git");
                prop_assert_eq!(parsed(&ssh), None);

                let https = format!("https://{host}/{path}.git");
                prop_assert_eq!(parsed(&https), None);
            }
        }
    }
}
