use std::fmt;

use dockci_core::GitHubRepo;

use crate::executor::CommandExecutor;
use crate::gh::GhClient;
use crate::git::GitClient;

#[derive(Debug, Default)]
pub struct DoctorReport {
    pub git: CheckResult,
    pub work_tree: CheckResult,
    pub remote: CheckResult,
    pub gh: CheckResult,
    pub gh_auth: CheckResult,
    /// Informational only; a missing dockci.toml is fine.
    pub config_file: CheckResult,
}

impl DoctorReport {
    pub fn all_passed(&self) -> bool {
        self.git.passed
            && self.work_tree.passed
            && self.remote.passed
            && self.gh.passed
            && self.gh_auth.passed
    }

    fn rows(&self) -> [(&'static str, &CheckResult); 6] {
        [
            ("git", &self.git),
            ("Work tree", &self.work_tree),
            ("GitHub remote", &self.remote),
            ("gh CLI", &self.gh),
            ("gh auth", &self.gh_auth),
            ("dockci.toml", &self.config_file),
        ]
    }
}

impl fmt::Display for DoctorReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (label, check) in self.rows() {
            writeln!(f, "  [{}] {label:<14} {}", check.icon(), check.detail)?;
        }
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct CheckResult {
    pub passed: bool,
    pub detail: String,
}

impl CheckResult {
    pub fn ok(detail: &str) -> Self {
        Self {
            passed: true,
            detail: detail.to_owned(),
        }
    }

    pub fn fail(detail: &str) -> Self {
        Self {
            passed: false,
            detail: detail.to_owned(),
        }
    }

    pub fn icon(&self) -> &'static str {
        if self.passed { "OK" } else { "NG" }
    }
}

/// Run all diagnostic checks without early return.
///
/// `config_file` is left at its default; the caller fills it in.
pub async fn doctor<G: CommandExecutor, H: CommandExecutor>(
    git: &GitClient<G>,
    gh: &GhClient<H>,
) -> DoctorReport {
    let mut report = DoctorReport::default();

    match git.version().await {
        Ok(v) => report.git = CheckResult::ok(&v),
        Err(e) => report.git = CheckResult::fail(&e.to_string()),
    }

    match git.is_inside_work_tree().await {
        Ok(true) => report.work_tree = CheckResult::ok("inside a git work tree"),
        Ok(false) => report.work_tree = CheckResult::fail("not a git repository"),
        Err(e) => report.work_tree = CheckResult::fail(&e.to_string()),
    }

    report.remote = match git.origin_url().await {
        Ok(Some(url)) => match GitHubRepo::from_remote_url(&url) {
            Some(repo) => CheckResult::ok(&repo.to_string()),
            None => CheckResult::fail(&format!("origin '{url}' is not a GitHub repository")),
        },
        Ok(None) => CheckResult::fail("no 'origin' remote"),
        Err(e) => CheckResult::fail(&e.to_string()),
    };

    match gh.version().await {
        Ok(v) => report.gh = CheckResult::ok(&v),
        Err(e) if e.is_not_found() => {
            report.gh = CheckResult::fail("not installed — https://cli.github.com");
            report.gh_auth = CheckResult::fail("skipped (gh not installed)");
            return report;
        }
        Err(e) => report.gh = CheckResult::fail(&e.to_string()),
    }

    match gh.auth_status().await {
        Ok(()) => report.gh_auth = CheckResult::ok("authenticated"),
        Err(e) => {
            tracing::debug!(error = %e, "gh auth status failed");
            report.gh_auth = CheckResult::fail("not authenticated — run: gh auth login");
        }
    }

    report
}
