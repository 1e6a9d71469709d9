use std::path::Path;

use dockci_core::ProjectConfig;
use dockci_github::{CheckResult, GhClient, GitClient};

pub async fn doctor() -> anyhow::Result<()> {
    let git = GitClient::new();
    let gh = GhClient::new();
    let mut report = dockci_github::doctor(&git, &gh).await;

    // Informational; defaults apply without it
    report.config_file = match ProjectConfig::load(Path::new(".")) {
        Ok(_) if ProjectConfig::exists(Path::new(".")) => CheckResult::ok("Found"),
        Ok(_) => CheckResult::ok("Not found (using defaults)"),
        Err(e) => CheckResult::fail(&e.to_string()),
    };

    println!();
    println!("{report}");

    if !report.all_passed() {
        anyhow::bail!("some checks failed — see above for details");
    }

    Ok(())
}
