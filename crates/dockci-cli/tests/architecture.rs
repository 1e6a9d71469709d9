use std::path::{Path, PathBuf};

use arch_lint::rules::{NoErrorSwallowing, NoSilentResultDrop};
use arch_lint::{Analyzer, Severity};

fn workspace_root() -> PathBuf {
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));
    manifest_dir
        .ancestors()
        .nth(2)
        .map(Path::to_path_buf)
        .unwrap_or_else(|| manifest_dir.to_path_buf())
}

/// Library and binary code must neither discard an `Err` nor turn a
/// `Result` into `Option` without a recorded reason.
#[test]
fn no_swallowed_errors_in_workspace_sources() {
    let root = workspace_root();
    let analyzer = Analyzer::builder()
        .root(&root)
        .exclude("**/target/**")
        .exclude("**/tests/**")
        .exclude("examples/**")
        .rule(NoErrorSwallowing::new())
        .rule(NoSilentResultDrop::new())
        .build()
        .expect("arch-lint analyzer");

    let result = analyzer.analyze().expect("arch-lint analysis");
    assert!(
        !result.has_violations_at(Severity::Warning),
        "{}",
        result.format_test_report(Severity::Warning)
    );
}
