use std::path::{Path, PathBuf};

use dockci_core::ProjectConfig;
use dockci_render::Summary;

use crate::prompt::NonInteractive;
use crate::wizard::{Wizard, WorkflowArgs};

/// Render workflow files from flags and `dockci.toml` alone.
///
/// Documents go to stdout (or `output_dir`), the summary to stderr.
pub async fn render(args: WorkflowArgs, output_dir: Option<PathBuf>) -> anyhow::Result<()> {
    let config = ProjectConfig::load(Path::new("."))?;
    let workflow = Wizard::new(&mut NonInteractive, &config)
        .assume_yes(true)
        .collect(&args)?;
    let rendered = dockci_render::render(&workflow);

    match output_dir {
        Some(dir) => {
            let written = rendered.write_to(&dir)?;
            eprintln!(
                "{}",
                Summary::new(&workflow, &rendered)
                    .with_written(written.into_iter().map(|f| f.path))
            );
        }
        None => {
            for (i, file) in rendered.files.iter().enumerate() {
                if i > 0 {
                    println!("---");
                }
                println!("# {}", file.name);
                print!("{}", file.contents);
            }
            eprintln!("{}", Summary::new(&workflow, &rendered));
        }
    }
    Ok(())
}
