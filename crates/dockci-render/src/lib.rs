//! GitHub Actions workflow generation for dockci.
//!
//! # Layouts
//!
//! ```text
//! inline          ci.yml                      checkout → qemu → buildx → login → build-push
//! local-reusable  ci.yml                      uses: ./.github/workflows/docker-build-push.yml
//!                 docker-build-push.yml       on: workflow_call (typed inputs + 2 secrets)
//! remote-shared   ci.yml                      uses: owner/repo/.github/workflows/docker-build-push.yml@ref
//! ```
//!
//! Every caller (and the inline workflow) triggers on pushes to `main` and
//! `develop`, on `v*` tags, and on manual dispatch. Images pushed from `main`
//! are tagged `latest`; every other ref pushes its own name as the tag.
//!
//! Rendering is a pure function of [`dockci_core::WorkflowConfig`]: no
//! timestamps or other ambient input end up in the output.

pub mod output;
pub mod summary;
pub mod workflow;

pub use output::{Notice, RenderedFile, RenderedWorkflows, WriteError, WrittenFile};
pub use summary::Summary;
pub use workflow::{WorkflowGenerator, render};
