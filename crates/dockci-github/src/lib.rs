//! `git` and `gh` operations for dockci.
//!
//! Both tools are driven through the [`CommandExecutor`] trait so tests can
//! substitute mocks for the real processes.

pub mod doctor;
pub mod error;
pub mod executor;
pub mod gh;
pub mod git;

pub use doctor::{CheckResult, DoctorReport, doctor};
pub use error::{CommandError, PublishError, RunError, SecretError};
pub use executor::{CommandExecutor, RealExecutor};
pub use gh::{GhClient, RunSelector};
pub use git::{GitClient, PublishOutcome};
