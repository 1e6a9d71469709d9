#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{program} not found on PATH")]
    NotFound {
        program: String,
        source: std::io::Error,
    },

    #[error("{program} command failed: {args:?}\n{stderr}")]
    CommandFailed {
        program: String,
        args: Vec<String>,
        stderr: String,
        /// Exit code, or `None` when terminated by a signal.
        code: Option<i32>,
    },

    #[error("{program} output was not valid UTF-8")]
    InvalidUtf8 {
        program: String,
        source: std::string::FromUtf8Error,
    },

    #[error("failed to write to {program} stdin")]
    StdinWrite {
        program: String,
        source: std::io::Error,
    },
}

impl CommandError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Exit code of a command that ran and failed.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            Self::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SecretError {
    #[error("failed to set repository secret {name}")]
    Set { name: String, source: CommandError },
}

#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    #[error("nothing to publish")]
    NoPaths,

    #[error("git add failed")]
    Add { source: CommandError },

    #[error("git commit failed")]
    Commit { source: CommandError },

    #[error("git push failed")]
    Push { source: CommandError },
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("failed to dispatch workflow {workflow}")]
    Dispatch {
        workflow: String,
        source: CommandError,
    },

    #[error("failed to list runs of {workflow}")]
    List {
        workflow: String,
        source: CommandError,
    },

    #[error("unexpected `gh run list` output")]
    Parse { source: serde_json::Error },

    #[error("no run of {workflow} appeared after {attempts} attempts")]
    NotFound { workflow: String, attempts: u32 },

    #[error("workflow run {run_id} did not succeed")]
    Failed {
        run_id: u64,
        /// Exit code of `gh run watch --exit-status`.
        code: Option<i32>,
        source: CommandError,
    },
}
