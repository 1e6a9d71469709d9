use std::process::Stdio;

use crate::error::CommandError;

/// Abstraction over CLI execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
#[allow(async_fn_in_trait)]
pub trait CommandExecutor: Send + Sync {
    /// Execute a command and capture stdout.
    async fn exec(&self, args: &[String]) -> Result<String, CommandError>;

    /// Execute a command, streaming output to the terminal.
    async fn exec_streaming(&self, args: &[String]) -> Result<(), CommandError>;

    /// Execute a command with data piped to stdin.
    ///
    /// Used for secret values so they never show up in process arguments.
    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, CommandError>;
}

/// Runs a real program (`git` or `gh`) as a child process.
#[derive(Debug, Clone)]
pub struct RealExecutor {
    program: &'static str,
}

impl RealExecutor {
    pub fn git() -> Self {
        Self { program: "git" }
    }

    pub fn gh() -> Self {
        Self { program: "gh" }
    }

    fn command(&self, args: &[String]) -> tokio::process::Command {
        tracing::debug!(program = self.program, ?args, "spawning");
        let mut cmd = tokio::process::Command::new(self.program);
        cmd.args(args);
        cmd
    }

    fn not_found(&self, source: std::io::Error) -> CommandError {
        CommandError::NotFound {
            program: self.program.to_owned(),
            source,
        }
    }

    fn finish(
        &self,
        args: &[String],
        output: std::process::Output,
    ) -> Result<String, CommandError> {
        if output.status.success() {
            String::from_utf8(output.stdout).map_err(|e| CommandError::InvalidUtf8 {
                program: self.program.to_owned(),
                source: e,
            })
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_owned();
            Err(CommandError::CommandFailed {
                program: self.program.to_owned(),
                args: args.to_vec(),
                stderr,
                code: output.status.code(),
            })
        }
    }
}

impl CommandExecutor for RealExecutor {
    async fn exec(&self, args: &[String]) -> Result<String, CommandError> {
        let output = self
            .command(args)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| self.not_found(e))?;

        self.finish(args, output)
    }

    async fn exec_streaming(&self, args: &[String]) -> Result<(), CommandError> {
        let status = self
            .command(args)
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await
            .map_err(|e| self.not_found(e))?;

        if status.success() {
            Ok(())
        } else {
            Err(CommandError::CommandFailed {
                program: self.program.to_owned(),
                args: args.to_vec(),
                stderr: format!("exit code: {status}"),
                code: status.code(),
            })
        }
    }

    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
    ) -> Result<String, CommandError> {
        use tokio::io::AsyncWriteExt;

        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.not_found(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            let stdin_err = |e| CommandError::StdinWrite {
                program: self.program.to_owned(),
                source: e,
            };
            stdin.write_all(stdin_data).await.map_err(stdin_err)?;
            stdin.shutdown().await.map_err(stdin_err)?;
        }

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| self.not_found(e))?;

        self.finish(args, output)
    }
}
