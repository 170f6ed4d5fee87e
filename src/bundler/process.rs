//! External tool invocation.
//!
//! Every external program the pipeline touches (`cargo`, `lipo`, `hdiutil`,
//! `open`) goes through [`CommandRunner`], so tests can substitute fakes
//! without spawning real processes.

use super::{Error, Result, Stage};
use std::fmt;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

/// A fully described external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    /// Stage issuing the command
    pub stage: Stage,
    /// Program name, resolved through `PATH`
    pub program: String,
    /// Arguments in order
    pub args: Vec<String>,
    /// Working directory
    pub cwd: PathBuf,
    /// Extra environment variables
    pub envs: Vec<(String, String)>,
}

impl ToolInvocation {
    /// Start describing a command for `stage`.
    pub fn new(stage: Stage, program: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            stage,
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
            envs: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable for the child.
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }
}

impl fmt::Display for ToolInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (key, value) in &self.envs {
            write!(f, "{key}={value} ")?;
        }
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Exit status and captured output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when terminated by a signal
    pub exit_code: Option<i32>,
    /// Captured stdout
    pub stdout: String,
    /// Captured stderr
    pub stderr: String,
}

impl ToolOutput {
    /// Output of a command that exited with `code`.
    pub fn with_code(code: i32) -> Self {
        Self {
            exit_code: Some(code),
            ..Default::default()
        }
    }

    /// Whether the command exited 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }

    /// The tool's own error output: stderr, or stdout when stderr is empty.
    pub fn diagnostics(&self) -> String {
        if self.stderr.trim().is_empty() {
            self.stdout.clone()
        } else {
            self.stderr.clone()
        }
    }
}

/// Runs external commands and waits for them to exit.
pub trait CommandRunner: Send + Sync {
    /// Run `invocation` to completion.
    ///
    /// Returns `Ok` for any process that exited with a code, zero or not;
    /// spawn failures and signal terminations are
    /// [`Error::ExternalToolFailure`].
    fn run(&self, invocation: &ToolInvocation) -> impl Future<Output = Result<ToolOutput>> + Send;
}

/// Spawns real processes with `tokio::process`.
///
/// No timeout is applied: a hung tool blocks the pipeline.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &ToolInvocation) -> Result<ToolOutput> {
        let program = resolve_tool(invocation.stage, &invocation.program)?;
        log::info!("Running: {}", invocation);

        let output = tokio::process::Command::new(&program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .envs(invocation.envs.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| Error::ExternalToolFailure {
                stage: invocation.stage,
                program: invocation.program.clone(),
                exit_code: None,
                reason: format!("failed to execute {}: {}", program.display(), e),
            })?;

        let result = ToolOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        if result.exit_code.is_none() {
            return Err(Error::ExternalToolFailure {
                stage: invocation.stage,
                program: invocation.program.clone(),
                exit_code: None,
                reason: format!("interrupted\n{}", result.diagnostics()),
            });
        }

        log::debug!(
            "{} exited with {:?} ({} bytes stdout, {} bytes stderr)",
            invocation.program,
            result.exit_code,
            result.stdout.len(),
            result.stderr.len()
        );
        Ok(result)
    }
}

/// Locate `program` in `PATH`.
pub fn resolve_tool(stage: Stage, program: &str) -> Result<PathBuf> {
    match which::which(program) {
        Ok(path) => {
            log::debug!("Found {} at: {}", program, path.display());
            Ok(path)
        }
        Err(e) => Err(Error::ExternalToolFailure {
            stage,
            program: program.to_string(),
            exit_code: None,
            reason: format!("not found in PATH: {}", e),
        }),
    }
}

/// Render a path as a command argument.
pub fn path_arg(path: &Path) -> Result<String> {
    path.to_str().map(str::to_owned).ok_or_else(|| {
        Error::GenericError(format!(
            "Invalid path (contains non-UTF8 characters): {}",
            path.display()
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invocation_renders_env_and_args() {
        let inv = ToolInvocation::new(Stage::Build, "cargo", "/src")
            .arg("build")
            .args(["--features", "default"])
            .env("MACOSX_DEPLOYMENT_TARGET", "10.11");
        assert_eq!(
            inv.to_string(),
            "MACOSX_DEPLOYMENT_TARGET=10.11 cargo build --features default"
        );
    }

    #[test]
    fn diagnostics_prefer_stderr() {
        let mut out = ToolOutput::with_code(1);
        out.stdout = "progress\n".into();
        assert_eq!(out.diagnostics(), "progress\n");
        out.stderr = "error: boom\n".into();
        assert_eq!(out.diagnostics(), "error: boom\n");
        assert!(!out.success());
    }

    #[tokio::test]
    async fn missing_program_is_external_tool_failure() {
        let inv = ToolInvocation::new(Stage::Install, "definitely-not-a-real-tool-7f3a", ".");
        let err = SystemRunner.run(&inv).await.unwrap_err();
        assert!(matches!(
            err,
            Error::ExternalToolFailure { stage: Stage::Install, exit_code: None, .. }
        ));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn captures_exit_code_and_output() {
        let inv = ToolInvocation::new(Stage::Package, "sh", ".")
            .args(["-c", "echo out; echo err >&2; exit 3"]);
        let out = SystemRunner.run(&inv).await.unwrap();
        assert_eq!(out.exit_code, Some(3));
        assert_eq!(out.stdout, "out\n");
        assert_eq!(out.stderr, "err\n");
    }
}
