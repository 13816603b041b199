//! Blocking external command execution.
//!
//! Every collaborator (git, the container engine, sops) goes through a
//! [`CommandRunner`]. Each [`CommandSpec`] names its working directory
//! explicitly; nothing depends on the process's current directory.
//!
//! Commands block until the child exits. There is no timeout: a hung child
//! hangs the run.

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::ExecError;

/// A single external command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub cwd: PathBuf,
}

impl CommandSpec {
    pub fn new(program: impl Into<PathBuf>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            cwd: cwd.into(),
        }
    }

    pub fn arg(mut self, arg: impl Into<OsString>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Arguments as lossy strings, for assertions and log lines.
    pub fn arg_strings(&self) -> Vec<String> {
        self.args
            .iter()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }
}

/// Anchor a path-like program (`bin/docker`, `./.deckhand/sops`) to the
/// current directory. Children run in their own working directory, where a
/// relative program path would no longer resolve. Bare names are left for
/// `PATH` lookup.
pub fn resolve_program(program: impl Into<PathBuf>) -> PathBuf {
    let program = program.into();
    if program.is_absolute() || program.components().count() < 2 {
        return program;
    }
    std::path::absolute(&program).unwrap_or(program)
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}

/// Seam between the deploy logic and child processes.
pub trait CommandRunner {
    /// Run with inherited stdio; fail on non-zero exit.
    fn run(&self, spec: &CommandSpec) -> Result<(), ExecError>;

    /// Run and return trimmed stdout; fail on non-zero exit.
    fn capture(&self, spec: &CommandSpec) -> Result<String, ExecError>;
}

/// [`CommandRunner`] backed by `std::process::Command`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl SystemRunner {
    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args).current_dir(spec.cwd());
        cmd
    }

    fn spawn_err(spec: &CommandSpec, source: std::io::Error) -> ExecError {
        ExecError::Spawn {
            program: spec.program.display().to_string(),
            cwd: spec.cwd.clone(),
            source,
        }
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, spec: &CommandSpec) -> Result<(), ExecError> {
        tracing::debug!(cwd = %spec.cwd.display(), "exec: {spec}");
        let status = Self::command(spec)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| Self::spawn_err(spec, e))?;

        if status.success() {
            return Ok(());
        }
        Err(ExecError::Failed {
            command: spec.to_string(),
            status,
            stderr: String::new(),
        })
    }

    fn capture(&self, spec: &CommandSpec) -> Result<String, ExecError> {
        tracing::debug!(cwd = %spec.cwd.display(), "exec (captured): {spec}");
        let output = Self::command(spec)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Self::spawn_err(spec, e))?;

        if output.status.success() {
            return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
        }
        Err(ExecError::Failed {
            command: spec.to_string(),
            status: output.status,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }
}
