//! Process execution for backend commands.
//!
//! Backends never change the process working directory. Commands that must run
//! inside a checkout pass it as `dir`, which keeps concurrent handles on
//! different checkouts independent of each other.

use std::{
    ffi::{OsStr, OsString},
    path::Path,
    process::{Command, Stdio},
};

use utils::shell::resolve_executable_path_blocking;

use crate::error::VcsError;

/// Runs an external program and returns its combined output
pub trait CommandRunner: Send + Sync {
    /// Run `program` with `args`, inside `dir` when given.
    ///
    /// Returns stdout followed by stderr on success. A non-zero exit maps to
    /// [`VcsError::CommandFailed`] carrying the same combined output.
    fn run(&self, program: &str, args: &[OsString], dir: Option<&Path>)
        -> Result<String, VcsError>;
}

/// Runs commands as real child processes
#[derive(Clone, Default)]
pub struct SystemRunner;

impl SystemRunner {
    pub fn new() -> Self {
        Self {}
    }
}

impl CommandRunner for SystemRunner {
    fn run(
        &self,
        program: &str,
        args: &[OsString],
        dir: Option<&Path>,
    ) -> Result<String, VcsError> {
        let exe = resolve_executable_path_blocking(program)
            .ok_or_else(|| VcsError::NotAvailable(program.to_string()))?;

        let mut cmd = Command::new(&exe);
        cmd.args(args);
        if let Some(dir) = dir {
            cmd.current_dir(dir);
        }
        cmd.stdin(Stdio::null());

        tracing::trace!(dir = ?dir, "Running {} command: {:?}", program, cmd);

        let output = cmd.output().map_err(|e| VcsError::CommandFailed {
            command: render_command(program, args),
            output: e.to_string(),
        })?;

        let mut combined = output.stdout;
        combined.extend_from_slice(&output.stderr);
        let text = String::from_utf8_lossy(&combined).into_owned();

        if !output.status.success() {
            return Err(VcsError::CommandFailed {
                command: render_command(program, args),
                output: text.trim().to_string(),
            });
        }

        Ok(text)
    }
}

/// Render a command line for error messages
pub(crate) fn render_command(program: &str, args: &[OsString]) -> String {
    let mut line = program.to_string();
    for arg in args {
        line.push(' ');
        line.push_str(&arg.to_string_lossy());
    }
    line
}

/// Collect heterogeneous arguments into owned `OsString`s
pub(crate) fn to_args<I, S>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = S>,
    S: AsRef<OsStr>,
{
    args.into_iter().map(|a| a.as_ref().to_os_string()).collect()
}

#[cfg(test)]
pub(crate) mod fake {
    use std::{
        collections::VecDeque,
        path::PathBuf,
        sync::{Arc, Mutex},
    };

    use super::*;

    /// A command the fake runner received
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Call {
        pub program: String,
        pub args: Vec<String>,
        pub dir: Option<PathBuf>,
    }

    impl Call {
        pub fn line(&self) -> String {
            std::iter::once(self.program.as_str())
                .chain(self.args.iter().map(String::as_str))
                .collect::<Vec<_>>()
                .join(" ")
        }
    }

    /// Replays scripted outputs in order and records every call.
    ///
    /// `Err(text)` replies become `CommandFailed` with `text` as the output.
    /// Once the script runs out, every call succeeds with empty output.
    #[derive(Clone, Default)]
    pub struct FakeRunner {
        replies: Arc<Mutex<VecDeque<Result<String, String>>>>,
        calls: Arc<Mutex<Vec<Call>>>,
    }

    impl FakeRunner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn reply_ok(self, output: &str) -> Self {
            self.replies.lock().unwrap().push_back(Ok(output.to_string()));
            self
        }

        pub fn reply_err(self, output: &str) -> Self {
            self.replies.lock().unwrap().push_back(Err(output.to_string()));
            self
        }

        pub fn calls(&self) -> Vec<Call> {
            self.calls.lock().unwrap().clone()
        }

        pub fn lines(&self) -> Vec<String> {
            self.calls().iter().map(Call::line).collect()
        }
    }

    impl CommandRunner for FakeRunner {
        fn run(
            &self,
            program: &str,
            args: &[OsString],
            dir: Option<&Path>,
        ) -> Result<String, VcsError> {
            self.calls.lock().unwrap().push(Call {
                program: program.to_string(),
                args: args.iter().map(|a| a.to_string_lossy().into_owned()).collect(),
                dir: dir.map(Path::to_path_buf),
            });

            match self.replies.lock().unwrap().pop_front() {
                Some(Ok(output)) => Ok(output),
                Some(Err(output)) => Err(VcsError::CommandFailed {
                    command: render_command(program, args),
                    output,
                }),
                None => Ok(String::new()),
            }
        }
    }
}
