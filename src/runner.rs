//! # External Commands
//!
//! Every collaborator this tool talks to (git, the vault command, the
//! colorizer) is an external program. They are all reached through the
//! [`CommandRunner`] trait so the diff pipeline can be driven by scripted
//! fakes in tests.

use crate::error::{Result, VaultDiffError};
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;

/// Captured result of one external command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl CommandOutput {
    pub fn success(stdout: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(0),
            stdout: stdout.into(),
            stderr: Vec::new(),
        }
    }

    pub fn failure(code: i32, stderr: impl Into<Vec<u8>>) -> Self {
        Self {
            code: Some(code),
            stdout: Vec::new(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stdout_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stdout).into_owned()
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }

    /// Turn a non-zero exit into a [`VaultDiffError::Command`].
    pub fn into_checked(self, program: &str) -> Result<Self> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(VaultDiffError::Command {
                program: program.to_string(),
                code: self.code,
                stderr: self.stderr_lossy(),
            })
        }
    }
}

/// Run a program with arguments and optional stdin, collecting its output.
///
/// Implementations return `Err` only when the program could not be run at
/// all; a non-zero exit is reported through [`CommandOutput::code`].
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[String], input: Option<&[u8]>) -> Result<CommandOutput>;
}

/// Runs real processes in the current working directory.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String], input: Option<&[u8]>) -> Result<CommandOutput> {
        log::debug!("running {} {}", program, args.join(" "));

        let mut child = Command::new(program)
            .args(args)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Feed stdin from its own thread so a child that streams output
        // cannot block on a full stdout pipe while we are still writing.
        let writer = match (input, child.stdin.take()) {
            (Some(data), Some(mut stdin)) => {
                let data = data.to_vec();
                Some(thread::spawn(move || stdin.write_all(&data)))
            }
            _ => None,
        };

        let output = child.wait_with_output()?;

        if let Some(writer) = writer {
            match writer.join() {
                Ok(Ok(())) => {}
                // The child may legitimately exit before reading everything.
                Ok(Err(e)) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Ok(Err(e)) => return Err(e.into()),
                Err(_) => {
                    return Err(VaultDiffError::Other(format!(
                        "stdin writer for '{program}' panicked"
                    )))
                }
            }
        }

        Ok(CommandOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn into_checked_passes_success_through() {
        let output = CommandOutput::success("ok\n").into_checked("git").unwrap();
        assert_eq!(output.stdout_lossy(), "ok\n");
    }

    #[test]
    fn into_checked_reports_failure() {
        let err = CommandOutput::failure(2, "  boom \n")
            .into_checked("colordiff")
            .unwrap_err();
        match err {
            VaultDiffError::Command {
                program,
                code,
                stderr,
            } => {
                assert_eq!(program, "colordiff");
                assert_eq!(code, Some(2));
                assert_eq!(stderr, "boom");
            }
            other => panic!("expected command error, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_feeds_stdin_and_captures_stdout() {
        let output = SystemRunner
            .run("cat", &[], Some(b"line one\nline two\n"))
            .unwrap();
        assert!(output.is_success());
        assert_eq!(output.stdout, b"line one\nline two\n");
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_handles_large_input() {
        let data = "0123456789abcdef\n".repeat(64 * 1024);
        let output = SystemRunner.run("cat", &[], Some(data.as_bytes())).unwrap();
        assert_eq!(output.stdout.len(), data.len());
    }

    #[cfg(unix)]
    #[test]
    fn system_runner_reports_exit_code() {
        let args = vec!["-c".to_string(), "echo nope >&2; exit 3".to_string()];
        let output = SystemRunner.run("sh", &args, None).unwrap();
        assert_eq!(output.code, Some(3));
        assert_eq!(output.stderr_lossy(), "nope");
    }

    #[test]
    fn system_runner_errors_on_missing_program() {
        let result = SystemRunner.run("definitely-not-a-real-program-4821", &[], None);
        assert!(matches!(result, Err(VaultDiffError::Io(_))));
    }
}
