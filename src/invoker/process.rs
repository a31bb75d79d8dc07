use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// What the child sees on stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdinMode {
    Null,
    /// A single newline, for tools that block on "press any key".
    Acknowledge,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdoutMode {
    Capture,
    /// Child writes straight to the operator's terminal.
    Inherit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: PathBuf,
    pub args: Vec<OsString>,
    pub stdin: StdinMode,
    pub stdout: StdoutMode,
}

impl Invocation {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdin: StdinMode::Null,
            stdout: StdoutMode::Capture,
        }
    }

    pub fn arg<S: Into<OsString>>(mut self, arg: S) -> Self {
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

    pub fn with_stdin(mut self, stdin: StdinMode) -> Self {
        self.stdin = stdin;
        self
    }

    pub fn with_stdout(mut self, stdout: StdoutMode) -> Self {
        self.stdout = stdout;
        self
    }

    pub fn command_line(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }
}

/// Best-effort result of running a collaborator. A launch failure has no
/// stdout; a non-zero exit keeps whatever was captured.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationOutcome {
    pub stdout: Option<String>,
    pub diagnostic: Option<String>,
    pub exit_code: Option<i32>,
}

impl InvocationOutcome {
    pub fn completed<S: Into<String>>(stdout: S) -> Self {
        Self {
            stdout: Some(stdout.into()),
            diagnostic: None,
            exit_code: Some(0),
        }
    }

    pub fn failed<S: Into<String>>(diagnostic: S) -> Self {
        Self {
            stdout: None,
            diagnostic: Some(diagnostic.into()),
            exit_code: None,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.diagnostic.is_none()
    }

    pub fn captured_text(&self) -> String {
        self.stdout.clone().unwrap_or_default()
    }
}

pub trait Invoker {
    fn invoke(&self, invocation: &Invocation) -> InvocationOutcome;
}

/// Runs collaborators as child processes and blocks until each exits.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessInvoker;

impl ProcessInvoker {
    pub fn new() -> Self {
        Self
    }

    fn build_command(invocation: &Invocation) -> Command {
        let mut command = Command::new(&invocation.program);
        command.args(&invocation.args);

        match invocation.stdin {
            StdinMode::Null => command.stdin(Stdio::null()),
            StdinMode::Acknowledge => command.stdin(Stdio::piped()),
        };

        match (invocation.stdout, invocation.stdin) {
            (StdoutMode::Inherit, _) => {
                command.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            (StdoutMode::Capture, StdinMode::Acknowledge) => {
                command.stdout(Stdio::piped()).stderr(Stdio::null());
            }
            (StdoutMode::Capture, StdinMode::Null) => {
                command.stdout(Stdio::piped()).stderr(Stdio::piped());
            }
        }

        command
    }
}

impl Invoker for ProcessInvoker {
    fn invoke(&self, invocation: &Invocation) -> InvocationOutcome {
        log::debug!("Running {}", invocation.command_line());

        let mut child = match Self::build_command(invocation).spawn() {
            Ok(child) => child,
            Err(e) => {
                let diagnostic = format!(
                    "failed to launch {}: {}",
                    invocation.program.display(),
                    e
                );
                log::warn!("{}", diagnostic);
                return InvocationOutcome::failed(diagnostic);
            }
        };

        if invocation.stdin == StdinMode::Acknowledge {
            if let Some(mut stdin) = child.stdin.take() {
                // The child may exit without reading; a broken pipe is fine.
                if let Err(e) = stdin.write_all(b"\n") {
                    log::debug!("Could not acknowledge prompt: {}", e);
                }
            }
        }

        let output = match child.wait_with_output() {
            Ok(output) => output,
            Err(e) => {
                let diagnostic = format!(
                    "failed to collect output of {}: {}",
                    invocation.program.display(),
                    e
                );
                log::warn!("{}", diagnostic);
                return InvocationOutcome::failed(diagnostic);
            }
        };

        let stdout = match invocation.stdout {
            StdoutMode::Capture => Some(String::from_utf8_lossy(&output.stdout).into_owned()),
            StdoutMode::Inherit => None,
        };

        let diagnostic = if output.status.success() {
            None
        } else {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let mut message = format!("{} exited with {}", invocation.program.display(), output.status);
            if let Some(first_line) = stderr.lines().find(|line| !line.trim().is_empty()) {
                message.push_str(": ");
                message.push_str(first_line.trim());
            }
            log::warn!("{}", message);
            Some(message)
        };

        InvocationOutcome {
            stdout,
            diagnostic,
            exit_code: output.status.code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invocation_builder() {
        let invocation = Invocation::new("python")
            .args(["oledump.py"])
            .arg("sample.doc")
            .with_stdin(StdinMode::Acknowledge);

        assert_eq!(invocation.command_line(), "python oledump.py sample.doc");
        assert_eq!(invocation.stdin, StdinMode::Acknowledge);
        assert_eq!(invocation.stdout, StdoutMode::Capture);
    }

    #[test]
    fn test_missing_program_is_best_effort() {
        let invocation = Invocation::new("/nonexistent/trianalyze-collaborator").arg("x.doc");
        let outcome = ProcessInvoker::new().invoke(&invocation);

        assert!(!outcome.succeeded());
        assert!(outcome.stdout.is_none());
        assert_eq!(outcome.captured_text(), "");
        assert!(outcome
            .diagnostic
            .unwrap()
            .contains("failed to launch"));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout() {
        let invocation = Invocation::new("sh").args(["-c", "echo hello; echo noise >&2"]);
        let outcome = ProcessInvoker::new().invoke(&invocation);

        assert!(outcome.succeeded());
        assert_eq!(outcome.stdout.as_deref(), Some("hello\n"));
        assert_eq!(outcome.exit_code, Some(0));
    }

    #[cfg(unix)]
    #[test]
    fn test_acknowledge_feeds_newline() {
        let invocation = Invocation::new("sh")
            .args(["-c", "read answer; echo \"got:$answer\""])
            .with_stdin(StdinMode::Acknowledge);
        let outcome = ProcessInvoker::new().invoke(&invocation);

        assert!(outcome.succeeded());
        assert_eq!(outcome.stdout.as_deref(), Some("got:\n"));
    }

    #[cfg(unix)]
    #[test]
    fn test_nonzero_exit_keeps_partial_output() {
        let invocation = Invocation::new("sh").args(["-c", "echo partial; echo broken >&2; exit 3"]);
        let outcome = ProcessInvoker::new().invoke(&invocation);

        assert!(!outcome.succeeded());
        assert_eq!(outcome.stdout.as_deref(), Some("partial\n"));
        assert_eq!(outcome.exit_code, Some(3));
        assert!(outcome.diagnostic.unwrap().contains("broken"));
    }
}
