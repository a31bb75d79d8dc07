use crate::config::CollaboratorSpec;
use crate::invoker::process::{Invocation, StdinMode, StdoutMode};
use std::path::{Path, PathBuf};

/// An external tool the pipeline runs once per target file.
#[derive(Debug, Clone)]
pub struct Collaborator {
    name: String,
    program: PathBuf,
    args: Vec<String>,
    stdin: StdinMode,
    stdout: StdoutMode,
}

impl Collaborator {
    pub fn from_spec<S: Into<String>>(name: S, spec: &CollaboratorSpec) -> Self {
        let stdin = if spec.needs_acknowledgement() {
            StdinMode::Acknowledge
        } else {
            StdinMode::Null
        };

        Self {
            name: name.into(),
            program: spec.program.clone(),
            args: spec.args.clone(),
            stdin,
            stdout: StdoutMode::Capture,
        }
    }

    /// Output goes to the terminal instead of being captured.
    pub fn passthrough(mut self) -> Self {
        self.stdout = StdoutMode::Inherit;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn invocation_for(&self, target: &Path) -> Invocation {
        Invocation::new(&self.program)
            .args(&self.args)
            .arg(target)
            .with_stdin(self.stdin)
            .with_stdout(self.stdout)
    }
}
