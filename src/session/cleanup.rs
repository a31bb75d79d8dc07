use crate::error::{Result, TriAnalyzeError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

pub const CLEANUP_PROMPT: &str = "Keep network miner files? [y/n]: ";

/// Where the keep/discard answer comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CleanupPolicy {
    /// Ask the operator on stdin
    #[default]
    Prompt,
    /// Keep the extracted files without asking
    Keep,
    /// Discard the extracted files without asking
    Discard,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CleanupDecision {
    Keep,
    Discard,
    Unrecognized(String),
}

impl CleanupDecision {
    pub fn parse(input: &str) -> Self {
        let answer = input.trim().to_lowercase();
        match answer.as_str() {
            "y" => CleanupDecision::Keep,
            "n" => CleanupDecision::Discard,
            _ => CleanupDecision::Unrecognized(answer),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CleanupOutcome {
    Kept,
    Cleared,
}

pub struct SessionCleanup {
    extraction_dir: PathBuf,
}

impl SessionCleanup {
    pub fn new<P: Into<PathBuf>>(extraction_dir: P) -> Self {
        Self {
            extraction_dir: extraction_dir.into(),
        }
    }

    pub fn extraction_dir(&self) -> &Path {
        &self.extraction_dir
    }

    /// Writes the prompt and reads a single line. End of input counts as an
    /// empty answer.
    pub fn prompt<R: BufRead, W: Write>(&self, input: &mut R, prompt_out: &mut W) -> Result<CleanupDecision> {
        write!(prompt_out, "{}", CLEANUP_PROMPT)?;
        prompt_out.flush()?;

        let mut line = String::new();
        input.read_line(&mut line)?;

        Ok(CleanupDecision::parse(&line))
    }

    pub fn apply(&self, decision: &CleanupDecision) -> Result<CleanupOutcome> {
        match decision {
            CleanupDecision::Discard => {
                self.clear()?;
                log::info!(
                    "Cleared extraction directory {}",
                    self.extraction_dir.display()
                );
                Ok(CleanupOutcome::Cleared)
            }
            CleanupDecision::Keep => Ok(CleanupOutcome::Kept),
            CleanupDecision::Unrecognized(answer) => {
                log::warn!("Unrecognized cleanup answer '{}', keeping files", answer);
                Ok(CleanupOutcome::Kept)
            }
        }
    }

    fn clear(&self) -> Result<()> {
        if self.extraction_dir.exists() {
            fs::remove_dir_all(&self.extraction_dir)
                .map_err(|e| TriAnalyzeError::filesystem(&self.extraction_dir, e))?;
        }

        fs::create_dir_all(&self.extraction_dir)
            .map_err(|e| TriAnalyzeError::filesystem(&self.extraction_dir, e))?;

        Ok(())
    }
}
