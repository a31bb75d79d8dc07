pub mod cli;
pub mod collector;
pub mod config;
pub mod error;
pub mod export;
pub mod invoker;
pub mod scanner;
pub mod session;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, MessageFormat};
pub use config::{CliOverrides, CollaboratorSpec, Config, OutputConfig, ScanConfig, ToolsConfig};
pub use error::{Result, TriAnalyzeError, UserFriendlyError};

// Core functionality re-exports
pub use collector::{
    merge_reports, CollectionProgress, CombinedTable, ReportCollection, ReportCollector,
    EXIFTOOL_FIELD, FILE_FIELD, OLEDUMP_FIELD,
};
pub use export::{ExportArtifact, ExportFormat, OutputManager};
pub use invoker::{Collaborator, Invocation, InvocationOutcome, Invoker, ProcessInvoker};
pub use scanner::{CarvedFileScanner, ExtractedFile, FileFilter};
pub use session::{CleanupDecision, CleanupOutcome, CleanupPolicy, SessionCleanup};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Summary of one analysis run.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub capture: PathBuf,
    pub extraction_dir: PathBuf,
    pub files_discovered: usize,
    pub artifact: ExportArtifact,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub carver_diagnostic: Option<String>,
    pub ole_dump_failures: Vec<String>,
    pub metadata_failures: Vec<String>,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
}

impl AnalysisReport {
    /// Every non-fatal collaborator problem seen during the run.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if let Some(ref diagnostic) = self.carver_diagnostic {
            warnings.push(format!("networkminer: {}", diagnostic));
        }
        warnings.extend(self.ole_dump_failures.iter().cloned());
        warnings.extend(self.metadata_failures.iter().cloned());
        warnings
    }
}

/// Main library interface: carve, analyze, merge, export.
pub struct TriAnalyze {
    config: Config,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
    invoker: Box<dyn Invoker>,
}

impl TriAnalyze {
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(!quiet && output_mode == OutputMode::Human);

        Self {
            config,
            output_formatter,
            progress_manager,
            invoker: Box::new(ProcessInvoker::new()),
        }
    }

    /// Replace the process launcher, e.g. with a scripted one.
    pub fn with_invoker(mut self, invoker: Box<dyn Invoker>) -> Self {
        self.invoker = invoker;
        self
    }

    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.message_format {
            MessageFormat::Human => OutputMode::Human,
            MessageFormat::Json => OutputMode::Json,
            MessageFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(config, output_mode, cli_args.verbose, cli_args.quiet))
    }

    /// Run the whole pipeline against one capture file.
    pub fn analyze(&self, capture: &Path) -> Result<AnalysisReport> {
        let start_time = Instant::now();

        // Step 0: nothing runs without a capture
        self.validate_capture(capture)?;

        // Step 1: output directory
        let output_manager = self.setup_output_directory()?;

        // Step 2: carve files out of the capture
        let carver_diagnostic = self.carve_files(capture)?;

        // Step 3: find office documents among the carved files
        let files = self.discover_files()?;
        if files.is_empty() {
            self.output_formatter.warning(&format!(
                "No candidate files found in {}",
                self.config.tools.extraction_dir.display()
            ));
        } else {
            self.output_formatter
                .info(&format!("Found {} candidate files", files.len()));
        }

        // Step 4 and 5: one report per file from each analyzer
        let ole_dump = Collaborator::from_spec("oledump", &self.config.tools.ole_dump);
        let (ole_reports, ole_progress) =
            self.run_pass("Oledump.py is processing...", &ole_dump, &files, OLEDUMP_FIELD);

        let metadata = Collaborator::from_spec("exiftool", &self.config.tools.metadata);
        let (metadata_reports, metadata_progress) =
            self.run_pass("Exiftool is processing...", &metadata, &files, EXIFTOOL_FIELD);

        // Step 6: merge
        self.output_formatter.start_operation("Compilation...");
        let table = merge_reports(&ole_reports, &metadata_reports)?;
        self.output_formatter
            .debug(&format!("Combined table has {} rows", table.len()));

        // Step 7: export
        let artifact = output_manager.export(&table, self.config.output.format)?;
        self.output_formatter.success(&format!(
            "Results have been exported to {}",
            artifact.path.display()
        ));

        Ok(AnalysisReport {
            capture: capture.to_path_buf(),
            extraction_dir: self.config.tools.extraction_dir.clone(),
            files_discovered: files.len(),
            artifact,
            carver_diagnostic,
            ole_dump_failures: ole_progress.failures,
            metadata_failures: metadata_progress.failures,
            duration: start_time.elapsed(),
            completed_at: Utc::now(),
        })
    }

    /// Ask (or decide from config) whether to keep the carved files.
    pub fn finish_session<R: BufRead, W: Write>(
        &self,
        input: &mut R,
        prompt_out: &mut W,
    ) -> Result<CleanupOutcome> {
        let cleanup = SessionCleanup::new(&self.config.tools.extraction_dir);
        let decision = match self.config.output.cleanup {
            CleanupPolicy::Prompt => cleanup.prompt(input, prompt_out)?,
            CleanupPolicy::Keep => CleanupDecision::Keep,
            CleanupPolicy::Discard => CleanupDecision::Discard,
        };

        let outcome = cleanup.apply(&decision)?;
        let dir = cleanup.extraction_dir().display();
        match (&decision, outcome) {
            (CleanupDecision::Unrecognized(_), _) => self.output_formatter.warning(
                "Invalid input. The contents of the directory will be kept by default.",
            ),
            (_, CleanupOutcome::Kept) => self
                .output_formatter
                .info(&format!("The contents of {} will be kept.", dir)),
            (_, CleanupOutcome::Cleared) => self.output_formatter.success(&format!(
                "The contents of {} have been deleted and the directory has been recreated.",
                dir
            )),
        }

        Ok(outcome)
    }

    /// Command lines a run would launch, without launching anything. Per-file
    /// analyzer invocations use a placeholder target.
    pub fn planned_invocations(&self, capture: &Path) -> Vec<String> {
        let tools = &self.config.tools;
        let placeholder = Path::new("<carved file>");

        vec![
            Collaborator::from_spec("networkminer", &tools.carver)
                .invocation_for(capture)
                .command_line(),
            Collaborator::from_spec("oledump", &tools.ole_dump)
                .invocation_for(placeholder)
                .command_line(),
            Collaborator::from_spec("exiftool", &tools.metadata)
                .invocation_for(placeholder)
                .command_line(),
        ]
    }

    fn validate_capture(&self, capture: &Path) -> Result<()> {
        if !capture.is_file() {
            return Err(TriAnalyzeError::MissingCapture {
                path: capture.to_path_buf(),
            });
        }
        Ok(())
    }

    fn setup_output_directory(&self) -> Result<OutputManager> {
        let output_manager = OutputManager::new(self.config.output.directory.clone());
        output_manager.initialize()?;

        self.output_formatter.debug(&format!(
            "Output directory: {}",
            output_manager.get_output_directory().display()
        ));

        Ok(output_manager)
    }

    /// A carver failure is reported, not fatal: whatever it managed to
    /// write is still analyzed.
    fn carve_files(&self, capture: &Path) -> Result<Option<String>> {
        let extraction_dir = &self.config.tools.extraction_dir;
        std::fs::create_dir_all(extraction_dir)
            .map_err(|e| TriAnalyzeError::filesystem(extraction_dir, e))?;

        self.output_formatter
            .start_operation("Extracting files with NetworkMiner");

        let carver = Collaborator::from_spec("networkminer", &self.config.tools.carver).passthrough();
        let invocation = carver.invocation_for(capture);
        log::debug!("Launching {}", invocation.command_line());

        let spinner = self
            .progress_manager
            .create_spinner(&format!("NetworkMiner is carving {}", capture.display()));
        let started = Instant::now();
        let outcome = self.invoker.invoke(&invocation);

        match outcome.diagnostic {
            Some(ref diagnostic) => {
                spinner.abandon_with_message("NetworkMiner did not finish cleanly");
                self.output_formatter
                    .warning(&format!("NetworkMiner did not finish cleanly: {}", diagnostic));
            }
            None => ui::progress::finish_progress_with_summary(
                &spinner,
                "NetworkMiner finished",
                started.elapsed(),
            ),
        }

        Ok(outcome.diagnostic)
    }

    fn discover_files(&self) -> Result<Vec<ExtractedFile>> {
        let scanner = CarvedFileScanner::new(&self.config.scan);
        let files = scanner.scan_directory(&self.config.tools.extraction_dir)?;

        for file in &files {
            self.output_formatter.debug(&file.display_path());
        }

        Ok(files)
    }

    fn run_pass(
        &self,
        announcement: &str,
        collaborator: &Collaborator,
        files: &[ExtractedFile],
        value_field: &str,
    ) -> (ReportCollection, CollectionProgress) {
        self.output_formatter.start_operation(announcement);

        let file_progress = self
            .progress_manager
            .create_file_progress(files.len() as u64, collaborator.name());
        let progress_callback = {
            let pb = file_progress.clone();
            move |progress: &CollectionProgress| {
                ui::progress::update_collection_progress(&pb, progress);
            }
        };

        let collector = ReportCollector::new(self.invoker.as_ref(), collaborator);
        let (reports, progress) = collector.collect(files, value_field, Some(&progress_callback));

        ui::progress::finish_progress_with_summary(
            &file_progress,
            &format!("{} processed {} files", collaborator.name(), progress.files_processed),
            progress.elapsed(),
        );

        (reports, progress)
    }

    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)
            .map_err(|e| TriAnalyzeError::filesystem(output_path.as_ref(), e))?;
        Ok(())
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    pub fn handle_error(&self, error: &TriAnalyzeError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
