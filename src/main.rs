use clap::Parser;
use std::io::{self, Write};
use std::process;
use trianalyze::{Cli, OutputFormatter, OutputMode, TriAnalyze, TriAnalyzeError, UserFriendlyError};

fn main() {
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();
    setup_logging(&cli);

    // Handle special commands first
    if cli.generate_config {
        return handle_generate_config(&cli);
    }

    let triana = match TriAnalyze::from_cli(&cli) {
        Ok(triana) => triana,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    let capture = match cli.pcap {
        Some(ref capture) => capture,
        None => {
            triana.output_formatter().error("A capture file is required (--pcap)");
            return 1;
        }
    };

    if cli.dry_run {
        return handle_dry_run(&triana, capture);
    }

    let report = match triana.analyze(capture) {
        Ok(report) => report,
        Err(e) => {
            triana.handle_error(&e);
            return exit_code_for(&e);
        }
    };

    triana.output_formatter().print_analysis_report(&report);

    let stdin = io::stdin();
    let mut prompt_out = prompt_destination(triana.output_formatter().mode());
    match triana.finish_session(&mut stdin.lock(), &mut prompt_out) {
        Ok(_) => 0,
        Err(e) => {
            triana.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

/// JSON mode keeps stdout to one object per line, so the prompt goes to
/// stderr there.
fn prompt_destination(mode: OutputMode) -> Box<dyn Write> {
    match mode {
        OutputMode::Json => Box::new(io::stderr()),
        OutputMode::Human | OutputMode::Plain => Box::new(io::stdout()),
    }
}

fn exit_code_for(error: &TriAnalyzeError) -> i32 {
    match error {
        TriAnalyzeError::Config { .. } | TriAnalyzeError::UnsupportedFormat { .. } => 2,
        TriAnalyzeError::MissingCapture { .. } => 3,
        TriAnalyzeError::MergePrecondition { .. } => 4,
        TriAnalyzeError::Filesystem { .. } | TriAnalyzeError::Io(_) => 5,
        TriAnalyzeError::Export { .. }
        | TriAnalyzeError::Csv(_)
        | TriAnalyzeError::Xlsx(_)
        | TriAnalyzeError::Json(_) => 6,
    }
}

fn handle_generate_config(cli: &Cli) -> i32 {
    let config_path = cli
        .config
        .as_ref()
        .map(|p| p.to_string_lossy().to_string())
        .unwrap_or_else(|| "trianalyze.toml".to_string());

    match TriAnalyze::generate_sample_config(&config_path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", config_path);
            println!("\nTo use this configuration:");
            println!("  trianalyze --pcap <capture> --config {}", config_path);
            println!("\nEdit the tool paths to match your installation.");
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            exit_code_for(&e)
        }
    }
}

fn handle_dry_run(triana: &TriAnalyze, capture: &std::path::Path) -> i32 {
    let formatter = triana.output_formatter();

    formatter.info("DRY RUN MODE - No tools will be launched");
    formatter.print_separator();

    if capture.is_file() {
        formatter.success(&format!("Capture file found: {}", capture.display()));
    } else {
        formatter.error(&format!("Capture file not found: {}", capture.display()));
        return 3;
    }

    formatter.info("Configuration that would be used:");
    let config = triana.config();

    println!("  Extraction directory: {}", config.tools.extraction_dir.display());
    println!("  Extensions: {}", config.scan.extensions.join(", "));
    println!("  Case sensitive: {}", config.scan.case_sensitive);
    println!("  Output directory: {}", config.output.directory.display());
    println!("  Output format: {}", config.output.format);
    println!("  Cleanup: {:?}", config.output.cleanup);

    formatter.print_separator();
    formatter.info("Planned invocations:");
    for command_line in triana.planned_invocations(capture) {
        println!("  {}", command_line);
    }

    formatter.print_separator();
    formatter.success("Dry run completed successfully");
    formatter.info("Run without --dry-run to perform the analysis");

    0
}

fn print_startup_error(error: &TriAnalyzeError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging(cli: &Cli) {
    let env = env_logger::Env::default().default_filter_or(cli.log_filter());
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp_secs()
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use trianalyze::Config;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let cli = Cli::try_parse_from([
            PathBuf::from("trianalyze"),
            PathBuf::from("--generate-config"),
            PathBuf::from("--config"),
            config_path.clone(),
        ])
        .unwrap();

        let exit_code = handle_generate_config(&cli);
        assert_eq!(exit_code, 0);

        let content = fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[scan]"));
        assert!(Config::load_from_file(&config_path).is_ok());
    }

    #[test]
    fn test_dry_run_mode() {
        let temp_dir = TempDir::new().unwrap();
        let capture = temp_dir.path().join("traffic.pcap");
        fs::write(&capture, b"pcap").unwrap();

        let mut config = Config::default();
        config.tools.extraction_dir = temp_dir.path().join("AssembledFiles");
        config.output.directory = temp_dir.path().join("Output");
        let triana = TriAnalyze::new(config, OutputMode::Plain, 0, true);

        assert_eq!(handle_dry_run(&triana, &capture), 0);
        assert!(!temp_dir.path().join("Output").exists());
        assert!(!temp_dir.path().join("AssembledFiles").exists());
    }

    #[test]
    fn test_dry_run_missing_capture() {
        let triana = TriAnalyze::new(Config::default(), OutputMode::Plain, 0, true);
        assert_eq!(handle_dry_run(&triana, std::path::Path::new("missing.pcap")), 3);
    }

    #[test]
    fn test_exit_codes() {
        let missing = TriAnalyzeError::MissingCapture {
            path: PathBuf::from("missing.pcap"),
        };
        assert_eq!(exit_code_for(&missing), 3);

        let format = TriAnalyzeError::UnsupportedFormat {
            format: "xml".to_string(),
        };
        assert_eq!(exit_code_for(&format), 2);

        let merge = TriAnalyzeError::MergePrecondition {
            collection: "Oledump_Output".to_string(),
            expected: "File".to_string(),
        };
        assert_eq!(exit_code_for(&merge), 4);
    }
}
