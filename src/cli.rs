use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::export::ExportFormat;
use crate::session::CleanupPolicy;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "trianalyze")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Carve office documents from a packet capture and merge their OLE and metadata reports")]
#[command(
    long_about = "TriAnalyze runs a network file carver against a packet capture, feeds every \
                  recovered .doc/.xls/.docx/.xlsx file to an OLE stream dumper and a metadata \
                  extractor, and merges both outputs into a single CSV, JSON or Excel report."
)]
#[command(after_help = "EXAMPLES:\n  \
    trianalyze --pcap traffic.pcap\n  \
    trianalyze -p traffic.pcap -f excel -o reports\n  \
    trianalyze -p traffic.pcap -f json --cleanup discard\n  \
    trianalyze --generate-config --config trianalyze.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    /// Path to the pcap file
    #[arg(short, long, required_unless_present = "generate_config")]
    pub pcap: Option<PathBuf>,

    /// Output format (excel, csv, json)
    #[arg(short, long, value_parser = parse_export_format)]
    pub format: Option<ExportFormat>,

    /// Directory for the results file (default: Output)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Directory the carver writes recovered files to
    #[arg(long)]
    pub extraction_dir: Option<PathBuf>,

    /// What to do with the extracted files afterwards
    #[arg(long, value_enum)]
    pub cleanup: Option<CleanupPolicy>,

    /// Format of progress messages on the terminal
    #[arg(long, value_enum, default_value_t = MessageFormat::Human)]
    pub message_format: MessageFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Show the planned invocations without running anything
    #[arg(long)]
    pub dry_run: bool,

    /// Generate sample configuration file
    #[arg(long, help = "Generate a sample configuration file")]
    pub generate_config: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum MessageFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        let overrides = self.create_cli_overrides();
        config.merge_with_cli_args(&overrides);
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_output_dir(self.output.clone())
            .with_format(self.format)
            .with_cleanup(self.cleanup)
            .with_extraction_dir(self.extraction_dir.clone())
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }

    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "trianalyze=error";
        }

        match self.verbosity_level() {
            0 => "trianalyze=warn",
            1 => "trianalyze=info",
            _ => "trianalyze=debug",
        }
    }
}

pub fn parse_export_format(s: &str) -> std::result::Result<ExportFormat, String> {
    ExportFormat::parse(s).map_err(|_| {
        format!(
            "invalid output format '{}' (expected one of: excel, csv, json)",
            s
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "trianalyze",
            "-p",
            "capture.pcap",
            "-f",
            "excel",
            "-o",
            "reports",
            "--cleanup",
            "keep",
        ])
        .unwrap();

        assert_eq!(cli.pcap, Some(PathBuf::from("capture.pcap")));
        assert_eq!(cli.format, Some(ExportFormat::Excel));
        assert_eq!(cli.output, Some(PathBuf::from("reports")));
        assert_eq!(cli.cleanup, Some(CleanupPolicy::Keep));
    }

    #[test]
    fn test_defaults_come_from_config() {
        let cli = Cli::try_parse_from(["trianalyze", "--pcap", "capture.pcap"]).unwrap();
        assert!(cli.format.is_none());

        let overrides = cli.create_cli_overrides();
        let mut config = Config::default();
        config.merge_with_cli_args(&overrides);

        assert_eq!(config.output.format, ExportFormat::Csv);
        assert_eq!(config.output.directory, PathBuf::from("Output"));
    }

    #[test]
    fn test_pcap_is_required() {
        assert!(Cli::try_parse_from(["trianalyze", "-f", "csv"]).is_err());
        assert!(Cli::try_parse_from(["trianalyze", "--generate-config"]).is_ok());
    }

    #[test]
    fn test_invalid_format_rejected() {
        let result = Cli::try_parse_from(["trianalyze", "-p", "capture.pcap", "-f", "xml"]);
        assert!(result.is_err());
        assert!(parse_export_format("xml").unwrap_err().contains("excel, csv, json"));
    }

    #[test]
    fn test_log_filter() {
        let cli = Cli::try_parse_from(["trianalyze", "-p", "c.pcap", "-vv"]).unwrap();
        assert_eq!(cli.log_filter(), "trianalyze=debug");

        let cli = Cli::try_parse_from(["trianalyze", "-p", "c.pcap", "-q"]).unwrap();
        assert_eq!(cli.log_filter(), "trianalyze=error");

        let cli = Cli::try_parse_from(["trianalyze", "-p", "c.pcap"]).unwrap();
        assert_eq!(cli.log_filter(), "trianalyze=warn");
    }
}
