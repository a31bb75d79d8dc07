use crate::error::{TriAnalyzeError, UserFriendlyError};
use crate::AnalysisReport;
use console::{style, Emoji, StyledObject, Term};
use serde_json::{json, Value};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OutputMode {
    Human,
    Json,
    Plain,
}

static CHECKMARK: Emoji = Emoji("✅ ", "✓ ");
static CROSS: Emoji = Emoji("❌ ", "✗ ");
static INFO: Emoji = Emoji("ℹ️  ", "i ");
static WARNING: Emoji = Emoji("⚠️  ", "! ");
static ROCKET: Emoji = Emoji("🚀 ", "> ");
static DEBUG: Emoji = Emoji("   ", "  ");

#[derive(Debug, Clone, Copy, PartialEq)]
enum Level {
    Step,
    Success,
    Info,
    Warning,
    Error,
    Debug,
}

impl Level {
    fn label(self) -> &'static str {
        match self {
            Level::Step => "step",
            Level::Success => "success",
            Level::Info => "info",
            Level::Warning => "warning",
            Level::Error => "error",
            Level::Debug => "debug",
        }
    }

    fn emoji(self) -> &'static Emoji<'static, 'static> {
        match self {
            Level::Step => &ROCKET,
            Level::Success => &CHECKMARK,
            Level::Info => &INFO,
            Level::Warning => &WARNING,
            Level::Error => &CROSS,
            Level::Debug => &DEBUG,
        }
    }

    fn paint(self, message: &str) -> StyledObject<&str> {
        match self {
            Level::Step => style(message).bold(),
            Level::Success => style(message).green().bold(),
            Level::Info => style(message).cyan(),
            Level::Warning => style(message).yellow().bold(),
            Level::Error => style(message).red().bold(),
            Level::Debug => style(message).dim(),
        }
    }

    /// Lowest verbosity at which the level is shown; errors always are.
    fn min_verbosity(self) -> u8 {
        match self {
            Level::Step | Level::Success | Level::Error => 0,
            Level::Info | Level::Warning => 1,
            Level::Debug => 2,
        }
    }
}

/// Operator-facing messages in human, JSON-lines or plain form.
pub struct OutputFormatter {
    mode: OutputMode,
    use_colors: bool,
    verbose_level: u8,
    quiet: bool,
}

impl OutputFormatter {
    pub fn new(mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let use_colors = mode == OutputMode::Human && !quiet && Term::stdout().features().colors_supported();

        Self {
            mode,
            use_colors,
            verbose_level: if quiet { 0 } else { verbose.max(1) },
            quiet,
        }
    }

    pub fn mode(&self) -> OutputMode {
        self.mode
    }

    pub fn start_operation(&self, operation: &str) {
        self.emit(Level::Step, operation);
    }

    pub fn success(&self, message: &str) {
        self.emit(Level::Success, message);
    }

    pub fn info(&self, message: &str) {
        self.emit(Level::Info, message);
    }

    pub fn warning(&self, message: &str) {
        self.emit(Level::Warning, message);
    }

    pub fn error(&self, message: &str) {
        self.emit(Level::Error, message);
    }

    pub fn debug(&self, message: &str) {
        self.emit(Level::Debug, message);
    }

    /// Error line plus the remediation hint, both on stderr outside JSON mode.
    pub fn print_user_friendly_error(&self, error: &TriAnalyzeError) {
        self.error(&error.user_message());

        let Some(suggestion) = error.suggestion() else {
            return;
        };
        match self.mode {
            OutputMode::Json => print_json(&json!({ "type": "suggestion", "message": suggestion })),
            OutputMode::Human if self.use_colors => {
                eprintln!("{}{}", INFO, style(format!("Suggestion: {}", suggestion)).cyan())
            }
            _ => eprintln!("Suggestion: {}", suggestion),
        }
    }

    pub fn print_analysis_report(&self, report: &AnalysisReport) {
        match self.mode {
            OutputMode::Json => {
                let mut value = serde_json::to_value(report).unwrap_or_else(|_| json!({}));
                if let Some(object) = value.as_object_mut() {
                    object.insert("type".to_string(), json!("report"));
                }
                print_json(&value);
            }
            OutputMode::Human | OutputMode::Plain if !self.quiet => self.print_text_report(report),
            _ => {}
        }
    }

    pub fn print_separator(&self) {
        if self.quiet || self.mode == OutputMode::Json {
            return;
        }
        if self.use_colors {
            println!("{}", style("─".repeat(60)).dim());
        } else {
            println!("{}", "-".repeat(60));
        }
    }

    fn emit(&self, level: Level, message: &str) {
        if level != Level::Error && (self.quiet || self.verbose_level < level.min_verbosity()) {
            return;
        }

        let to_stderr = level == Level::Error;
        let line = match self.mode {
            OutputMode::Json => {
                return print_json(&json!({
                    "type": "message",
                    "level": level.label(),
                    "message": message,
                    "timestamp": chrono::Utc::now().to_rfc3339()
                }));
            }
            OutputMode::Plain => format!("{}: {}", level.label().to_uppercase(), message),
            OutputMode::Human if self.use_colors => format!("{}{}", level.emoji(), level.paint(message)),
            OutputMode::Human => format!("{}{}", level.emoji(), message),
        };

        if to_stderr {
            eprintln!("{}", line);
        } else {
            println!("{}", line);
        }
    }

    fn print_text_report(&self, report: &AnalysisReport) {
        let highlight = |value: String| {
            if self.use_colors {
                style(value).cyan().bold().to_string()
            } else {
                value
            }
        };

        println!();
        println!("Analysis report");
        println!("  Capture:          {}", report.capture.display());
        println!("  Files analyzed:   {}", highlight(report.files_discovered.to_string()));
        println!("  Rows exported:    {}", highlight(report.artifact.rows.to_string()));
        println!("  Report:           {}", highlight(report.artifact.path.display().to_string()));
        println!("  Time taken:       {}", super::progress::format_duration(report.duration));

        let warnings = report.warnings();
        if !warnings.is_empty() {
            println!();
            println!("Collaborator issues ({}):", warnings.len());
            for warning in warnings.iter().take(self.issue_limit()) {
                println!("  - {}", warning);
            }
            if warnings.len() > self.issue_limit() {
                println!("  ... {} more (use -vv to list all)", warnings.len() - self.issue_limit());
            }
        }

        self.print_separator();
    }

    fn issue_limit(&self) -> usize {
        if self.verbose_level >= 2 {
            usize::MAX
        } else {
            10
        }
    }
}

fn print_json(value: &Value) {
    println!("{}", serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string()));
}
