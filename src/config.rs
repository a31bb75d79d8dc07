use crate::error::{Result, TriAnalyzeError};
use crate::export::ExportFormat;
use crate::session::CleanupPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub tools: ToolsConfig,
    pub scan: ScanConfig,
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ToolsConfig {
    /// Directory the carver deposits recovered files into.
    pub extraction_dir: PathBuf,
    pub carver: CollaboratorSpec,
    pub ole_dump: CollaboratorSpec,
    pub metadata: CollaboratorSpec,
}

/// How to launch one external collaborator. The target file path is
/// appended after `args`.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CollaboratorSpec {
    pub program: PathBuf,
    #[serde(default)]
    pub args: Vec<String>,
    /// Send a single newline on stdin. Unset means "detect from the program
    /// name" (the `-k` build of the metadata tool waits for a keypress).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acknowledge_prompt: Option<bool>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScanConfig {
    pub extensions: Vec<String>,
    pub case_sensitive: bool,
    pub max_depth: usize,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub format: ExportFormat,
    pub cleanup: CleanupPolicy,
}

impl Default for ToolsConfig {
    fn default() -> Self {
        Self {
            extraction_dir: PathBuf::from("netminercli").join("AssembledFiles"),
            carver: CollaboratorSpec::new(PathBuf::from("netminercli").join("NetworkMinerCLI.exe")),
            ole_dump: CollaboratorSpec::new("python")
                .with_args(vec![PathBuf::from("oledump")
                    .join("oledump.py")
                    .to_string_lossy()
                    .to_string()]),
            metadata: CollaboratorSpec::new(PathBuf::from("exiftool").join("exiftool.exe")),
        }
    }
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: vec![
                "doc".to_string(),
                "xls".to_string(),
                "docx".to_string(),
                "xlsx".to_string(),
            ],
            case_sensitive: false,
            max_depth: 64,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("Output"),
            format: ExportFormat::default(),
            cleanup: CleanupPolicy::default(),
        }
    }
}

impl CollaboratorSpec {
    pub fn new<P: Into<PathBuf>>(program: P) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            acknowledge_prompt: None,
        }
    }

    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_acknowledge_prompt(mut self, acknowledge: bool) -> Self {
        self.acknowledge_prompt = Some(acknowledge);
        self
    }

    pub fn needs_acknowledgement(&self) -> bool {
        match self.acknowledge_prompt {
            Some(explicit) => explicit,
            None => self
                .program
                .file_name()
                .map(|name| name.to_string_lossy().contains("-k"))
                .unwrap_or(false),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(TriAnalyzeError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| TriAnalyzeError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| TriAnalyzeError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["trianalyze.toml", ".trianalyze.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref output_dir) = cli_args.output_dir {
            self.output.directory = output_dir.clone();
        }

        if let Some(format) = cli_args.format {
            self.output.format = format;
        }

        if let Some(cleanup) = cli_args.cleanup {
            self.output.cleanup = cleanup;
        }

        if let Some(ref extraction_dir) = cli_args.extraction_dir {
            self.tools.extraction_dir = extraction_dir.clone();
        }
    }

    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let content = toml::to_string_pretty(self).map_err(|e| TriAnalyzeError::Config {
            message: format!("Failed to serialize config: {}", e),
        })?;

        std::fs::write(path, content).map_err(|e| TriAnalyzeError::Config {
            message: format!("Failed to write config file {}: {}", path.display(), e),
        })?;

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan.extensions.is_empty() {
            return Err(TriAnalyzeError::Config {
                message: "At least one file extension must be specified".to_string(),
            });
        }

        if self
            .scan
            .extensions
            .iter()
            .any(|ext| ext.trim_start_matches('.').is_empty())
        {
            return Err(TriAnalyzeError::Config {
                message: "File extensions must not be empty".to_string(),
            });
        }

        if self.scan.max_depth == 0 {
            return Err(TriAnalyzeError::Config {
                message: "Maximum directory depth must be greater than 0".to_string(),
            });
        }

        for (name, spec) in [
            ("carver", &self.tools.carver),
            ("ole_dump", &self.tools.ole_dump),
            ("metadata", &self.tools.metadata),
        ] {
            if spec.program.as_os_str().is_empty() {
                return Err(TriAnalyzeError::Config {
                    message: format!("tools.{}.program must not be empty", name),
                });
            }
        }

        if self.tools.extraction_dir.as_os_str().is_empty() {
            return Err(TriAnalyzeError::Config {
                message: "tools.extraction_dir must not be empty".to_string(),
            });
        }

        // The report must survive a discard of the extraction directory.
        let output = &self.output.directory;
        let extraction = &self.tools.extraction_dir;
        if output.starts_with(extraction) || extraction.starts_with(output) {
            return Err(TriAnalyzeError::Config {
                message: format!(
                    "Output directory {} and extraction directory {} must not contain each other",
                    output.display(),
                    extraction.display()
                ),
            });
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let sample_config = Self::default();
        toml::to_string_pretty(&sample_config).unwrap_or_else(|_| String::new())
    }
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub output_dir: Option<PathBuf>,
    pub format: Option<ExportFormat>,
    pub cleanup: Option<CleanupPolicy>,
    pub extraction_dir: Option<PathBuf>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_output_dir(mut self, output_dir: Option<PathBuf>) -> Self {
        self.output_dir = output_dir;
        self
    }

    pub fn with_format(mut self, format: Option<ExportFormat>) -> Self {
        self.format = format;
        self
    }

    pub fn with_cleanup(mut self, cleanup: Option<CleanupPolicy>) -> Self {
        self.cleanup = cleanup;
        self
    }

    pub fn with_extraction_dir(mut self, extraction_dir: Option<PathBuf>) -> Self {
        self.extraction_dir = extraction_dir;
        self
    }
}
