use clap::{Parser, Subcommand, ValueEnum};
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub base_url: String,
    pub token: Option<String>,
    pub timeout_secs: u64,
    pub generate_path: String,
    pub execute_path: String,
    pub databases_path: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct WorkbenchConfig {
    pub max_prompt_chars: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ExportConfig {
    pub dir: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub workbench: WorkbenchConfig,
    pub export: ExportConfig,
}

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CliArgs {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Base URL of the query service
    #[arg(long)]
    pub base_url: Option<String>,

    /// Bearer token for the query service
    #[arg(long)]
    pub token: Option<String>,

    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Database to work against (display name, file name or id from the catalog)
    #[arg(short, long)]
    pub database: Option<String>,

    /// Storage file name to use directly, without consulting the catalog
    #[arg(long, conflicts_with = "database")]
    pub db_file: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List the databases available to this account
    Databases,
    /// Generate SQL for a single question, optionally running it
    Ask {
        /// The natural-language question
        prompt: String,

        /// Execute the generated statement
        #[arg(long)]
        run: bool,

        /// Acknowledge an unsafe verdict so the statement may run
        #[arg(long, requires = "run")]
        acknowledge: bool,

        /// Export the row-set after running
        #[arg(long, value_enum, requires = "run")]
        export: Option<ExportFormat>,
    },
    /// Interactive workbench (default)
    Repl,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }
}

impl AppConfig {
    pub fn new(args: &CliArgs) -> Result<Self, ConfigError> {
        let mut config_builder = Self::defaults()?;

        // Add configuration from file if specified
        if let Some(config_path) = &args.config {
            config_builder = config_builder.add_source(File::from(config_path.as_path()));
        } else {
            // Check for config in default locations
            let default_locations = vec![
                "config.toml",
                "config/config.toml",
                "/etc/sql-workbench/config.toml",
            ];

            for location in default_locations {
                if Path::new(location).exists() {
                    config_builder =
                        config_builder.add_source(File::new(location, config::FileFormat::Toml));
                    break;
                }
            }
        }

        config_builder = config_builder.add_source(Self::environment());

        let mut config: AppConfig = config_builder.build()?.try_deserialize()?;
        config.apply_args(args);

        Ok(config)
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, ConfigError> {
        let defaults = AppConfig::default();
        Config::builder()
            .set_default("api.base_url", defaults.api.base_url)?
            .set_default("api.timeout_secs", defaults.api.timeout_secs as i64)?
            .set_default("api.generate_path", defaults.api.generate_path)?
            .set_default("api.execute_path", defaults.api.execute_path)?
            .set_default("api.databases_path", defaults.api.databases_path)?
            .set_default(
                "workbench.max_prompt_chars",
                defaults.workbench.max_prompt_chars as i64,
            )?
            .set_default("export.dir", defaults.export.dir)
    }

    // SQL_WORKBENCH__API__BASE_URL -> api.base_url
    fn environment() -> Environment {
        Environment::with_prefix("SQL_WORKBENCH").separator("__")
    }

    // Command line flags win over file and environment
    fn apply_args(&mut self, args: &CliArgs) {
        if let Some(base_url) = &args.base_url {
            self.api.base_url = base_url.clone();
        }
        if let Some(token) = &args.token {
            self.api.token = Some(token.clone());
        }
        if let Some(timeout) = args.timeout_secs {
            self.api.timeout_secs = timeout;
        }
        // An empty token in a file or env var means "no token"
        if self.api.token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            self.api.token = None;
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api: ApiConfig {
                base_url: "http://localhost:3000".to_string(),
                token: None,
                timeout_secs: 30,
                generate_path: "api/query/generate".to_string(),
                execute_path: "api/query/execute".to_string(),
                databases_path: "api/dbs".to_string(),
            },
            workbench: WorkbenchConfig {
                max_prompt_chars: 1000,
            },
            export: ExportConfig {
                dir: "exports".to_string(),
            },
        }
    }
}
