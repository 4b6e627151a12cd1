use crate::config::mode::DataMode;
use crate::config::toml_config::DashboardSettings;
use crate::utils::error::Result;
use crate::utils::validation::{self, Validate};
use clap::{Parser, ValueEnum};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Compact,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "orders-dashboard")]
#[command(about = "Show the latest orders and customers from the warehouse or mock files")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Data source; overrides the USE_MOCK_DATA environment flag
    #[arg(long)]
    pub mode: Option<DataMode>,

    /// Also write the dashboard as a static HTML page
    #[arg(long)]
    pub html: Option<String>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log process CPU and memory usage")]
    pub monitor: bool,

    #[arg(long, value_enum, default_value = "compact")]
    pub log_format: LogFormat,
}

impl CliConfig {
    /// The explicit `--mode` wins; otherwise the environment flag decides.
    pub fn resolve_mode(&self) -> DataMode {
        self.mode.unwrap_or_else(DataMode::from_env)
    }

    /// Loads the config file (or defaults) and applies command line overrides.
    pub fn load_settings(&self) -> Result<DashboardSettings> {
        let mut settings = match &self.config {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path);
                DashboardSettings::from_file(path)?
            }
            None => DashboardSettings::default(),
        };

        if let Some(html) = &self.html {
            settings.output.html_path = Some(html.clone());
        }

        // [connection] 留到 live 模式開 session 時才驗證
        settings.validate()?;
        Ok(settings)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(path) = &self.config {
            validation::validate_path("config", path)?;
        }
        if let Some(path) = &self.html {
            validation::validate_path("html", path)?;
        }
        Ok(())
    }
}
