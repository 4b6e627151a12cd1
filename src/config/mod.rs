#[cfg(feature = "cli")]
pub mod cli;
pub mod mode;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use mode::DataMode;
pub use toml_config::{
    ConnectionConfig, DashboardSettings, MockConfig, OutputConfig, PageConfig, TokenType,
};
