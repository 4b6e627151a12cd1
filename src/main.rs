use clap::Parser;
use orders_dashboard::config::cli::LogFormat;
use orders_dashboard::utils::{logger, validation::Validate};
use orders_dashboard::{select_source, CliConfig, DashboardEngine, DashboardError, LocalStorage};

#[tokio::main]
async fn main() {
    let config = CliConfig::parse();

    // 初始化日誌
    match config.log_format {
        LogFormat::Compact => logger::init_cli_logger(config.verbose),
        LogFormat::Json => logger::init_json_logger(),
    }

    tracing::info!("Starting orders-dashboard");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = run(&config).await {
        tracing::error!(
            "❌ Dashboard failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }
}

async fn run(config: &CliConfig) -> Result<(), DashboardError> {
    config.validate()?;
    let settings = config.load_settings()?;

    // 模式只在啟動時解析一次
    let mode = config.resolve_mode();
    tracing::info!("Data mode: {}", mode);

    let source = select_source(mode, &settings).await?;

    let mut engine = DashboardEngine::new(source, LocalStorage::new("."), settings.page.clone())
        .with_monitoring(config.monitor);
    if let Some(path) = &settings.output.html_path {
        engine = engine.with_html_output(path.clone());
    }

    let output = engine.run().await?;
    print!("{}", output.text);
    if let Some(path) = output.html_path {
        println!();
        println!("📁 HTML page saved to: {}", path);
    }

    Ok(())
}
