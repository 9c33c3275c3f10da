use anyhow::Context;
use chrono::NaiveDate;
use clap::Parser;
use quote_ranker::config::toml_config::{LogFormat, TomlConfig};
use quote_ranker::domain::model::ReportMode;
use quote_ranker::domain::ports::ConfigProvider;
use quote_ranker::utils::error::report_failure;
use quote_ranker::utils::{logger, validation::Validate};
use quote_ranker::{LocalStorage, ReportEngine};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Quote report driven by a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "quote-report.toml")]
    config: String,

    /// Override the report date from config (YYYY-MM-DD)
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Override the report mode from config
    #[arg(long, value_enum)]
    mode: Option<ReportMode>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Show the resolved configuration and check the snapshot without writing output
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    let level = if args.verbose {
        "debug"
    } else {
        config.log_level()
    };
    logger::init_with_level(level, config.log_format() == LogFormat::Json);

    tracing::info!("🚀 Starting TOML-based quote report");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    if let Some(date) = args.date {
        config.report.date = Some(date);
        tracing::info!("🔧 Report date overridden to: {}", date);
    }
    if let Some(mode) = args.mode {
        config.report.mode = Some(mode);
        tracing::info!("🔧 Report mode overridden to: {}", mode);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    display_config_summary(&config, &args);

    let storage = LocalStorage::new(".".to_string());

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - no report will be written");
        let engine = ReportEngine::new(storage, config);
        let snapshot = engine
            .load_snapshot()
            .await
            .context("snapshot failed to load")?;
        println!("🔍 Dry Run Analysis:");
        println!("  Products: {}", snapshot.products.len());
        println!("  Stores: {}", snapshot.stores.len());
        println!("  Quotes: {}", snapshot.quotes.len());
        println!("  Prescriptions: {}", snapshot.prescriptions.len());
        println!("✅ Snapshot is valid.");
        return Ok(());
    }

    let engine = ReportEngine::new(storage, config);

    match engine.run().await {
        Ok(report) => {
            print!("{}", report);
        }
        Err(e) => {
            let exit_code = report_failure(&e);
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    eprintln!("📋 Configuration Summary:");
    eprintln!(
        "  Snapshot: {} ({:?})",
        config.data_path(),
        config.snapshot_format()
    );
    if let Some(date) = config.report_date() {
        eprintln!("  Date: {}", date);
    }
    eprintln!("  Mode: {}", config.report_mode());
    eprintln!("  Unit matching: {:?}", config.unit_matching());
    eprintln!("  Currency: {}", config.currency_symbol());
    if let Some(output) = config.output_path() {
        eprintln!("  Output: {}", output);
    }

    if args.dry_run {
        eprintln!("  🔍 DRY RUN MODE ENABLED");
    }

    eprintln!();
}
