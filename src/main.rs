use clap::Parser;
use quote_ranker::domain::ports::ConfigProvider;
use quote_ranker::utils::error::report_failure;
use quote_ranker::utils::{logger, validation::Validate};
use quote_ranker::{CliConfig, LocalStorage, ReportEngine};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting quote-ranker");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!(
        "Generating {} report for {} from {}",
        config.report_mode(),
        config.date,
        config.data
    );

    // Relative paths resolve against the working directory.
    let storage = LocalStorage::new(".".to_string());
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
