use clap::Parser;
use moderation_pipeline::utils::{logger, validation::Validate};
use moderation_pipeline::web::{self, AppState};
use moderation_pipeline::{Cli, ModerationPipeline, PipelineEngine, ScoringClient, TranslationClient};
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting moderation-pipeline");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = match cli.load_settings() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("❌ Failed to load configuration: {}", e);
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    web::metrics::install();

    match (&cli.input, &cli.output) {
        (Some(input), Some(output)) => run_once(&settings, cli.monitor, input, output).await,
        _ => {
            let state = AppState::from_settings(&settings, cli.monitor);
            let listener = TcpListener::bind(&settings.server.bind).await?;
            web::serve(listener, state).await?;
            Ok(())
        }
    }
}

async fn run_once(
    settings: &moderation_pipeline::Settings,
    monitor: bool,
    input: &str,
    output: &str,
) -> anyhow::Result<()> {
    let translator = TranslationClient::new(
        settings.clients.translation_url.clone(),
        settings.clients.retry.clone(),
        settings.circuit_breaker.clone(),
        &settings.cache,
    );
    let scorer = ScoringClient::new(
        settings.clients.scoring_url.clone(),
        settings.clients.retry.clone(),
        settings.circuit_breaker.clone(),
        &settings.cache,
    );
    let pipeline = ModerationPipeline::new(translator, scorer, settings.processing.concurrency);
    let engine = PipelineEngine::new_with_monitoring(pipeline, monitor);

    match engine.run(input, output).await {
        Ok(report) => {
            println!("✅ Moderation pipeline completed successfully!");
            println!(
                "📈 {} processed, {} failed, {} unique users",
                report.processed, report.failed, report.unique_users
            );
            println!("📁 Output saved to: {}", output);
            Ok(())
        }
        Err(e) => {
            tracing::error!(
                "❌ Pipeline failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                moderation_pipeline::utils::error::ErrorSeverity::Low => 0,
                moderation_pipeline::utils::error::ErrorSeverity::Medium => 2,
                moderation_pipeline::utils::error::ErrorSeverity::High => 1,
                moderation_pipeline::utils::error::ErrorSeverity::Critical => 3,
            };
            if exit_code > 0 {
                std::process::exit(exit_code);
            }
            Ok(())
        }
    }
}
