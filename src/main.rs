use clap::Parser;
use slot_notifier::config::{location_from, preferences_from};
use slot_notifier::core::{ConfigProvider, Notifier};
use slot_notifier::utils::error::{ErrorSeverity, SlotError};
use slot_notifier::utils::{logger, validation::Validate};
use slot_notifier::{
    CliConfig, CowinClient, LogNotifier, Orchestrator, SmtpNotifier, WatchConfig, WebhookNotifier,
};
use std::time::Duration;

fn exit_with(e: &SlotError) -> ! {
    tracing::error!("❌ {} (Severity: {:?})", e, e.severity());
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    let exit_code = match e.severity() {
        ErrorSeverity::Low | ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn build_notifier(config: &dyn ConfigProvider) -> Result<Box<dyn Notifier>, SlotError> {
    let timeout = Duration::from_secs(config.request_timeout_secs());

    if let Some(url) = config.webhook_url() {
        if config.email().is_some() {
            tracing::warn!("Both webhook and email are configured, using the webhook");
        }
        return Ok(Box::new(WebhookNotifier::new(url, timeout)?));
    }

    if let Some(email) = config.email() {
        let notifier = SmtpNotifier::new(
            config.smtp_host(),
            config.smtp_port(),
            email,
            config.smtp_password().unwrap_or_default(),
            timeout,
        )?;
        return Ok(Box::new(notifier));
    }

    tracing::warn!("No webhook or email configured, notifications will only be logged");
    Ok(Box::new(LogNotifier))
}

async fn run(config: &dyn ConfigProvider) -> Result<(), SlotError> {
    let prefs = preferences_from(config)?;
    let location = location_from(config);

    let client = CowinClient::new(
        config.base_url(),
        Duration::from_secs(config.request_timeout_secs()),
    )?;
    let notifier = build_notifier(config)?;
    let mut orchestrator = Orchestrator::new(client.clone(), client, notifier);

    tracing::info!(
        "🔍 Watching {} / {} for dose {} slots, age {} (every {}s)",
        location.state,
        location.district,
        prefs.dose,
        prefs.age,
        config.interval_secs()
    );

    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
        tracing::info!("Received Ctrl-C, shutting down");
    };

    orchestrator
        .watch(
            Duration::from_secs(config.interval_secs()),
            prefs.dose,
            &prefs,
            &location,
            shutdown,
        )
        .await
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.json_logs {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }

    tracing::info!("Starting slot-notifier");
    if cli.verbose {
        let mut shown = cli.clone();
        if shown.smtp_password.is_some() {
            shown.smtp_password = Some("***".to_string());
        }
        tracing::debug!("CLI config: {:?}", shown);
    }

    let result = match &cli.config {
        Some(path) => {
            let file_config = match WatchConfig::from_file(path) {
                Ok(config) => config,
                Err(e) => exit_with(&e),
            };
            if let Err(e) = file_config.validate() {
                exit_with(&e);
            }
            run(&file_config).await
        }
        None => {
            if let Err(e) = cli.validate() {
                exit_with(&e);
            }
            run(&cli).await
        }
    };

    if let Err(e) = result {
        exit_with(&e);
    }

    Ok(())
}
