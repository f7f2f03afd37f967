//! calreport - Weekly progress reports from tagged calendar events

use calreport::{
    cli::{Cli, Command, resolve_ranges},
    config::Config,
    error::Result,
    fetch::get_events,
    output::{Summary, get_formatter},
    report::{ReportAssembler, generate_report},
    timezone::TimezoneConfig,
};
use calreport_provider_json::DataLoader;
use chrono::Utc;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Merge command-line flags over the loaded configuration
fn apply_cli_overrides(config: &mut Config, cli: &Cli) {
    if let Some(events) = &cli.events {
        config.events = Some(events.clone());
    }
    if let Some(dir) = &cli.reports_dir {
        config.reports_dir = Some(dir.clone());
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging. --quiet and --verbose override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else if cli.verbose {
        tracing_subscriber::EnvFilter::new(
            "calreport=debug,calreport_core=debug,calreport_provider_json=debug",
        )
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("calreport=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, &cli);

    let tz_config =
        TimezoneConfig::resolve(cli.timezone.as_deref(), config.timezone.as_deref(), cli.utc)?;
    info!(
        "Using timezone: {} (from {:?})",
        tz_config.display_name(),
        tz_config.source
    );

    let now = Utc::now().with_timezone(&tz_config.tz).naive_local();
    let today = cli.today(now.date())?;
    let ranges = resolve_ranges(cli.command.as_ref(), today)?;
    let classifier = config.classifier();

    match &cli.command {
        Some(Command::Summary(args)) => {
            let source = DataLoader::new(config.require_events()?)?;
            let formatter = get_formatter(args.json, is_terminal::is_terminal(std::io::stdout()));

            for range in &ranges {
                let events = get_events(&source, range, &tz_config.tz, &classifier).await?;
                let summary = Summary::build(&events, range, &config.targets);
                println!("{}", formatter.format_summary(&summary));
            }
        }
        _ => {
            // Configuration problems surface before anything is fetched
            let reports_dir = config.require_reports_dir()?;
            let source = DataLoader::new(config.require_events()?)?;
            let assembler = ReportAssembler::new(config.targets);

            for range in &ranges {
                println!(
                    "Generating report for {} to {}",
                    range.start().format("%m/%d/%Y"),
                    range.end().format("%m/%d/%Y")
                );
                let report =
                    generate_report(&source, &classifier, &assembler, range, &tz_config.tz, now)
                        .await?;
                let path = report.write_to_dir(reports_dir)?;
                println!("Saved {}", path.display());
            }
        }
    }

    Ok(())
}
