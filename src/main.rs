//! campstat - Production change reports for pMp campaigns

use campstat::{
    cli::{Cli, parse_anchor},
    error::{CampstatError, Result},
    output::ReportWriter,
    pipeline::{RunOptions, run},
    timezone::TimezoneConfig,
    windows::{BoundaryGenerator, Window},
};
use campstat_pdmv::{PdmvClient, PdmvConfig};
use chrono::{DateTime, Datelike, TimeZone};
use chrono_tz::Tz;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// The instant windows are anchored on: `--anchor` if given, otherwise now
fn anchor_time(cli: &Cli, tz_config: &TimezoneConfig) -> Result<DateTime<Tz>> {
    match &cli.anchor {
        Some(value) => {
            let local = parse_anchor(value)?;
            tz_config
                .tz
                .from_local_datetime(&local)
                .earliest()
                .ok_or_else(|| {
                    CampstatError::InvalidDate(format!(
                        "{local} does not exist in {}",
                        tz_config.display_name()
                    ))
                })
        }
        None => Ok(tz_config.now()),
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // The --quiet flag should override RUST_LOG
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            tracing_subscriber::EnvFilter::new(
                "campstat=info,campstat_core=info,campstat_pdmv=info",
            )
        })
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let tz_config = TimezoneConfig::from_cli(cli.timezone.as_deref(), cli.utc)?;
    info!("Using timezone: {}", tz_config.display_name());

    let now = anchor_time(&cli, &tz_config)?;
    info!("Anchoring windows at {}", now);

    let source = PdmvClient::new(PdmvConfig {
        mcm_url: cli.mcm_url.clone(),
        pmp_url: cli.pmp_url.clone(),
        granularity: cli.granularity,
    })?;
    let writer = ReportWriter::create(&cli.output_dir)?;

    let show_progress = !cli.quiet && is_terminal::is_terminal(std::io::stdout());
    let options = RunOptions::new(Window::default_set(now.year(), cli.years))
        .with_sample_size(cli.sample())
        .with_progress(show_progress);

    let summary = run(&source, &BoundaryGenerator::new(now), &writer, &options).await?;
    info!(
        "Wrote {} reports for {} campaigns",
        summary.written.len(),
        summary.campaigns
    );

    Ok(())
}
