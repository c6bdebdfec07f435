mod cli;
mod seed;

use chrono::Days;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt};

use verdant_core::config::load_config;
use verdant_core::types::DateWindow;
use verdant_service::dispatch::assign::auto_assign;
use verdant_service::error::ServiceError;
use verdant_service::scheduling::generator::generate_for_all;
use verdant_store::store::memory::MemoryStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let (filter_layer, filter_handle) = reload::Layer::new(EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(
            fmt::layer()
                .with_target(true)
                .with_writer(std::io::stderr),
        )
        .init();

    let args = cli::Cli::parse();
    let config = load_config()?;

    if let Ok(filter) = EnvFilter::try_new(config.logging.level.as_str()) {
        if let Err(e) = filter_handle.modify(|current| *current = filter) {
            tracing::warn!(error = %e, "Failed to update log filter from config");
        }
    } else {
        tracing::warn!(level = %config.logging.level, "Invalid log level in config, keeping info");
    }

    let store = MemoryStore::new();
    let company_id = seed::load_seed(&args.seed, &store).await?;

    match args.command {
        cli::Commands::Generate { from, to } => {
            let to = match to {
                Some(to) => to,
                None => from
                    .checked_add_days(Days::new(u64::from(config.scheduling.horizon_days)))
                    .ok_or_else(|| anyhow::anyhow!("window end overflows the calendar"))?,
            };
            let window = DateWindow::new(from, to)?;
            let summary = generate_for_all(&store, company_id, window).await?;
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        cli::Commands::Assign { date, radius_km } => {
            let radius_km = radius_km.unwrap_or(config.dispatch.cluster_radius_km);
            let summary = match auto_assign(&store, company_id, date, radius_km).await {
                Ok(summary) => summary,
                // Domain failures are a user-facing notice, not a crash.
                Err(
                    err @ (ServiceError::NoUnassignedAppointments { .. }
                    | ServiceError::NoActiveTeams),
                ) => {
                    eprintln!("{err}");
                    std::process::exit(2);
                }
                Err(err) => return Err(err.into()),
            };
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
