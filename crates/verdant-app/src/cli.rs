use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Verdant field-service scheduling and dispatch engine.
#[derive(Parser)]
#[command(name = "verdant", version, about = "Field-service scheduling and dispatch engine")]
pub struct Cli {
    /// JSON seed file standing in for the datastore collaborator
    #[arg(long)]
    pub seed: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand schedules into dated appointments over a window
    Generate {
        /// Window start (YYYY-MM-DD)
        #[arg(long)]
        from: NaiveDate,
        /// Inclusive window end (YYYY-MM-DD); defaults to the configured
        /// horizon past the start
        #[arg(long)]
        to: Option<NaiveDate>,
    },

    /// Assign a day's unassigned appointments to crews by proximity
    Assign {
        /// Target date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,
        /// Proximity radius in kilometres; defaults from config
        #[arg(long)]
        radius_km: Option<f64>,
    },
}
