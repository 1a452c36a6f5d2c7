use crate::error::SelectionError;
use crate::filter::FilterController;
use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::PathBuf;

/// Terminal dashboard for the Global Terrorism Database
#[derive(Parser, Debug)]
#[command(name = "incident-map", version, about, long_about = None)]
pub struct Cli {
    /// Incident CSV file
    #[arg(
        long,
        env = "INCIDENT_MAP_DATA",
        default_value = "modified_globalterrorismdb_0718dist.csv"
    )]
    pub data: PathBuf,

    /// Directory with Natural Earth GeoJSON outlines
    #[arg(long, env = "INCIDENT_MAP_BASEMAP", default_value = "data")]
    pub basemap: PathBuf,

    /// Initial region (defaults to the dataset's fifth region)
    #[arg(long)]
    pub region: Option<String>,

    /// Initial country (defaults to the region's first country)
    #[arg(long)]
    pub country: Option<String>,

    /// First year of the initial range
    #[arg(long, value_name = "YEAR")]
    pub from: Option<i32>,

    /// Last year of the initial range
    #[arg(long, value_name = "YEAR")]
    pub to: Option<i32>,

    /// Write logs here instead of stderr (the UI owns the terminal)
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    /// Set up `env_logger`; `RUST_LOG` overrides the default `info` level
    pub fn init_logging(&self) -> Result<()> {
        let mut builder =
            env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));

        if let Some(path) = &self.log_file {
            let file = File::create(path)
                .with_context(|| format!("creating log file {}", path.display()))?;
            builder.target(env_logger::Target::Pipe(Box::new(file)));
        }

        builder.try_init().context("installing logger")?;
        Ok(())
    }

    /// Apply the initial selection given on the command line
    pub fn apply_selection(&self, filter: &mut FilterController) -> Result<(), SelectionError> {
        if let Some(region) = &self.region {
            filter.set_region(region)?;
        }
        if let Some(country) = &self.country {
            filter.set_country(country)?;
        }
        if self.from.is_some() || self.to.is_some() {
            let years = filter.years();
            filter.set_year_range(self.from.unwrap_or(years.from), self.to.unwrap_or(years.to))?;
        }
        Ok(())
    }
}
