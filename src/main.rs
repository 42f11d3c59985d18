use restaurant_dashboard::render::{render_options, render_view};
use restaurant_dashboard::{
    Category, Dashboard, DashboardConfig, DashboardError, Selection, TableCache,
};

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "restaurant-dashboard")]
#[command(about = "Revenue dashboard for burger and fried chicken chains in Saudi Arabia")]
#[command(version)]
struct Args {
    /// Path to the chain dataset (overrides DASHBOARD_DATA_PATH)
    #[arg(short, long, global = true)]
    data: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Filter the dataset and render the three charts
    Report {
        /// Category to include (repeatable; default: all present)
        #[arg(short, long = "category")]
        categories: Vec<Category>,

        /// City to include (repeatable; default: all present)
        #[arg(long = "city")]
        cities: Vec<String>,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Longest bar in text output (overrides DASHBOARD_BAR_WIDTH)
        #[arg(long)]
        bar_width: Option<usize>,
    },
    /// List the categories and cities available for filtering
    Options {
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(Args::parse()) {
        error!("{:#}", e);
        eprintln!("\nError: {:#}", e);
        if is_data_load(&e) {
            eprintln!("Charts are unavailable until the data file can be loaded.");
        }
        std::process::exit(1);
    }
}

fn is_data_load(err: &anyhow::Error) -> bool {
    err.downcast_ref::<DashboardError>()
        .map_or(false, DashboardError::is_data_load)
}

fn run(args: Args) -> Result<()> {
    let mut config = DashboardConfig::from_env()?;
    if let Some(data) = args.data {
        config.data_path = data;
    }
    info!("Data file: {}", config.data_path.display());

    let cache = TableCache::new();
    let dashboard = Dashboard::new(cache.load(&config.data_path)?);

    match args.command {
        Commands::Report {
            categories,
            cities,
            format,
            bar_width,
        } => {
            let defaults = dashboard.default_selection()?;
            let selection = Selection {
                categories: if categories.is_empty() {
                    defaults.categories
                } else {
                    categories.into_iter().collect()
                },
                cities: if cities.is_empty() {
                    defaults.cities
                } else {
                    cities.into_iter().collect()
                },
            };

            let view = dashboard.view(&selection)?;
            match format {
                OutputFormat::Text => {
                    println!("{}", render_view(&view, bar_width.unwrap_or(config.bar_width).max(1)))
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&view)?),
            }
        }
        Commands::Options { format } => {
            let options = dashboard.options()?;
            match format {
                OutputFormat::Text => println!("{}", render_options(&options)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&options)?),
            }
        }
    }

    Ok(())
}
