use chrono::NaiveDate;
use chrono::Utc;
use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;
use reporting::Dashboard;
use reporting::FilterState;
use reporting::ReportingConfig;
use sales_gen::store::output::write_parquet;
use sales_gen::store::Config;
use sales_gen::store::Scenario;
use tracing::info;
use tracing::metadata::LevelFilter;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use crate::error::Result;

mod error;
mod render;

const NUM_RECORDS: usize = 10_000;
const RANDOM_SEED: u64 = 35_487;
const PARQUET_FILE: &str = "sales.parquet";

#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
        .into()
    }
}

#[derive(Parser)]
#[command(propagate_version = true)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[arg(value_enum, default_value = "info")]
    log_level: LogLevel,
    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand)]
enum Cmd {
    /// Generate the synthetic sales dataset and write it to
    /// sales.parquet in the working directory.
    Generate,
    /// Render the dashboard once for the current filter selection.
    Dashboard {
        #[arg(long, value_delimiter = ',')]
        regions: Option<Vec<String>>,
        #[arg(long, value_delimiter = ',')]
        products: Option<Vec<String>>,
        #[arg(long)]
        from: Option<NaiveDate>,
        #[arg(long)]
        to: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(LevelFilter::from(cli.log_level))
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    match cli.cmd {
        Cmd::Generate => generate(),
        Cmd::Dashboard {
            regions,
            products,
            from,
            to,
        } => {
            let date_range = match (from, to) {
                (Some(from), Some(to)) => Some((from, to)),
                _ => None,
            };
            dashboard(FilterState {
                regions,
                products,
                date_range,
            })
            .await
        }
    }
}

fn generate() -> Result<()> {
    println!("Generating synthetic sales data...");

    let cfg = Config {
        num_records: NUM_RECORDS,
        seed: RANDOM_SEED,
        to_date: Utc::now().date_naive(),
    };
    let mut scenario = Scenario::try_new(cfg)?;
    let rows = scenario.run()?;
    info!("generated {} records", rows.len());

    println!("Generated {} records", rows.len());
    println!("\nSaving to parquet format...");
    write_parquet(PARQUET_FILE, &rows)?;

    println!("\nSample data:");
    for row in rows.iter().take(5) {
        println!(
            "  {} | {} | {} x{} @ ${:.2} | {} | {} | -{:.2}% | ${:.2}",
            row.date,
            row.region,
            row.product,
            row.quantity,
            row.unit_price,
            row.customer_segment,
            row.sales_channel,
            row.discount_percent,
            row.total_amount,
        );
    }

    println!("\nData saved to {PARQUET_FILE}");
    Ok(())
}

async fn dashboard(filters: FilterState) -> Result<()> {
    let cfg = ReportingConfig::from_env();
    let mut dashboard = Dashboard::connect(&cfg).await;
    if !dashboard.is_connected() {
        println!("No connection to {}", cfg.warehouse_path.display());
    }
    dashboard.set_filters(filters).await;

    render::render(dashboard.snapshot());
    Ok(())
}
