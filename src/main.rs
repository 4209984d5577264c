use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use evcurve::config::Settings;
use evcurve::data::loader;
use evcurve::processing::executive::{
    billing_progress, billing_vs_cost, efficiency_trend, executive_grid, BillingProgress, BillingVsCost,
    FormulaSummary, SummaryTable,
};
use evcurve::processing::metrics::{PerformanceTrends, TrendSeries};
use evcurve::report::table;
use evcurve::{DashboardState, Granularity};

#[derive(Parser)]
#[command(name = "evcurve")]
#[command(about = "Chart-ready earned-value curves from dashboard data", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Settings file (JSON)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cleaned S-curve chart as JSON
    Curve {
        input: PathBuf,
        /// months, weeks or days
        #[arg(short, long)]
        granularity: Option<Granularity>,
    },
    /// Print CPI/SPI and billing trends as JSON
    Trend { input: PathBuf },
    /// Print the executive billing grid
    Grid { input: PathBuf },
    /// Print the formula summary and summary table
    Summary { input: PathBuf },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    match cli.command {
        Commands::Curve { input, granularity } => {
            let mut state = load_state(&input)?;
            if !state.init_curve_chart() {
                anyhow::bail!("{input:?} has no periods to chart");
            }
            let wanted = granularity.unwrap_or(settings.default_granularity);
            if wanted != Granularity::Months {
                state.set_granularity(wanted);
            }
            print_json(&state.chart(), &settings)?;
        }
        Commands::Trend { input } => {
            let mut state = load_state(&input)?;
            state.init_curve_chart();
            let blob = state.blob();
            let ac = &state.curves().ac;
            let labels = blob.month_labels();
            let bac_real = state.refs().bac_real;

            let report = TrendReport {
                performance: PerformanceTrends::compute(blob),
                billing_progress: billing_progress(&blob.facturacion_mensual, ac, bac_real, &labels),
                billing_vs_cost: billing_vs_cost(&blob.facturacion_mensual, ac, &labels),
                efficiency: efficiency_trend(&blob.facturacion_mensual, ac, &labels),
            };
            print_json(&report, &settings)?;
        }
        Commands::Grid { input } => {
            let mut state = load_state(&input)?;
            state.init_curve_chart();
            let rows = executive_grid(
                &state.blob().facturacion_mensual,
                &state.curves().ac,
                state.refs().bac_real,
                settings.quarter_len,
            );
            print!("{}", table::render_grid(&rows, &settings));
        }
        Commands::Summary { input } => {
            let mut state = load_state(&input)?;
            state.init_curve_chart();
            let summary = FormulaSummary::compute(state.blob(), &state.curves().ac);
            let summary_table = SummaryTable::compute(state.blob());
            print!("{}", table::render_summary(&summary, &summary_table, &settings));
        }
    }

    Ok(())
}

#[derive(Serialize)]
struct TrendReport {
    performance: PerformanceTrends,
    billing_progress: BillingProgress,
    billing_vs_cost: BillingVsCost,
    efficiency: TrendSeries,
}

fn load_state(input: &Path) -> Result<DashboardState> {
    let blob = loader::load_file(input).with_context(|| format!("loading {input:?}"))?;
    Ok(DashboardState::new(blob))
}

fn print_json<T: Serialize>(value: &T, settings: &Settings) -> Result<()> {
    let text = if settings.pretty_json {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{text}");
    Ok(())
}
