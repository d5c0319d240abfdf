use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use perfchart::{
    config::Config,
    datasets,
    functions::{load_nested::load_nested, load_table::load_table_path},
    render::{FigureWriter, PlottersRenderer},
    report, Error,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "perfchart", version, about = "Render benchmark charts")]
struct Cli {
    /// TOML configuration file. Defaults to `perfchart.toml` if present.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Raise log verbosity. Repeat for more.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Process vs thread worker charts from a CSV of measurements.
    Processes {
        csv: PathBuf,
        output_dir: PathBuf,
        label: String,
    },
    /// Copy strategy charts from the built-in measurements or a CSV.
    Network {
        output_dir: PathBuf,
        label: String,
        /// Read measurements from this CSV instead of the built-in tables.
        #[arg(long)]
        data: Option<PathBuf>,
        /// Thread count held fixed on message size sweeps.
        #[arg(long)]
        threads: Option<u64>,
        /// Message size held fixed on the thread count sweep.
        #[arg(long)]
        msg_size: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut config = Config::load(cli.config.as_deref()).context("failed to load configuration")?;

    let paths = match cli.command {
        Command::Processes {
            csv,
            output_dir,
            label,
        } => {
            ensure_exists(&csv)?;
            let writer = figure_writer(&config)?;
            let store = load_table_path(
                &csv,
                &datasets::processes::SCHEMA,
                &datasets::processes::variants(),
            )
            .with_context(|| format!("failed to load {}", csv.display()))?;
            report::processes(&writer, &store, &config, &output_dir, &label)
                .context("failed to write charts")?
        }
        Command::Network {
            output_dir,
            label,
            data,
            threads,
            msg_size,
        } => {
            if let Some(threads) = threads {
                config.threads = threads;
            }
            if let Some(msg_size) = msg_size {
                config.msg_size = msg_size;
            }
            if let Some(data) = &data {
                ensure_exists(data)?;
            }
            let writer = figure_writer(&config)?;
            let variants = datasets::network::variants();
            let store = match &data {
                Some(data) => load_table_path(data, &datasets::network::SCHEMA, &variants)
                    .with_context(|| format!("failed to load {}", data.display()))?,
                None => load_nested(&datasets::network::MEASURED, &variants)
                    .context("built-in measurements are inconsistent")?,
            };
            report::network(&writer, &store, &config, &output_dir, &label)
                .context("failed to write charts")?
        }
    };

    tracing::info!(figures = paths.len(), "done");
    Ok(())
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn ensure_exists(path: &Path) -> anyhow::Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::InputNotFound(path.to_path_buf()).into())
    }
}

fn figure_writer(config: &Config) -> anyhow::Result<FigureWriter<PlottersRenderer>> {
    FigureWriter::new(PlottersRenderer::new(config.dpi, config.font_family.as_str()))
        .context("cannot render figures")
}
