//! flowbeta CLI - order-flow imbalance, price-impact beta and depth analysis.

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use flowbeta_lib::{GridFill, Interval, ModelSpec, Variable};
use std::path::PathBuf;

mod commands;
mod config;
mod display;
mod logging;

use config::PipelineConfig;
use display::{CovarianceArg, Format, PolicyArg};

#[derive(Parser)]
#[command(name = "flowbeta")]
#[command(about = "Order-flow imbalance, price-impact beta and market-depth analysis", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (suppress progress output and logs below error)
    #[arg(short, long, global = true)]
    quiet: bool,

    /// JSON pipeline configuration; command-line flags take precedence
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

/// Location of the daily tick files.
#[derive(clap::Args)]
struct SourceArgs {
    /// Directory holding the quote and trade subdirectories
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Extension of the daily files (e.g. csv.gz, csv)
    #[arg(long)]
    extension: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the interval-signal table (delta_midprice, OFI, TFI) of a date range
    Signals {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// End date (YYYY-MM-DD), inclusive
        #[arg(short, long)]
        end: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Bucket width (e.g. 10s, 1min)
        #[arg(short, long)]
        interval: Option<Interval>,

        /// Tick size dividing mid prices
        #[arg(long)]
        tick_size: Option<f64>,

        /// Emit empty buckets between observed ones
        #[arg(long)]
        dense: bool,

        /// Output file path. Defaults to signals.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
    },

    /// Build the average-depth series of a date range
    Depth {
        /// Start date (YYYY-MM-DD)
        #[arg(short, long)]
        start: String,

        /// End date (YYYY-MM-DD), inclusive
        #[arg(short, long)]
        end: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Depth window (e.g. 30min)
        #[arg(short, long)]
        window: Option<Interval>,

        /// Emit NaN for windows without quotes
        #[arg(long)]
        dense: bool,

        /// Output file path. Defaults to depth.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,
    },

    /// Regress, align betas with depth and report a date range
    Report {
        /// Interval-signal file written by `signals`
        #[arg(long)]
        signals: PathBuf,

        /// Depth file written by `depth`
        #[arg(long)]
        depth: PathBuf,

        /// Start of the reported range (e.g. 2020-11-15 or "2020-11-15 09")
        #[arg(short, long)]
        start: String,

        /// End of the reported range, inclusive
        #[arg(short, long)]
        end: String,

        /// Regression window (e.g. 30min)
        #[arg(short, long)]
        window: Option<Interval>,

        /// Model formula (e.g. "delta_midprice ~ OFI + TFI")
        #[arg(short, long)]
        model: Option<ModelSpec>,

        /// Predictor whose slope is reported
        #[arg(short, long)]
        predictor: Option<Variable>,

        /// Covariance estimator
        #[arg(long, value_enum)]
        covariance: Option<CovarianceArg>,

        /// Lag count of the HAC estimator
        #[arg(long)]
        maxlags: Option<usize>,

        /// Handling of windows with fewer rows than parameters
        #[arg(long, value_enum)]
        policy: Option<PolicyArg>,

        /// Output file path. Defaults to report.<format>
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "csv")]
        format: Format,

        /// Render the seasonality chart to this SVG file
        #[arg(long)]
        chart: Option<PathBuf>,

        /// Seasonality profile CSV. Defaults to the chart path with a csv extension
        #[arg(long)]
        profile: Option<PathBuf>,
    },
}

impl SourceArgs {
    fn apply(self, config: &mut PipelineConfig) {
        if let Some(root) = self.root {
            config.source.root = root;
        }
        if let Some(extension) = self.extension {
            config.source.extension = extension;
        }
    }
}

const fn fill(dense: bool, configured: GridFill) -> GridFill {
    if dense { GridFill::Dense } else { configured }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(cli.verbose, cli.quiet);

    // Show help if no command provided
    let Some(command) = cli.command else {
        Cli::command().print_help()?;
        return Ok(());
    };

    let mut config = PipelineConfig::load(cli.config.as_deref())?;

    match command {
        Commands::Signals {
            start,
            end,
            source,
            interval,
            tick_size,
            dense,
            output,
            format,
        } => {
            source.apply(&mut config);
            let signal = &mut config.signal;
            signal.interval = interval.unwrap_or(signal.interval);
            signal.tick_size = tick_size.unwrap_or(signal.tick_size);
            signal.fill = fill(dense, signal.fill);

            commands::signals::signals(&config, &start, &end, output, format, cli.quiet)
        }
        Commands::Depth {
            start,
            end,
            source,
            window,
            dense,
            output,
            format,
        } => {
            source.apply(&mut config);
            let depth = &mut config.depth;
            depth.window = window.unwrap_or(depth.window);
            depth.fill = fill(dense, depth.fill);

            commands::depth::depth(&config, &start, &end, output, format, cli.quiet)
        }
        Commands::Report {
            signals,
            depth,
            start,
            end,
            window,
            model,
            predictor,
            covariance,
            maxlags,
            policy,
            output,
            format,
            chart,
            profile,
        } => {
            let regression = &mut config.regression;
            if let Some(window) = window {
                regression.window = window;
                config.report.grid = window;
            }
            if let Some(model) = model {
                regression.model = model;
            }
            if covariance.is_some() || maxlags.is_some() {
                regression.covariance =
                    display::covariance(covariance, maxlags, regression.covariance);
            }
            if let Some(policy) = policy {
                regression.policy = policy.into();
            }
            if let Some(predictor) = predictor {
                config.report.predictor = predictor;
            }

            let inputs = commands::report::ReportInputs {
                signals,
                depth,
                start,
                end,
            };
            let outputs = commands::report::ReportOutputs {
                output,
                format,
                chart,
                profile,
            };
            commands::report::report(&config, &inputs, &outputs, cli.quiet)
        }
    }
}
