//! Command-line definitions

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Build a directed road graph from road segment polylines and certify it
/// for traffic simulation.
#[derive(Parser, Debug)]
#[command(name = "roadgraph", version)]
#[command(propagate_version = true)]
pub struct Cli {
    /// TOML file with `[build]` and `[validation]` tables
    #[arg(long, short = 'c', global = true)]
    pub config: Option<PathBuf>,

    /// Log debug output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build graph and node files from raw road segments, then validate them
    Build(BuildArgs),
    /// Validate previously built graph and node files
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
pub struct BuildArgs {
    /// Raw road segments (`{meta, segments}` JSON)
    #[arg(long, short = 'i')]
    pub input: PathBuf,

    /// Output segments/graph file
    #[arg(long)]
    pub graph_out: PathBuf,

    /// Output nodes file
    #[arg(long)]
    pub nodes_out: PathBuf,

    /// Output validation report [default: graph_validation_report.json
    /// next to the graph file]
    #[arg(long)]
    pub report_out: Option<PathBuf>,

    /// Write the graph without validating it
    #[arg(long)]
    pub skip_validation: bool,

    /// Print the validation report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub build: BuildOverrides,

    #[command(flatten)]
    pub thresholds: ThresholdOverrides,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Segments/graph file written by `build`
    #[arg(long)]
    pub graph: PathBuf,

    /// Nodes file written by `build`
    #[arg(long)]
    pub nodes: PathBuf,

    /// Output validation report [default: graph_validation_report.json
    /// next to the graph file]
    #[arg(long)]
    pub report_out: Option<PathBuf>,

    /// Print the validation report as JSON on stdout
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub thresholds: ThresholdOverrides,
}

/// Per-run overrides of `[build]` settings
#[derive(Args, Debug, Default)]
pub struct BuildOverrides {
    /// Endpoint snap radius
    #[arg(long)]
    pub snap_radius: Option<f64>,

    /// Largest linked turn, degrees
    #[arg(long)]
    pub angle_threshold: Option<f64>,

    #[arg(long)]
    pub spawn_rate_threshold: Option<f64>,

    #[arg(long)]
    pub speed_ratio_threshold: Option<f64>,

    /// Length above which a segment is major, meters
    #[arg(long)]
    pub length_threshold: Option<f64>,

    /// Boundary strip width along the data extent
    #[arg(long)]
    pub boundary_buffer: Option<f64>,
}

/// Per-run overrides of `[validation]` settings, as fractions
#[derive(Args, Debug, Default)]
pub struct ThresholdOverrides {
    #[arg(long)]
    pub min_largest_component: Option<f64>,

    #[arg(long)]
    pub min_entry_reachability: Option<f64>,

    #[arg(long)]
    pub max_interior_dead_end: Option<f64>,
}
