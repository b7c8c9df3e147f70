use std::path::{Path, PathBuf};

use roadgraph_core::prelude::*;
use tracing::{info, warn};

use crate::cli::{BuildArgs, ValidateArgs};
use crate::config::PipelineConfig;
use crate::error::CliError;
use crate::summary;

/// Report file name used when `--report-out` is not given
const DEFAULT_REPORT_FILE: &str = "graph_validation_report.json";

/// How a command ended, mapped onto the process exit code by `main`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Passed,
    Failed,
    Skipped,
}

pub fn run_build(args: &BuildArgs, config_path: Option<&Path>) -> Result<Outcome, CliError> {
    let mut config = PipelineConfig::load(config_path)?;
    config.apply_build(&args.build);
    config.apply_thresholds(&args.thresholds);
    config.validate()?;

    let input = read_segments(&args.input)?;
    if !input.skipped.is_empty() {
        warn!(
            "Skipped {} malformed segment records of {}",
            input.skipped.len(),
            input.skipped.len() + input.segments.len()
        );
    }

    let graph = create_road_graph(input, &config.build)?;
    write_graph_files(&graph, &args.graph_out, &args.nodes_out)?;
    summary::print_graph(&graph);

    if args.skip_validation {
        info!("Validation skipped");
        return Ok(Outcome::Skipped);
    }

    let report = validate_graph(&graph, &config.validation);
    let report_out = report_path(args.report_out.as_deref(), &args.graph_out);
    finish(&report, &report_out, args.json)
}

pub fn run_validate(args: &ValidateArgs, config_path: Option<&Path>) -> Result<Outcome, CliError> {
    let mut config = PipelineConfig::load(config_path)?;
    config.apply_thresholds(&args.thresholds);
    config.validate()?;

    let graph = read_graph_files(&args.graph, &args.nodes)?;
    let report = validate_graph(&graph, &config.validation);
    let report_out = report_path(args.report_out.as_deref(), &args.graph);
    finish(&report, &report_out, args.json)
}

fn report_path(explicit: Option<&Path>, graph_path: &Path) -> PathBuf {
    explicit.map_or_else(
        || graph_path.with_file_name(DEFAULT_REPORT_FILE),
        Path::to_path_buf,
    )
}

fn finish(report: &ValidationReport, report_out: &Path, json: bool) -> Result<Outcome, CliError> {
    write_report(report, report_out)?;

    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        summary::print_report(report);
    }

    Ok(if report.passed {
        Outcome::Passed
    } else {
        Outcome::Failed
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_defaults_to_graph_directory() {
        assert_eq!(
            report_path(None, Path::new("out/city/graph.json")),
            PathBuf::from("out/city/graph_validation_report.json")
        );
        assert_eq!(
            report_path(Some(Path::new("report.json")), Path::new("out/graph.json")),
            PathBuf::from("report.json")
        );
    }
}
