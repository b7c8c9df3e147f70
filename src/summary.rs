//! Human readable console output

use roadgraph_core::{RoadGraph, ValidationReport};

pub fn print_graph(graph: &RoadGraph) {
    let summary = graph.summary();
    println!("Graph {}", graph.graph_version);
    println!("  segments:       {}", summary.segment_count);
    println!("  nodes:          {}", summary.node_count);
    println!("  major segments: {}", summary.major_segment_count);
    println!("  entry points:   {}", summary.entry_point_count);
    println!("  boundary nodes: {}", summary.boundary_node_count);
    println!("  orphans:        {}", summary.orphan_segment_count);
    println!(
        "  avg successors: {:.2}, avg predecessors: {:.2}",
        summary.avg_successors(),
        summary.avg_predecessors()
    );
}

pub fn print_report(report: &ValidationReport) {
    println!("Validation");
    for check in &report.checks {
        println!("  {check}");
    }
    println!(
        "  components: {}, boundary dead ends: {}",
        report.component_count, report.boundary_dead_ends
    );

    if report.passed {
        println!("PASSED");
    } else {
        println!("FAILED");
        for failure in &report.failures {
            println!("  - {failure}");
        }
    }
}
