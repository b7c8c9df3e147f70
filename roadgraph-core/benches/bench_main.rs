use criterion::{Criterion, black_box, criterion_group, criterion_main};
use roadgraph_core::prelude::*;
use serde_json::Map;

/// Two-way street grid with `size` x `size` blocks of 120 m
fn synthetic_grid(size: u32) -> Vec<RawSegment> {
    let mut out = Vec::with_capacity((size as usize + 1) * size as usize * 4);
    let mut push = |from: (f64, f64), to: (f64, f64)| {
        out.push(RawSegment {
            id: format!("road_{:06}", out.len()),
            points: vec![
                [from.0 + 1.5, 0.0, from.1],
                [(from.0 + to.0) / 2.0, 0.0, (from.1 + to.1) / 2.0],
                [to.0, 0.0, to.1 - 1.0],
            ],
            road_type: "street".to_string(),
            avg_speed_mph: 14.0,
            free_flow_speed_mph: 25.0,
            spawn_rates: vec![0.05, 0.12],
            extra: Map::new(),
        });
    };

    for i in 0..=size {
        for j in 0..size {
            let a = f64::from(i) * 120.0;
            let (b, c) = (f64::from(j) * 120.0, f64::from(j + 1) * 120.0);
            push((a, b), (a, c));
            push((a, c), (a, b));
            push((b, a), (c, a));
            push((c, a), (b, a));
        }
    }
    out
}

fn bench_build(c: &mut Criterion) {
    let segments = synthetic_grid(60);
    let config = GraphBuildConfig::default();

    c.bench_function("create_road_graph_60x60", |b| {
        b.iter(|| {
            let input = LoadedSegments::from_segments(segments.clone());
            black_box(create_road_graph(input, &config).expect("graph"))
        });
    });
}

fn bench_validate(c: &mut Criterion) {
    let graph = create_road_graph(
        LoadedSegments::from_segments(synthetic_grid(60)),
        &GraphBuildConfig::default(),
    )
    .expect("graph");
    let thresholds = ValidationThresholds::default();

    c.bench_function("validate_graph_60x60", |b| {
        b.iter(|| black_box(validate_graph(&graph, &thresholds)));
    });
}

criterion_group!(benches, bench_build, bench_validate);
criterion_main!(benches);
