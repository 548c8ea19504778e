use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::json;
use shard_capacity_alert::metrics::base::{PrometheusResult, PrometheusResultMetric};
use shard_capacity_alert::metrics::reduce_shard_statuses;
use shard_capacity_alert::report::AlertReport;
use shard_capacity_alert::telegram::render_shard_table;

fn sample_results() -> Vec<PrometheusResult> {
    (0..2000)
        .map(|i| PrometheusResult {
            metric: PrometheusResultMetric {
                name: "free_slots".to_string(),
                shard: format!("catalog-{:03}", i % 400),
                shard_type: if i % 7 == 0 { "brand" } else { "category" }.to_string(),
            },
            value: vec![json!(1700000000.25), json!(((i * 37) % 5000).to_string())],
        })
        .collect()
}

fn reduce_benchmark(c: &mut Criterion) {
    let results = sample_results();

    c.bench_function("reduce_shard_statuses", |b| {
        b.iter(|| black_box(reduce_shard_statuses(black_box(&results)).unwrap()))
    });
}

fn render_benchmark(c: &mut Criterion) {
    let statuses = reduce_shard_statuses(&sample_results()).unwrap();
    let report = AlertReport::select(statuses, 1000);

    c.bench_function("render_shard_table", |b| {
        b.iter(|| black_box(render_shard_table(black_box(&report.shards))))
    });
}

criterion_group!(benches, reduce_benchmark, render_benchmark);
criterion_main!(benches);
