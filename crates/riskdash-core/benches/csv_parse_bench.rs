use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use once_cell::sync::Lazy;
use riskdash_core::readers::{parse_bytes, ParserConfig};
use riskdash_core::stats::{statistics_from_rows, StatsColumns};
use std::hint::black_box;

const INTEGRATIONS: [&str; 5] = ["Slack", "GitHub", "Drive", "Jira", "Zoom"];

/// Build an activity export with `rows` data lines and a blank line every 50 rows.
fn create_activity_csv(rows: usize) -> Vec<u8> {
    let mut out = String::from("user,integration,risk_score,status,breach_category,timestamp\n");
    for i in 0..rows {
        let breach = if i % 7 == 0 { "Policy Violation" } else { "" };
        out.push_str(&format!(
            "user{},{},{},open,{},2024-06-01 {:02}:15:00\n",
            i % 300,
            INTEGRATIONS[i % INTEGRATIONS.len()],
            (i * 37) % 100,
            breach,
            i % 24
        ));
        if i % 50 == 0 {
            out.push('\n');
        }
    }
    out.into_bytes()
}

static ACTIVITY_FILES: Lazy<Vec<(usize, Vec<u8>)>> = Lazy::new(|| {
    [1_000usize, 10_000, 100_000]
        .iter()
        .map(|&size| (size, create_activity_csv(size)))
        .collect()
});

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_parse");
    let config = ParserConfig::default();

    for (size, data) in ACTIVITY_FILES.iter() {
        group.throughput(criterion::Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), data, |b, data| {
            b.iter(|| {
                let rows = parse_bytes(data, &config).unwrap();
                black_box(rows.len());
            });
        });
    }

    group.finish();
}

/// Parse then aggregate, the path behind `riskdash stats`.
fn bench_parse_and_aggregate(c: &mut Criterion) {
    let mut group = c.benchmark_group("csv_parse_aggregate");
    let config = ParserConfig::default();
    let columns = StatsColumns::default();

    for (size, data) in ACTIVITY_FILES.iter() {
        group.throughput(criterion::Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), data, |b, data| {
            b.iter(|| {
                let rows = parse_bytes(data, &config).unwrap();
                let stats = statistics_from_rows(&rows, &columns);
                black_box(stats.total_activities);
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_parse, bench_parse_and_aggregate);
criterion_main!(benches);
