use std::hint::black_box;

use chrono::{TimeZone, Utc};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use history_clusters::controller::assembler::ResultAssembler;
use history_clusters::models::{Group, QueryState, Visit};
use history_clusters::rows::RowModel;
use history_clusters::source::build_page;

/// Generate N synthetic clusters of `visits` visits each
fn generate_groups(num_groups: usize, visits: usize) -> Vec<Group> {
    let ts = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
    (0..num_groups)
        .map(|g| {
            let label = format!("topic {}", g);
            let group_visits = (0..visits)
                .map(|v| {
                    Visit::new(
                        format!("Article {} about topic {}", v, g),
                        format!("https://site{}.example.com/articles/{}", g % 50, v),
                        ts,
                    )
                })
                .collect();
            Group::new(format!("\u{201C}{}\u{201D}", label), label, ts, group_visits)
                .with_related_searches(vec![format!("more topic {}", g)])
        })
        .collect()
}

fn bench_build_page(c: &mut Criterion) {
    let mut group = c.benchmark_group("build_page");

    for size in [100, 1_000, 10_000].iter() {
        let groups = generate_groups(*size, 5);

        group.throughput(Throughput::Elements(*size as u64));
        group.bench_with_input(BenchmarkId::new("blank", size), size, |b, _| {
            b.iter(|| build_page(black_box(&groups), "", 0, 10));
        });
        group.bench_with_input(BenchmarkId::new("fuzzy", size), size, |b, _| {
            b.iter(|| build_page(black_box(&groups), "article tpc", 0, 10));
        });
    }

    group.finish();
}

fn bench_assemble(c: &mut Criterion) {
    let mut group = c.benchmark_group("assemble");
    let groups = generate_groups(500, 8);

    for page_size in [10, 50, 200].iter() {
        let page = build_page(&groups, "article", 0, *page_size);
        let searching = QueryState::searching("article");
        let queryless = QueryState::queryless();

        group.throughput(Throughput::Elements(*page_size as u64));
        group.bench_with_input(BenchmarkId::new("expanded", page_size), page_size, |b, _| {
            b.iter(|| {
                let mut assembler = ResultAssembler::new(2);
                let mut rows = RowModel::new();
                assembler.assemble(black_box(&page), &searching, &mut rows);
                rows.len()
            });
        });
        group.bench_with_input(BenchmarkId::new("suggestions", page_size), page_size, |b, _| {
            b.iter(|| {
                let mut assembler = ResultAssembler::new(2);
                let mut rows = RowModel::new();
                assembler.assemble(black_box(&page), &queryless, &mut rows);
                rows.len()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_build_page, bench_assemble);
criterion_main!(benches);
