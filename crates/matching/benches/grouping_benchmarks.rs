use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

use stockmerge_matching::{GroupingMode, Named, Stocked, find_matches, group_with_mode, score};

#[derive(Debug, Clone)]
struct BenchItem {
    name: String,
    quantity: f64,
}

impl Named for BenchItem {
    fn raw_name(&self) -> &str {
        &self.name
    }
}

impl Stocked for BenchItem {
    fn quantity_available(&self) -> f64 {
        self.quantity
    }
}

const STEMS: &[&str] = &[
    "Ácido Hialurônico",
    "Toxina Botulínica",
    "Luva Nitrílica",
    "Seringa Descartável",
    "Agulha Hipodérmica",
    "Gaze Estéril",
    "Soro Fisiológico",
    "Álcool 70%",
];

/// Synthetic catalog: stems with size/variant suffixes, so some names collide.
fn synthetic_catalog(n: usize) -> Vec<BenchItem> {
    (0..n)
        .map(|i| BenchItem {
            name: format!("{} {}ml lote {}", STEMS[i % STEMS.len()], (i / 8) % 5, i % 13),
            quantity: (i % 17) as f64,
        })
        .collect()
}

fn bench_score(c: &mut Criterion) {
    c.bench_function("score/typical_names", |b| {
        b.iter(|| {
            score(
                black_box("acido hialuronico 2ml lote 7"),
                black_box("acido hialuronico 3ml lote 1"),
            )
        })
    });
}

fn bench_find_matches(c: &mut Criterion) {
    let mut group = c.benchmark_group("find_matches");
    for size in [100usize, 1_000, 3_000] {
        let catalog = synthetic_catalog(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &catalog, |b, catalog| {
            b.iter(|| find_matches(black_box("luva nitrilica 2ml"), catalog, 0.8))
        });
    }
    group.finish();
}

fn bench_grouping(c: &mut Criterion) {
    let mut group = c.benchmark_group("group");
    group.sample_size(10);
    for size in [100usize, 500, 1_000] {
        let catalog = synthetic_catalog(size);
        group.throughput(Throughput::Elements((size * (size - 1) / 2) as u64));
        for mode in [GroupingMode::SingleLink, GroupingMode::CompleteLink] {
            group.bench_with_input(
                BenchmarkId::new(format!("{mode:?}"), size),
                &catalog,
                |b, catalog| b.iter(|| group_with_mode(catalog, 0.8, mode)),
            );
        }
    }
    group.finish();
}

criterion_group!(benches, bench_score, bench_find_matches, bench_grouping);
criterion_main!(benches);
