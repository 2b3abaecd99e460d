use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use ddeserts_annotate::{add_share_columns, AnnotationPipeline};
use ddeserts_core::{CensusConfig, Estimate, Population, Record, Stat, Table};
use rand::prelude::*;

/// Synthetic geographies with plausible nested counts
fn generate_table(config: &CensusConfig, size: usize, seed: u64) -> Table {
    let mut rng = StdRng::seed_from_u64(seed);
    let races: Vec<_> = config.breakdowns.races().cloned().collect();

    let records = (0..size)
        .map(|i| {
            let mut record = Record::new(format!("G{i}"), format!("Place {i} city, California"));
            let tot: f64 = rng.gen_range(100.0..1_000_000.0);
            let counts = [tot, tot * 0.75, tot * 0.8, tot * 0.6];
            for (pop, est) in Population::BASE.into_iter().zip(counts) {
                record.set(&Stat::total(pop), Estimate::new(est, est.sqrt()));
                for race in &races {
                    let share: f64 = rng.gen_range(0.0..0.1);
                    let r = est * share;
                    record.set(&Stat::count(race, pop), Estimate::new(r, r.sqrt() + 1.0));
                }
            }
            record
        })
        .collect();
    Table::from_records(records)
}

fn bench_standard_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("standard_pipeline");
    let config = CensusConfig::default();
    let pipeline = AnnotationPipeline::standard(&config).unwrap();

    for size in [100, 1_000, 10_000] {
        let table = generate_table(&config, size, 42);
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| {
                let mut table = table.clone();
                pipeline.run(black_box(&mut table)).unwrap();
                table
            })
        });
    }
    group.finish();
}

fn bench_share_stage(c: &mut Criterion) {
    let config = CensusConfig::default();
    let pipeline = AnnotationPipeline::standard(&config).unwrap();
    let mut table = generate_table(&config, 10_000, 7);
    pipeline.run(&mut table).unwrap();

    c.bench_function("share_rerun_10000", |b| {
        b.iter(|| add_share_columns(black_box(&mut table), &config).unwrap())
    });
}

criterion_group!(benches, bench_standard_pipeline, bench_share_stage);
criterion_main!(benches);
