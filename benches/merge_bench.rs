
use criterion::{black_box, criterion_group, criterion_main, Criterion};

use supercon::component::components_from_partition;
use supercon::example_gen::generate_contig_batch;
use supercon::merge_config::MergeConfigBuilder;
use supercon::merge_pipeline::MergePipeline;
use supercon::partitioner::Partitioner;

pub fn bench_partition(c: &mut Criterion) {
    let reference_lengths = [1000, 5000];
    let num_samples = [4, 8];
    let error_rates = [0.0, 0.01];

    let mut benchmark_group = c.benchmark_group("partition-group");
    benchmark_group.sample_size(10);

    for &rl in reference_lengths.iter() {
        for &ns in num_samples.iter() {
            for &er in error_rates.iter() {
                let (_reference, batch) = generate_contig_batch(rl, ns, 4, er, 0);
                let config = MergeConfigBuilder::default()
                    .qgram_length(11)
                    .min_score(40)
                    .minimal_length(50)
                    .build().unwrap();

                let test_label = format!("partition_{rl}x{ns}_{er}");
                benchmark_group.bench_function(&test_label, |b| b.iter(|| {
                    black_box({
                        let partitioner = Partitioner::new(&batch, config.clone()).unwrap();
                        partitioner.partition().unwrap()
                    });
                }));
            }
        }
    }

    benchmark_group.finish();
}

pub fn bench_merge(c: &mut Criterion) {
    let reference_lengths = [1000, 5000];
    let num_samples = [4, 8];
    let error_rates = [0.0, 0.01];

    let mut benchmark_group = c.benchmark_group("merge-group");
    benchmark_group.sample_size(10);

    for &rl in reference_lengths.iter() {
        for &ns in num_samples.iter() {
            for &er in error_rates.iter() {
                let (_reference, batch) = generate_contig_batch(rl, ns, 4, er, 0);
                let config = MergeConfigBuilder::default()
                    .qgram_length(11)
                    .min_score(40)
                    .minimal_length(50)
                    .build().unwrap();

                // partition once up front; the merge stage is what gets timed
                let mut partition = Partitioner::new(&batch, config.clone()).unwrap()
                    .partition().unwrap();
                let components = components_from_partition(&mut partition, batch.len());

                let test_label = format!("merge_{rl}x{ns}_{er}");
                benchmark_group.bench_function(&test_label, |b| b.iter(|| {
                    black_box({
                        let pipeline = MergePipeline::new(&batch, config.clone());
                        let mut sink = vec![];
                        pipeline.construct_supercontigs(&components, &mut sink).unwrap()
                    });
                }));
            }
        }
    }

    benchmark_group.finish();
}

criterion_group!(benches, bench_partition, bench_merge);
criterion_main!(benches);
