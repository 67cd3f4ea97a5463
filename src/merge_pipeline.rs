
/*!
This module provides access to the MergePipeline, which drives one batch end to end:
partition the contigs, convert the union-find into ordered components, merge each
component into supercontigs, and emit FASTA records.

Capacity overruns never fail the batch. Oversized components are skipped, merges that
blow the path cap are given up, and both are counted in the returned stats; only input
errors propagate.

# Example usage
```rust
use supercon::contig::{Contig, ContigBatch};
use supercon::merge_config::MergeConfigBuilder;
use supercon::merge_pipeline::MergePipeline;

let batch = ContigBatch::from_contigs(vec![
    Contig::new("s1", "c0", b"TTGCAATGACGGTCATCGAC".to_vec()),
    Contig::new("s2", "c0", b"ACGGTCATCGACTCCAGGTT".to_vec()),
]);
let config = MergeConfigBuilder::default()
    .qgram_length(4)
    .min_score(8)
    .minimal_length(8)
    .min_branch_len(2)
    .build().unwrap();

let mut fasta = vec![];
let stats = MergePipeline::new(&batch, config).run(&mut fasta).unwrap();
assert_eq!(stats.num_components, 1);
assert_eq!(
    std::str::from_utf8(&fasta).unwrap(),
    ">COMPONENT_0.0_a_length_28_size_2\nTTGCAATGACGGTCATCGACTCCAGGTT\n"
);
```
*/

use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::io::Write;

use crate::component::{components_from_partition, Component};
use crate::contig::ContigBatch;
use crate::formats::{write_singleton, write_supercontigs};
use crate::merge_config::MergeConfig;
use crate::partitioner::Partitioner;
use crate::supercontig::SupercontigBuilder;

/// Counters for one batch run. Skipped and given-up components are reported here rather
/// than failing the job.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct MergeStats {
    /// Total number of components considered
    pub num_components: usize,
    /// Components consisting of a single contig, emitted verbatim
    pub num_singletons: usize,
    /// Components that merged into more than one supercontig, plus the given-up ones
    pub num_branching: usize,
    /// Components abandoned because they enumerated too many paths; nothing is emitted
    pub num_given_up: usize,
    /// Components skipped for holding more contigs than the configured factor allows
    pub num_too_large: usize
}

/// Core utility that merges a partitioned batch of contigs and writes the supercontigs.
#[derive(Debug)]
pub struct MergePipeline<'a> {
    /// The batch under consideration
    batch: &'a ContigBatch,
    /// The config for this run
    config: MergeConfig
}

impl<'a> MergePipeline<'a> {
    /// Creates a new pipeline over a batch.
    /// # Arguments
    /// * `batch` - the contig batch
    /// * `config` - the partitioning and merging options
    pub fn new(batch: &'a ContigBatch, config: MergeConfig) -> MergePipeline<'a> {
        MergePipeline {
            batch,
            config
        }
    }

    /// Partitions the batch, builds the components, and merges every one of them.
    /// # Arguments
    /// * `writer` - where the FASTA records go
    /// # Errors
    /// * on invalid configuration or when writing fails
    pub fn run<W: Write>(&self, writer: &mut W) -> Result<MergeStats, Box<dyn std::error::Error>> {
        let mut partition = Partitioner::new(self.batch, self.config.clone())?.partition()?;
        let components = components_from_partition(&mut partition, self.batch.len());
        self.construct_supercontigs(&components, writer)
    }

    /// Merges an already-built component map and writes the supercontigs.
    ///
    /// The per-batch position in the output headers advances only for components that
    /// reach the merge step; skipped and singleton components do not consume a slot.
    /// # Arguments
    /// * `components` - the ordered component map
    /// * `writer` - where the FASTA records go
    /// # Errors
    /// * when writing fails
    pub fn construct_supercontigs<W: Write>(
        &self,
        components: &BTreeMap<usize, Component>,
        writer: &mut W
    ) -> Result<MergeStats, Box<dyn std::error::Error>> {
        info!("Constructing supercontigs");

        let mut stats = MergeStats {
            num_components: components.len(),
            ..Default::default()
        };
        let max_component_size = self.config.max_component_factor * self.batch.num_samples();

        let mut position = 0;
        for component in components.values() {
            let order = component.align_order();

            if order.len() > max_component_size {
                warn!("Skipping component of size {}", order.len());
                stats.num_too_large += 1;
                continue;
            }

            // a contig that aligned to nothing is passed through under its own id
            if order.len() == 1 {
                let index = order[0];
                write_singleton(writer, &self.batch.id_of(index), self.batch.sequence(index))?;
                stats.num_singletons += 1;
                continue;
            }

            debug!("Merging component {}.{} of size {}", self.config.batch_index, position, order.len());

            let mut builder = SupercontigBuilder::with_config(self.config.clone())?;
            for &index in order.iter() {
                builder.add_sequence(self.batch.sequence(index))?;
            }

            match builder.build()? {
                Some(merged) => {
                    if merged.len() > 1 {
                        stats.num_branching += 1;
                    }
                    write_supercontigs(writer, &merged, order.len(), self.config.batch_index, position)?;
                }
                None => {
                    debug!(
                        "Component {}.{} of size {} given up",
                        self.config.batch_index, position, order.len()
                    );
                    stats.num_given_up += 1;
                    stats.num_branching += 1;
                }
            }
            position += 1;
        }

        info!("{} components are merged from several contigs", stats.num_components - stats.num_singletons);
        info!("{} contigs did not align with any other contig", stats.num_singletons);
        info!("{} components are branching, given up on {} of them", stats.num_branching, stats.num_given_up);
        info!("{} components exceeded the maximum number of contigs for merging", stats.num_too_large);

        Ok(stats)
    }

    // getters
    pub fn batch(&self) -> &ContigBatch {
        self.batch
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }
}
