/*!
# supercon
This library merges overlapping DNA contigs assembled from many individuals into
"supercontigs": branching path sequences read off a directed acyclic sequence graph.

Processing runs in two stages:
* Partitioning streams the contigs through a q-gram filter with banded Smith-Waterman
  verification and groups everything that overlaps into components, tracking both strands
  of every contig through a union-find.
* Merging seeds a sequence graph with the first contig of a component, aligns each
  further contig against all source-to-sink paths, and splices the unaligned flanks in
  as branch vertices. Each final path is one supercontig.

Oversized components and merges that branch beyond the path cap are given up and
counted, not failed.

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

// partition the batch, merge each component, and collect the FASTA output
let mut fasta = vec![];
let stats = MergePipeline::new(&batch, config).run(&mut fasta).unwrap();
assert_eq!(stats.num_components, 1);
assert_eq!(
    std::str::from_utf8(&fasta).unwrap(),
    ">COMPONENT_0.0_a_length_28_size_2\nTTGCAATGACGGTCATCGACTCCAGGTT\n"
);
```
*/

/// Turning a partition into ordered components
pub mod component;
/// Contig records and the two-strand batch container
pub mod contig;
/// Utility for generating test batches
pub mod example_gen;
/// The aligned-pairs text format and the supercontig FASTA output
pub mod formats;
/// Configuration for partitioning and merging
pub mod merge_config;
/// Batch orchestration: partition, merge, emit
pub mod merge_pipeline;
/// Main functionality for the partitioning component
pub mod partitioner;
/// Packed q-gram hashing and the occurrence index
pub mod qgram_index;
/// Basic pair-wise alignment utilities
pub mod sequence_alignment;
/// The per-component sequence graph and its path enumeration
pub mod sequence_graph;
/// Main functionality for merging one component into supercontigs
pub mod supercontig;
/// Disjoint-set forest over the logical contig indices
pub mod union_find;
