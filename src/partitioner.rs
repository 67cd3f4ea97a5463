
/*!
This module provides access to the Partitioner, which streams the contigs of a batch
through a filter-and-verify alignment pipeline and groups everything that overlaps into
connected components via a union-find.

The filter buckets shared q-grams by diagonal and only verifies (target, bucket) pairs
that collect enough hits to be consistent with the configured error rate and minimum
match length. Verification is a banded Smith-Waterman restricted to the bucket's
diagonals; a pair is accepted iff its local score exceeds the configured threshold.

# Example usage
```rust
use supercon::contig::{Contig, ContigBatch};
use supercon::merge_config::MergeConfigBuilder;
use supercon::partitioner::Partitioner;

let batch = ContigBatch::from_contigs(vec![
    Contig::new("s1", "c0", b"TTGCAATGACGGTCATCGAC".to_vec()),
    Contig::new("s2", "c0", b"ACGGTCATCGACTCCAGGTT".to_vec()),
]);
let config = MergeConfigBuilder::default()
    .qgram_length(4)
    .min_score(8)
    .minimal_length(8)
    .build().unwrap();

let partition = Partitioner::new(&batch, config).unwrap().partition().unwrap();
assert!(partition.aligned_pairs().contains(&(0, 1)));
```
*/

use itertools::Itertools;
use log::{debug, info};
use rustc_hash::FxHashMap as HashMap;
use simple_error::bail;
use std::collections::BTreeSet;

use crate::contig::ContigBatch;
use crate::merge_config::MergeConfig;
use crate::qgram_index::{qgram_hashes, QGramIndex, MAX_QGRAM_LENGTH};
use crate::sequence_alignment::banded_local_align;
use crate::union_find::UnionFind;

/// The outcome of partitioning a batch: the accepted pairs of logical contig indices and
/// the union-find holding the connected components over both strands.
#[derive(Debug)]
pub struct Partition {
    /// Accepted (query, target) pairs of logical indices
    aligned_pairs: BTreeSet<(usize, usize)>,
    /// Union-find over the 2N logical indices
    union_find: UnionFind
}

impl Partition {
    /// Creates an empty partition over a logical index space, e.g. for replaying
    /// previously persisted aligned pairs.
    /// # Arguments
    /// * `num_logical` - size of the logical index space, 2N
    pub fn empty(num_logical: usize) -> Partition {
        Partition {
            aligned_pairs: BTreeSet::new(),
            union_find: UnionFind::new(num_logical)
        }
    }

    // getters
    pub fn aligned_pairs(&self) -> &BTreeSet<(usize, usize)> {
        &self.aligned_pairs
    }

    pub fn union_find_mut(&mut self) -> &mut UnionFind {
        &mut self.union_find
    }

    /// Records a pair that was verified elsewhere (e.g. read back from disk) and joins
    /// the two contigs and their reverse complements. Pairs already in the same set are
    /// ignored, which deduplicates across multiple input files. Returns whether the pair
    /// was new.
    /// # Arguments
    /// * `a` - first logical index
    /// * `b` - second logical index
    /// * `num_forward` - the forward contig count N, for the rc twin indices
    pub fn add_pair(&mut self, a: usize, b: usize, num_forward: usize) -> bool {
        if self.union_find.find(a) == self.union_find.find(b) {
            return false;
        }
        let rc = |x: usize| if x < num_forward { x + num_forward } else { x - num_forward };
        self.aligned_pairs.insert((a, b));
        self.union_find.union(a, b);
        self.union_find.union(rc(a), rc(b));
        true
    }
}

/// Parameters of the q-gram filter, derived once per run from the config.
#[derive(Clone, Copy, Debug)]
struct FilterParams {
    /// Hits a diagonal bucket must collect before it is verified
    threshold: u32,
    /// log2 of the bucket width
    shift: u32,
    /// Diagonal slack below a bucket, the number of indels the filter tolerates
    overlap: isize
}

impl FilterParams {
    fn from_config(config: &MergeConfig) -> FilterParams {
        let max_errors = (config.error_rate * config.minimal_length as f64).floor() as usize;
        // the q-gram lemma: a match of length L with e errors keeps at least
        // (L + 1) - q * (e + 1) of its q-grams intact
        let threshold = (config.minimal_length + 1)
            .saturating_sub(config.qgram_length * (max_errors + 1))
            .max(1) as u32;
        let width = (max_errors + 1).next_power_of_two();
        FilterParams {
            threshold,
            shift: width.trailing_zeros(),
            overlap: max_errors as isize
        }
    }
}

/// Core utility that partitions a contig batch into components of overlapping contigs.
#[derive(Debug)]
pub struct Partitioner<'a> {
    /// The batch under consideration
    batch: &'a ContigBatch,
    /// The config for this run
    config: MergeConfig
}

impl<'a> Partitioner<'a> {
    /// Creates a new partitioner and performs sanity checks on the config.
    /// # Arguments
    /// * `batch` - the contig batch to partition
    /// * `config` - the partitioning and merging options
    /// # Errors
    /// * if the q-gram length, error rate, or scoring options are out of range
    pub fn new(batch: &'a ContigBatch, config: MergeConfig) -> Result<Partitioner<'a>, Box<dyn std::error::Error>> {
        if config.qgram_length == 0 || config.qgram_length > MAX_QGRAM_LENGTH {
            bail!("q-gram length must be in 1..={}, got {}", MAX_QGRAM_LENGTH, config.qgram_length);
        }
        if !(config.error_rate > 0.0 && config.error_rate < 1.0) {
            bail!("error rate must be strictly between 0 and 1, got {}", config.error_rate);
        }
        if config.match_score <= 0 {
            bail!("match score must be positive, got {}", config.match_score);
        }
        if config.error_penalty >= 0 {
            bail!("error penalty must be negative, got {}", config.error_penalty);
        }
        if config.min_score <= 0 {
            bail!("minimum score must be positive, got {}", config.min_score);
        }
        Ok(Partitioner {
            batch,
            config
        })
    }

    /// Streams every forward contig against the q-gram index of all logical contigs,
    /// verifying candidate buckets and joining accepted pairs in the union-find.
    /// Unverifiable candidates are skipped silently.
    /// # Errors
    /// * if the q-gram index cannot be built
    pub fn partition(&self) -> Result<Partition, Box<dyn std::error::Error>> {
        let num_forward = self.batch.len();
        let num_logical = self.batch.num_logical();
        let mut partition = Partition::empty(num_logical);

        info!("Partitioning contigs");
        info!("- Indexing batch of {} contigs over both strands", num_forward);

        let sequences: Vec<&[u8]> = (0..num_logical).map(|i| self.batch.sequence(i)).collect();
        let index = QGramIndex::build(&sequences, self.config.qgram_length)?;

        let params = FilterParams::from_config(&self.config);
        let delta = self.config.band_extension();
        let scoring = self.config.scoring();
        debug!("Filter parameters: {:?}, band extension {}", params, delta);

        info!("- Streaming over all contigs");
        let mut num_comparisons: usize = 0;

        for a in 0..num_forward {
            // count q-gram hits per (target, diagonal bucket)
            let mut bucket_hits: HashMap<(u32, isize), u32> = Default::default();
            for (i, hash) in qgram_hashes(sequences[a], self.config.qgram_length) {
                for &(b, o) in index.occurrences(hash) {
                    let diagonal = o as isize - i as isize;
                    let entry = bucket_hits.entry((b, diagonal >> params.shift)).or_insert(0);
                    *entry += 1;
                }
            }

            // the passing buckets are this query's verification candidates
            let candidates = bucket_hits.into_iter()
                .filter_map(|(key, hits)| if hits >= params.threshold { Some(key) } else { None })
                .sorted();

            for (b, bucket) in candidates {
                let b = b as usize;

                // align contigs of different samples only; this also drops self-hits
                if self.batch.sample_of(a) == self.batch.sample_of(b) {
                    continue;
                }

                // align contigs only if they are not in the same component already
                if partition.union_find.find(a) == partition.union_find.find(b) {
                    continue;
                }

                // the bucket's inclusive diagonal interval, padded by the filter overlap
                // and by a tenth of the score threshold
                let lower = (bucket << params.shift) - params.overlap - delta;
                let upper = ((bucket + 1) << params.shift) - 1 + delta;

                // verify by banded Smith-Waterman alignment
                num_comparisons += 1;
                let alignment = banded_local_align(sequences[a], sequences[b], lower, upper, scoring);
                if alignment.score <= self.config.min_score {
                    continue;
                }

                partition.aligned_pairs.insert((a, b));

                // join the two contigs and their reverse complements
                partition.union_find.union(a, b);
                partition.union_find.union(self.batch.rc_index(a), self.batch.rc_index(b));

                // stop aligning this contig once its component is saturated
                if partition.union_find.set_size(a) > self.config.max_set_size {
                    break;
                }
            }
        }

        info!("Number of pairwise comparisons: {}", num_comparisons);
        info!("Number of valid alignments:     {}", partition.aligned_pairs.len());

        Ok(partition)
    }

    // getters
    pub fn batch(&self) -> &ContigBatch {
        self.batch
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }
}
