
/*!
This module provides access to the SupercontigBuilder, which merges the ordered contigs
of one component into a small set of branching path sequences.

The graph starts as a single vertex holding the first contig. Every further contig is
aligned against all source-to-sink paths of the growing graph; the best-scoring path is
chosen and the unaligned flanks of the contig are spliced in as new branch vertices. The
aligned middle is never edited, so the chosen path's letters stand for that interval.

# Example usage
```rust
use supercon::merge_config::MergeConfigBuilder;
use supercon::supercontig::SupercontigBuilder;

let config = MergeConfigBuilder::default()
    .qgram_length(4)
    .error_penalty(-3)
    .min_branch_len(2)
    .build().unwrap();

let mut builder = SupercontigBuilder::with_config(config).unwrap();
builder.add_sequence(b"AAAACCCC").unwrap();
builder.add_sequence(b"CCCCGGGG").unwrap();

let merged = builder.build().unwrap().unwrap();
assert_eq!(merged, vec![b"AAAACCCCGGGG".to_vec()]);
```
*/

use log::{debug, trace};
use simple_error::bail;

use crate::merge_config::MergeConfig;
use crate::sequence_alignment::{banded_local_align, best_diagonal, local_align, LocalAlignment};
use crate::sequence_graph::{GraphPath, SequenceGraph};

/// Core utility that merges the sequences of one component into a sequence graph and
/// reads the merged supercontigs back off its paths.
#[derive(Debug, Default)]
pub struct SupercontigBuilder<'a> {
    /// The component's contig sequences in alignment-adjacency order
    sequences: Vec<&'a [u8]>,
    /// The config for this merge
    config: MergeConfig
}

impl<'a> SupercontigBuilder<'a> {
    /// Creates a new instance of SupercontigBuilder.
    /// # Arguments
    /// * `config` - the merging options
    /// # Errors
    /// * None so far
    pub fn with_config(config: MergeConfig) -> Result<SupercontigBuilder<'a>, Box<dyn std::error::Error>> {
        Ok(SupercontigBuilder {
            sequences: vec![],
            config
        })
    }

    /// Adds the next sequence of the component.
    /// # Arguments
    /// * `sequence` - the sequence to add
    /// # Errors
    /// * if the sequence is empty; vertex labels must be non-empty
    pub fn add_sequence(&mut self, sequence: &'a [u8]) -> Result<(), Box<dyn std::error::Error>> {
        if sequence.is_empty() {
            bail!("Cannot merge an empty sequence");
        }
        self.sequences.push(sequence);
        Ok(())
    }

    /// Merges all added sequences and returns the final path sequences, or `None` when
    /// the merge is given up because the graph enumerated more than the configured
    /// maximum number of paths. Low-scoring alignments are spliced regardless; the
    /// component's earlier grouping is trusted.
    /// # Errors
    /// * if no sequences were added
    pub fn build(&self) -> Result<Option<Vec<Vec<u8>>>, Box<dyn std::error::Error>> {
        if self.sequences.is_empty() {
            bail!("Cannot merge an empty component");
        }

        let scoring = self.config.scoring();
        let mut graph = SequenceGraph::with_seed(self.sequences[0].to_vec());

        for (i, &sequence) in self.sequences.iter().enumerate().skip(1) {
            // one extra path is enough to notice the cap is blown
            let paths = graph.enumerate_paths(Some(self.config.max_paths + 1));
            if paths.len() > self.config.max_paths {
                debug!("Giving up the merge at sequence {}: more than {} paths", i, self.config.max_paths);
                return Ok(None);
            }

            // align against every path; on ties the first path in enumeration order wins
            let mut best_score = i32::MIN;
            let mut best: Option<(usize, LocalAlignment)> = None;
            for (p, path) in paths.iter().enumerate() {
                let alignment = match best_diagonal(sequence, &path.seq, self.config.qgram_length) {
                    Some(diag) => banded_local_align(
                        sequence,
                        &path.seq,
                        diag - self.config.band_radius,
                        diag + self.config.band_radius,
                        scoring
                    ),
                    None => local_align(sequence, &path.seq, scoring)
                };
                trace!("Sequence {} vs path {}: score {}", i, p, alignment.score);
                if alignment.score > best_score {
                    best_score = alignment.score;
                    best = Some((p, alignment));
                }
            }

            let (p, alignment) = best.expect("a seeded graph always has at least one path");
            splice(&mut graph, &paths[p], sequence, &alignment, self.config.min_branch_len);
        }

        let merged = graph.enumerate_paths(None).into_iter()
            .map(|path| path.seq)
            .collect();
        Ok(Some(merged))
    }

    // getters
    pub fn sequences(&self) -> &[&'a [u8]] {
        &self.sequences
    }

    pub fn config(&self) -> &MergeConfig {
        &self.config
    }
}

/// Splices a sequence into the graph along its best path alignment. The right flank is
/// handled before the left one, against the path's original position map.
/// # Arguments
/// * `graph` - the graph being grown
/// * `path` - the chosen path
/// * `sequence` - the incoming sequence
/// * `alignment` - the local alignment of `sequence` (first) against `path.seq` (second)
/// * `min_branch_len` - flanks at or below this length are discarded
fn splice(graph: &mut SequenceGraph, path: &GraphPath, sequence: &[u8], alignment: &LocalAlignment, min_branch_len: usize) {
    // --- right end of the alignment

    let end_seq = alignment.end1;
    let end_path = alignment.end2;
    if end_seq < sequence.len() {
        let (v, v_end) = path.vertex_at(end_path);

        if end_path == path.seq.len() {
            // the alignment runs through the sink; the flank extends the last label
            graph.label_mut(v).extend_from_slice(&sequence[end_seq..]);
        } else if sequence.len() - end_seq > min_branch_len {
            if v_end > end_path {
                let split_at = graph.label(v).len() - (v_end - end_path);
                if split_at == 0 {
                    // the alignment never entered the path; the flank competes with the
                    // whole of it as a fresh source rather than splitting off an empty label
                    let branch = graph.add_vertex(sequence[end_seq..].to_vec());
                    graph.add_source(branch);
                    return;
                }
                graph.split_vertex(v, split_at);
            }
            let branch = graph.add_vertex(sequence[end_seq..].to_vec());
            graph.add_edge(v, branch);
        }
    }

    // --- left end of the alignment

    let begin_seq = alignment.begin1;
    let begin_path = alignment.begin2;
    if begin_seq > 0 {
        let (u, u_end) = path.vertex_after(begin_path);

        if begin_path == 0 {
            // the alignment starts at a source; the flank grows the first label leftwards
            let label = graph.label_mut(u);
            let mut prefixed = sequence[..begin_seq].to_vec();
            prefixed.extend_from_slice(label);
            *label = prefixed;
        } else if begin_seq > min_branch_len {
            let mut attach = u;
            // the length guard keeps a label grown by the right flank from wrapping the
            // subtraction; such a vertex takes the branch without a split
            let label_len = graph.label(u).len();
            if u_end >= label_len && u_end - label_len < begin_path {
                // the alignment starts strictly inside u; the branch attaches to the
                // suffix half so the boundary falls exactly at the alignment start
                let split_at = label_len - (u_end - begin_path);
                attach = graph.split_vertex(u, split_at);
            }
            let branch = graph.add_vertex(sequence[..begin_seq].to_vec());
            graph.add_source(branch);
            graph.add_edge(branch, attach);
        }
    }
}
