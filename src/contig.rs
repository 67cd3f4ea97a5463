
/*!
Contig records and the batch container that owns them.

A batch of N physical contigs spans a logical index space of size 2N: index `g` is the
forward orientation of contig `g` and index `g + N` is its reverse complement. Everything
downstream (partitioning, components, merging) works on logical indices, so both strands
of a contig can join the same component.
*/

use rustc_hash::FxHashSet as HashSet;

/// Orientation of a logical contig index
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Orientation {
    Forward,
    ReverseComplement
}

/// One assembled contig from a single sample. Immutable after construction.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Contig {
    /// Name of the sample the contig was assembled from
    sample: String,
    /// Name of the contig within the sample
    name: String,
    /// The nucleotide sequence over {A, C, G, T, N}
    sequence: Vec<u8>
}

impl Contig {
    /// Creates a new contig record.
    /// The sequence is normalized to upper case; anything outside {A, C, G, T} becomes `N`.
    /// # Arguments
    /// * `sample` - the sample name
    /// * `name` - the contig name within the sample
    /// * `sequence` - the nucleotide sequence
    pub fn new(sample: &str, name: &str, sequence: Vec<u8>) -> Contig {
        let sequence = sequence.into_iter()
            .map(|c| match c.to_ascii_uppercase() {
                b @ (b'A' | b'C' | b'G' | b'T') => b,
                _ => b'N'
            })
            .collect();
        Contig {
            sample: sample.to_string(),
            name: name.to_string(),
            sequence
        }
    }

    // getters
    pub fn sample(&self) -> &str {
        &self.sample
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sequence(&self) -> &[u8] {
        &self.sequence
    }
}

/// Returns the reverse complement of a sequence; `N` stays `N`.
pub fn reverse_complement(sequence: &[u8]) -> Vec<u8> {
    sequence.iter().rev()
        .map(|&c| match c {
            b'A' => b'T',
            b'C' => b'G',
            b'G' => b'C',
            b'T' => b'A',
            _ => b'N'
        })
        .collect()
}

/// Owns a batch of contigs and exposes the logical index space over both strands.
/// Reverse complements are materialized once at construction so that all sequence
/// access hands out plain slices.
#[derive(Debug, Default)]
pub struct ContigBatch {
    /// The forward contig records
    contigs: Vec<Contig>,
    /// Reverse complement sequences, parallel to `contigs`
    rc_sequences: Vec<Vec<u8>>,
    /// Number of distinct sample names in the batch
    num_samples: usize
}

impl ContigBatch {
    /// Builds a batch from forward contig records.
    /// # Arguments
    /// * `contigs` - the forward contigs, one entry per physical contig
    pub fn from_contigs(contigs: Vec<Contig>) -> ContigBatch {
        let rc_sequences = contigs.iter()
            .map(|c| reverse_complement(c.sequence()))
            .collect();
        let num_samples = contigs.iter()
            .map(|c| c.sample())
            .collect::<HashSet<&str>>()
            .len();
        ContigBatch {
            contigs,
            rc_sequences,
            num_samples
        }
    }

    /// Number of physical (forward) contigs, N.
    pub fn len(&self) -> usize {
        self.contigs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.contigs.is_empty()
    }

    /// Size of the logical index space, 2N.
    pub fn num_logical(&self) -> usize {
        2 * self.contigs.len()
    }

    /// Number of distinct samples in the batch.
    pub fn num_samples(&self) -> usize {
        self.num_samples
    }

    /// Maps a logical index to the logical index of the opposite strand.
    pub fn rc_index(&self, index: usize) -> usize {
        let n = self.contigs.len();
        if index < n {
            index + n
        } else {
            index - n
        }
    }

    /// Orientation of a logical index.
    pub fn orientation(&self, index: usize) -> Orientation {
        if index < self.contigs.len() {
            Orientation::Forward
        } else {
            Orientation::ReverseComplement
        }
    }

    /// The sequence of a logical index; the reverse strand was materialized at construction.
    pub fn sequence(&self, index: usize) -> &[u8] {
        let n = self.contigs.len();
        if index < n {
            self.contigs[index].sequence()
        } else {
            &self.rc_sequences[index - n]
        }
    }

    /// The sample name a logical index belongs to; identical for both strands.
    pub fn sample_of(&self, index: usize) -> &str {
        self.contigs[index % self.contigs.len()].sample()
    }

    /// Rendered id of a logical index, `<sample>_<name>` with an `_rc` suffix on the
    /// reverse strand. Used verbatim when a singleton component is emitted.
    pub fn id_of(&self, index: usize) -> String {
        let contig = &self.contigs[index % self.contigs.len()];
        match self.orientation(index) {
            Orientation::Forward => format!("{}_{}", contig.sample(), contig.name()),
            Orientation::ReverseComplement => format!("{}_{}_rc", contig.sample(), contig.name())
        }
    }

    // getters
    pub fn contigs(&self) -> &[Contig] {
        &self.contigs
    }
}
