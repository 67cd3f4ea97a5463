
/*!
Packed q-gram hashing and an occurrence index over a set of sequences.

A q-gram packs into a `u64` at 3 bits per symbol (A, C, G, T, N each get a code), so q is
capped at [`MAX_QGRAM_LENGTH`]. The index is built once over all logical contigs of a
batch and is immutable afterwards, so it can be shared read-only between queries.
*/

use rustc_hash::FxHashMap as HashMap;
use simple_error::bail;

/// Largest supported q-gram length; 3 bits per symbol must fit a u64.
pub const MAX_QGRAM_LENGTH: usize = 21;

/// 3-bit symbol code; anything outside {A, C, G, T} hashes like N.
#[inline]
fn symbol_code(c: u8) -> u64 {
    match c {
        b'A' => 0,
        b'C' => 1,
        b'G' => 2,
        b'T' => 3,
        _ => 4
    }
}

/// Iterates the packed q-gram hashes of a sequence as `(position, hash)` pairs.
/// Yields nothing when the sequence is shorter than q.
pub fn qgram_hashes(sequence: &[u8], qgram_length: usize) -> impl Iterator<Item = (usize, u64)> + '_ {
    assert!(qgram_length > 0 && qgram_length <= MAX_QGRAM_LENGTH);
    let mask = (1u64 << (3 * qgram_length)) - 1;
    sequence.iter()
        .enumerate()
        .scan(0u64, move |hash, (i, &c)| {
            *hash = ((*hash << 3) | symbol_code(c)) & mask;
            Some((i, *hash))
        })
        .filter_map(move |(i, hash)| {
            // the window is only full once q symbols have rolled in
            if i + 1 >= qgram_length {
                Some((i + 1 - qgram_length, hash))
            } else {
                None
            }
        })
}

/// Occurrence index mapping each q-gram of a sequence set to its `(sequence, position)` list.
#[derive(Debug)]
pub struct QGramIndex {
    /// The q-gram length the index was built with
    qgram_length: usize,
    /// Occurrence lists keyed by packed q-gram hash
    occurrences: HashMap<u64, Vec<(u32, u32)>>
}

impl QGramIndex {
    /// Builds the index over a set of sequences.
    /// # Arguments
    /// * `sequences` - the sequences to index; their slot in the slice is the sequence id
    /// * `qgram_length` - the q-gram length, in 1..=[`MAX_QGRAM_LENGTH`]
    /// # Errors
    /// * if the q-gram length is zero or does not pack into a u64
    pub fn build(sequences: &[&[u8]], qgram_length: usize) -> Result<QGramIndex, Box<dyn std::error::Error>> {
        if qgram_length == 0 || qgram_length > MAX_QGRAM_LENGTH {
            bail!("q-gram length must be in 1..={}, got {}", MAX_QGRAM_LENGTH, qgram_length);
        }

        let mut occurrences: HashMap<u64, Vec<(u32, u32)>> = Default::default();
        for (seq_id, sequence) in sequences.iter().enumerate() {
            for (position, hash) in qgram_hashes(sequence, qgram_length) {
                occurrences.entry(hash).or_default().push((seq_id as u32, position as u32));
            }
        }

        Ok(QGramIndex {
            qgram_length,
            occurrences
        })
    }

    /// All `(sequence, position)` occurrences of a q-gram hash; empty if unseen.
    pub fn occurrences(&self, hash: u64) -> &[(u32, u32)] {
        self.occurrences.get(&hash).map_or(&[], |v| v.as_slice())
    }

    // getters
    pub fn qgram_length(&self) -> usize {
        self.qgram_length
    }
}
