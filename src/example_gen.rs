
use rand::distributions::Uniform;
use rand::{Rng, SeedableRng};

use crate::contig::{Contig, ContigBatch};

const ALPHABET: &[u8; 4] = b"ACGT";

/// Creates a test batch we can verify is working: a random reference and, per sample,
/// a series of overlapping windows cut from it with errors injected.
/// # Arguments
/// * `reference_length` - the length of the underlying reference
/// * `num_samples` - the number of samples to cut windows for
/// * `contigs_per_sample` - the number of windows per sample; adjacent windows overlap
/// * `error_rate` - overall error rate, assumes mismatch, insertion, and deletion are equally likely sub-components of this error rate
/// * `seed` - rng seed, so callers get reproducible batches
pub fn generate_contig_batch(
    reference_length: usize,
    num_samples: usize,
    contigs_per_sample: usize,
    error_rate: f64,
    seed: u64
) -> (Vec<u8>, ContigBatch) {
    assert!(num_samples > 0 && contigs_per_sample > 0);
    assert!((0.0..=1.0).contains(&error_rate));

    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let base_distribution = Uniform::new(0, 4u8);
    let basem1_distribution = Uniform::new(0, 3u8);
    let error_distribution = Uniform::new(0.0, 1.0);
    let error_type_distribution = Uniform::new(0, 3);

    let reference: Vec<u8> = (0..reference_length)
        .map(|_i| ALPHABET[rng.sample(base_distribution) as usize])
        .collect();

    // adjacent windows share half their length
    let window_length = 2 * reference_length / (contigs_per_sample + 1);
    let step = if contigs_per_sample > 1 {
        (reference_length - window_length) / (contigs_per_sample - 1)
    } else {
        0
    };

    let mut contigs = vec![];
    for sample in 0..num_samples {
        for window in 0..contigs_per_sample {
            let start = window * step;
            let template = &reference[start..(start + window_length).min(reference_length)];

            let mut seq = vec![];
            let mut ref_index = 0;
            while ref_index < template.len() {
                let c = template[ref_index];
                let is_error = rng.sample(error_distribution) < error_rate;
                if is_error {
                    let error_type = rng.sample(error_type_distribution);
                    match error_type {
                        0 => {
                            // substitution
                            let offset = rng.sample(basem1_distribution);
                            let original = ALPHABET.iter().position(|&a| a == c).unwrap() as u8;
                            seq.push(ALPHABET[((original + 1 + offset) % 4) as usize]);
                            ref_index += 1;
                        },
                        1 => {
                            // deletion
                            ref_index += 1;
                        },
                        2 => {
                            // insertion
                            seq.push(ALPHABET[rng.sample(base_distribution) as usize]);
                        },
                        _ => panic!("no impl")
                    }
                } else {
                    seq.push(c);
                    ref_index += 1;
                }
            }

            contigs.push(Contig::new(&format!("s{}", sample), &format!("c{}", window), seq));
        }
    }

    (reference, ContigBatch::from_contigs(contigs))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_free_windows_match_reference() {
        let (reference, batch) = generate_contig_batch(200, 2, 3, 0.0, 0);
        assert_eq!(reference.len(), 200);
        assert_eq!(batch.len(), 6);
        assert_eq!(batch.num_samples(), 2);

        // window 0 of every sample is a verbatim prefix of the reference
        assert_eq!(batch.sequence(0), &reference[..100]);
        assert_eq!(batch.sequence(3), &reference[..100]);
        // the last window ends at the reference end
        assert_eq!(batch.sequence(2), &reference[100..]);
    }

    #[test]
    fn test_seed_reproducibility() {
        let (ref1, batch1) = generate_contig_batch(150, 2, 2, 0.05, 7);
        let (ref2, batch2) = generate_contig_batch(150, 2, 2, 0.05, 7);
        assert_eq!(ref1, ref2);
        assert_eq!(batch1.contigs(), batch2.contigs());

        let (ref3, _batch3) = generate_contig_batch(150, 2, 2, 0.05, 8);
        assert_ne!(ref1, ref3);
    }

    #[test]
    fn test_errors_change_windows() {
        let (reference, batch) = generate_contig_batch(200, 1, 2, 0.2, 0);
        // at a 20% error rate a 100 bp window practically never survives untouched
        assert_ne!(batch.sequence(0), &reference[..100]);
    }
}
