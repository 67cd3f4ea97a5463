
/*!
Contains configuration information for partitioning and merging.
Typical usage is to use the builder to construct the config, e.g.
```
use supercon::merge_config::{MergeConfig, MergeConfigBuilder};
let config: MergeConfig = MergeConfigBuilder::default()
    .qgram_length(11)
    .min_score(50)
    .build()
    .unwrap();
```
*/

use crate::sequence_alignment::Scoring;

/**
Contains configuration information for partitioning and merging.
Typical usage is to use the builder to construct the config, e.g.
```
use supercon::merge_config::{MergeConfig, MergeConfigBuilder};
let config: MergeConfig = MergeConfigBuilder::default()
    .qgram_length(11)
    .min_score(50)
    .build()
    .unwrap();
```
*/
#[derive(derive_builder::Builder, Clone, Debug)]
#[builder(default)]
pub struct MergeConfig {
    /// Seed length q for the q-gram filter and the best-diagonal vote
    pub qgram_length: usize,
    /// Reward for a matching pair, positive
    pub match_score: i32,
    /// Cost of a mismatch or gap position, negative
    pub error_penalty: i32,
    /// Verification threshold; a pair is accepted iff its local score exceeds this
    pub min_score: i32,
    /// Minimum match length L assumed by the q-gram filter
    pub minimal_length: usize,
    /// Error tolerance of the q-gram filter, in (0, 1)
    pub error_rate: f64,
    /// Flanks at or below this length are discarded rather than grafted as branches
    pub min_branch_len: usize,
    /// A union-find set beyond this size stops collecting edges from the current query
    pub max_set_size: usize,
    /// Merging a component is abandoned once it enumerates more than this many paths
    pub max_paths: usize,
    /// Components larger than this factor times the sample count are skipped
    pub max_component_factor: usize,
    /// Half-width of the alignment band around the best diagonal during merging
    pub band_radius: isize,
    /// Batch index carried into the supercontig output headers
    pub batch_index: usize
}

impl Default for MergeConfig {
    fn default() -> Self {
        Self {
            // mid-sized seeds balance sensitivity against index size
            qgram_length: 15,
            // unit match reward, steep error cost; overlaps are expected to be near-exact
            match_score: 1,
            error_penalty: -5,
            // an accepted overlap needs roughly a hundred matching positions
            min_score: 90,
            minimal_length: 100,
            error_rate: 0.01,
            // shorter flanks are more likely trimming noise than real branches
            min_branch_len: 30,
            // beyond a hundred members a set stops absorbing edges from one query
            max_set_size: 100,
            // more paths than this and the component is not worth untangling
            max_paths: 30,
            max_component_factor: 10,
            // the band mirrors the one the verification stage derives from its buckets
            band_radius: 25,
            batch_index: 0
        }
    }
}

impl MergeConfig {
    /// The alignment scoring scheme implied by the config.
    pub fn scoring(&self) -> Scoring {
        Scoring {
            match_score: self.match_score,
            error_penalty: self.error_penalty
        }
    }

    /// Band slack added around a verification bucket, one tenth of the score threshold.
    pub fn band_extension(&self) -> isize {
        (self.min_score / 10) as isize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let config = MergeConfigBuilder::default().build().unwrap();
        assert_eq!(config.qgram_length, 15);
        assert_eq!(config.max_paths, 30);
        assert_eq!(config.band_extension(), 9);
    }

    #[test]
    fn test_builder_overrides() {
        let config = MergeConfigBuilder::default()
            .qgram_length(4)
            .min_score(8)
            .error_penalty(-3)
            .build()
            .unwrap();
        assert_eq!(config.qgram_length, 4);
        assert_eq!(config.band_extension(), 0);
        assert_eq!(config.scoring().error_penalty, -3);
    }
}
