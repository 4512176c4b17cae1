use crate::engines::encoding::{bit_weight, VarId};
use crate::types::Weights;

/// Maps a solver bitstring back to a normalized weight vector.
pub struct SolutionDecoder {
    precision_bits: usize,
}

impl SolutionDecoder {
    pub fn new(precision_bits: usize) -> Self {
        Self { precision_bits }
    }

    /// Sum the bit weights of every set bit per asset, then normalize.
    /// An all-false assignment degenerates to the uniform allocation.
    ///
    /// Missing trailing bits read as false, so a short assignment never
    /// panics.
    pub fn decode(&self, assignment: &[bool], num_assets: usize) -> Weights {
        let mut raw = vec![0.0; num_assets];

        for asset in 0..num_assets {
            for bit in 0..self.precision_bits {
                let var = VarId { asset, bit };
                if assignment
                    .get(var.index(self.precision_bits))
                    .copied()
                    .unwrap_or(false)
                {
                    raw[asset] += bit_weight(bit, self.precision_bits);
                }
            }
        }

        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            log::warn!("Decoded assignment has no set bits; falling back to uniform weights");
            return Weights::uniform(num_assets);
        }

        Weights::from_raw(raw).normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_asset_fully_set_round_trips_to_one() {
        let decoder = SolutionDecoder::new(4);
        // Asset 1 has all four bits set, asset 0 none.
        let assignment = vec![false, false, false, false, true, true, true, true];

        let weights = decoder.decode(&assignment, 2);
        assert_eq!(weights.values(), &[0.0, 1.0]);
    }

    #[test]
    fn test_all_false_degenerates_to_uniform() {
        let decoder = SolutionDecoder::new(4);
        let weights = decoder.decode(&[false; 8], 2);
        assert_eq!(weights.values(), &[0.5, 0.5]);
    }

    #[test]
    fn test_partial_bits_normalize() {
        let decoder = SolutionDecoder::new(2);
        // Asset 0: bit 0 (1/3); asset 1: bit 1 (2/3); already sums to 1.
        let assignment = vec![true, false, false, true];

        let weights = decoder.decode(&assignment, 2);
        assert!((weights.values()[0] - 1.0 / 3.0).abs() < 1e-12);
        assert!((weights.values()[1] - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_short_assignment_reads_missing_bits_as_false() {
        let decoder = SolutionDecoder::new(4);
        let weights = decoder.decode(&[true], 2);
        assert_eq!(weights.values(), &[1.0, 0.0]);
    }
}
