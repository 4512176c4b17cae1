use quantfolio::config::EncodingConfig;
use quantfolio::engines::encoding::{QuboEncoder, VarId};
use quantfolio::types::ReturnsStatistics;

fn encoder(precision_bits: usize) -> QuboEncoder {
    QuboEncoder::new(&EncodingConfig {
        precision_bits,
        penalty_multiplier: 100.0,
        noise_amplitude: 0.0,
        noise_seed: 42,
    })
}

fn stats(n: usize) -> ReturnsStatistics {
    let expected_returns = (0..n).map(|i| 0.05 + 0.01 * i as f64).collect();
    let mut covariance = vec![vec![0.0; n]; n];
    for (i, row) in covariance.iter_mut().enumerate() {
        row[i] = 0.04 + 0.01 * i as f64;
    }
    ReturnsStatistics {
        expected_returns,
        covariance,
    }
}

#[test]
fn test_variable_count_scales_with_assets_and_bits() {
    for (n, bits) in [(1, 1), (1, 4), (2, 4), (3, 2), (5, 3)] {
        let problem = encoder(bits).build(&stats(n), 0.5).unwrap();
        assert_eq!(problem.num_variables(), n * bits);
        assert_eq!(problem.linear().len(), n * bits);
        assert_eq!(problem.variables().count(), n * bits);
    }
}

#[test]
fn test_quadratic_keys_canonical_and_unique() {
    let problem = encoder(4).build(&stats(3), 0.5).unwrap();

    for (a, b) in problem.quadratic().keys() {
        assert!(a <= b, "non-canonical key ({:?}, {:?})", a, b);
    }

    // Every unordered pair of the 12 variables, plus the 12 self pairs.
    assert_eq!(problem.quadratic().len(), 12 * 11 / 2 + 12);
}

#[test]
fn test_budget_penalty_rewards_full_allocation() {
    let problem = encoder(4).build(&stats(2), 0.5).unwrap();

    let empty = vec![false; 8];
    // Asset 0 fully allocated: bits 0..4 set.
    let full_single = vec![true, true, true, true, false, false, false, false];
    // Everything set: allocation of 2.0, far past the budget.
    let overfull = vec![true; 8];

    let empty_value = problem.evaluate(&empty);
    let full_value = problem.evaluate(&full_single);
    let overfull_value = problem.evaluate(&overfull);

    assert!(full_value < empty_value);
    assert!(full_value < overfull_value);
}

#[test]
fn test_identical_inputs_produce_identical_problems() {
    let noisy = EncodingConfig {
        precision_bits: 4,
        penalty_multiplier: 100.0,
        noise_amplitude: 0.01,
        noise_seed: 42,
    };

    let a = QuboEncoder::new(&noisy).build(&stats(3), 0.3).unwrap();
    let b = QuboEncoder::new(&noisy).build(&stats(3), 0.3).unwrap();

    assert_eq!(a.linear(), b.linear());
    assert_eq!(a.quadratic(), b.quadratic());
}

#[test]
fn test_return_appetite_extremes() {
    // Pure return-seeking: risk carries zero coefficient everywhere.
    let return_only = encoder(2).build(&stats(2), 1.0).unwrap();
    let risk_pair = (
        VarId { asset: 0, bit: 0 },
        VarId { asset: 0, bit: 1 },
    );
    // Same-asset cross pairs come only from the risk term, so at full
    // appetite they must be exactly zero.
    assert_eq!(return_only.quadratic()[&risk_pair], 0.0);

    // Pure risk avoidance still carries the budget penalty in the
    // linear terms, but no return contribution.
    let risk_only = encoder(2).build(&stats(2), 0.0).unwrap();
    let var = VarId { asset: 1, bit: 0 };
    let penalty = 100.0 * 2.0;
    let w = 1.0 / 3.0;
    assert!((risk_only.linear()[&var] - (-2.0 * penalty * w)).abs() < 1e-12);
}
