//! Statistical helpers for checking weighted selection and win rates.
//!
//! The attacker pool is only correct if every live unit is chosen with
//! probability `speed / total_speed`. These helpers sample the pool and
//! run a chi-square goodness-of-fit test against that distribution.

use skirmish_core::battle::Battlefield;
use skirmish_core::draw::DrawSource;

/// Chi-square critical values at p = 0.001 for 1..=10 degrees of freedom.
const CHI_SQUARE_999: [f64; 10] = [
    10.828, 13.816, 16.266, 18.467, 20.515, 22.458, 24.322, 26.124, 27.877, 29.588,
];

/// Upper-tail z score for p = 0.001.
const Z_999: f64 = 3.090;

/// Draw `samples` attackers from the pool, counting picks per unit id.
pub fn selection_counts(
    field: &Battlefield,
    draws: &mut impl DrawSource,
    samples: u32,
) -> Vec<u64> {
    let mut counts = vec![0u64; field.units().len()];
    let pool = field.pool();
    if pool.is_empty() {
        return counts;
    }
    for _ in 0..samples {
        if let Some(id) = pool.get(draws.draw_index(pool.len())) {
            counts[id.index()] += 1;
        }
    }
    counts
}

/// Expected selection probability per unit id: `speed / total live speed`.
/// Dead units get 0.
#[must_use]
pub fn expected_shares(field: &Battlefield) -> Vec<f64> {
    let total: f64 = field
        .units()
        .iter()
        .filter(|u| u.is_alive())
        .map(|u| f64::from(u.speed))
        .sum();
    field
        .units()
        .iter()
        .map(|u| {
            if u.is_alive() && total > 0.0 {
                f64::from(u.speed) / total
            } else {
                0.0
            }
        })
        .collect()
}

/// Pearson chi-square statistic. Categories with zero expected probability
/// are skipped.
#[must_use]
pub fn chi_square(observed: &[u64], expected: &[f64]) -> f64 {
    let n: u64 = observed.iter().sum();
    observed
        .iter()
        .zip(expected)
        .filter(|(_, &p)| p > 0.0)
        .map(|(&o, &p)| {
            let e = p * n as f64;
            let diff = o as f64 - e;
            diff * diff / e
        })
        .sum()
}

/// Critical chi-square value at p = 0.001.
///
/// Exact table values up to 10 degrees of freedom, Wilson-Hilferty
/// approximation beyond.
#[must_use]
pub fn chi_square_critical(degrees_of_freedom: usize) -> f64 {
    match degrees_of_freedom {
        0 => 0.0,
        1..=10 => CHI_SQUARE_999[degrees_of_freedom - 1],
        _ => {
            let k = degrees_of_freedom as f64;
            let a = 2.0 / (9.0 * k);
            k * (1.0 - a + Z_999 * a.sqrt()).powi(3)
        }
    }
}

/// Whether the observed selection counts fit the speed-weighted
/// distribution at the 0.1% significance level.
#[must_use]
pub fn fits_speed_weighting(observed: &[u64], expected: &[f64]) -> bool {
    let categories = expected.iter().filter(|&&p| p > 0.0).count();
    if categories < 2 {
        return true;
    }
    chi_square(observed, expected) < chi_square_critical(categories - 1)
}

/// Whether an observed rate is within `sigmas` standard errors of the
/// expected rate for `n` Bernoulli trials.
#[must_use]
pub fn within_sigma(observed: f64, expected: f64, n: u32, sigmas: f64) -> bool {
    if n == 0 {
        return false;
    }
    let std_err = (expected * (1.0 - expected) / f64::from(n)).sqrt();
    (observed - expected).abs() <= sigmas * std_err.max(f64::EPSILON)
}
