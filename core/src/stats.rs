//! Normal-distribution helpers for the length score.

/// Standard-normal CDF, Abramowitz & Stegun 26.2.17 five-term rational
/// approximation, as used by Gale & Church for length matching.
///
/// `magnitude` is expected non-negative; the absolute error of the
/// approximation is below 7.5e-8.
pub fn pnorm(magnitude: f64) -> f64 {
    let t = 1.0 / (1.0 + 0.2316419 * magnitude);

    1.0 - 0.3989423
        * (-magnitude * magnitude / 2.0).exp()
        * ((((1.330274429 * t - 1.821255978) * t + 1.781477937) * t - 0.356563782) * t
            + 0.319381530)
        * t
}

/// Standardizes a deviation against a variance scaled by the local mean.
pub fn standardize(value: f64, mean: f64, variance: f64) -> f64 {
    value / (variance * mean).sqrt()
}

pub fn average(a: f64, b: f64) -> f64 {
    (a + b) / 2.0
}
