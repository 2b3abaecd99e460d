//! Margin-of-error arithmetic
//!
//! Approximations for combining survey estimates, following the ACS General
//! Handbook (chapter 8). Every function here is total: survey data routinely
//! violates textbook preconditions (a subpopulation larger than its
//! population, negative residuals) because each figure is sampled
//! independently, so inputs are clamped to a plausible range instead of
//! rejected. NaN is reserved for ratios over a population of zero and is
//! propagated, never swallowed.

use serde::{Deserialize, Serialize};

/// Combine margins of error of independent estimates for a sum or difference.
///
/// Returns `sqrt(Σ moe²)`. An empty input yields 0.
pub fn moe_of_sum<I>(moes: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    moes.into_iter().map(|moe| moe * moe).sum::<f64>().sqrt()
}

/// Clamp to `>= 0`, keeping NaN as NaN.
///
/// `f64::max` returns the non-NaN operand, which would quietly turn an
/// undefined residual into a zero.
#[inline]
pub fn floor_at_zero(x: f64) -> f64 {
    if x.is_nan() {
        x
    } else {
        x.max(0.0)
    }
}

/// Estimate `subpop / pop`, constrained to `[0, 1]`.
///
/// - `pop` is treated as at least 1
/// - `subpop` is clamped to `[0, pop]`
///
/// NaN in either input gives NaN.
pub fn ratio_of(subpop_est: f64, pop_est: f64) -> f64 {
    if subpop_est.is_nan() || pop_est.is_nan() {
        return f64::NAN;
    }

    let pop_est = pop_est.max(1.0);
    let subpop_est = subpop_est.clamp(0.0, pop_est);

    (subpop_est / pop_est).clamp(0.0, 1.0)
}

/// Approximate margin of error of `subpop / pop` for estimates drawn from
/// independent sources.
///
/// Evaluates [`ratio_of`] at the two pessimistic corners of the joint
/// interval, `(subpop - moe, pop + moe)` and `(subpop + moe, pop - moe)`, and
/// returns the half-width of the wider side. Because the corners go through
/// the same clamping as the central ratio, the result never exceeds
/// `max(ratio, 1 - ratio)`.
///
/// Both margins must be non-negative. A population estimate `<= 0` has no
/// meaningful ratio and yields NaN.
pub fn moe_of_ratio(subpop_est: f64, subpop_moe: f64, pop_est: f64, pop_moe: f64) -> f64 {
    debug_assert!(!(subpop_moe < 0.0), "negative subpopulation MoE: {subpop_moe}");
    debug_assert!(!(pop_moe < 0.0), "negative population MoE: {pop_moe}");

    if !(pop_est > 0.0) {
        return f64::NAN;
    }

    let central = ratio_of(subpop_est, pop_est);
    let lower = ratio_of(subpop_est - subpop_moe, pop_est + pop_moe);
    let upper = ratio_of(subpop_est + subpop_moe, pop_est - pop_moe);

    (central - lower).max(upper - central)
}

/// Handbook margin of error for a proportion whose subpopulation is nested
/// in the population (e.g. adults who are citizens, out of all adults).
///
/// `sqrt(subpop_moe² - (p * pop_moe)²) / pop`, with `pop >= 1` and `pop_moe`
/// capped at `subpop_moe` so the radicand stays non-negative. Tighter than
/// [`moe_of_ratio`], but only valid when the nesting really holds.
pub fn moe_of_nested_ratio(
    subpop_est: f64,
    subpop_moe: f64,
    pop_est: f64,
    pop_moe: f64,
) -> f64 {
    let pop_est = pop_est.max(1.0);
    let prop = ratio_of(subpop_est, pop_est);
    let pop_moe = pop_moe.min(subpop_moe);

    (subpop_moe * subpop_moe - (prop * pop_moe).powi(2)).sqrt() / pop_est
}

/// A survey estimate together with its margin of error.
///
/// Pairs are values: combinators always return a new pair.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Estimate {
    /// Point estimate
    pub est: f64,
    /// Margin of error at the dataset-wide confidence level
    pub moe: f64,
}

impl Estimate {
    /// Undefined estimate, e.g. a share of an empty population
    pub const NAN: Estimate = Estimate {
        est: f64::NAN,
        moe: f64::NAN,
    };

    pub fn new(est: f64, moe: f64) -> Self {
        Self { est, moe }
    }

    /// An exactly known value (margin of error 0)
    pub fn exact(est: f64) -> Self {
        Self { est, moe: 0.0 }
    }

    /// True if either component is NaN
    pub fn is_nan(&self) -> bool {
        self.est.is_nan() || self.moe.is_nan()
    }

    /// Sum of independent estimates
    pub fn sum<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a Estimate>,
    {
        let mut est = 0.0;
        let mut sum_sq = 0.0;
        for part in parts {
            est += part.est;
            sum_sq += part.moe * part.moe;
        }
        Self {
            est,
            moe: sum_sq.sqrt(),
        }
    }

    /// `self - other`, floored at zero; used for counts that cannot be negative
    pub fn clamped_difference(&self, other: &Estimate) -> Self {
        Self {
            est: floor_at_zero(self.est - other.est),
            moe: moe_of_sum([self.moe, other.moe]),
        }
    }

    /// `self - other` without clamping; used for signed gaps between proportions
    pub fn signed_difference(&self, other: &Estimate) -> Self {
        Self {
            est: self.est - other.est,
            moe: moe_of_sum([self.moe, other.moe]),
        }
    }

    /// Share of `pop` made up by `subpop`, with [`ratio_of`] / [`moe_of_ratio`].
    ///
    /// Both components are NaN when `pop.est <= 0`.
    pub fn proportion(subpop: &Estimate, pop: &Estimate) -> Self {
        if !(pop.est > 0.0) {
            return Self::NAN;
        }
        Self {
            est: ratio_of(subpop.est, pop.est),
            moe: moe_of_ratio(subpop.est, subpop.moe, pop.est, pop.moe),
        }
    }
}
