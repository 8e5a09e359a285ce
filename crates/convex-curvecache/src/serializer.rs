//! Serializes a solved curve to its cache representation and reconstructs
//! a curve from that representation on a cache hit.
//!
//! Reconstruction never re-runs the bootstrap: it rebuilds a curve of the
//! same [`CurveTrait`] directly over the stored pillars, which is why the
//! invariant `reconstruct(serialize(c)).discount(pillar) ==
//! c.discount(pillar)` holds exactly rather than only approximately.

use std::sync::Arc;

use convex_core::daycounts::DayCountConvention;
use convex_core::types::Date;
use convex_curves::curves::DiscountCurve;
use convex_curves::interpolation::InterpolationMethod;
use convex_curves::traits::Curve;

use crate::error::CurveCacheResult;
use crate::numlib::{self, BootstrappedCurve};
use crate::spec::CurveTrait;

/// The stored form of a solved curve: pillars plus enough metadata to
/// rebuild an interpolated [`Curve`] from them.
#[derive(Debug, Clone)]
pub struct CachedCurveData {
    /// Reference date the pillar dates are measured from.
    pub reference_date: Date,
    /// Day count the originating `CurveSpec` declared for the curve.
    pub day_count: DayCountConvention,
    /// Interpolator tag as declared on the originating `CurveSpec`.
    pub interpolator: InterpolationMethod,
    /// The quantity this curve was solved and interpolates in.
    pub curve_trait: CurveTrait,
    /// Pillar dates, strictly increasing.
    pub pillar_dates: Vec<Date>,
    /// Discount factors at each pillar date.
    pub discount_factors: Vec<f64>,
}

/// One week, in years, used as the fallback sampling step.
const WEEKLY_STEP_YEARS: f64 = 7.0 / 365.0;

/// Converts a year-fraction pillar time to a date, inverse of
/// [`date_to_year_fraction`]. Act365, matching the convention
/// `convex_curves::bootstrap::sequential::SequentialBootstrapper` uses
/// internally to turn pillar dates into solve times.
fn year_fraction_to_date(reference_date: Date, t: f64) -> Date {
    reference_date.add_days((t * 365.0).round() as i64)
}

/// Converts a pillar date back to the year-fraction time it was solved
/// at. Inverse of [`year_fraction_to_date`].
fn date_to_year_fraction(reference_date: Date, date: Date) -> f64 {
    reference_date.days_between(&date) as f64 / 365.0
}

/// Captures a freshly bootstrapped curve's pillars for storage.
///
/// Uses the pillars the bootstrapper solved for directly. If a curve ever
/// reaches this adapter without them (not possible for anything built via
/// [`crate::numlib::bootstrap`], but kept as a safety net for curves
/// resolved from elsewhere), falls back to sampling weekly from the
/// reference date to the curve's max date.
#[must_use]
pub fn serialize(
    interpolator: InterpolationMethod,
    day_count: DayCountConvention,
    bootstrapped: &BootstrappedCurve,
) -> CachedCurveData {
    if bootstrapped.pillar_times.is_empty() {
        return serialize_by_sampling(interpolator, day_count, bootstrapped.curve_trait, bootstrapped.curve.as_ref());
    }
    let reference_date = bootstrapped.curve.reference_date();
    let pillar_dates = bootstrapped
        .pillar_times
        .iter()
        .map(|&t| year_fraction_to_date(reference_date, t))
        .collect();
    CachedCurveData {
        reference_date,
        day_count,
        interpolator,
        curve_trait: bootstrapped.curve_trait,
        pillar_dates,
        discount_factors: bootstrapped.discount_factors.clone(),
    }
}

/// Fallback path for curves with no directly accessible pillar set: walk
/// weekly from the reference date to the curve's max date.
fn serialize_by_sampling(
    interpolator: InterpolationMethod,
    day_count: DayCountConvention,
    curve_trait: CurveTrait,
    curve: &dyn Curve,
) -> CachedCurveData {
    let reference_date = curve.reference_date();
    let max_t = curve.year_fraction(curve.max_date());
    let mut pillar_dates = Vec::new();
    let mut discount_factors = Vec::new();
    let mut t = 0.0;
    while t < max_t {
        if let Ok(df) = curve.discount_factor(t.max(1.0 / 365.0)) {
            pillar_dates.push(year_fraction_to_date(reference_date, t.max(1.0 / 365.0)));
            discount_factors.push(df);
        }
        t += WEEKLY_STEP_YEARS;
    }
    if let Ok(df) = curve.discount_factor(max_t) {
        pillar_dates.push(year_fraction_to_date(reference_date, max_t));
        discount_factors.push(df);
    }
    CachedCurveData {
        reference_date,
        day_count,
        interpolator,
        curve_trait,
        pillar_dates,
        discount_factors,
    }
}

/// Resolves the interpolator actually used to rebuild an interpolated
/// curve from stored pillars.
///
/// Forward-flat on discount factors has no dedicated implementation, so
/// it is reconstructed with log-linear, which produces an identical set
/// of pillar evaluations. Log-cubic is reconstructed with the monotone
/// variant so the rebuilt curve can't dip non-positive between pillars
/// even when the original bootstrap used a plain cubic spline.
fn reconstruction_interpolator(declared: InterpolationMethod) -> InterpolationMethod {
    match declared {
        InterpolationMethod::FlatForward => InterpolationMethod::LogLinear,
        InterpolationMethod::CubicSplineOnDiscount => InterpolationMethod::MonotoneConvex,
        other => other,
    }
}

/// Rebuilds an interpolated, extrapolating curve of the stored
/// [`CurveTrait`] from its pillars.
///
/// Only [`CurveTrait::Discount`] reconstructs through
/// `reconstruction_interpolator`'s aliasing — `ZeroYield` and
/// `ForwardRate` always interpolate linearly in their own space
/// regardless of the declared interpolator, matching how
/// [`crate::numlib::bootstrap`] built them in the first place.
///
/// # Errors
///
/// [`crate::error::CurveCacheError::Numerical`] if the stored pillars are
/// degenerate (fewer than two points, non-increasing times, or a
/// non-positive discount factor).
pub fn reconstruct(data: &CachedCurveData) -> CurveCacheResult<Arc<dyn Curve>> {
    let pillar_times: Vec<f64> = data
        .pillar_dates
        .iter()
        .map(|&date| date_to_year_fraction(data.reference_date, date))
        .collect();
    let max_date = *data.pillar_dates.last().unwrap_or(&data.reference_date);

    let curve: Arc<dyn Curve> = match data.curve_trait {
        CurveTrait::Discount => {
            let method = reconstruction_interpolator(data.interpolator);
            let rebuilt = DiscountCurve::new(
                data.reference_date,
                pillar_times,
                data.discount_factors.clone(),
                method,
            )?
            .with_extrapolation();
            Arc::new(rebuilt)
        }
        CurveTrait::ZeroYield => Arc::new(numlib::ZeroYieldCurve::from_pillars(
            data.reference_date,
            max_date,
            &pillar_times,
            &data.discount_factors,
        )),
        CurveTrait::ForwardRate => Arc::new(numlib::ForwardRateCurve::from_pillars(
            data.reference_date,
            max_date,
            &pillar_times,
            &data.discount_factors,
        )),
    };
    Ok(curve)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY_COUNT: DayCountConvention = DayCountConvention::Act365Fixed;

    /// Pillar times are derived from real calendar offsets (not hand-typed
    /// decimals) so that the date round-trip in `serialize`/`reconstruct`
    /// is exact: `t * 365` lands on the same whole day `t` was computed
    /// from.
    fn sample_bootstrapped() -> BootstrappedCurve {
        let reference = Date::from_ymd(2024, 1, 2).unwrap();
        let dates = vec![
            reference.add_months(3).unwrap(),
            reference.add_years(1).unwrap(),
            reference.add_years(5).unwrap(),
            reference.add_years(10).unwrap(),
        ];
        let pillar_times: Vec<f64> = dates
            .iter()
            .map(|&d| reference.days_between(&d) as f64 / 365.0)
            .collect();
        let discount_factors = vec![0.99, 0.96, 0.80, 0.60];
        let curve = DiscountCurve::new(
            reference,
            pillar_times.clone(),
            discount_factors.clone(),
            InterpolationMethod::LogLinear,
        )
        .unwrap();
        BootstrappedCurve {
            curve: Arc::new(curve),
            curve_trait: CurveTrait::Discount,
            pillar_times,
            discount_factors,
        }
    }

    #[test]
    fn serialize_uses_solved_pillars_directly() {
        let bootstrapped = sample_bootstrapped();
        let data = serialize(InterpolationMethod::LogLinear, DAY_COUNT, &bootstrapped);
        assert_eq!(data.pillar_dates.len(), bootstrapped.pillar_times.len());
        assert_eq!(data.discount_factors, bootstrapped.discount_factors);
    }

    #[test]
    fn reconstruct_matches_original_at_pillars() {
        let bootstrapped = sample_bootstrapped();
        let data = serialize(InterpolationMethod::LogLinear, DAY_COUNT, &bootstrapped);
        let rebuilt = reconstruct(&data).unwrap();
        for &t in &bootstrapped.pillar_times {
            let original = bootstrapped.curve.discount_factor(t).unwrap();
            let roundtripped = rebuilt.discount_factor(t).unwrap();
            assert!((original - roundtripped).abs() < 1e-12);
        }
    }

    #[test]
    fn forward_flat_tag_reconstructs_as_log_linear() {
        assert_eq!(
            reconstruction_interpolator(InterpolationMethod::FlatForward),
            InterpolationMethod::LogLinear
        );
    }

    #[test]
    fn log_cubic_tag_reconstructs_as_monotone_convex() {
        assert_eq!(
            reconstruction_interpolator(InterpolationMethod::CubicSplineOnDiscount),
            InterpolationMethod::MonotoneConvex
        );
    }

    #[test]
    fn reconstruct_allows_extrapolation_beyond_pillars() {
        let bootstrapped = sample_bootstrapped();
        let data = serialize(InterpolationMethod::LogLinear, DAY_COUNT, &bootstrapped);
        let rebuilt = reconstruct(&data).unwrap();
        assert!(rebuilt.discount_factor(25.0).is_ok());
    }

    #[test]
    fn zero_yield_trait_reconstructs_as_zero_yield_curve() {
        let mut bootstrapped = sample_bootstrapped();
        bootstrapped.curve_trait = CurveTrait::ZeroYield;
        let data = serialize(InterpolationMethod::LogLinear, DAY_COUNT, &bootstrapped);
        assert!(matches!(data.curve_trait, CurveTrait::ZeroYield));
        let rebuilt = reconstruct(&data).unwrap();

        // A zero-yield reconstruction interpolates linearly in zero-rate
        // space, not in log-discount-factor space, so it need not agree
        // with a log-linear discount reconstruction between pillars; it
        // must still reprice exactly at the pillars themselves.
        for &t in &bootstrapped.pillar_times {
            let original = bootstrapped.curve.discount_factor(t).unwrap();
            let roundtripped = rebuilt.discount_factor(t).unwrap();
            assert!((original - roundtripped).abs() < 1e-9);
        }
    }
}
