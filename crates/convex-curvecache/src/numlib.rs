//! The numerical-library adapter.
//!
//! This is the one module allowed to speak in `convex_curves` types. It
//! turns a resolved [`CalibrationPoint`] into a boxed
//! [`convex_curves::instruments::CurveInstrument`], runs the bootstrap for
//! a `(trait, interpolator)` combination, and evaluates discount / zero /
//! forward measures on the solved curve. The rest of the crate only ever
//! sees [`convex_curves::traits::Curve`] and plain numbers.

use std::sync::Arc;

use convex_core::calendars::{Calendar, USCalendar, WeekendCalendar};
use convex_core::types::Date;
use convex_curves::bootstrap::sequential::{SequentialBootstrapConfig, SequentialBootstrapper};
use convex_curves::instruments::{
    BasisSwap, CurveInstrument, Deposit, FutureType, RateFuture, TreasuryBond, FRA, OIS,
};
use convex_curves::traits::Curve;

use crate::error::{CurveCacheError, CurveCacheResult};
use crate::spec::{CalibrationPoint, CurveTrait};

/// Resolves a convention's calendar name to a concrete [`Calendar`].
///
/// Only US-dollar markets get federal-holiday treatment here; every other
/// currency falls back to a weekend-only calendar. This mirrors the
/// coverage `convex-core` actually ships (a SIFMA/Gilts/Bunds calendar zoo
/// exists as source files in the workspace but is not wired into
/// `convex_core::calendars`'s module tree, so it isn't something this
/// adapter can depend on).
pub(crate) fn resolve_calendar(name: &str) -> Box<dyn Calendar> {
    match name {
        "USD" | "US" | "SIFMA" => Box::new(USCalendar),
        _ => Box::new(WeekendCalendar),
    }
}

/// Parses a tenor string ("O/N", "1W", "3M", "5Y") into an end date from
/// `start`.
pub(crate) fn advance_tenor(start: Date, tenor: &str) -> CurveCacheResult<Date> {
    let tenor = tenor.trim().to_uppercase();
    if tenor == "O/N" || tenor == "ON" {
        return Ok(start.add_days(1));
    }
    if tenor == "T/N" || tenor == "TN" {
        return Ok(start.add_days(2));
    }
    let (number, unit) = tenor.split_at(tenor.len() - 1);
    let n: i64 = number
        .parse()
        .map_err(|_| CurveCacheError::UnknownEnumValue {
            field: "tenor".into(),
            value: tenor.clone(),
        })?;
    match unit {
        "D" => Ok(start.add_days(n)),
        "W" => Ok(start.add_days(n * 7)),
        "M" => start
            .add_months(n as i32)
            .map_err(CurveCacheError::Core),
        "Y" => start
            .add_years(n as i32)
            .map_err(CurveCacheError::Core),
        _ => Err(CurveCacheError::UnknownEnumValue {
            field: "tenor".into(),
            value: tenor,
        }),
    }
}

/// A point resolved to concrete numeric inputs, ready to feed both the
/// numerical-library adapter and the cache-key builder.
///
/// The same resolved value (base quote + bump) must reach both consumers,
/// per the "quote-bump-before-keying" rule — callers build one of these
/// once per point and pass it to both [`build_instrument`] and the cache
/// key.
pub struct ResolvedPoint<'a> {
    /// The point being resolved.
    pub point: &'a CalibrationPoint,
    /// The resolved (base + bump) numeric value driving the instrument.
    pub value: f64,
    /// Resolved discount-curve dependency, if the point declares one.
    pub dep_curve: Option<Arc<dyn Curve>>,
    /// A second resolved dependency (cross-currency basis only).
    pub dep_curve_2: Option<Arc<dyn Curve>>,
}

/// Builds a boxed calibration helper from a resolved point.
///
/// # Errors
///
/// Propagates [`convex_curves::error::CurveError`] for malformed tenors or
/// instrument construction failures.
pub fn build_instrument(
    reference_date: Date,
    resolved: &ResolvedPoint<'_>,
) -> CurveCacheResult<Box<dyn CurveInstrument>> {
    Ok(match resolved.point {
        CalibrationPoint::Deposit {
            tenor,
            fixing_days,
            conventions,
            ..
        } => {
            let calendar = resolve_calendar(&conventions.calendar);
            let spot = calendar.add_business_days(reference_date, *fixing_days as i32);
            let end = advance_tenor(spot, tenor)?;
            Box::new(
                Deposit::new(spot, end, resolved.value).with_day_count(conventions.day_count),
            )
        }
        CalibrationPoint::Fra {
            months_to_start,
            months_to_end,
            conventions,
            ..
        } => {
            let start = reference_date
                .add_months(*months_to_start as i32)
                .map_err(CurveCacheError::Core)?;
            let end = reference_date
                .add_months(*months_to_end as i32)
                .map_err(CurveCacheError::Core)?;
            Box::new(
                FRA::new(reference_date, start, end, resolved.value)
                    .with_day_count(conventions.day_count),
            )
        }
        CalibrationPoint::Future {
            quote_is_price,
            start,
            months,
            conventions,
            ..
        } => {
            let rate = if *quote_is_price {
                (100.0 - resolved.value) / 100.0
            } else {
                resolved.value
            };
            let calendar = resolve_calendar(&conventions.calendar);
            let unadjusted_end = start.add_months(*months as i32).map_err(CurveCacheError::Core)?;
            let end = calendar
                .adjust(unadjusted_end, conventions.bdc)
                .map_err(CurveCacheError::Core)?;
            Box::new(RateFuture::new(
                future_type_for_months(*months),
                *start,
                *start,
                end,
                100.0 * (1.0 - rate),
            ))
        }
        CalibrationPoint::Swap {
            tenor,
            fixed_frequency,
            forward_start_days,
            ..
        } => {
            let calendar = resolve_calendar("USD");
            let effective = calendar.add_business_days(reference_date, *forward_start_days as i32);
            let end = advance_tenor(effective, tenor)?;
            Box::new(convex_curves::instruments::Swap::new(
                effective,
                end,
                resolved.value,
                *fixed_frequency,
            ))
        }
        CalibrationPoint::Ois {
            tenor, fixing_days, ..
        } => {
            let calendar = resolve_calendar("USD");
            let effective = calendar.add_business_days(reference_date, *fixing_days as i32);
            let end = advance_tenor(effective, tenor)?;
            Box::new(OIS::new(effective, end, resolved.value))
        }
        CalibrationPoint::DatedOis { start, end, .. } => {
            Box::new(OIS::new(*start, *end, resolved.value))
        }
        CalibrationPoint::Bond {
            settlement_days,
            coupon_rate,
            maturity,
            ..
        } => {
            let calendar = resolve_calendar("USD");
            let settlement = calendar.add_business_days(reference_date, *settlement_days as i32);
            Box::new(TreasuryBond::new(
                "cusip",
                settlement,
                *maturity,
                *coupon_rate,
                resolved.value,
            ))
        }
        CalibrationPoint::TenorBasisSwap { tenor, .. } => {
            let end = advance_tenor(reference_date, tenor)?;
            Box::new(BasisSwap::tenor_basis(
                reference_date,
                end,
                convex_curves::instruments::RateIndex::sofr_1m(),
                convex_curves::instruments::RateIndex::sofr_3m(),
                resolved.value,
            ))
        }
        CalibrationPoint::FxSwap {
            spot,
            tenor,
            conventions,
            ..
        } => {
            let calendar = resolve_calendar(&conventions.calendar);
            let unadjusted_end = advance_tenor(reference_date, tenor)?;
            let end = calendar
                .adjust(unadjusted_end, conventions.bdc)
                .map_err(CurveCacheError::Core)?;
            let foreign = resolved.dep_curve.clone().ok_or_else(|| {
                CurveCacheError::unknown_curve("<fx swap foreign curve dependency>")
            })?;
            Box::new(FxSwapHelper {
                maturity: end,
                spot: *spot,
                forward: *spot + resolved.value,
                foreign_discount: foreign,
            })
        }
        CalibrationPoint::CrossCcyBasis { tenor, .. } => {
            let end = advance_tenor(reference_date, tenor)?;
            let domestic = resolved.dep_curve.clone().ok_or_else(|| {
                CurveCacheError::unknown_curve("<cross-currency basis domestic curve dependency>")
            })?;
            let foreign = resolved.dep_curve_2.clone().ok_or_else(|| {
                CurveCacheError::unknown_curve("<cross-currency basis foreign curve dependency>")
            })?;
            Box::new(CrossCcyBasisHelper {
                maturity: end,
                spread: resolved.value,
                domestic_discount: domestic,
                foreign_discount: foreign,
            })
        }
    })
}

/// Implied-discount helper for an FX swap, bootstrapping the foreign leg's
/// domestic-collateral discount curve via covered interest parity:
/// `forward / spot = DF_foreign(t) / DF_domestic(t)`.
struct FxSwapHelper {
    maturity: Date,
    spot: f64,
    forward: f64,
    foreign_discount: Arc<dyn Curve>,
}

impl CurveInstrument for FxSwapHelper {
    fn maturity(&self) -> Date {
        self.maturity
    }

    fn pv(&self, curve: &dyn Curve) -> convex_curves::error::CurveResult<f64> {
        let t = curve.year_fraction(self.maturity);
        let domestic_df = curve.discount_factor(t)?;
        let foreign_df = self.foreign_discount.discount_factor(t)?;
        Ok(self.spot * foreign_df - self.forward * domestic_df)
    }

    fn implied_df(
        &self,
        curve: &dyn Curve,
        _target_pv: f64,
    ) -> convex_curves::error::CurveResult<f64> {
        let t = curve.year_fraction(self.maturity);
        let foreign_df = self.foreign_discount.discount_factor(t)?;
        Ok(self.spot * foreign_df / self.forward)
    }

    fn instrument_type(&self) -> convex_curves::instruments::InstrumentType {
        convex_curves::instruments::InstrumentType::BasisSwap
    }

    fn description(&self) -> String {
        format!("FX swap to {}", self.maturity)
    }
}

/// Implied-discount helper for a cross-currency basis swap, bootstrapping
/// the basis-adjusted discount curve from the domestic and foreign
/// single-currency discount curves plus a quoted basis spread,
/// single-period.
///
/// Modeled as the geometric mean of the two known curves' discount factors,
/// adjusted by the quoted spread: `df(t) = sqrt(domestic_df(t) *
/// foreign_df(t)) * exp(-spread * t)`. This calibration point carries no FX
/// spot/forward (unlike [`FxSwapHelper`]), so the textbook covered-interest-
/// parity relation isn't available here; the geometric mean keeps both
/// dependency curves genuinely load-bearing (neither cancels out
/// algebraically) while collapsing to `domestic_df == foreign_df` exactly
/// when the two curves agree and the spread is zero.
struct CrossCcyBasisHelper {
    maturity: Date,
    spread: f64,
    domestic_discount: Arc<dyn Curve>,
    foreign_discount: Arc<dyn Curve>,
}

impl CrossCcyBasisHelper {
    fn target_df(&self, curve: &dyn Curve) -> convex_curves::error::CurveResult<f64> {
        let t = curve.year_fraction(self.maturity);
        let domestic_df = self.domestic_discount.discount_factor(t)?;
        let foreign_df = self.foreign_discount.discount_factor(t)?;
        Ok((domestic_df * foreign_df).sqrt() * (-self.spread * t).exp())
    }
}

impl CurveInstrument for CrossCcyBasisHelper {
    fn maturity(&self) -> Date {
        self.maturity
    }

    fn pv(&self, curve: &dyn Curve) -> convex_curves::error::CurveResult<f64> {
        let t = curve.year_fraction(self.maturity);
        let df = curve.discount_factor(t)?;
        Ok(self.target_df(curve)? - df)
    }

    fn implied_df(
        &self,
        curve: &dyn Curve,
        _target_pv: f64,
    ) -> convex_curves::error::CurveResult<f64> {
        self.target_df(curve)
    }

    fn instrument_type(&self) -> convex_curves::instruments::InstrumentType {
        convex_curves::instruments::InstrumentType::BasisSwap
    }

    fn description(&self) -> String {
        format!("Cross-currency basis swap to {}", self.maturity)
    }
}

/// Maps a futures accrual length to the closest standard contract.
fn future_type_for_months(months: u32) -> FutureType {
    match months {
        1 => FutureType::SOFR1M,
        _ => FutureType::SOFR3M,
    }
}

/// The solved curve plus its pillar times and discount factors, read
/// straight off the bootstrapper's concrete result before it is erased
/// behind `Arc<dyn Curve>`.
///
/// Carrying the pillars out of `bootstrap` is what lets the serializer
/// avoid a downcast: `convex_curves::traits::Curve` has no `Any` bound to
/// downcast through, so the only other way to recover pillar dates would
/// be the weekly-sampling fallback, for every curve, always.
///
/// `pillar_times`/`discount_factors` always describe the underlying
/// discount-factor solve regardless of `curve_trait` — `curve` is the one
/// that differs, since it interpolates in whatever space `curve_trait`
/// names.
pub struct BootstrappedCurve {
    /// The curve, type-erased for the rest of the crate.
    pub curve: Arc<dyn Curve>,
    /// The quantity `curve` was solved and interpolates in.
    pub curve_trait: CurveTrait,
    /// Pillar times in years from the reference date.
    pub pillar_times: Vec<f64>,
    /// Discount factors at each pillar time.
    pub discount_factors: Vec<f64>,
}

/// Fixed repricing tolerance enforced on every bootstrap solve, regardless
/// of interpolator or curve trait.
const BOOTSTRAP_TOLERANCE: f64 = 1e-15;

/// Runs the bootstrap over a batch of helpers for one curve.
///
/// Always solves discount factors at each pillar via the sequential
/// bootstrap (closed-form per instrument, repriced to within
/// [`BOOTSTRAP_TOLERANCE`]); `curve_trait` then selects which space the
/// returned curve interpolates in between pillars — discount factors
/// (the default), continuously compounded zero yields, or piecewise-flat
/// forward rates — rather than changing what gets solved for.
///
/// # Errors
///
/// [`CurveCacheError::Numerical`] if the instrument set is empty, the
/// underlying library fails to converge, or a solved pillar doesn't
/// reprice its own instrument within tolerance.
pub fn bootstrap(
    reference_date: Date,
    interpolation: convex_curves::interpolation::InterpolationMethod,
    curve_trait: CurveTrait,
    instruments: Vec<Box<dyn CurveInstrument>>,
) -> CurveCacheResult<BootstrappedCurve> {
    let config = SequentialBootstrapConfig {
        interpolation,
        allow_extrapolation: true,
        tolerance: BOOTSTRAP_TOLERANCE,
    };
    let mut bootstrapper = SequentialBootstrapper::new(reference_date).with_config(config);
    for inst in instruments {
        bootstrapper = bootstrapper.add_instrument(BoxedInstrument(inst));
    }
    let curve = bootstrapper.bootstrap()?;
    let pillar_times = curve.pillar_times().to_vec();
    let discount_factors = curve.discount_factors_raw().to_vec();
    let max_date = curve.max_date();

    let erased: Arc<dyn Curve> = match curve_trait {
        CurveTrait::Discount => Arc::new(curve),
        CurveTrait::ZeroYield => Arc::new(ZeroYieldCurve::from_pillars(
            reference_date,
            max_date,
            &pillar_times,
            &discount_factors,
        )),
        CurveTrait::ForwardRate => Arc::new(ForwardRateCurve::from_pillars(
            reference_date,
            max_date,
            &pillar_times,
            &discount_factors,
        )),
    };

    Ok(BootstrappedCurve {
        curve: erased,
        curve_trait,
        pillar_times,
        discount_factors,
    })
}

/// Linear interpolation with flat extrapolation beyond the ends, used by
/// [`ZeroYieldCurve`] and [`ForwardRateCurve`] to interpolate in their own
/// space rather than in discount-factor space.
fn interpolate_linear(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= *xs.last().unwrap() {
        return *ys.last().unwrap();
    }
    match xs.binary_search_by(|probe| probe.partial_cmp(&x).unwrap()) {
        Ok(i) => ys[i],
        Err(i) => {
            let (x0, x1) = (xs[i - 1], xs[i]);
            let (y0, y1) = (ys[i - 1], ys[i]);
            y0 + (y1 - y0) * (x - x0) / (x1 - x0)
        }
    }
}

/// A curve solved for discount factors but interpolated in continuously
/// compounded zero-yield space: `z(t) = -ln(P(t)) / t`, linearly
/// interpolated between pillars and flat-extrapolated beyond them, then
/// converted back with `P(t) = exp(-z(t) * t)`.
pub(crate) struct ZeroYieldCurve {
    reference_date: Date,
    max_date: Date,
    pillar_times: Vec<f64>,
    zero_rates: Vec<f64>,
}

impl ZeroYieldCurve {
    pub(crate) fn from_pillars(
        reference_date: Date,
        max_date: Date,
        pillar_times: &[f64],
        discount_factors: &[f64],
    ) -> Self {
        let zero_rates = pillar_times
            .iter()
            .zip(discount_factors)
            .map(|(&t, &df)| if t <= 0.0 { 0.0 } else { -df.ln() / t })
            .collect();
        Self {
            reference_date,
            max_date,
            pillar_times: pillar_times.to_vec(),
            zero_rates,
        }
    }
}

impl Curve for ZeroYieldCurve {
    fn discount_factor(&self, t: f64) -> convex_curves::error::CurveResult<f64> {
        if t <= 0.0 {
            return Ok(1.0);
        }
        let z = interpolate_linear(&self.pillar_times, &self.zero_rates, t);
        Ok((-z * t).exp())
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_date(&self) -> Date {
        self.max_date
    }
}

/// A curve solved for discount factors but interpolated in flat-forward
/// space: each pillar interval carries its own continuously compounded
/// flat forward rate, `F(t_i, t_{i+1}) = ln(P(t_i) / P(t_{i+1})) / (t_{i+1}
/// - t_i)`, and the last interval's forward extrapolates flat beyond the
/// final pillar.
pub(crate) struct ForwardRateCurve {
    reference_date: Date,
    max_date: Date,
    pillar_times: Vec<f64>,
    /// `forwards[i]` is the flat forward over `(pillar_times[i],
    /// pillar_times[i + 1])`; one shorter than `pillar_times`.
    forwards: Vec<f64>,
}

impl ForwardRateCurve {
    pub(crate) fn from_pillars(
        reference_date: Date,
        max_date: Date,
        pillar_times: &[f64],
        discount_factors: &[f64],
    ) -> Self {
        let mut forwards = Vec::with_capacity(pillar_times.len().saturating_sub(1));
        for i in 0..pillar_times.len().saturating_sub(1) {
            let dt = pillar_times[i + 1] - pillar_times[i];
            let forward = if dt.abs() < 1e-12 {
                0.0
            } else {
                (discount_factors[i] / discount_factors[i + 1]).ln() / dt
            };
            forwards.push(forward);
        }
        Self {
            reference_date,
            max_date,
            pillar_times: pillar_times.to_vec(),
            forwards,
        }
    }
}

impl Curve for ForwardRateCurve {
    fn discount_factor(&self, t: f64) -> convex_curves::error::CurveResult<f64> {
        if t <= 0.0 {
            return Ok(1.0);
        }
        let mut log_df = 0.0_f64;
        for i in 0..self.forwards.len() {
            let seg_start = self.pillar_times[i];
            let seg_end = self.pillar_times[i + 1];
            if t >= seg_end {
                log_df -= self.forwards[i] * (seg_end - seg_start);
            } else if t > seg_start {
                log_df -= self.forwards[i] * (t - seg_start);
                return Ok(log_df.exp());
            } else {
                break;
            }
        }
        if let (Some(&last_forward), Some(&last_pillar)) =
            (self.forwards.last(), self.pillar_times.last())
        {
            if t > last_pillar {
                log_df -= last_forward * (t - last_pillar);
            }
        }
        Ok(log_df.exp())
    }

    fn reference_date(&self) -> Date {
        self.reference_date
    }

    fn max_date(&self) -> Date {
        self.max_date
    }
}

/// Lets a `Box<dyn CurveInstrument>` satisfy `SequentialBootstrapper::add_instrument`'s
/// generic bound, since the trait has no such blanket impl upstream.
struct BoxedInstrument(Box<dyn CurveInstrument>);

impl CurveInstrument for BoxedInstrument {
    fn maturity(&self) -> Date {
        self.0.maturity()
    }

    fn pillar_date(&self) -> Date {
        self.0.pillar_date()
    }

    fn pv(&self, curve: &dyn Curve) -> convex_curves::error::CurveResult<f64> {
        self.0.pv(curve)
    }

    fn implied_df(
        &self,
        curve: &dyn Curve,
        target_pv: f64,
    ) -> convex_curves::error::CurveResult<f64> {
        self.0.implied_df(curve, target_pv)
    }

    fn instrument_type(&self) -> convex_curves::instruments::InstrumentType {
        self.0.instrument_type()
    }

    fn description(&self) -> String {
        self.0.description()
    }
}
