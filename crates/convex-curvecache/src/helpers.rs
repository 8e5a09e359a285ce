//! Resolves [`CalibrationPoint`]s against the live registries into
//! [`ResolvedPoint`]s, then hands them to [`crate::numlib`] to build
//! concrete instruments.
//!
//! This is the seam between the declarative [`CurveSpec`] world and the
//! numerical-library world: everything above this module only ever sees
//! ids and quote references; everything below only ever sees dates,
//! rates, and [`convex_curves`] types.

use convex_core::types::Date;
use convex_curves::instruments::CurveInstrument;

use crate::error::CurveCacheResult;
use crate::handle::CurveRegistry;
use crate::numlib::{self, ResolvedPoint};
use crate::quotes::{QuoteKind, QuoteRegistry};
use crate::spec::CalibrationPoint;

/// Resolves one point against the quote and curve registries, then builds
/// its numerical-library instrument.
///
/// # Errors
///
/// [`crate::error::CurveCacheError::UnknownQuote`] /
/// [`crate::error::CurveCacheError::UnknownCurve`] if a referenced id is
/// not registered; propagates [`crate::error::CurveCacheError::Numerical`]
/// from instrument construction.
pub fn resolve_and_build(
    reference_date: Date,
    point: &CalibrationPoint,
    quotes: &QuoteRegistry,
    curves: &CurveRegistry,
) -> CurveCacheResult<(Box<dyn CurveInstrument>, f64)> {
    let value = resolve_value(point, quotes)?;
    let dep_curve = first_dependency(point)
        .map(|id| curves.handle(id).and_then(|h| h.resolve()))
        .transpose()?;
    let dep_curve_2 = second_dependency(point)
        .map(|id| curves.handle(id).and_then(|h| h.resolve()))
        .transpose()?;

    let resolved = ResolvedPoint {
        point,
        value,
        dep_curve,
        dep_curve_2,
    };
    let instrument = numlib::build_instrument(reference_date, &resolved)?;
    Ok((instrument, value))
}

/// Reads the quote that drives a point's numeric value, with the point's
/// bump applied. Public alias of [`resolve_value`] for callers (the
/// orchestrator's cache-key builder) outside this module that need the
/// same resolved value without building an instrument.
///
/// # Errors
///
/// [`crate::error::CurveCacheError::UnknownQuote`] /
/// [`crate::error::CurveCacheError::QuoteKindMismatch`].
pub fn resolve_quote_value(point: &CalibrationPoint, quotes: &QuoteRegistry) -> CurveCacheResult<f64> {
    resolve_value(point, quotes)
}

/// Every `IndexDefinition` id a point references, in field-declaration
/// order — used to fold referenced index definitions into the cache key.
#[must_use]
pub fn index_ids(point: &CalibrationPoint) -> Vec<&str> {
    match point {
        CalibrationPoint::Swap { float_index_id, .. } => vec![float_index_id.as_str()],
        CalibrationPoint::Ois {
            overnight_index_id, ..
        }
        | CalibrationPoint::DatedOis {
            overnight_index_id, ..
        } => vec![overnight_index_id.as_str()],
        CalibrationPoint::TenorBasisSwap {
            short_index_id,
            long_index_id,
            ..
        } => vec![short_index_id.as_str(), long_index_id.as_str()],
        CalibrationPoint::CrossCcyBasis {
            domestic_index_id,
            foreign_index_id,
            ..
        } => vec![domestic_index_id.as_str(), foreign_index_id.as_str()],
        _ => Vec::new(),
    }
}

/// Reads the quote that drives a point's numeric value, with the point's
/// bump applied.
fn resolve_value(point: &CalibrationPoint, quotes: &QuoteRegistry) -> CurveCacheResult<f64> {
    let quote_ref = match point {
        CalibrationPoint::Deposit { rate, .. }
        | CalibrationPoint::Fra { rate, .. }
        | CalibrationPoint::Swap { rate, .. }
        | CalibrationPoint::Ois { rate, .. }
        | CalibrationPoint::DatedOis { rate, .. } => rate,
        CalibrationPoint::Future { quote, .. } => quote,
        CalibrationPoint::Bond { price, .. } => price,
        CalibrationPoint::TenorBasisSwap { spread, .. }
        | CalibrationPoint::CrossCcyBasis { spread, .. } => spread,
        CalibrationPoint::FxSwap { fx_points, .. } => fx_points,
    };
    let kind = match point {
        CalibrationPoint::Bond { .. } => QuoteKind::Price,
        _ => QuoteKind::CurveRate,
    };
    let handle = quotes.handle_typed(&quote_ref.id, kind)?;
    Ok(handle.bumped_value(quote_ref.bump))
}

/// The first (or only) exogenous curve dependency a point declares, if
/// any — used to resolve `dep_curve` before building the instrument.
fn first_dependency(point: &CalibrationPoint) -> Option<&str> {
    match point {
        CalibrationPoint::Swap {
            discount_curve_dep: Some(d),
            ..
        }
        | CalibrationPoint::TenorBasisSwap {
            discount_curve_dep: Some(d),
            ..
        } => Some(d.as_str()),
        CalibrationPoint::FxSwap {
            foreign_curve_dep, ..
        } => Some(foreign_curve_dep.as_str()),
        CalibrationPoint::CrossCcyBasis {
            domestic_discount_dep,
            ..
        } => Some(domestic_discount_dep.as_str()),
        _ => None,
    }
}

/// The second exogenous curve dependency, present only for cross-currency
/// basis swaps (which resolve against both a domestic and a foreign leg).
fn second_dependency(point: &CalibrationPoint) -> Option<&str> {
    match point {
        CalibrationPoint::CrossCcyBasis {
            foreign_discount_dep,
            ..
        } => Some(foreign_discount_dep.as_str()),
        _ => None,
    }
}

/// Builds every instrument for a curve spec's points, in declaration
/// order, returning the boxed instruments ready for
/// [`crate::numlib::bootstrap`].
///
/// # Errors
///
/// Propagates the first failure from [`resolve_and_build`].
pub fn build_all(
    reference_date: Date,
    points: &[CalibrationPoint],
    quotes: &QuoteRegistry,
    curves: &CurveRegistry,
) -> CurveCacheResult<Vec<Box<dyn CurveInstrument>>> {
    points
        .iter()
        .map(|p| resolve_and_build(reference_date, p, quotes, curves).map(|(inst, _)| inst))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use convex_core::calendars::BusinessDayConvention;
    use convex_core::daycounts::DayCountConvention;

    use crate::spec::{Conventions, QuoteRef};

    fn conv() -> Conventions {
        Conventions {
            calendar: "USD".into(),
            bdc: BusinessDayConvention::ModifiedFollowing,
            day_count: DayCountConvention::Act360,
        }
    }

    #[test]
    fn deposit_resolves_quote_and_builds_instrument() {
        let mut quotes = QuoteRegistry::new();
        quotes.upsert("usd.3m", 0.0525, QuoteKind::CurveRate).unwrap();
        let curves = CurveRegistry::new();
        let point = CalibrationPoint::Deposit {
            rate: QuoteRef::new("usd.3m"),
            tenor: "3M".into(),
            fixing_days: 2,
            conventions: conv(),
        };
        let reference = Date::from_ymd(2024, 1, 2).unwrap();
        let (_, value) = resolve_and_build(reference, &point, &quotes, &curves).unwrap();
        assert!((value - 0.0525).abs() < 1e-12);
    }

    #[test]
    fn bump_is_applied_once() {
        let mut quotes = QuoteRegistry::new();
        quotes.upsert("usd.3m", 0.05, QuoteKind::CurveRate).unwrap();
        let curves = CurveRegistry::new();
        let point = CalibrationPoint::Deposit {
            rate: QuoteRef::bumped("usd.3m", 0.0010),
            tenor: "3M".into(),
            fixing_days: 2,
            conventions: conv(),
        };
        let reference = Date::from_ymd(2024, 1, 2).unwrap();
        let (_, value) = resolve_and_build(reference, &point, &quotes, &curves).unwrap();
        assert!((value - 0.0510).abs() < 1e-12);
    }

    #[test]
    fn unknown_curve_dependency_errors() {
        let mut quotes = QuoteRegistry::new();
        quotes.upsert("q", 0.01, QuoteKind::CurveRate).unwrap();
        let curves = CurveRegistry::new();
        let point = CalibrationPoint::TenorBasisSwap {
            spread: QuoteRef::new("q"),
            short_index_id: "a".into(),
            long_index_id: "b".into(),
            tenor: "5Y".into(),
            discount_curve_dep: Some("missing".into()),
        };
        let reference = Date::from_ymd(2024, 1, 2).unwrap();
        assert!(resolve_and_build(reference, &point, &quotes, &curves).is_err());
    }

    #[test]
    fn bond_uses_price_quote_kind() {
        let mut quotes = QuoteRegistry::new();
        quotes.upsert("bond.px", 99.5, QuoteKind::Price).unwrap();
        let curves = CurveRegistry::new();
        let reference = Date::from_ymd(2024, 1, 2).unwrap();
        let point = CalibrationPoint::Bond {
            price: QuoteRef::new("bond.px"),
            settlement_days: 1,
            face: 100.0,
            coupon_rate: 0.04,
            frequency: convex_core::types::Frequency::SemiAnnual,
            redemption: 1.0,
            issue_date: reference,
            maturity: reference.add_years(5).unwrap(),
        };
        let (_, value) = resolve_and_build(reference, &point, &quotes, &curves).unwrap();
        assert!((value - 99.5).abs() < 1e-12);
    }
}
