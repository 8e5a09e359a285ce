//! `CurveSpec`: the declarative description of one curve to bootstrap.

use convex_core::calendars::BusinessDayConvention;
use convex_core::daycounts::DayCountConvention;
use convex_core::types::{Date, Frequency};
use convex_curves::interpolation::InterpolationMethod;

/// The quantity a piecewise curve is solved in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CurveTrait {
    /// Solve directly for discount factors.
    Discount,
    /// Solve for continuously compounded zero yields.
    ZeroYield,
    /// Solve for instantaneous forward rates.
    ForwardRate,
}

/// A reference to a quote, with an additive bump applied once at the point
/// of use (see [`crate::quotes::QuoteHandle::bumped_value`]).
#[derive(Debug, Clone)]
pub struct QuoteRef {
    /// Id of the referenced quote.
    pub id: String,
    /// Additive bump (0.0 if none requested).
    pub bump: f64,
}

impl QuoteRef {
    /// Creates an unbumped reference.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            bump: 0.0,
        }
    }

    /// Creates a bumped reference.
    #[must_use]
    pub fn bumped(id: impl Into<String>, bump: f64) -> Self {
        Self {
            id: id.into(),
            bump,
        }
    }
}

/// Averaging convention for OIS compounding over the accrual period.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AveragingMethod {
    /// Daily compounded backward-looking average (SOFR/€STR/SONIA style).
    CompoundedDaily,
    /// Simple arithmetic average of daily fixings.
    SimpleAverage,
}

/// Common date/calendar conventions shared by several calibration points.
#[derive(Debug, Clone)]
pub struct Conventions {
    /// Fixing/settlement calendar name, resolved by the numerical-library
    /// adapter.
    pub calendar: String,
    /// Business day convention.
    pub bdc: BusinessDayConvention,
    /// Accrual day count.
    pub day_count: DayCountConvention,
}

/// One calibration instrument, tagged by variant.
///
/// Modeled as a tagged sum with a `match` at the dispatch point in
/// [`crate::helpers`] rather than a trait-object hierarchy: each variant's
/// field set is fixed at compile time, and there is no inheritance to
/// navigate.
#[derive(Debug, Clone)]
pub enum CalibrationPoint {
    /// Money-market deposit.
    Deposit {
        /// Rate, as a quote reference or an inline literal.
        rate: QuoteRef,
        /// Tenor string (e.g. "3M", "O/N").
        tenor: String,
        /// Settlement lag in business days.
        fixing_days: u32,
        /// Conventions.
        conventions: Conventions,
    },
    /// Forward Rate Agreement.
    Fra {
        /// FRA rate.
        rate: QuoteRef,
        /// Months from spot to the start of the accrual period.
        months_to_start: u32,
        /// Months from spot to the end of the accrual period.
        months_to_end: u32,
        /// Conventions.
        conventions: Conventions,
    },
    /// Rate future (SOFR / Eurodollar / SONIA / EURIBOR style).
    Future {
        /// Quoted futures price (100 − implied rate) or rate, per
        /// `quote_is_price`.
        quote: QuoteRef,
        /// True if `quote` is a price; false if it is already a rate.
        quote_is_price: bool,
        /// Contract start date (IMM-dated).
        start: Date,
        /// Accrual length in months.
        months: u32,
        /// Conventions.
        conventions: Conventions,
    },
    /// Vanilla interest rate swap.
    Swap {
        /// Fixed rate.
        rate: QuoteRef,
        /// Tenor string.
        tenor: String,
        /// Fixed-leg payment frequency.
        fixed_frequency: Frequency,
        /// Fixed-leg day count.
        fixed_day_count: DayCountConvention,
        /// Id of the floating `IndexDefinition`.
        float_index_id: String,
        /// Spread over the floating index, in rate units.
        spread: f64,
        /// Forward-start lag in business days.
        forward_start_days: u32,
        /// Id of the exogenous discount curve, if the swap is priced off a
        /// curve other than the one being built.
        discount_curve_dep: Option<String>,
    },
    /// Overnight Index Swap at a standard tenor.
    Ois {
        /// Fixed rate.
        rate: QuoteRef,
        /// Tenor string.
        tenor: String,
        /// Settlement lag in business days.
        fixing_days: u32,
        /// Id of the overnight `IndexDefinition`.
        overnight_index_id: String,
        /// Fixed-leg payment frequency.
        payment_frequency: Frequency,
        /// How daily fixings compound over the accrual period.
        averaging: AveragingMethod,
    },
    /// OIS with an explicit, non-tenor window (e.g. a dated meeting-to-
    /// meeting swap).
    DatedOis {
        /// Fixed rate.
        rate: QuoteRef,
        /// Explicit accrual start.
        start: Date,
        /// Explicit accrual end.
        end: Date,
        /// Id of the overnight `IndexDefinition`.
        overnight_index_id: String,
    },
    /// Fixed-rate government bond.
    Bond {
        /// Clean market price.
        price: QuoteRef,
        /// Settlement lag in business days.
        settlement_days: u32,
        /// Face value.
        face: f64,
        /// Annual coupon rate.
        coupon_rate: f64,
        /// Coupon frequency.
        frequency: Frequency,
        /// Redemption value per unit face (1.0 for par redemption).
        redemption: f64,
        /// Issue date.
        issue_date: Date,
        /// Maturity date.
        maturity: Date,
    },
    /// Tenor basis swap (same currency, two float legs of different
    /// tenors).
    TenorBasisSwap {
        /// Basis spread.
        spread: QuoteRef,
        /// Id of the shorter-tenor `IndexDefinition`.
        short_index_id: String,
        /// Id of the longer-tenor `IndexDefinition`.
        long_index_id: String,
        /// Tenor string.
        tenor: String,
        /// Id of the exogenous discount curve, if any.
        discount_curve_dep: Option<String>,
    },
    /// FX swap (spot vs forward), used to bootstrap an implied foreign-
    /// currency collateralized curve.
    FxSwap {
        /// Forward points (forward − spot, in quote currency units).
        fx_points: QuoteRef,
        /// Spot FX rate.
        spot: f64,
        /// Tenor string.
        tenor: String,
        /// Conventions.
        conventions: Conventions,
        /// Id of the known foreign-currency discount curve.
        foreign_curve_dep: String,
    },
    /// Cross-currency basis swap.
    CrossCcyBasis {
        /// Basis spread, applied to the domestic leg.
        spread: QuoteRef,
        /// Id of the domestic-currency `IndexDefinition`.
        domestic_index_id: String,
        /// Id of the foreign-currency `IndexDefinition`.
        foreign_index_id: String,
        /// Tenor string.
        tenor: String,
        /// Id of the domestic-currency discount curve.
        domestic_discount_dep: String,
        /// Id of the foreign-currency discount curve.
        foreign_discount_dep: String,
    },
}

impl CalibrationPoint {
    /// Every curve id this point requires to be solved (or in flight)
    /// before it can be built, per its `deps` field.
    ///
    /// Used by the dependency resolver to extract `(thisCurve, depCurve)`
    /// edges.
    #[must_use]
    pub fn deps(&self) -> Vec<&str> {
        match self {
            Self::Swap { discount_curve_dep: Some(d), .. }
            | Self::TenorBasisSwap { discount_curve_dep: Some(d), .. } => vec![d.as_str()],
            Self::FxSwap { foreign_curve_dep, .. } => vec![foreign_curve_dep.as_str()],
            Self::CrossCcyBasis {
                domestic_discount_dep,
                foreign_discount_dep,
                ..
            } => vec![domestic_discount_dep.as_str(), foreign_discount_dep.as_str()],
            _ => Vec::new(),
        }
    }

    /// Short tag used in log messages and error context.
    #[must_use]
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Deposit { .. } => "Deposit",
            Self::Fra { .. } => "FRA",
            Self::Future { .. } => "Future",
            Self::Swap { .. } => "Swap",
            Self::Ois { .. } => "OIS",
            Self::DatedOis { .. } => "DatedOIS",
            Self::Bond { .. } => "Bond",
            Self::TenorBasisSwap { .. } => "TenorBasisSwap",
            Self::FxSwap { .. } => "FxSwap",
            Self::CrossCcyBasis { .. } => "CrossCcyBasis",
        }
    }
}

/// The declarative description of one curve: how it is solved and from
/// what instruments.
#[derive(Debug, Clone)]
pub struct CurveSpec {
    /// Curve id, unique within a request.
    pub id: String,
    /// Valuation reference date.
    pub reference_date: Date,
    /// Day count used for year-fraction conversions on the curve itself.
    pub day_count: DayCountConvention,
    /// Interpolator.
    pub interpolator: InterpolationMethod,
    /// The quantity the curve is solved in.
    pub curve_trait: CurveTrait,
    /// Ordered calibration points, shortest maturity first by convention
    /// (not enforced — the numerical-library adapter sorts internally).
    pub points: Vec<CalibrationPoint>,
}

impl CurveSpec {
    /// Every curve id this spec's points declare a dependency on, deduped.
    #[must_use]
    pub fn dependency_ids(&self) -> Vec<&str> {
        let mut deps: Vec<&str> = self.points.iter().flat_map(CalibrationPoint::deps).collect();
        deps.sort_unstable();
        deps.dedup();
        deps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conv() -> Conventions {
        Conventions {
            calendar: "USD".into(),
            bdc: BusinessDayConvention::ModifiedFollowing,
            day_count: DayCountConvention::Act360,
        }
    }

    #[test]
    fn deposit_has_no_deps() {
        let p = CalibrationPoint::Deposit {
            rate: QuoteRef::new("q1"),
            tenor: "3M".into(),
            fixing_days: 2,
            conventions: conv(),
        };
        assert!(p.deps().is_empty());
    }

    #[test]
    fn swap_with_discount_dep_exposes_it() {
        let p = CalibrationPoint::Swap {
            rate: QuoteRef::new("q1"),
            tenor: "5Y".into(),
            fixed_frequency: Frequency::Annual,
            fixed_day_count: DayCountConvention::Act360,
            float_index_id: "eur3m".into(),
            spread: 0.0,
            forward_start_days: 0,
            discount_curve_dep: Some("ois".into()),
        };
        assert_eq!(p.deps(), vec!["ois"]);
    }

    #[test]
    fn cross_ccy_basis_exposes_both_deps() {
        let p = CalibrationPoint::CrossCcyBasis {
            spread: QuoteRef::new("q1"),
            domestic_index_id: "usd.sofr".into(),
            foreign_index_id: "eur.estr".into(),
            tenor: "5Y".into(),
            domestic_discount_dep: "usd.ois".into(),
            foreign_discount_dep: "eur.ois".into(),
        };
        assert_eq!(p.deps(), vec!["usd.ois", "eur.ois"]);
    }

    #[test]
    fn curve_spec_dependency_ids_dedup_and_sort() {
        let spec = CurveSpec {
            id: "euribor".into(),
            reference_date: Date::from_ymd(2024, 1, 2).unwrap(),
            day_count: DayCountConvention::Act360,
            interpolator: InterpolationMethod::LogLinear,
            curve_trait: CurveTrait::Discount,
            points: vec![
                CalibrationPoint::Swap {
                    rate: QuoteRef::new("q1"),
                    tenor: "2Y".into(),
                    fixed_frequency: Frequency::Annual,
                    fixed_day_count: DayCountConvention::Act360,
                    float_index_id: "eur3m".into(),
                    spread: 0.0,
                    forward_start_days: 0,
                    discount_curve_dep: Some("ois".into()),
                },
                CalibrationPoint::Swap {
                    rate: QuoteRef::new("q2"),
                    tenor: "5Y".into(),
                    fixed_frequency: Frequency::Annual,
                    fixed_day_count: DayCountConvention::Act360,
                    float_index_id: "eur3m".into(),
                    spread: 0.0,
                    forward_start_days: 0,
                    discount_curve_dep: Some("ois".into()),
                },
            ],
        };
        assert_eq!(spec.dependency_ids(), vec!["ois"]);
    }
}
