//! Grid/measure evaluator for the public curve-query endpoint.
//!
//! A request names a [`GridSpec`] (how to build the dates) and a
//! non-empty list of [`Measure`]s (what to evaluate at each date). This
//! module builds the grid once and evaluates every measure against it,
//! returning the dates alongside each measure's value vector and the
//! underlying curve's pillar dates.

use rust_decimal::prelude::ToPrimitive;

use convex_core::calendars::{BusinessDayConvention, Calendar};
use convex_core::daycounts::DayCountConvention;
use convex_core::types::Date;
use convex_curves::compounding::Compounding;
use convex_curves::traits::Curve;

use crate::error::{CurveCacheError, CurveCacheResult};
use crate::numlib::{advance_tenor, resolve_calendar};

/// A single advance unit for a [`GridSpec::Tenor`] grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TenorUnit {
    Days,
    Weeks,
    Months,
    Years,
}

/// Hard cap on the number of points a single grid may produce.
///
/// Preserved as a conservative default rather than made configurable;
/// see the design notes for why.
pub const MAX_GRID_POINTS: usize = 50_000;

/// How the query's grid of dates is constructed.
#[derive(Debug, Clone)]
pub enum GridSpec {
    /// `count` points at `1, 2, ..., count` multiples of `unit`, advanced
    /// from `reference_date` and, if a calendar/BDC pair is given,
    /// adjusted onto a business day.
    Tenor {
        count: u32,
        unit: TenorUnit,
        calendar: Option<String>,
        bdc: Option<BusinessDayConvention>,
    },
    /// Inclusive `[start, end]` stepped by `step_days` calendar days, or
    /// by that many business days if `business_days_only` is set.
    Range {
        start: Date,
        end: Date,
        step_days: u32,
        business_days_only: bool,
        calendar: Option<String>,
    },
}

impl GridSpec {
    /// Builds the grid's dates.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::GridTooLarge`] if the spec would produce more
    /// than [`MAX_GRID_POINTS`] dates.
    pub fn build(&self, reference_date: Date) -> CurveCacheResult<Vec<Date>> {
        match self {
            GridSpec::Tenor {
                count,
                unit,
                calendar,
                bdc,
            } => build_tenor_grid(reference_date, *count, *unit, calendar.as_deref(), *bdc),
            GridSpec::Range {
                start,
                end,
                step_days,
                business_days_only,
                calendar,
            } => build_range_grid(*start, *end, *step_days, *business_days_only, calendar.as_deref()),
        }
    }
}

fn build_tenor_grid(
    reference_date: Date,
    count: u32,
    unit: TenorUnit,
    calendar: Option<&str>,
    bdc: Option<BusinessDayConvention>,
) -> CurveCacheResult<Vec<Date>> {
    check_point_count(count as usize)?;
    let tenor_tag = match unit {
        TenorUnit::Days => "D",
        TenorUnit::Weeks => "W",
        TenorUnit::Months => "M",
        TenorUnit::Years => "Y",
    };
    let cal = calendar.map(resolve_calendar);
    let mut dates = Vec::with_capacity(count as usize);
    for n in 1..=count {
        let mut date = advance_tenor(reference_date, &format!("{n}{tenor_tag}"))?;
        if let (Some(cal), Some(bdc)) = (&cal, bdc) {
            date = cal.adjust(date, bdc)?;
        }
        dates.push(date);
    }
    Ok(dates)
}

fn build_range_grid(
    start: Date,
    end: Date,
    step_days: u32,
    business_days_only: bool,
    calendar: Option<&str>,
) -> CurveCacheResult<Vec<Date>> {
    if step_days == 0 {
        return Err(CurveCacheError::InvalidGrid {
            reason: "step_days must be positive".into(),
        });
    }
    if end < start {
        return Err(CurveCacheError::InvalidGrid {
            reason: "range grid end precedes start".into(),
        });
    }
    let cal = calendar.map(resolve_calendar);
    let step_count = i32::try_from(step_days).unwrap_or(i32::MAX);
    let step_days_i64 = i64::from(step_days);

    let mut dates = Vec::new();
    let mut date = start;
    while date <= end {
        check_point_count(dates.len() + 1)?;
        dates.push(date);
        date = match (business_days_only, &cal) {
            (true, Some(cal)) => cal.add_business_days(date, step_count),
            (true, None) => date.add_business_days(step_count),
            (false, _) => date.add_days(step_days_i64),
        };
    }
    Ok(dates)
}

fn check_point_count(n: usize) -> CurveCacheResult<()> {
    if n > MAX_GRID_POINTS {
        Err(CurveCacheError::GridTooLarge {
            requested: n,
            max: MAX_GRID_POINTS,
        })
    } else {
        Ok(())
    }
}

/// A single requested evaluation, applied at every grid point.
#[derive(Debug, Clone)]
pub enum Measure {
    /// Discount factor, evaluated directly.
    Df,
    /// Zero rate under the given compounding and day-count convention.
    /// A grid point that falls on the reference date is advanced by one
    /// day first, since the zero rate at zero time is degenerate.
    Zero {
        compounding: Compounding,
        day_count: DayCountConvention,
    },
    /// Instantaneous forward rate (limiting period-forward as the period
    /// shrinks to zero).
    InstantaneousForward,
    /// Forward rate over a tenor advanced from the grid date.
    PeriodForward { tenor: String, compounding: Compounding },
}

impl Measure {
    /// `ZERO` with the default compounding (Annual) and day-count
    /// (Actual/365 Fixed, matching [`Curve::year_fraction`]'s default).
    #[must_use]
    pub fn zero_default() -> Self {
        Measure::Zero {
            compounding: Compounding::Annual,
            day_count: DayCountConvention::Act365Fixed,
        }
    }

    /// `FWD` over the default 3-month period under Simple compounding.
    #[must_use]
    pub fn period_forward_default() -> Self {
        Measure::PeriodForward {
            tenor: "3M".into(),
            compounding: Compounding::Simple,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            Measure::Df => "DF",
            Measure::Zero { .. } => "ZERO",
            Measure::InstantaneousForward | Measure::PeriodForward { .. } => "FWD",
        }
    }
}

/// One measure's evaluated values across the whole grid, in grid order.
#[derive(Debug, Clone)]
pub struct MeasureSeries {
    pub label: &'static str,
    pub values: Vec<f64>,
}

/// The full result of evaluating a query: the grid dates, one series per
/// requested measure, and the underlying curve's pillar dates.
#[derive(Debug, Clone)]
pub struct GridResult {
    pub dates: Vec<String>,
    pub series: Vec<MeasureSeries>,
    pub pillar_dates: Vec<String>,
}

/// Builds the grid and evaluates every measure against `curve`.
///
/// # Errors
///
/// [`CurveCacheError::GridTooLarge`] / [`CurveCacheError::InvalidGrid`]
/// from grid construction; propagates [`CurveCacheError::Curves`] if a
/// measure can't be evaluated at some grid point (e.g. extrapolation
/// disabled and a date falls outside the curve's range).
pub fn evaluate(
    reference_date: Date,
    grid: &GridSpec,
    measures: &[Measure],
    curve: &dyn Curve,
    pillar_dates: &[Date],
) -> CurveCacheResult<GridResult> {
    if measures.is_empty() {
        return Err(CurveCacheError::InvalidGrid {
            reason: "at least one measure is required".into(),
        });
    }
    let dates = grid.build(reference_date)?;

    let mut series = Vec::with_capacity(measures.len());
    for measure in measures {
        let mut values = Vec::with_capacity(dates.len());
        for &date in &dates {
            values.push(evaluate_one(measure, reference_date, date, curve)?);
        }
        series.push(MeasureSeries {
            label: measure.label(),
            values,
        });
    }

    Ok(GridResult {
        dates: dates.iter().map(Date::to_string).collect(),
        series,
        pillar_dates: pillar_dates.iter().map(Date::to_string).collect(),
    })
}

fn evaluate_one(measure: &Measure, reference_date: Date, date: Date, curve: &dyn Curve) -> CurveCacheResult<f64> {
    match measure {
        Measure::Df => Ok(curve.discount_factor_at(date)?),
        Measure::Zero { compounding, day_count } => {
            let eval_date = if date == reference_date { date.add_days(1) } else { date };
            let t = year_fraction(*day_count, reference_date, eval_date);
            Ok(curve.zero_rate(t, *compounding)?)
        }
        Measure::InstantaneousForward => {
            let t = curve.year_fraction(date);
            Ok(curve.instantaneous_forward(t)?)
        }
        Measure::PeriodForward { tenor, compounding } => {
            let t1 = curve.year_fraction(date);
            let end = advance_tenor(date, tenor)?;
            let t2 = curve.year_fraction(end);
            let simple = curve.forward_rate(t1, t2)?;
            Ok(Compounding::Simple.convert_to(simple, *compounding, t2 - t1))
        }
    }
}

fn year_fraction(day_count: DayCountConvention, start: Date, end: Date) -> f64 {
    day_count
        .to_day_count()
        .year_fraction(start, end)
        .to_f64()
        .unwrap_or(0.0)
}
