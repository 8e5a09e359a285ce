//! G-spread (government spread) calculator.
//!
//! The G-spread is the yield spread of a bond over the interpolated
//! government benchmark yield at the same maturity.

use rust_decimal::Decimal;

use convex_bonds::traits::{Bond, FixedCouponBond};
use convex_core::types::{Date, Spread, SpreadType, Yield};

use crate::error::{AnalyticsError, AnalyticsResult};

use super::benchmark::BenchmarkSpec;
use super::government_curve::GovernmentCurve;

/// G-spread calculator for fixed rate bonds.
///
/// Calculates the spread over a government benchmark yield.
#[derive(Debug)]
pub struct GSpreadCalculator<'a> {
    /// Reference to the government curve.
    gov_curve: &'a GovernmentCurve,
    /// Benchmark specification.
    benchmark_spec: BenchmarkSpec,
}

impl<'a> GSpreadCalculator<'a> {
    /// Creates a new G-spread calculator with interpolated benchmark.
    ///
    /// # Arguments
    ///
    /// * `gov_curve` - Government yield curve with benchmarks
    #[must_use]
    pub fn new(gov_curve: &'a GovernmentCurve) -> Self {
        Self {
            gov_curve,
            benchmark_spec: BenchmarkSpec::Interpolated,
        }
    }

    /// Sets the benchmark specification.
    #[must_use]
    pub fn with_benchmark(mut self, spec: BenchmarkSpec) -> Self {
        self.benchmark_spec = spec;
        self
    }

    /// Calculates the G-spread for a bond.
    ///
    /// # Arguments
    ///
    /// * `bond` - The fixed rate bond
    /// * `bond_yield` - The bond's yield to maturity
    /// * `settlement` - Settlement date
    ///
    /// # Returns
    ///
    /// The G-spread as a `Spread` in basis points.
    ///
    /// # Errors
    ///
    /// Returns `AnalyticsError` if:
    /// - Settlement is at or after maturity
    /// - Benchmark yield cannot be determined
    pub fn calculate<B: Bond + FixedCouponBond>(
        &self,
        bond: &B,
        bond_yield: Yield,
        settlement: Date,
    ) -> AnalyticsResult<Spread> {
        let maturity = bond.maturity().ok_or_else(|| {
            AnalyticsError::InvalidInput("Bond has no maturity (perpetual)".to_string())
        })?;

        if settlement >= maturity {
            return Err(AnalyticsError::InvalidSettlement {
                settlement: settlement.to_string(),
                maturity: maturity.to_string(),
            });
        }

        // Get benchmark yield based on specification
        let benchmark_yield = self.get_benchmark_yield(settlement, maturity)?;

        // G-spread = Bond yield - Benchmark yield
        let bond_yield_val = bond_yield.value();
        let benchmark_yield_val = benchmark_yield.value();

        let spread = bond_yield_val - benchmark_yield_val;
        let spread_bps = (spread * Decimal::from(10_000)).round();

        Ok(Spread::new(spread_bps, SpreadType::GSpread))
    }

    /// Gets the benchmark yield based on the specification.
    fn get_benchmark_yield(&self, settlement: Date, maturity: Date) -> AnalyticsResult<Yield> {
        let years_to_maturity = settlement.days_between(&maturity) as f64 / 365.0;

        match &self.benchmark_spec {
            BenchmarkSpec::Interpolated => Ok(self.gov_curve.interpolated_yield(years_to_maturity)),
            BenchmarkSpec::OnTheRunTenor(tenor) => {
                self.gov_curve.benchmark_yield(*tenor).ok_or_else(|| {
                    AnalyticsError::BenchmarkNotFound(format!("No benchmark for tenor {:?}", tenor))
                })
            }
            BenchmarkSpec::NearestOnTheRun => self
                .gov_curve
                .nearest_benchmark(years_to_maturity)
                .map(|b| b.yield_rate)
                .ok_or_else(|| {
                    AnalyticsError::BenchmarkNotFound("No benchmarks available".to_string())
                }),
            BenchmarkSpec::SpecificSecurity(id) => self
                .gov_curve
                .security_by_id(id)
                .map(|b| b.yield_rate)
                .ok_or_else(|| {
                    AnalyticsError::BenchmarkNotFound(format!("Security {} not found", id))
                }),
            BenchmarkSpec::ExplicitYield(y) => Ok(*y),
        }
    }

    /// Returns the benchmark yield that would be used.
    ///
    /// Useful for debugging or displaying the benchmark.
    pub fn benchmark_yield(&self, settlement: Date, maturity: Date) -> AnalyticsResult<Yield> {
        self.get_benchmark_yield(settlement, maturity)
    }
}

/// Convenience function to calculate G-spread with interpolated benchmark.
///
/// # Arguments
///
/// * `bond` - The fixed rate bond
/// * `bond_yield` - Bond's yield to maturity
/// * `gov_curve` - Government yield curve
/// * `settlement` - Settlement date
///
/// # Returns
///
/// G-spread in basis points.
pub fn g_spread<B: Bond + FixedCouponBond>(
    bond: &B,
    bond_yield: Yield,
    gov_curve: &GovernmentCurve,
    settlement: Date,
) -> AnalyticsResult<Spread> {
    GSpreadCalculator::new(gov_curve).calculate(bond, bond_yield, settlement)
}

/// Calculate G-spread with explicit benchmark specification.
pub fn g_spread_with_benchmark<B: Bond + FixedCouponBond>(
    bond: &B,
    bond_yield: Yield,
    gov_curve: &GovernmentCurve,
    settlement: Date,
    benchmark_spec: BenchmarkSpec,
) -> AnalyticsResult<Spread> {
    GSpreadCalculator::new(gov_curve)
        .with_benchmark(benchmark_spec)
        .calculate(bond, bond_yield, settlement)
}
