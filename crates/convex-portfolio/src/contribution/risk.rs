//! Risk contribution analysis.
//!
//! Calculates how each holding contributes to portfolio-level risk metrics.

use crate::types::{AnalyticsConfig, Holding, RatingBucket, Sector};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Contribution of a single holding to a portfolio metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingContribution {
    /// Holding identifier.
    pub id: String,

    /// Market value weight (0-1).
    pub weight: f64,

    /// Absolute contribution value.
    pub contribution: f64,

    /// Contribution as percentage of total (0-100).
    pub contribution_pct: f64,
}

/// Aggregated contribution for a bucket (sector, rating, etc.).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BucketContribution {
    /// Number of holdings in this bucket.
    pub count: usize,

    /// Total weight of holdings in bucket (0-1).
    pub weight: f64,

    /// Absolute contribution value.
    pub contribution: f64,

    /// Contribution as percentage of total (0-100).
    pub contribution_pct: f64,
}

/// Duration contribution analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DurationContributions {
    /// Contributions by holding, sorted by absolute contribution descending.
    pub by_holding: Vec<HoldingContribution>,

    /// Contributions by sector.
    pub by_sector: HashMap<Sector, BucketContribution>,

    /// Contributions by rating bucket.
    pub by_rating: HashMap<RatingBucket, BucketContribution>,

    /// Portfolio weighted average duration.
    pub portfolio_duration: f64,

    /// Total portfolio market value.
    pub total_market_value: Decimal,
}

impl DurationContributions {
    /// Returns the top N contributors by absolute contribution.
    #[must_use]
    pub fn top_contributors(&self, n: usize) -> Vec<&HoldingContribution> {
        self.by_holding.iter().take(n).collect()
    }

    /// Returns holdings that contribute more than the given percentage.
    #[must_use]
    pub fn large_contributors(&self, threshold_pct: f64) -> Vec<&HoldingContribution> {
        self.by_holding
            .iter()
            .filter(|c| c.contribution_pct.abs() > threshold_pct)
            .collect()
    }
}

/// DV01 contribution analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Dv01Contributions {
    /// Contributions by holding, sorted by absolute contribution descending.
    pub by_holding: Vec<HoldingContribution>,

    /// Contributions by sector.
    pub by_sector: HashMap<Sector, BucketContribution>,

    /// Contributions by rating bucket.
    pub by_rating: HashMap<RatingBucket, BucketContribution>,

    /// Total portfolio DV01.
    pub total_dv01: Decimal,

    /// Total portfolio market value.
    pub total_market_value: Decimal,
}

impl Dv01Contributions {
    /// Returns the top N contributors by absolute DV01.
    #[must_use]
    pub fn top_contributors(&self, n: usize) -> Vec<&HoldingContribution> {
        self.by_holding.iter().take(n).collect()
    }
}

/// Spread contribution analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadContributions {
    /// Contributions by holding, sorted by absolute contribution descending.
    pub by_holding: Vec<HoldingContribution>,

    /// Contributions by sector.
    pub by_sector: HashMap<Sector, BucketContribution>,

    /// Contributions by rating bucket.
    pub by_rating: HashMap<RatingBucket, BucketContribution>,

    /// Portfolio weighted average spread.
    pub portfolio_spread: f64,

    /// Total portfolio market value.
    pub total_market_value: Decimal,
}

impl SpreadContributions {
    /// Returns the top N contributors by absolute spread contribution.
    #[must_use]
    pub fn top_contributors(&self, n: usize) -> Vec<&HoldingContribution> {
        self.by_holding.iter().take(n).collect()
    }
}

/// CS01 (credit spread sensitivity) contribution analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Cs01Contributions {
    /// Contributions by holding, sorted by absolute contribution descending.
    pub by_holding: Vec<HoldingContribution>,

    /// Contributions by sector.
    pub by_sector: HashMap<Sector, BucketContribution>,

    /// Contributions by rating bucket.
    pub by_rating: HashMap<RatingBucket, BucketContribution>,

    /// Total portfolio CS01.
    pub total_cs01: Decimal,

    /// Total portfolio market value.
    pub total_market_value: Decimal,
}

/// Calculates duration contributions for each holding.
///
/// Duration contribution = weight × duration
///
/// # Arguments
///
/// * `holdings` - Slice of holdings to analyze
/// * `config` - Analytics configuration
///
/// # Returns
///
/// Duration contribution breakdown by holding and aggregations.
///
/// # Example
///
/// ```rust,ignore
/// use convex_portfolio::contribution::duration_contributions;
///
/// let contrib = duration_contributions(&portfolio.holdings, &config);
/// println!("Portfolio duration: {:.2}", contrib.portfolio_duration);
///
/// for c in contrib.top_contributors(5) {
///     println!("{}: {:.2}%", c.id, c.contribution_pct);
/// }
/// ```
#[must_use]
pub fn duration_contributions(
    holdings: &[Holding],
    _config: &AnalyticsConfig,
) -> DurationContributions {
    if holdings.is_empty() {
        return DurationContributions {
            by_holding: vec![],
            by_sector: HashMap::new(),
            by_rating: HashMap::new(),
            portfolio_duration: 0.0,
            total_market_value: Decimal::ZERO,
        };
    }

    let total_mv: Decimal = holdings.iter().map(|h| h.market_value()).sum();

    if total_mv.is_zero() {
        return DurationContributions {
            by_holding: vec![],
            by_sector: HashMap::new(),
            by_rating: HashMap::new(),
            portfolio_duration: 0.0,
            total_market_value: Decimal::ZERO,
        };
    }

    // Calculate individual contributions
    let mut contributions: Vec<HoldingContribution> = Vec::with_capacity(holdings.len());
    let mut total_contribution = 0.0;

    for h in holdings {
        if let Some(duration) = h.analytics.best_duration() {
            let mv: f64 = h.market_value().try_into().unwrap_or(0.0);
            let total_mv_f: f64 = total_mv.try_into().unwrap_or(1.0);
            let weight = mv / total_mv_f;
            let contribution = weight * duration;

            contributions.push(HoldingContribution {
                id: h.id.clone(),
                weight,
                contribution,
                contribution_pct: 0.0, // Will be calculated after we know total
            });

            total_contribution += contribution;
        }
    }

    // Calculate contribution percentages
    if total_contribution.abs() > f64::EPSILON {
        for c in &mut contributions {
            c.contribution_pct = (c.contribution / total_contribution) * 100.0;
        }
    }

    // Sort by absolute contribution descending
    contributions.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Aggregate by sector
    let by_sector = aggregate_by_sector(holdings, total_mv, total_contribution, |h| {
        h.analytics.best_duration()
    });

    // Aggregate by rating
    let by_rating = aggregate_by_rating(holdings, total_mv, total_contribution, |h| {
        h.analytics.best_duration()
    });

    DurationContributions {
        by_holding: contributions,
        by_sector,
        by_rating,
        portfolio_duration: total_contribution,
        total_market_value: total_mv,
    }
}

/// Calculates DV01 contributions for each holding.
///
/// DV01 contribution is the absolute DV01 value for each holding.
///
/// # Arguments
///
/// * `holdings` - Slice of holdings to analyze
/// * `config` - Analytics configuration
///
/// # Returns
///
/// DV01 contribution breakdown by holding and aggregations.
#[must_use]
pub fn dv01_contributions(holdings: &[Holding], _config: &AnalyticsConfig) -> Dv01Contributions {
    if holdings.is_empty() {
        return Dv01Contributions {
            by_holding: vec![],
            by_sector: HashMap::new(),
            by_rating: HashMap::new(),
            total_dv01: Decimal::ZERO,
            total_market_value: Decimal::ZERO,
        };
    }

    let total_mv: Decimal = holdings.iter().map(|h| h.market_value()).sum();
    let mut total_dv01 = Decimal::ZERO;

    // Calculate individual contributions
    let mut contributions: Vec<HoldingContribution> = Vec::with_capacity(holdings.len());

    for h in holdings {
        if let Some(dv01) = h.total_dv01() {
            let mv: f64 = h.market_value().try_into().unwrap_or(0.0);
            let total_mv_f: f64 = total_mv.try_into().unwrap_or(1.0);
            let weight = mv / total_mv_f;
            let dv01_f: f64 = dv01.try_into().unwrap_or(0.0);

            contributions.push(HoldingContribution {
                id: h.id.clone(),
                weight,
                contribution: dv01_f,
                contribution_pct: 0.0,
            });

            total_dv01 += dv01;
        }
    }

    // Calculate contribution percentages
    let total_dv01_f: f64 = total_dv01.try_into().unwrap_or(0.0);
    if total_dv01_f.abs() > f64::EPSILON {
        for c in &mut contributions {
            c.contribution_pct = (c.contribution / total_dv01_f) * 100.0;
        }
    }

    // Sort by absolute contribution descending
    contributions.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Aggregate by sector
    let by_sector = aggregate_dv01_by_sector(holdings, total_dv01);

    // Aggregate by rating
    let by_rating = aggregate_dv01_by_rating(holdings, total_dv01);

    Dv01Contributions {
        by_holding: contributions,
        by_sector,
        by_rating,
        total_dv01,
        total_market_value: total_mv,
    }
}

/// Calculates spread contributions for each holding.
///
/// Spread contribution = weight × spread (using best available spread).
///
/// # Arguments
///
/// * `holdings` - Slice of holdings to analyze
/// * `config` - Analytics configuration
///
/// # Returns
///
/// Spread contribution breakdown by holding and aggregations.
#[must_use]
pub fn spread_contributions(
    holdings: &[Holding],
    _config: &AnalyticsConfig,
) -> SpreadContributions {
    if holdings.is_empty() {
        return SpreadContributions {
            by_holding: vec![],
            by_sector: HashMap::new(),
            by_rating: HashMap::new(),
            portfolio_spread: 0.0,
            total_market_value: Decimal::ZERO,
        };
    }

    let total_mv: Decimal = holdings.iter().map(|h| h.market_value()).sum();

    if total_mv.is_zero() {
        return SpreadContributions {
            by_holding: vec![],
            by_sector: HashMap::new(),
            by_rating: HashMap::new(),
            portfolio_spread: 0.0,
            total_market_value: Decimal::ZERO,
        };
    }

    // Calculate individual contributions
    let mut contributions: Vec<HoldingContribution> = Vec::with_capacity(holdings.len());
    let mut total_contribution = 0.0;

    for h in holdings {
        if let Some(spread) = h.analytics.best_spread() {
            let mv: f64 = h.market_value().try_into().unwrap_or(0.0);
            let total_mv_f: f64 = total_mv.try_into().unwrap_or(1.0);
            let weight = mv / total_mv_f;
            let contribution = weight * spread;

            contributions.push(HoldingContribution {
                id: h.id.clone(),
                weight,
                contribution,
                contribution_pct: 0.0,
            });

            total_contribution += contribution;
        }
    }

    // Calculate contribution percentages
    if total_contribution.abs() > f64::EPSILON {
        for c in &mut contributions {
            c.contribution_pct = (c.contribution / total_contribution) * 100.0;
        }
    }

    // Sort by absolute contribution descending
    contributions.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Aggregate by sector
    let by_sector = aggregate_by_sector(holdings, total_mv, total_contribution, |h| {
        h.analytics.best_spread()
    });

    // Aggregate by rating
    let by_rating = aggregate_by_rating(holdings, total_mv, total_contribution, |h| {
        h.analytics.best_spread()
    });

    SpreadContributions {
        by_holding: contributions,
        by_sector,
        by_rating,
        portfolio_spread: total_contribution,
        total_market_value: total_mv,
    }
}

/// Calculates CS01 contributions for each holding.
///
/// CS01 contribution is the absolute credit spread sensitivity for each holding.
///
/// # Arguments
///
/// * `holdings` - Slice of holdings to analyze
/// * `config` - Analytics configuration
///
/// # Returns
///
/// CS01 contribution breakdown by holding and aggregations.
#[must_use]
pub fn cs01_contributions(holdings: &[Holding], _config: &AnalyticsConfig) -> Cs01Contributions {
    if holdings.is_empty() {
        return Cs01Contributions {
            by_holding: vec![],
            by_sector: HashMap::new(),
            by_rating: HashMap::new(),
            total_cs01: Decimal::ZERO,
            total_market_value: Decimal::ZERO,
        };
    }

    let total_mv: Decimal = holdings.iter().map(|h| h.market_value()).sum();
    let mut total_cs01 = Decimal::ZERO;

    // Calculate individual contributions
    let mut contributions: Vec<HoldingContribution> = Vec::with_capacity(holdings.len());

    for h in holdings {
        if let Some(cs01) = h.analytics.cs01 {
            // CS01 per par × par amount / 100
            let cs01_total = Decimal::from_f64_retain(cs01).unwrap_or(Decimal::ZERO) * h.par_amount
                / Decimal::ONE_HUNDRED
                * h.fx_rate;

            let mv: f64 = h.market_value().try_into().unwrap_or(0.0);
            let total_mv_f: f64 = total_mv.try_into().unwrap_or(1.0);
            let weight = mv / total_mv_f;
            let cs01_f: f64 = cs01_total.try_into().unwrap_or(0.0);

            contributions.push(HoldingContribution {
                id: h.id.clone(),
                weight,
                contribution: cs01_f,
                contribution_pct: 0.0,
            });

            total_cs01 += cs01_total;
        }
    }

    // Calculate contribution percentages
    let total_cs01_f: f64 = total_cs01.try_into().unwrap_or(0.0);
    if total_cs01_f.abs() > f64::EPSILON {
        for c in &mut contributions {
            c.contribution_pct = (c.contribution / total_cs01_f) * 100.0;
        }
    }

    // Sort by absolute contribution descending
    contributions.sort_by(|a, b| {
        b.contribution
            .abs()
            .partial_cmp(&a.contribution.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    // Aggregate by sector
    let by_sector = aggregate_cs01_by_sector(holdings, total_cs01);

    // Aggregate by rating
    let by_rating = aggregate_cs01_by_rating(holdings, total_cs01);

    Cs01Contributions {
        by_holding: contributions,
        by_sector,
        by_rating,
        total_cs01,
        total_market_value: total_mv,
    }
}

/// Helper to aggregate contributions by sector.
fn aggregate_by_sector<F>(
    holdings: &[Holding],
    total_mv: Decimal,
    total_contribution: f64,
    metric_fn: F,
) -> HashMap<Sector, BucketContribution>
where
    F: Fn(&Holding) -> Option<f64>,
{
    let mut by_sector: HashMap<Sector, BucketContribution> = HashMap::new();
    let total_mv_f: f64 = total_mv.try_into().unwrap_or(1.0);

    for h in holdings {
        if let Some(sector) = h.classification.sector.composite {
            if let Some(value) = metric_fn(h) {
                let mv: f64 = h.market_value().try_into().unwrap_or(0.0);
                let weight = mv / total_mv_f;
                let contribution = weight * value;

                let entry = by_sector.entry(sector).or_default();
                entry.count += 1;
                entry.weight += weight;
                entry.contribution += contribution;
            }
        }
    }

    // Calculate percentages
    if total_contribution.abs() > f64::EPSILON {
        for contrib in by_sector.values_mut() {
            contrib.contribution_pct = (contrib.contribution / total_contribution) * 100.0;
        }
    }

    by_sector
}

/// Helper to aggregate contributions by rating.
fn aggregate_by_rating<F>(
    holdings: &[Holding],
    total_mv: Decimal,
    total_contribution: f64,
    metric_fn: F,
) -> HashMap<RatingBucket, BucketContribution>
where
    F: Fn(&Holding) -> Option<f64>,
{
    let mut by_rating: HashMap<RatingBucket, BucketContribution> = HashMap::new();
    let total_mv_f: f64 = total_mv.try_into().unwrap_or(1.0);

    for h in holdings {
        if let Some(rating) = h.classification.rating.composite {
            if let Some(value) = metric_fn(h) {
                let bucket = rating.bucket();
                let mv: f64 = h.market_value().try_into().unwrap_or(0.0);
                let weight = mv / total_mv_f;
                let contribution = weight * value;

                let entry = by_rating.entry(bucket).or_default();
                entry.count += 1;
                entry.weight += weight;
                entry.contribution += contribution;
            }
        }
    }

    // Calculate percentages
    if total_contribution.abs() > f64::EPSILON {
        for contrib in by_rating.values_mut() {
            contrib.contribution_pct = (contrib.contribution / total_contribution) * 100.0;
        }
    }

    by_rating
}

/// Helper to aggregate DV01 by sector.
fn aggregate_dv01_by_sector(
    holdings: &[Holding],
    total_dv01: Decimal,
) -> HashMap<Sector, BucketContribution> {
    let mut by_sector: HashMap<Sector, BucketContribution> = HashMap::new();
    let total_mv: Decimal = holdings.iter().map(|h| h.market_value()).sum();
    let total_mv_f: f64 = total_mv.try_into().unwrap_or(1.0);
    let total_dv01_f: f64 = total_dv01.try_into().unwrap_or(0.0);

    for h in holdings {
        if let Some(sector) = h.classification.sector.composite {
            if let Some(dv01) = h.total_dv01() {
                let mv: f64 = h.market_value().try_into().unwrap_or(0.0);
                let weight = mv / total_mv_f;
                let dv01_f: f64 = dv01.try_into().unwrap_or(0.0);

                let entry = by_sector.entry(sector).or_default();
                entry.count += 1;
                entry.weight += weight;
                entry.contribution += dv01_f;
            }
        }
    }

    // Calculate percentages
    if total_dv01_f.abs() > f64::EPSILON {
        for contrib in by_sector.values_mut() {
            contrib.contribution_pct = (contrib.contribution / total_dv01_f) * 100.0;
        }
    }

    by_sector
}

/// Helper to aggregate DV01 by rating.
fn aggregate_dv01_by_rating(
    holdings: &[Holding],
    total_dv01: Decimal,
) -> HashMap<RatingBucket, BucketContribution> {
    let mut by_rating: HashMap<RatingBucket, BucketContribution> = HashMap::new();
    let total_mv: Decimal = holdings.iter().map(|h| h.market_value()).sum();
    let total_mv_f: f64 = total_mv.try_into().unwrap_or(1.0);
    let total_dv01_f: f64 = total_dv01.try_into().unwrap_or(0.0);

    for h in holdings {
        if let Some(rating) = h.classification.rating.composite {
            if let Some(dv01) = h.total_dv01() {
                let bucket = rating.bucket();
                let mv: f64 = h.market_value().try_into().unwrap_or(0.0);
                let weight = mv / total_mv_f;
                let dv01_f: f64 = dv01.try_into().unwrap_or(0.0);

                let entry = by_rating.entry(bucket).or_default();
                entry.count += 1;
                entry.weight += weight;
                entry.contribution += dv01_f;
            }
        }
    }

    // Calculate percentages
    if total_dv01_f.abs() > f64::EPSILON {
        for contrib in by_rating.values_mut() {
            contrib.contribution_pct = (contrib.contribution / total_dv01_f) * 100.0;
        }
    }

    by_rating
}

/// Helper to aggregate CS01 by sector.
fn aggregate_cs01_by_sector(
    holdings: &[Holding],
    total_cs01: Decimal,
) -> HashMap<Sector, BucketContribution> {
    let mut by_sector: HashMap<Sector, BucketContribution> = HashMap::new();
    let total_mv: Decimal = holdings.iter().map(|h| h.market_value()).sum();
    let total_mv_f: f64 = total_mv.try_into().unwrap_or(1.0);
    let total_cs01_f: f64 = total_cs01.try_into().unwrap_or(0.0);

    for h in holdings {
        if let Some(sector) = h.classification.sector.composite {
            if let Some(cs01) = h.analytics.cs01 {
                let cs01_total = Decimal::from_f64_retain(cs01).unwrap_or(Decimal::ZERO)
                    * h.par_amount
                    / Decimal::ONE_HUNDRED
                    * h.fx_rate;

                let mv: f64 = h.market_value().try_into().unwrap_or(0.0);
                let weight = mv / total_mv_f;
                let cs01_f: f64 = cs01_total.try_into().unwrap_or(0.0);

                let entry = by_sector.entry(sector).or_default();
                entry.count += 1;
                entry.weight += weight;
                entry.contribution += cs01_f;
            }
        }
    }

    // Calculate percentages
    if total_cs01_f.abs() > f64::EPSILON {
        for contrib in by_sector.values_mut() {
            contrib.contribution_pct = (contrib.contribution / total_cs01_f) * 100.0;
        }
    }

    by_sector
}

/// Helper to aggregate CS01 by rating.
fn aggregate_cs01_by_rating(
    holdings: &[Holding],
    total_cs01: Decimal,
) -> HashMap<RatingBucket, BucketContribution> {
    let mut by_rating: HashMap<RatingBucket, BucketContribution> = HashMap::new();
    let total_mv: Decimal = holdings.iter().map(|h| h.market_value()).sum();
    let total_mv_f: f64 = total_mv.try_into().unwrap_or(1.0);
    let total_cs01_f: f64 = total_cs01.try_into().unwrap_or(0.0);

    for h in holdings {
        if let Some(rating) = h.classification.rating.composite {
            if let Some(cs01) = h.analytics.cs01 {
                let cs01_total = Decimal::from_f64_retain(cs01).unwrap_or(Decimal::ZERO)
                    * h.par_amount
                    / Decimal::ONE_HUNDRED
                    * h.fx_rate;

                let bucket = rating.bucket();
                let mv: f64 = h.market_value().try_into().unwrap_or(0.0);
                let weight = mv / total_mv_f;
                let cs01_f: f64 = cs01_total.try_into().unwrap_or(0.0);

                let entry = by_rating.entry(bucket).or_default();
                entry.count += 1;
                entry.weight += weight;
                entry.contribution += cs01_f;
            }
        }
    }

    // Calculate percentages
    if total_cs01_f.abs() > f64::EPSILON {
        for contrib in by_rating.values_mut() {
            contrib.contribution_pct = (contrib.contribution / total_cs01_f) * 100.0;
        }
    }

    by_rating
}
