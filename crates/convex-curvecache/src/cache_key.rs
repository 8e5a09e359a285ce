//! Content-addressed cache key: a total function of every input that can
//! change a bootstrapped curve's pillars.
//!
//! The key is `yc:v1:<64 lowercase hex>`, a sha-256 digest over a canonical
//! byte encoding. All integers little-endian; booleans one byte; doubles
//! IEEE-754 with `-0.0` normalized to `+0.0`; strings `u32` length prefix
//! followed by raw UTF-8 bytes; variants begin with a one-byte
//! discriminator; optional fields are prefixed with a presence byte. Named
//! section tags (`HDR`, `HELP`, `IDX`, `DEPS`) separate logically distinct
//! regions so no two distinct inputs collide by accident of adjacency.

use chrono::Datelike;
use sha2::{Digest, Sha256};

use convex_core::calendars::BusinessDayConvention;
use convex_core::daycounts::DayCountConvention;
use convex_core::types::{Date, Frequency};
use convex_curves::interpolation::InterpolationMethod;

use crate::spec::{AveragingMethod, CalibrationPoint, CurveTrait};

/// A validated `yc:v1:<hex>` cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    /// Returns the key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CacheKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Accumulates canonical bytes for one cache key computation.
struct Encoder {
    bytes: Vec<u8>,
}

impl Encoder {
    fn new() -> Self {
        Self { bytes: Vec::with_capacity(256) }
    }

    fn tag(&mut self, tag: &str) {
        self.bytes.extend_from_slice(tag.as_bytes());
    }

    fn u8(&mut self, v: u8) {
        self.bytes.push(v);
    }

    fn u32(&mut self, v: u32) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    fn u64(&mut self, v: u64) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    fn i64(&mut self, v: i64) {
        self.bytes.extend_from_slice(&v.to_le_bytes());
    }

    fn bool(&mut self, v: bool) {
        self.u8(u8::from(v));
    }

    /// Normalizes `-0.0` to `+0.0` before writing IEEE-754 bits, so that
    /// two numerically-equal-but-differently-signed zeros hash identically.
    fn f64(&mut self, v: f64) {
        let normalized = if v == 0.0 { 0.0 } else { v };
        self.bytes.extend_from_slice(&normalized.to_bits().to_le_bytes());
    }

    fn str(&mut self, s: &str) {
        self.u32(s.len() as u32);
        self.bytes.extend_from_slice(s.as_bytes());
    }

    fn date(&mut self, d: Date) {
        self.i64(i64::from(d.as_naive_date().num_days_from_ce()));
    }

    fn presence<T>(&mut self, opt: &Option<T>, write: impl FnOnce(&mut Self, &T)) {
        match opt {
            Some(v) => {
                self.bool(true);
                write(self, v);
            }
            None => self.bool(false),
        }
    }

    fn day_count(&mut self, dc: DayCountConvention) {
        self.u8(dc as u8);
    }

    fn bdc(&mut self, bdc: BusinessDayConvention) {
        self.u8(bdc as u8);
    }

    fn frequency(&mut self, f: Frequency) {
        self.u8(f as u8);
    }

    fn interpolator(&mut self, i: InterpolationMethod) {
        self.u8(i as u8);
    }

    fn curve_trait(&mut self, t: CurveTrait) {
        self.u8(match t {
            CurveTrait::Discount => 0,
            CurveTrait::ZeroYield => 1,
            CurveTrait::ForwardRate => 2,
        });
    }

    fn averaging(&mut self, a: AveragingMethod) {
        self.u8(match a {
            AveragingMethod::CompoundedDaily => 0,
            AveragingMethod::SimpleAverage => 1,
        });
    }

    fn finish(self) -> CacheKey {
        let digest = Sha256::digest(&self.bytes);
        CacheKey(format!("yc:v1:{digest:x}"))
    }
}

/// The inputs one curve's cache key is computed over.
pub struct KeyInput<'a> {
    /// The valuation/evaluation date the request was made for.
    pub evaluation_date: Date,
    /// The curve's own reference date (spot, typically).
    pub reference_date: Date,
    /// Day count used by the curve itself.
    pub day_count: DayCountConvention,
    /// Interpolator.
    pub interpolator: InterpolationMethod,
    /// Bootstrap trait (Discount / ZeroYield / ForwardRate).
    pub curve_trait: CurveTrait,
    /// The curve id (distinguishes otherwise-identical specs).
    pub curve_id: &'a str,
    /// Each helper's resolved numeric value, in declaration order,
    /// parallel to `points`.
    pub resolved_values: &'a [f64],
    /// The calibration points themselves (for variant tag and non-quote
    /// fields).
    pub points: &'a [CalibrationPoint],
    /// Every index definition referenced by any helper of this curve,
    /// pre-sorted by id, flattened to its hashable field set.
    pub referenced_indices: &'a [IndexKeyFields],
    /// `(depId, depKey)` pairs for every curve this one depends on,
    /// pre-sorted by `depId`.
    pub dependencies: &'a [(String, CacheKey)],
}

/// The subset of an `IndexDefinition`'s fields that affect a dependent
/// curve's pillars, used to fold index definitions into the cache key.
pub struct IndexKeyFields {
    /// Index id.
    pub id: String,
    /// True for an `Ibor`-style term index, false for `Overnight`.
    pub is_ibor: bool,
    /// Tenor in months (0 for overnight).
    pub tenor_months: u32,
    /// Accrual day count.
    pub day_count: DayCountConvention,
    /// Business day convention.
    pub bdc: BusinessDayConvention,
    /// End-of-month rule.
    pub eom: bool,
}

/// Computes the cache key for one curve.
#[must_use]
pub fn compute(input: &KeyInput<'_>) -> CacheKey {
    let mut enc = Encoder::new();

    enc.tag("HDR");
    enc.date(input.evaluation_date);
    enc.date(input.reference_date);
    enc.day_count(input.day_count);
    enc.interpolator(input.interpolator);
    enc.curve_trait(input.curve_trait);
    enc.str(input.curve_id);

    enc.tag("HELP");
    enc.u32(input.points.len() as u32);
    for (point, &value) in input.points.iter().zip(input.resolved_values) {
        encode_point(&mut enc, point, value);
    }

    enc.tag("IDX");
    enc.u32(input.referenced_indices.len() as u32);
    for idx in input.referenced_indices {
        enc.str(&idx.id);
        enc.bool(idx.is_ibor);
        enc.u32(idx.tenor_months);
        enc.day_count(idx.day_count);
        enc.bdc(idx.bdc);
        enc.bool(idx.eom);
    }

    enc.tag("DEPS");
    enc.u32(input.dependencies.len() as u32);
    for (dep_id, dep_key) in input.dependencies {
        enc.str(dep_id);
        enc.str(dep_key.as_str());
    }

    enc.finish()
}

/// Writes one helper's variant tag and every field, with quote references
/// already resolved to `value` (never the quote id) and curve-handle
/// dependencies folded in separately via `KeyInput::dependencies`.
fn encode_point(enc: &mut Encoder, point: &CalibrationPoint, value: f64) {
    match point {
        CalibrationPoint::Deposit {
            tenor,
            fixing_days,
            conventions,
            ..
        } => {
            enc.u8(0);
            enc.f64(value);
            enc.str(tenor);
            enc.u32(*fixing_days);
            enc.str(&conventions.calendar);
            enc.bdc(conventions.bdc);
            enc.day_count(conventions.day_count);
        }
        CalibrationPoint::Fra {
            months_to_start,
            months_to_end,
            conventions,
            ..
        } => {
            enc.u8(1);
            enc.f64(value);
            enc.u32(*months_to_start);
            enc.u32(*months_to_end);
            enc.str(&conventions.calendar);
            enc.bdc(conventions.bdc);
            enc.day_count(conventions.day_count);
        }
        CalibrationPoint::Future {
            quote_is_price,
            start,
            months,
            conventions,
            ..
        } => {
            enc.u8(2);
            enc.bool(*quote_is_price);
            enc.f64(value);
            enc.date(*start);
            enc.u32(*months);
            enc.str(&conventions.calendar);
            enc.bdc(conventions.bdc);
            enc.day_count(conventions.day_count);
        }
        CalibrationPoint::Swap {
            tenor,
            fixed_frequency,
            fixed_day_count,
            float_index_id,
            spread,
            forward_start_days,
            discount_curve_dep,
        } => {
            enc.u8(3);
            enc.f64(value);
            enc.str(tenor);
            enc.frequency(*fixed_frequency);
            enc.day_count(*fixed_day_count);
            enc.str(float_index_id);
            enc.f64(*spread);
            enc.u32(*forward_start_days);
            enc.presence(discount_curve_dep, |e, d| e.str(d));
        }
        CalibrationPoint::Ois {
            tenor,
            fixing_days,
            overnight_index_id,
            payment_frequency,
            averaging,
            ..
        } => {
            enc.u8(4);
            enc.f64(value);
            enc.str(tenor);
            enc.u32(*fixing_days);
            enc.str(overnight_index_id);
            enc.frequency(*payment_frequency);
            enc.averaging(*averaging);
        }
        CalibrationPoint::DatedOis {
            start,
            end,
            overnight_index_id,
            ..
        } => {
            enc.u8(5);
            enc.f64(value);
            enc.date(*start);
            enc.date(*end);
            enc.str(overnight_index_id);
        }
        CalibrationPoint::Bond {
            settlement_days,
            face,
            coupon_rate,
            frequency,
            redemption,
            issue_date,
            maturity,
            ..
        } => {
            enc.u8(6);
            enc.f64(value);
            enc.u32(*settlement_days);
            enc.f64(*face);
            enc.f64(*coupon_rate);
            enc.frequency(*frequency);
            enc.f64(*redemption);
            enc.date(*issue_date);
            enc.date(*maturity);
        }
        CalibrationPoint::TenorBasisSwap {
            short_index_id,
            long_index_id,
            tenor,
            discount_curve_dep,
            ..
        } => {
            enc.u8(7);
            enc.f64(value);
            enc.str(short_index_id);
            enc.str(long_index_id);
            enc.str(tenor);
            enc.presence(discount_curve_dep, |e, d| e.str(d));
        }
        CalibrationPoint::FxSwap {
            spot,
            tenor,
            conventions,
            foreign_curve_dep,
            ..
        } => {
            enc.u8(8);
            enc.f64(value);
            enc.f64(*spot);
            enc.str(tenor);
            enc.str(&conventions.calendar);
            enc.str(foreign_curve_dep);
        }
        CalibrationPoint::CrossCcyBasis {
            domestic_index_id,
            foreign_index_id,
            tenor,
            domestic_discount_dep,
            foreign_discount_dep,
            ..
        } => {
            enc.u8(9);
            enc.f64(value);
            enc.str(domestic_index_id);
            enc.str(foreign_index_id);
            enc.str(tenor);
            enc.str(domestic_discount_dep);
            enc.str(foreign_discount_dep);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convex_core::calendars::BusinessDayConvention;

    fn conv() -> crate::spec::Conventions {
        crate::spec::Conventions {
            calendar: "USD".into(),
            bdc: BusinessDayConvention::ModifiedFollowing,
            day_count: DayCountConvention::Act360,
        }
    }

    fn base_input<'a>(
        points: &'a [CalibrationPoint],
        values: &'a [f64],
    ) -> KeyInput<'a> {
        KeyInput {
            evaluation_date: Date::from_ymd(2024, 1, 2).unwrap(),
            reference_date: Date::from_ymd(2024, 1, 2).unwrap(),
            day_count: DayCountConvention::Act360,
            interpolator: InterpolationMethod::LogLinear,
            curve_trait: CurveTrait::Discount,
            curve_id: "usd.ois",
            resolved_values: values,
            points,
            referenced_indices: &[],
            dependencies: &[],
        }
    }

    fn deposit(tenor: &str) -> CalibrationPoint {
        CalibrationPoint::Deposit {
            rate: crate::spec::QuoteRef::new("q"),
            tenor: tenor.into(),
            fixing_days: 2,
            conventions: conv(),
        }
    }

    #[test]
    fn same_bytes_yield_same_key() {
        let points = vec![deposit("3M")];
        let a = compute(&base_input(&points, &[0.05]));
        let b = compute(&base_input(&points, &[0.05]));
        assert_eq!(a, b);
    }

    #[test]
    fn different_resolved_value_changes_key() {
        let points = vec![deposit("3M")];
        let a = compute(&base_input(&points, &[0.05]));
        let b = compute(&base_input(&points, &[0.06]));
        assert_ne!(a, b);
    }

    #[test]
    fn different_curve_id_changes_key() {
        let points = vec![deposit("3M")];
        let mut input_a = base_input(&points, &[0.05]);
        let mut input_b = base_input(&points, &[0.05]);
        input_a.curve_id = "a";
        input_b.curve_id = "b";
        assert_ne!(compute(&input_a), compute(&input_b));
    }

    #[test]
    fn negative_zero_normalizes_to_positive_zero() {
        let points = vec![deposit("3M")];
        let a = compute(&base_input(&points, &[0.0]));
        let b = compute(&base_input(&points, &[-0.0]));
        assert_eq!(a, b);
    }

    #[test]
    fn key_has_expected_prefix_and_length() {
        let points = vec![deposit("3M")];
        let key = compute(&base_input(&points, &[0.05]));
        assert!(key.as_str().starts_with("yc:v1:"));
        assert_eq!(key.as_str().len(), "yc:v1:".len() + 64);
    }

    #[test]
    fn dependency_key_participates_in_hash() {
        let points = vec![deposit("3M")];
        let mut input_a = base_input(&points, &[0.05]);
        let dep_key = compute(&base_input(&points, &[0.01]));
        let deps_a = vec![("ois".to_string(), dep_key.clone())];
        input_a.dependencies = &deps_a;
        let input_b = base_input(&points, &[0.05]);
        assert_ne!(compute(&input_a), compute(&input_b));
    }
}
