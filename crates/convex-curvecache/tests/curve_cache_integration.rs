//! End-to-end scenarios over the public surface: registries in, a solved
//! curve (or a request failure) out.
//!
//! Pricing a bond off a solved curve (NPV) is the instrument-pricing
//! layer's job, not this crate's — these tests check the curve-cache
//! contract directly: build order, cache identity, bump isolation, cycle
//! detection, reconstruction fidelity, and pricing-registry
//! compatibility.

use std::sync::Arc;

use convex_core::calendars::BusinessDayConvention;
use convex_core::daycounts::DayCountConvention;
use convex_core::types::{Date, Frequency};
use convex_curves::curves::DiscountCurve;
use convex_curves::interpolation::InterpolationMethod;
use convex_curves::traits::Curve;

use convex_curvecache::cache::CurveCacheStore;
use convex_curvecache::error::CurveCacheError;
use convex_curvecache::handle::CurveRegistry;
use convex_curvecache::indices::IndexRegistry;
use convex_curvecache::numlib::BootstrappedCurve;
use convex_curvecache::orchestrator::{self, CurveOutcome};
use convex_curvecache::pricing_registry::{
    self, ModelKind, ModelRequest, PricingRequest, VolFamily, VolSurfacePayload, VolSurfaceRequest,
};
use convex_curvecache::quotes::{QuoteKind, QuoteRegistry};
use convex_curvecache::resolver;
use convex_curvecache::serializer;
use convex_curvecache::spec::{CalibrationPoint, Conventions, CurveSpec, CurveTrait, QuoteRef};

const DAY_COUNT: DayCountConvention = DayCountConvention::ActActIsda;

fn conventions() -> Conventions {
    Conventions {
        calendar: "USD".into(),
        bdc: BusinessDayConvention::ModifiedFollowing,
        day_count: DayCountConvention::ActActIsda,
    }
}

fn deposit(rate_id: &str, tenor: &str) -> CalibrationPoint {
    CalibrationPoint::Deposit {
        rate: QuoteRef::new(rate_id),
        tenor: tenor.into(),
        fixing_days: 2,
        conventions: conventions(),
    }
}

/// S1 — single curve, cache miss then hit.
#[tokio::test]
async fn s1_single_curve_cache_miss_then_hit() {
    let mut quotes = QuoteRegistry::new();
    quotes.upsert("usd.3m", 0.0096, QuoteKind::CurveRate).unwrap();
    quotes.upsert("usd.6m", 0.0145, QuoteKind::CurveRate).unwrap();
    quotes.upsert("usd.1y", 0.0194, QuoteKind::CurveRate).unwrap();
    quotes.upsert("usd.bond", 99.5, QuoteKind::Price).unwrap();
    let indices = IndexRegistry::new();
    let cache = CurveCacheStore::new(16);

    let reference = Date::from_ymd(2008, 9, 18).unwrap();
    let spec = CurveSpec {
        id: "usd.treasury".into(),
        reference_date: reference,
        day_count: DayCountConvention::ActActIsda,
        interpolator: InterpolationMethod::LogLinear,
        curve_trait: CurveTrait::Discount,
        points: vec![
            deposit("usd.3m", "3M"),
            deposit("usd.6m", "6M"),
            deposit("usd.1y", "1Y"),
            CalibrationPoint::Bond {
                price: QuoteRef::new("usd.bond"),
                settlement_days: 1,
                face: 100.0,
                coupon_rate: 0.045,
                frequency: Frequency::SemiAnnual,
                redemption: 1.0,
                issue_date: Date::from_ymd(2007, 5, 15).unwrap(),
                maturity: Date::from_ymd(2017, 5, 15).unwrap(),
            },
        ],
    };

    let mut curves_a = CurveRegistry::new();
    let report_a = orchestrator::run(reference, &[spec.clone()], &quotes, &indices, &mut curves_a, &cache).await.unwrap();
    assert!(matches!(report_a["usd.treasury"], CurveOutcome::Built));
    let first_curve = curves_a.handle("usd.treasury").unwrap().resolve().unwrap();
    let maturity_t = first_curve.year_fraction(Date::from_ymd(2017, 5, 15).unwrap());
    let first_df = first_curve.discount_factor(maturity_t).unwrap();

    let mut curves_b = CurveRegistry::new();
    let report_b = orchestrator::run(reference, &[spec], &quotes, &indices, &mut curves_b, &cache).await.unwrap();
    assert!(matches!(report_b["usd.treasury"], CurveOutcome::CacheHit));
    let second_curve = curves_b.handle("usd.treasury").unwrap().resolve().unwrap();
    let second_df = second_curve.discount_factor(maturity_t).unwrap();

    assert!((first_df - second_df).abs() < 1e-15, "cache hit must reproduce the bootstrapped curve bit-for-bit");
}

/// S2 — two-curve dependency: build order is fixed regardless of
/// declaration order, and that order doesn't perturb the leaf curve's key.
#[tokio::test]
async fn s2_two_curve_dependency_order_is_declaration_invariant() {
    let mut quotes = QuoteRegistry::new();
    quotes.upsert("usd.ois.rate", 0.03, QuoteKind::CurveRate).unwrap();
    quotes.upsert("usd.swap.rate", 0.035, QuoteKind::CurveRate).unwrap();
    let indices = IndexRegistry::new();
    let reference = Date::from_ymd(2024, 1, 2).unwrap();

    let ois = CurveSpec {
        id: "ois".into(),
        reference_date: reference,
        day_count: DayCountConvention::Act360,
        interpolator: InterpolationMethod::LogLinear,
        curve_trait: CurveTrait::Discount,
        points: vec![deposit("usd.ois.rate", "1Y")],
    };
    let euribor = CurveSpec {
        id: "euribor".into(),
        reference_date: reference,
        day_count: DayCountConvention::Act360,
        interpolator: InterpolationMethod::LogLinear,
        curve_trait: CurveTrait::Discount,
        points: vec![CalibrationPoint::Swap {
            rate: QuoteRef::new("usd.swap.rate"),
            tenor: "5Y".into(),
            fixed_frequency: Frequency::Annual,
            fixed_day_count: DayCountConvention::Act360,
            float_index_id: "usd.libor.3m".into(),
            spread: 0.0,
            forward_start_days: 0,
            discount_curve_dep: Some("ois".into()),
        }],
    };

    let declared_first = [ois.clone(), euribor.clone()];
    let order_a = resolver::build_order(&declared_first).unwrap();

    let declared_second = [euribor, ois];
    let order_b = resolver::build_order(&declared_second).unwrap();

    assert_eq!(order_a, vec!["ois".to_string(), "euribor".to_string()]);
    assert_eq!(order_a, order_b, "declaration order must not change the resolved build order");

    let cache = CurveCacheStore::new(16);
    let mut curves_a = CurveRegistry::new();
    orchestrator::run(reference, &declared_first, &quotes, &indices, &mut curves_a, &cache).await.unwrap();
    let ois_key_a = cache.stats().misses;

    let cache2 = CurveCacheStore::new(16);
    let mut curves_b = CurveRegistry::new();
    orchestrator::run(reference, &declared_second, &quotes, &indices, &mut curves_b, &cache2).await.unwrap();
    let ois_key_b = cache2.stats().misses;

    assert_eq!(ois_key_a, ois_key_b, "swapping declaration order must not change the number of builds");
}

/// S3 — bump isolation: a bumped quote produces a distinct cache entry,
/// and the unbumped baseline is still a hit afterward.
#[tokio::test]
async fn s3_bump_isolation_produces_a_distinct_key() {
    let mut quotes = QuoteRegistry::new();
    quotes.upsert("usd.1y", 0.02, QuoteKind::CurveRate).unwrap();
    let indices = IndexRegistry::new();
    let cache = CurveCacheStore::new(16);
    let reference = Date::from_ymd(2024, 1, 2).unwrap();

    let baseline = CurveSpec {
        id: "c".into(),
        reference_date: reference,
        day_count: DayCountConvention::Act360,
        interpolator: InterpolationMethod::LogLinear,
        curve_trait: CurveTrait::Discount,
        points: vec![deposit("usd.1y", "1Y")],
    };
    let mut bumped = baseline.clone();
    bumped.points = vec![CalibrationPoint::Deposit {
        rate: QuoteRef::bumped("usd.1y", 1e-4),
        tenor: "1Y".into(),
        fixing_days: 2,
        conventions: conventions(),
    }];

    let mut curves = CurveRegistry::new();
    orchestrator::run(reference, &[baseline.clone()], &quotes, &indices, &mut curves, &cache).await.unwrap();
    assert_eq!(cache.len(), 1);

    orchestrator::run(reference, &[bumped], &quotes, &indices, &mut curves, &cache).await.unwrap();
    assert_eq!(cache.len(), 2, "bumped quote must land in a distinct cache entry");

    let report = orchestrator::run(reference, &[baseline], &quotes, &indices, &mut curves, &cache).await.unwrap();
    assert!(matches!(report["c"], CurveOutcome::CacheHit), "baseline key must still be a hit");
}

/// S4 — cycle detection: A depends on B, B depends on A.
#[test]
fn s4_cycle_between_two_curves_is_rejected() {
    let reference = Date::from_ymd(2024, 1, 2).unwrap();
    let a = CurveSpec {
        id: "a".into(),
        reference_date: reference,
        day_count: DayCountConvention::Act360,
        interpolator: InterpolationMethod::LogLinear,
        curve_trait: CurveTrait::Discount,
        points: vec![CalibrationPoint::TenorBasisSwap {
            spread: QuoteRef::new("q"),
            short_index_id: "x".into(),
            long_index_id: "y".into(),
            tenor: "5Y".into(),
            discount_curve_dep: Some("b".into()),
        }],
    };
    let b = CurveSpec {
        id: "b".into(),
        reference_date: reference,
        day_count: DayCountConvention::Act360,
        interpolator: InterpolationMethod::LogLinear,
        curve_trait: CurveTrait::Discount,
        points: vec![CalibrationPoint::TenorBasisSwap {
            spread: QuoteRef::new("q"),
            short_index_id: "x".into(),
            long_index_id: "y".into(),
            tenor: "5Y".into(),
            discount_curve_dep: Some("a".into()),
        }],
    };

    let err = resolver::build_order(&[a, b]).unwrap_err();
    match err {
        CurveCacheError::CurveDependencyCycle { curve_ids } => {
            assert!(curve_ids.contains(&"a".to_string()));
            assert!(curve_ids.contains(&"b".to_string()));
        }
        other => panic!("expected CurveDependencyCycle, got {other:?}"),
    }
}

/// S5 — reconstruction fidelity across the interpolator set this
/// component actually ships: exact at pillars for every interpolator;
/// within tolerance between pillars for the two that reconstruct under
/// their own method (log-linear, linear). Forward-flat and log-cubic
/// reconstruct under an aliased method by design (see the serializer's
/// `reconstruction_interpolator`), so only the at-pillar invariant
/// applies to them here.
#[test]
fn s5_reconstruction_matches_original_at_pillars() {
    let reference = Date::from_ymd(2024, 1, 2).unwrap();
    let pillar_times = vec![0.25, 1.0, 2.0, 5.0, 10.0, 20.0];
    let discount_factors = vec![0.995, 0.98, 0.95, 0.85, 0.70, 0.50];

    for method in [
        InterpolationMethod::LogLinear,
        InterpolationMethod::Linear,
        InterpolationMethod::FlatForward,
        InterpolationMethod::CubicSplineOnDiscount,
    ] {
        let curve = DiscountCurve::new(reference, pillar_times.clone(), discount_factors.clone(), method)
            .unwrap()
            .with_extrapolation();
        let bootstrapped = BootstrappedCurve {
            curve: Arc::new(curve.clone()),
            curve_trait: CurveTrait::Discount,
            pillar_times: pillar_times.clone(),
            discount_factors: discount_factors.clone(),
        };
        let data = serializer::serialize(method, DAY_COUNT, &bootstrapped);
        let rebuilt = serializer::reconstruct(&data).unwrap();

        for &t in &pillar_times {
            let original = curve.discount_factor(t).unwrap();
            let roundtripped = rebuilt.discount_factor(t).unwrap();
            let rel_err = (original - roundtripped).abs() / original;
            assert!(rel_err <= 1e-12, "{method:?}: pillar {t} diverged by {rel_err}");
        }
    }

    // Between-pillar fidelity only holds when reconstruction uses the
    // originally declared method.
    for method in [InterpolationMethod::LogLinear, InterpolationMethod::Linear] {
        let curve = DiscountCurve::new(reference, pillar_times.clone(), discount_factors.clone(), method)
            .unwrap()
            .with_extrapolation();
        let bootstrapped = BootstrappedCurve {
            curve: Arc::new(curve.clone()),
            curve_trait: CurveTrait::Discount,
            pillar_times: pillar_times.clone(),
            discount_factors: discount_factors.clone(),
        };
        let data = serializer::serialize(method, DAY_COUNT, &bootstrapped);
        let rebuilt = serializer::reconstruct(&data).unwrap();

        let mid_points = [0.6, 1.5, 3.5, 7.5, 15.0];
        for &t in &mid_points {
            let original = curve.discount_factor(t).unwrap();
            let roundtripped = rebuilt.discount_factor(t).unwrap();
            let rel_err = (original - roundtripped).abs() / original;
            assert!(rel_err <= 1e-8, "{method:?}: midpoint {t} diverged by {rel_err}");
        }
    }
}

/// S6 — engine compatibility: Bachelier + ShiftedLognormal fails,
/// Bachelier + Normal succeeds.
#[test]
fn s6_bachelier_requires_normal_vols() {
    let base = |family: VolFamily| PricingRequest {
        evaluation_date: Some(Date::from_ymd(2024, 1, 2).unwrap()),
        curve_ids: vec!["usd.ois".into()],
        vol_surfaces: vec![VolSurfaceRequest {
            id: "usd.swaption.vols".into(),
            payload: VolSurfacePayload::Swaption {
                family,
                displacement: 0.0,
                raw: serde_json::json!({}),
            },
        }],
        models: vec![ModelRequest {
            id: "bachelier".into(),
            kind: ModelKind::Bachelier,
            vol_surface_id: "usd.swaption.vols".into(),
            payload: serde_json::json!({}),
        }],
    };

    let rejected = pricing_registry::assemble(&base(VolFamily::ShiftedLognormal)).unwrap_err();
    assert!(matches!(rejected, CurveCacheError::ModelVolIncompatible { .. }));

    assert!(pricing_registry::assemble(&base(VolFamily::Normal)).is_ok());
}
