//! The bootstrap orchestrator: pre-publishes handles, walks the build
//! order, and resolves each curve via cache hit or fresh bootstrap.
//!
//! A helper-build or bootstrap failure for one curve is recorded against
//! that curve only. Curves that do not depend on the failed one are
//! still attempted; curves that do are marked [`CurveOutcome::Unavailable`]
//! without an attempt, since their dependency handle will never link.

use std::collections::HashMap;

use tracing::{info, warn};

use crate::cache::CurveCacheStore;
use crate::cache_key::{self, IndexKeyFields, KeyInput};
use crate::error::{CurveCacheError, CurveCacheResult};
use crate::handle::CurveRegistry;
use crate::helpers;
use crate::indices::IndexRegistry;
use crate::numlib;
use crate::quotes::QuoteRegistry;
use crate::resolver;
use crate::serializer::{self, CachedCurveData};
use crate::spec::CurveSpec;
use convex_core::types::Date;

/// What happened while resolving one curve in a request.
#[derive(Debug)]
pub enum CurveOutcome {
    /// Served from cache without rebuilding.
    CacheHit,
    /// Built fresh and inserted into the cache.
    Built,
    /// This curve's own helper construction or bootstrap failed.
    Failed(String),
    /// Skipped because a curve it depends on failed or was itself
    /// unavailable.
    Unavailable,
}

/// Per-curve results for one orchestration pass, keyed by curve id.
pub type OrchestrationReport = HashMap<String, CurveOutcome>;

/// Runs the bootstrap orchestrator over a batch of curve specs.
///
/// Pre-publishes an empty handle for every spec's id before attempting
/// any build, so a helper for one curve can name another curve in the
/// same batch regardless of solve order. Processes specs in the
/// resolver's topological build order; on a miss for a given id, builds
/// that id's helpers, bootstraps, serializes, caches, and links; on a
/// hit, reconstructs from the cached pillars and links without
/// rebootstrapping.
///
/// # Errors
///
/// Only for failures that abort the whole batch: an unresolvable
/// dependency cycle. Per-curve build failures are reported in the
/// returned [`OrchestrationReport`], not propagated as an `Err`.
pub async fn run(
    evaluation_date: Date,
    specs: &[CurveSpec],
    quotes: &QuoteRegistry,
    indices: &IndexRegistry,
    curves: &mut CurveRegistry,
    cache: &CurveCacheStore,
) -> CurveCacheResult<OrchestrationReport> {
    for spec in specs {
        if !curves.has(&spec.id) {
            curves.put(spec.id.clone());
        }
    }

    let order = resolver::build_order(specs)?;
    let by_id: HashMap<&str, &CurveSpec> = specs.iter().map(|s| (s.id.as_str(), s)).collect();

    let mut report = OrchestrationReport::new();
    let mut resolved_keys: HashMap<String, cache_key::CacheKey> = HashMap::new();

    for curve_id in order {
        let spec = match by_id.get(curve_id.as_str()) {
            Some(spec) => *spec,
            None => continue,
        };

        if spec
            .dependency_ids()
            .iter()
            .any(|dep| matches!(report.get(*dep), Some(CurveOutcome::Failed(_) | CurveOutcome::Unavailable)))
        {
            warn!(curve = %curve_id, "skipping curve with a failed or unavailable dependency");
            report.insert(curve_id, CurveOutcome::Unavailable);
            continue;
        }

        match resolve_one(evaluation_date, spec, quotes, indices, curves, cache, &resolved_keys).await {
            Ok((outcome, key)) => {
                resolved_keys.insert(curve_id.clone(), key);
                report.insert(curve_id, outcome);
            }
            Err(err) => {
                warn!(curve = %curve_id, error = %err, "curve build failed");
                report.insert(curve_id, CurveOutcome::Failed(err.to_string()));
            }
        }
    }

    Ok(report)
}

/// Resolves a single curve: compute its key, try the cache, and on a
/// miss build, bootstrap, serialize, cache and link it.
///
/// Loops rather than checking the cache once: a follower that loses the
/// leadership race awaits the leader's [`tokio::sync::Notify`] and then
/// re-enters the top of the loop. If the leader's build succeeded, the
/// cache check now hits. If it failed, the in-flight marker is already
/// gone, so this caller wins leadership on its next `start_or_join_build`
/// and retries the build itself instead of replaying a stale failure.
async fn resolve_one(
    evaluation_date: Date,
    spec: &CurveSpec,
    quotes: &QuoteRegistry,
    indices: &IndexRegistry,
    curves: &CurveRegistry,
    cache: &CurveCacheStore,
    resolved_keys: &HashMap<String, cache_key::CacheKey>,
) -> CurveCacheResult<(CurveOutcome, cache_key::CacheKey)> {
    if spec.points.is_empty() {
        return Err(CurveCacheError::empty_curve(spec.id.clone()));
    }

    let resolved_values = resolve_values(spec, quotes)?;
    let referenced_indices = referenced_index_fields(spec, indices);
    let mut dependencies: Vec<(String, cache_key::CacheKey)> = spec
        .dependency_ids()
        .iter()
        .filter_map(|dep| resolved_keys.get(*dep).map(|k| ((*dep).to_string(), k.clone())))
        .collect();
    dependencies.sort_by(|a, b| a.0.cmp(&b.0));

    let key = cache_key::compute(&KeyInput {
        evaluation_date,
        reference_date: spec.reference_date,
        day_count: spec.day_count,
        interpolator: spec.interpolator,
        curve_trait: spec.curve_trait,
        curve_id: &spec.id,
        resolved_values: &resolved_values,
        points: &spec.points,
        referenced_indices: &referenced_indices,
        dependencies: &dependencies,
    });

    loop {
        if let Some(data) = cache.get(&key) {
            let curve = serializer::reconstruct(&data)?;
            curves.handle(&spec.id)?.link(curve);
            info!(curve = %spec.id, %key, "cache hit");
            return Ok((CurveOutcome::CacheHit, key));
        }

        let (notify, is_leader) = cache.start_or_join_build(&key);
        if !is_leader {
            notify.notified().await;
            continue;
        }

        let build_result = build_and_link(spec, quotes, curves, &key, cache);
        cache.finish_build(&key);
        let outcome = build_result?;
        return Ok((outcome, key));
    }
}

fn build_and_link(
    spec: &CurveSpec,
    quotes: &QuoteRegistry,
    curves: &CurveRegistry,
    key: &cache_key::CacheKey,
    cache: &CurveCacheStore,
) -> CurveCacheResult<CurveOutcome> {
    let instruments = helpers::build_all(spec.reference_date, &spec.points, quotes, curves)?;
    let bootstrapped = numlib::bootstrap(spec.reference_date, spec.interpolator, spec.curve_trait, instruments)?;
    let data: CachedCurveData = serializer::serialize(spec.interpolator, spec.day_count, &bootstrapped);
    cache.put(key.clone(), data);
    curves.handle(&spec.id)?.link(bootstrapped.curve);
    info!(curve = %spec.id, %key, "bootstrapped and cached");
    Ok(CurveOutcome::Built)
}

/// Resolves each point's driving quote value, in declaration order,
/// parallel to `spec.points` — the same values both build instruments
/// and feed the cache key.
fn resolve_values(spec: &CurveSpec, quotes: &QuoteRegistry) -> CurveCacheResult<Vec<f64>> {
    spec.points
        .iter()
        .map(|point| helpers::resolve_quote_value(point, quotes))
        .collect()
}

/// Flattens every `IndexDefinition` referenced by this spec's points into
/// the hashable field set the cache key needs, sorted and deduped by id.
fn referenced_index_fields(spec: &CurveSpec, indices: &IndexRegistry) -> Vec<IndexKeyFields> {
    let mut ids: Vec<&str> = spec
        .points
        .iter()
        .flat_map(helpers::index_ids)
        .collect();
    ids.sort_unstable();
    ids.dedup();

    ids.into_iter()
        .filter_map(|id| indices.key_fields(id))
        .collect()
}
