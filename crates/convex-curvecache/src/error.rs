//! Error types for curve construction and caching.
//!
//! Variants are grouped by the taxonomy the component design assigns them
//! to (input validation, reference resolution, dependency failure,
//! numerical, compatibility, cancellation) rather than by which module
//! raises them, so callers can match on "kind of failure" without caring
//! which internal stage produced it.

use convex_core::types::Date;
use thiserror::Error;

/// A specialized `Result` type for curve-cache operations.
pub type CurveCacheResult<T> = Result<T, CurveCacheError>;

/// Errors that can occur while assembling registries, resolving
/// dependencies, bootstrapping curves, or serving them from cache.
#[derive(Error, Debug, Clone)]
pub enum CurveCacheError {
    // ---- InputValidation ----
    /// A required field was missing from a request payload.
    #[error("missing required field: {field}")]
    MissingField {
        /// Name of the missing field.
        field: String,
    },

    /// A date string did not parse under either accepted separator.
    #[error("malformed date: {raw}")]
    MalformedDate {
        /// The offending raw string.
        raw: String,
    },

    /// An enum-like string did not match any known variant.
    #[error("unknown enum value `{value}` for {field}")]
    UnknownEnumValue {
        /// Field the value was supplied for.
        field: String,
        /// The offending value.
        value: String,
    },

    /// A curve spec had no calibration points.
    #[error("curve `{curve_id}` has no calibration points")]
    EmptyCurve {
        /// Id of the empty curve spec.
        curve_id: String,
    },

    /// Two entities were registered under the same id.
    #[error("duplicate id `{id}` in {registry}")]
    DuplicateId {
        /// Registry the collision occurred in.
        registry: String,
        /// The duplicated id.
        id: String,
    },

    /// A grid spec would produce more points than [`crate::grid::MAX_GRID_POINTS`].
    #[error("grid would produce {requested} points, exceeding the cap of {max}")]
    GridTooLarge {
        /// Points the spec would actually produce.
        requested: usize,
        /// The configured cap.
        max: usize,
    },

    /// A grid or measure query was malformed independent of size.
    #[error("invalid grid query: {reason}")]
    InvalidGrid {
        /// What was wrong with the query.
        reason: String,
    },

    // ---- ReferenceResolution ----
    /// A quote id was referenced but never registered.
    #[error("unknown quote: {id}")]
    UnknownQuote {
        /// The unresolved quote id.
        id: String,
    },

    /// A quote was looked up under a kind that does not match its
    /// registered kind.
    #[error("quote `{id}` has kind {actual:?}, expected {expected:?}")]
    QuoteKindMismatch {
        /// The quote id.
        id: String,
        /// The kind requested by the caller.
        expected: crate::quotes::QuoteKind,
        /// The kind the quote was registered with.
        actual: crate::quotes::QuoteKind,
    },

    /// A second `upsert` for an id tried to change its kind.
    #[error("quote `{id}` already registered with kind {existing:?}, cannot re-register as {attempted:?}")]
    QuoteKindConflict {
        /// The quote id.
        id: String,
        /// The kind already on file.
        existing: crate::quotes::QuoteKind,
        /// The kind the conflicting upsert attempted.
        attempted: crate::quotes::QuoteKind,
    },

    /// An index id was referenced but never registered.
    #[error("unknown index: {id}")]
    UnknownIndex {
        /// The unresolved index id.
        id: String,
    },

    /// An index was accessed through the wrong accessor (Ibor vs
    /// Overnight).
    #[error("index `{id}` is not an {expected} index")]
    IndexKindMismatch {
        /// The index id.
        id: String,
        /// The accessor kind that was requested.
        expected: &'static str,
    },

    /// A curve id was referenced but never registered.
    #[error("unknown curve: {id}")]
    UnknownCurve {
        /// The unresolved curve id.
        id: String,
    },

    /// A swap-index definition violated one of the §3 convention
    /// invariants.
    #[error("swap index `{id}` convention mismatch: {reason}")]
    SwapIndexConventionMismatch {
        /// The swap-index id.
        id: String,
        /// What was inconsistent.
        reason: String,
    },

    /// A fixing date on an index definition did not parse.
    #[error("invalid fixing date on index `{index_id}`: {raw}")]
    InvalidFixingDate {
        /// The owning index id.
        index_id: String,
        /// The offending raw date string.
        raw: String,
    },

    /// A vol surface or model spec id was referenced but never
    /// registered.
    #[error("unknown {kind}: {id}")]
    UnknownPricingEntry {
        /// "vol surface" or "model".
        kind: &'static str,
        /// The unresolved id.
        id: String,
    },

    /// The dependency graph over curve ids contains a cycle.
    #[error("curve dependency cycle involving: {}", .curve_ids.join(", "))]
    CurveDependencyCycle {
        /// Every curve id participating in at least one cycle.
        curve_ids: Vec<String>,
    },

    // ---- DependencyFailure ----
    /// A curve could not be attempted because a declared dependency
    /// failed.
    #[error("curve `{curve_id}` unavailable: depends on failed curve `{failed_dep}`")]
    DependencyFailed {
        /// The dependent curve id.
        curve_id: String,
        /// The dependency that failed.
        failed_dep: String,
    },

    // ---- Numerical ----
    /// The numerical-library bootstrap did not converge.
    #[error("bootstrap for curve `{curve_id}` did not converge: {reason}")]
    BootstrapFailed {
        /// The curve id being built.
        curve_id: String,
        /// Underlying failure description.
        reason: String,
    },

    /// Reconstructing a cached curve produced a non-monotone discount
    /// factor sequence.
    #[error("reconstructed curve `{curve_id}` has non-monotone discount factors at pillar {pillar}")]
    NonMonotoneReconstruction {
        /// The curve id.
        curve_id: String,
        /// The offending pillar date.
        pillar: Date,
    },

    /// A propagated error from the numerical-library adapter
    /// (`convex-curves`).
    #[error("numerical library error: {0}")]
    Numerical(#[from] convex_curves::error::CurveError),

    /// A propagated error from `convex-core` (date/calendar/day-count).
    #[error("core error: {0}")]
    Core(#[from] convex_core::error::ConvexError),

    // ---- CompatibilityViolation ----
    /// A pricing model's volatility requirement was not met by the
    /// supplied vol surface.
    #[error("model `{model_id}` incompatible with vol surface `{vol_id}`: {reason}")]
    ModelVolIncompatible {
        /// The model spec id.
        model_id: String,
        /// The vol surface id.
        vol_id: String,
        /// Why they are incompatible.
        reason: String,
    },

    // ---- Cancellation ----
    /// The orchestrator observed a cancellation signal.
    #[error("request cancelled")]
    Cancelled,
}

impl CurveCacheError {
    /// Creates a missing-field error.
    #[must_use]
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Creates a malformed-date error.
    #[must_use]
    pub fn malformed_date(raw: impl Into<String>) -> Self {
        Self::MalformedDate { raw: raw.into() }
    }

    /// Creates an unknown-quote error.
    #[must_use]
    pub fn unknown_quote(id: impl Into<String>) -> Self {
        Self::UnknownQuote { id: id.into() }
    }

    /// Creates an unknown-curve error.
    #[must_use]
    pub fn unknown_curve(id: impl Into<String>) -> Self {
        Self::UnknownCurve { id: id.into() }
    }

    /// Creates an empty-curve error.
    #[must_use]
    pub fn empty_curve(curve_id: impl Into<String>) -> Self {
        Self::EmptyCurve {
            curve_id: curve_id.into(),
        }
    }

    /// Creates a cycle error from the set of participating curve ids.
    ///
    /// Ids are sorted for a deterministic message independent of
    /// traversal order.
    #[must_use]
    pub fn cycle(mut curve_ids: Vec<String>) -> Self {
        curve_ids.sort();
        curve_ids.dedup();
        Self::CurveDependencyCycle { curve_ids }
    }
}
