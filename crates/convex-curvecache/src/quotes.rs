//! Quote registry: identity-keyed, mutable market data shared by helpers.

use std::sync::Arc;

use parking_lot::RwLock;

use crate::error::{CurveCacheError, CurveCacheResult};

/// What kind of market observable a [`Quote`] carries.
///
/// Fixed at first registration: a later `upsert` under a different kind
/// is a [`CurveCacheError::QuoteKindConflict`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuoteKind {
    /// A par rate or spread feeding a curve-helper.
    CurveRate,
    /// A clean or dirty price (bonds, bills).
    Price,
    /// A volatility level.
    Volatility,
}

/// A live handle onto a quote's current value.
///
/// Cloning a `QuoteHandle` shares the same backing cell: an `upsert` on
/// the owning registry is observed by every outstanding clone.
#[derive(Debug, Clone)]
pub struct QuoteHandle {
    id: Arc<str>,
    kind: QuoteKind,
    value: Arc<RwLock<f64>>,
}

impl QuoteHandle {
    /// The quote's id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The quote's kind.
    #[must_use]
    pub fn kind(&self) -> QuoteKind {
        self.kind
    }

    /// Reads the current value.
    #[must_use]
    pub fn value(&self) -> f64 {
        *self.value.read()
    }

    /// Reads the current value with an additive bump applied.
    ///
    /// The bump is never written back to the shared cell — it is applied
    /// once at the point of use, per the "quote-bump-before-keying" rule:
    /// the bumped number, not the bump itself, is what both the helper and
    /// the cache key see.
    #[must_use]
    pub fn bumped_value(&self, bump: f64) -> f64 {
        self.value() + bump
    }
}

struct QuoteEntry {
    kind: QuoteKind,
    value: Arc<RwLock<f64>>,
}

/// Registry of [`Quote`]s, built once per request and consulted by every
/// helper builder.
///
/// [`Quote`]: crate::quotes
#[derive(Default)]
pub struct QuoteRegistry {
    entries: std::collections::HashMap<Arc<str>, QuoteEntry>,
}

impl QuoteRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or updates a quote's value.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::QuoteKindConflict`] if `id` is already
    /// registered under a different `kind`.
    pub fn upsert(
        &mut self,
        id: impl Into<Arc<str>>,
        value: f64,
        kind: QuoteKind,
    ) -> CurveCacheResult<()> {
        let id = id.into();
        if let Some(existing) = self.entries.get(&id) {
            if existing.kind != kind {
                return Err(CurveCacheError::QuoteKindConflict {
                    id: id.to_string(),
                    existing: existing.kind,
                    attempted: kind,
                });
            }
            *existing.value.write() = value;
            return Ok(());
        }
        self.entries.insert(
            Arc::clone(&id),
            QuoteEntry {
                kind,
                value: Arc::new(RwLock::new(value)),
            },
        );
        Ok(())
    }

    /// Returns true if `id` is registered.
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Looks up a live handle without asserting a kind.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::UnknownQuote`] if `id` is not registered.
    pub fn handle(&self, id: &str) -> CurveCacheResult<QuoteHandle> {
        let entry = self
            .entries
            .get(id)
            .ok_or_else(|| CurveCacheError::unknown_quote(id))?;
        Ok(QuoteHandle {
            id: Arc::from(id),
            kind: entry.kind,
            value: Arc::clone(&entry.value),
        })
    }

    /// Looks up a live handle and asserts its kind.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::UnknownQuote`] if missing,
    /// [`CurveCacheError::QuoteKindMismatch`] if the kind differs.
    pub fn handle_typed(&self, id: &str, expected_kind: QuoteKind) -> CurveCacheResult<QuoteHandle> {
        let handle = self.handle(id)?;
        if handle.kind != expected_kind {
            return Err(CurveCacheError::QuoteKindMismatch {
                id: id.to_string(),
                expected: expected_kind,
                actual: handle.kind,
            });
        }
        Ok(handle)
    }

    /// Convenience: resolves straight to a value, asserting a kind.
    ///
    /// # Errors
    ///
    /// Same as [`QuoteRegistry::handle_typed`].
    pub fn value(&self, id: &str, expected_kind: QuoteKind) -> CurveCacheResult<f64> {
        self.handle_typed(id, expected_kind).map(|h| h.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_then_handle_observes_value() {
        let mut reg = QuoteRegistry::new();
        reg.upsert("usd.sofr.3m", 0.0525, QuoteKind::CurveRate).unwrap();
        assert_eq!(reg.handle("usd.sofr.3m").unwrap().value(), 0.0525);
    }

    #[test]
    fn live_handles_observe_later_upserts() {
        let mut reg = QuoteRegistry::new();
        reg.upsert("q1", 1.0, QuoteKind::Price).unwrap();
        let handle = reg.handle("q1").unwrap();
        reg.upsert("q1", 2.0, QuoteKind::Price).unwrap();
        assert_eq!(handle.value(), 2.0);
    }

    #[test]
    fn kind_conflict_on_reupsert_rejected() {
        let mut reg = QuoteRegistry::new();
        reg.upsert("q1", 1.0, QuoteKind::Price).unwrap();
        let err = reg.upsert("q1", 1.0, QuoteKind::Volatility).unwrap_err();
        assert!(matches!(err, CurveCacheError::QuoteKindConflict { .. }));
    }

    #[test]
    fn unknown_quote_errors() {
        let reg = QuoteRegistry::new();
        assert!(matches!(
            reg.handle("missing").unwrap_err(),
            CurveCacheError::UnknownQuote { .. }
        ));
    }

    #[test]
    fn kind_mismatch_on_lookup_rejected() {
        let mut reg = QuoteRegistry::new();
        reg.upsert("q1", 1.0, QuoteKind::Price).unwrap();
        assert!(matches!(
            reg.handle_typed("q1", QuoteKind::CurveRate).unwrap_err(),
            CurveCacheError::QuoteKindMismatch { .. }
        ));
    }

    #[test]
    fn bumped_value_does_not_mutate_shared_cell() {
        let mut reg = QuoteRegistry::new();
        reg.upsert("q1", 1.0, QuoteKind::CurveRate).unwrap();
        let handle = reg.handle("q1").unwrap();
        assert!((handle.bumped_value(1e-4) - 1.0001).abs() < 1e-12);
        assert_eq!(handle.value(), 1.0);
    }
}
