//! The curve handle: a late-bound indirection cell.
//!
//! Curves reference each other (an Ibor curve discounted by an OIS curve)
//! before either is solved. Rather than carry over the source library's
//! smart-pointer-of-relinkable-handle pattern, a `CurveHandle` is a single
//! explicit two-state cell: created empty, linked exactly once, clonable
//! freely, and every clone observes the link the instant it happens.

use std::sync::Arc;

use convex_curves::traits::Curve;
use parking_lot::RwLock;

use crate::error::{CurveCacheError, CurveCacheResult};

enum State {
    Empty,
    Linked(Arc<dyn Curve>),
}

/// A late-bound reference to a solved [`Curve`].
///
/// `CurveHandle::empty()` creates the cell in its `Empty` state; the
/// orchestrator calls [`CurveHandle::link`] exactly once, after which every
/// clone of the handle resolves to the same curve. Linking twice is a
/// programming error in the orchestrator, not a request-time failure, so it
/// panics rather than returning a `Result` — the same way a
/// `std::sync::OnceLock` double-set would.
#[derive(Clone)]
pub struct CurveHandle {
    state: Arc<RwLock<State>>,
}

impl CurveHandle {
    /// Creates an unlinked handle.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            state: Arc::new(RwLock::new(State::Empty)),
        }
    }

    /// Links the handle to a solved curve.
    ///
    /// # Panics
    ///
    /// Panics if the handle was already linked.
    pub fn link(&self, curve: Arc<dyn Curve>) {
        let mut state = self.state.write();
        assert!(
            matches!(*state, State::Empty),
            "CurveHandle linked more than once"
        );
        *state = State::Linked(curve);
    }

    /// Returns true if the handle has been linked.
    #[must_use]
    pub fn is_linked(&self) -> bool {
        matches!(*self.state.read(), State::Linked(_))
    }

    /// Resolves the handle to its curve.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::UnknownCurve`] if the handle has not yet been
    /// linked — callers that might legitimately observe this (helpers
    /// referencing a curve id that never resolved) should check
    /// [`CurveHandle::is_linked`] first where an `Unavailable` state is
    /// more appropriate than an error.
    pub fn resolve(&self) -> CurveCacheResult<Arc<dyn Curve>> {
        match &*self.state.read() {
            State::Linked(curve) => Ok(Arc::clone(curve)),
            State::Empty => Err(CurveCacheError::unknown_curve("<unlinked handle>")),
        }
    }
}

/// Registry mapping curve ids to their (possibly still-empty) handles.
///
/// Only the orchestrator writes to this registry: it pre-publishes an
/// empty handle per declared curve id before the dependency resolver runs,
/// so helper builders may resolve any curve id regardless of build order.
#[derive(Default)]
pub struct CurveRegistry {
    handles: std::collections::HashMap<String, CurveHandle>,
}

impl CurveRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Publishes an empty handle for `id`, or returns the existing one.
    pub fn put(&mut self, id: impl Into<String>) -> CurveHandle {
        self.handles.entry(id.into()).or_insert_with(CurveHandle::empty).clone()
    }

    /// Returns true if `id` has an entry (linked or not).
    #[must_use]
    pub fn has(&self, id: &str) -> bool {
        self.handles.contains_key(id)
    }

    /// Resolves the handle registered under `id`.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::UnknownCurve`] if `id` was never published.
    pub fn handle(&self, id: &str) -> CurveCacheResult<CurveHandle> {
        self.handles
            .get(id)
            .cloned()
            .ok_or_else(|| CurveCacheError::unknown_curve(id))
    }

    /// Iterates over every published `(id, handle)` pair.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &CurveHandle)> {
        self.handles.iter().map(|(k, v)| (k.as_str(), v))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use convex_core::types::Date;
    use convex_curves::error::CurveResult;

    struct FlatCurve(f64, Date);
    impl Curve for FlatCurve {
        fn discount_factor(&self, t: f64) -> CurveResult<f64> {
            Ok((-self.0 * t).exp())
        }
        fn reference_date(&self) -> Date {
            self.1
        }
        fn max_date(&self) -> Date {
            self.1.add_years(50).unwrap()
        }
    }

    #[test]
    fn empty_handle_resolve_fails() {
        let h = CurveHandle::empty();
        assert!(!h.is_linked());
        assert!(h.resolve().is_err());
    }

    #[test]
    fn link_then_resolve_succeeds_for_all_clones() {
        let h = CurveHandle::empty();
        let clone = h.clone();
        h.link(Arc::new(FlatCurve(0.05, Date::from_ymd(2024, 1, 1).unwrap())));
        assert!(clone.is_linked());
        assert!(clone.resolve().is_ok());
    }

    #[test]
    #[should_panic(expected = "linked more than once")]
    fn double_link_panics() {
        let h = CurveHandle::empty();
        let d = Date::from_ymd(2024, 1, 1).unwrap();
        h.link(Arc::new(FlatCurve(0.05, d)));
        h.link(Arc::new(FlatCurve(0.06, d)));
    }

    #[test]
    fn registry_pre_publishes_empty_handles() {
        let mut reg = CurveRegistry::new();
        let h = reg.put("ois");
        assert!(reg.has("ois"));
        assert!(!h.is_linked());
        assert!(reg.handle("missing").is_err());
    }
}
