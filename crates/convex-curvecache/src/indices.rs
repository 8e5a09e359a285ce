//! Index and swap-index registries.

use std::collections::HashMap;
use std::sync::Arc;

use convex_core::calendars::{BusinessDayConvention, Calendar};
use convex_core::daycounts::DayCountConvention;
use convex_core::types::{Date, Frequency};

use crate::cache_key::IndexKeyFields;
use crate::error::{CurveCacheError, CurveCacheResult};
use crate::handle::CurveHandle;

/// A floating-rate index definition.
///
/// Immutable across a request once registered. The `Ibor` variant carries
/// a tenor; `Overnight` does not.
#[derive(Clone)]
pub enum IndexDefinition {
    /// A term (Ibor-style) rate index, e.g. 3M EURIBOR.
    Ibor {
        /// Index id.
        id: String,
        /// Tenor in months.
        tenor_months: u32,
        /// Day count used to compute fixing lags.
        fixing_day_count: DayCountConvention,
        /// Fixing calendar.
        calendar: Arc<dyn Calendar>,
        /// Day count used for interest accrual on the index.
        day_count: DayCountConvention,
        /// Business day convention for fixing/payment dates.
        bdc: BusinessDayConvention,
        /// End-of-month rule.
        eom: bool,
        /// Currency code (ISO 4217, e.g. "EUR").
        currency: String,
        /// Historical (date, rate) fixings, sorted ascending by date.
        fixings: Vec<(Date, f64)>,
        /// Curve this index forwards off, once bound via `with_curve`.
        forwarding_curve: Option<CurveHandle>,
    },
    /// An overnight index, e.g. SOFR, €STR, SONIA.
    Overnight {
        /// Index id.
        id: String,
        /// Day count used for interest accrual.
        day_count: DayCountConvention,
        /// Fixing calendar.
        calendar: Arc<dyn Calendar>,
        /// Currency code.
        currency: String,
        /// Historical (date, rate) fixings, sorted ascending by date.
        fixings: Vec<(Date, f64)>,
        /// Curve this index forwards off, once bound via `with_curve`.
        forwarding_curve: Option<CurveHandle>,
    },
}

impl IndexDefinition {
    /// The index's id.
    #[must_use]
    pub fn id(&self) -> &str {
        match self {
            Self::Ibor { id, .. } | Self::Overnight { id, .. } => id,
        }
    }

    /// Installs historical fixings on a freshly constructed definition.
    ///
    /// Must be called before the definition is handed to a registry; once
    /// registries are frozen, definitions are read-only.
    #[must_use]
    pub fn with_fixings(mut self, fixings: Vec<(Date, f64)>) -> Self {
        match &mut self {
            Self::Ibor { fixings: f, .. } | Self::Overnight { fixings: f, .. } => {
                *f = fixings;
            }
        }
        self
    }

    /// Returns a clone of this definition bound to a forwarding curve
    /// handle, used by `IndexRegistry::ibor_with_curve` /
    /// `overnight_with_curve`.
    #[must_use]
    fn bound_to(&self, curve: CurveHandle) -> Self {
        let mut clone = self.clone();
        match &mut clone {
            Self::Ibor { forwarding_curve, .. } | Self::Overnight { forwarding_curve, .. } => {
                *forwarding_curve = Some(curve);
            }
        }
        clone
    }
}

/// Registry of [`IndexDefinition`]s, built once per request.
#[derive(Default)]
pub struct IndexRegistry {
    entries: HashMap<String, IndexDefinition>,
}

impl IndexRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a definition, installing its fixings if any fixing date
    /// fails to be a valid `Date` the build is aborted fatally.
    pub fn put(&mut self, definition: IndexDefinition) {
        self.entries.insert(definition.id().to_string(), definition);
    }

    /// Looks up an `Ibor` definition.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::UnknownIndex`] if missing,
    /// [`CurveCacheError::IndexKindMismatch`] if registered as `Overnight`.
    pub fn ibor(&self, id: &str) -> CurveCacheResult<&IndexDefinition> {
        let def = self
            .entries
            .get(id)
            .ok_or_else(|| CurveCacheError::UnknownIndex { id: id.to_string() })?;
        match def {
            IndexDefinition::Ibor { .. } => Ok(def),
            IndexDefinition::Overnight { .. } => Err(CurveCacheError::IndexKindMismatch {
                id: id.to_string(),
                expected: "Ibor",
            }),
        }
    }

    /// Looks up an `Overnight` definition.
    ///
    /// # Errors
    ///
    /// Same shape as [`IndexRegistry::ibor`], mirrored for `Overnight`.
    pub fn overnight(&self, id: &str) -> CurveCacheResult<&IndexDefinition> {
        let def = self
            .entries
            .get(id)
            .ok_or_else(|| CurveCacheError::UnknownIndex { id: id.to_string() })?;
        match def {
            IndexDefinition::Overnight { .. } => Ok(def),
            IndexDefinition::Ibor { .. } => Err(CurveCacheError::IndexKindMismatch {
                id: id.to_string(),
                expected: "Overnight",
            }),
        }
    }

    /// Like [`IndexRegistry::ibor`] but returns a clone bound to a
    /// forwarding curve.
    pub fn ibor_with_curve(&self, id: &str, curve: CurveHandle) -> CurveCacheResult<IndexDefinition> {
        Ok(self.ibor(id)?.bound_to(curve))
    }

    /// Like [`IndexRegistry::overnight`] but returns a clone bound to a
    /// forwarding curve.
    pub fn overnight_with_curve(
        &self,
        id: &str,
        curve: CurveHandle,
    ) -> CurveCacheResult<IndexDefinition> {
        Ok(self.overnight(id)?.bound_to(curve))
    }

    /// Flattens a registered definition's hashable fields for the cache
    /// key, or `None` if `id` isn't registered.
    ///
    /// `Overnight` definitions have no BDC/EOM of their own; they key in
    /// as the type default so two overnight indices that differ only in
    /// day count still produce different keys without inventing fields
    /// the index doesn't carry.
    #[must_use]
    pub fn key_fields(&self, id: &str) -> Option<IndexKeyFields> {
        self.entries.get(id).map(|def| match def {
            IndexDefinition::Ibor {
                id,
                tenor_months,
                day_count,
                bdc,
                eom,
                ..
            } => IndexKeyFields {
                id: id.clone(),
                is_ibor: true,
                tenor_months: *tenor_months,
                day_count: *day_count,
                bdc: *bdc,
                eom: *eom,
            },
            IndexDefinition::Overnight { id, day_count, .. } => IndexKeyFields {
                id: id.clone(),
                is_ibor: false,
                tenor_months: 0,
                day_count: *day_count,
                bdc: BusinessDayConvention::default(),
                eom: false,
            },
        })
    }
}

/// Which market convention a swap index follows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapIndexKind {
    /// A term-swap index referencing an Ibor floating leg (e.g. 10Y EUR
    /// swap vs 6M EURIBOR).
    IborSwap,
    /// An OIS-style swap index (e.g. USD SOFR OIS).
    OisSwap,
}

/// Fixed-leg conventions of a swap index.
#[derive(Debug, Clone)]
pub struct FixedLegConvention {
    /// Payment frequency.
    pub frequency: Frequency,
    /// Accrual day count.
    pub day_count: DayCountConvention,
    /// Business day convention.
    pub bdc: BusinessDayConvention,
    /// End-of-month rule.
    pub eom: bool,
}

/// Floating-leg conventions of a swap index.
#[derive(Debug, Clone)]
pub struct FloatLegConvention {
    /// Floating reset tenor in months (0 for overnight).
    pub tenor_months: u32,
    /// Business day convention.
    pub bdc: BusinessDayConvention,
}

/// A reusable swap-index definition (e.g. "USD 10Y SOFR swap").
#[derive(Clone)]
pub struct SwapIndexDefinition {
    /// Index id.
    pub id: String,
    /// Ibor-swap or OIS-swap.
    pub kind: SwapIndexKind,
    /// Settlement lag in spot days.
    pub spot_days: u32,
    /// Top-level calendar; must equal the fixed leg's calendar (§3).
    pub calendar: String,
    /// Top-level business day convention; must equal the fixed leg's.
    pub bdc: BusinessDayConvention,
    /// Top-level end-of-month flag; must equal the fixed leg's.
    pub eom: bool,
    /// Fixed-leg conventions.
    pub fixed_leg: FixedLegConvention,
    /// Floating-leg conventions.
    pub float_leg: FloatLegConvention,
    /// Id of the floating `IndexDefinition` this swap index reprices
    /// against.
    pub float_index_id: String,
}

impl SwapIndexDefinition {
    /// Validates the invariants from §3: the top-level calendar/BDC/EOM
    /// must match the fixed leg's; OIS variants additionally require the
    /// fixed BDC to equal the float BDC.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::SwapIndexConventionMismatch`] naming the
    /// violated rule.
    pub fn validate(&self) -> CurveCacheResult<()> {
        if self.bdc != self.fixed_leg.bdc {
            return Err(CurveCacheError::SwapIndexConventionMismatch {
                id: self.id.clone(),
                reason: "top-level BDC must match fixed-leg BDC".into(),
            });
        }
        if self.eom != self.fixed_leg.eom {
            return Err(CurveCacheError::SwapIndexConventionMismatch {
                id: self.id.clone(),
                reason: "top-level EOM flag must match fixed-leg EOM flag".into(),
            });
        }
        if self.kind == SwapIndexKind::OisSwap && self.fixed_leg.bdc != self.float_leg.bdc {
            return Err(CurveCacheError::SwapIndexConventionMismatch {
                id: self.id.clone(),
                reason: "OIS swap index requires fixed BDC == float BDC".into(),
            });
        }
        Ok(())
    }
}

/// Registry of [`SwapIndexDefinition`]s. Build-time validation enforces
/// §3's convention invariants; violations are fatal.
#[derive(Default)]
pub struct SwapIndexRegistry {
    entries: HashMap<String, SwapIndexDefinition>,
}

impl SwapIndexRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Validates and inserts a swap-index definition.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::SwapIndexConventionMismatch`] if `definition`
    /// fails [`SwapIndexDefinition::validate`].
    pub fn put(&mut self, definition: SwapIndexDefinition) -> CurveCacheResult<()> {
        definition.validate()?;
        self.entries.insert(definition.id.clone(), definition);
        Ok(())
    }

    /// Looks up a swap-index definition.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::UnknownIndex`] if missing.
    pub fn get(&self, id: &str) -> CurveCacheResult<&SwapIndexDefinition> {
        self.entries
            .get(id)
            .ok_or_else(|| CurveCacheError::UnknownIndex { id: id.to_string() })
    }
}
