//! Pricing-registry assembler.
//!
//! Consumes the decoded request's `pricing` section: a set of curve ids
//! the pricing layer will use, a (possibly empty) list of vol surfaces,
//! and a list of model specs. Each vol surface is parsed by one of three typed
//! parsers keyed off its payload variant; model specs are kept as opaque
//! pointers and checked for vol compatibility once everything is
//! assembled. This registry never prices anything — it only validates and
//! stores what the instrument-pricing layer will need.

use std::collections::HashMap;
use std::sync::Arc;

use convex_core::types::Date;

use crate::error::{CurveCacheError, CurveCacheResult};

/// The volatility family a surface is quoted in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VolFamily {
    ShiftedLognormal,
    Normal,
}

/// The three shapes a vol surface payload can take on the wire.
///
/// Each carries only what the compatibility checks need (family,
/// displacement) plus the raw payload for the instrument-pricing layer
/// to parse fully later; this registry never interprets the raw data.
#[derive(Debug, Clone)]
pub enum VolSurfacePayload {
    Optionlet {
        family: VolFamily,
        displacement: f64,
        raw: serde_json::Value,
    },
    Swaption {
        family: VolFamily,
        displacement: f64,
        raw: serde_json::Value,
    },
    Black {
        family: VolFamily,
        displacement: f64,
        raw: serde_json::Value,
    },
}

impl VolSurfacePayload {
    fn family_and_displacement(&self) -> (VolFamily, f64) {
        match self {
            VolSurfacePayload::Optionlet { family, displacement, .. }
            | VolSurfacePayload::Swaption { family, displacement, .. }
            | VolSurfacePayload::Black { family, displacement, .. } => (*family, *displacement),
        }
    }
}

/// One entry in the caller-supplied `pricing.vol_surfaces` list.
#[derive(Debug, Clone)]
pub struct VolSurfaceRequest {
    pub id: String,
    pub payload: VolSurfacePayload,
}

/// What the engine-compatibility checks need to know about a registered
/// vol surface, stripped of its raw payload.
#[derive(Debug, Clone, Copy)]
pub struct VolSurfaceMeta {
    pub family: VolFamily,
    pub displacement: f64,
}

/// The engine a model spec will be used to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelKind {
    Bachelier,
    Black,
    ShiftedBlack,
}

/// One entry in the caller-supplied `pricing.models` list.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub id: String,
    pub kind: ModelKind,
    /// The vol surface this model will be built against.
    pub vol_surface_id: String,
    pub payload: serde_json::Value,
}

/// An assembled model spec: an opaque pointer keyed by id, resolved
/// against its vol surface's metadata at construction time.
#[derive(Debug, Clone)]
pub struct ModelSpec {
    pub id: String,
    pub kind: ModelKind,
    pub vol_surface_id: String,
    pub payload: Arc<serde_json::Value>,
}

/// The caller-supplied `pricing` section of a request, before assembly.
#[derive(Debug, Clone, Default)]
pub struct PricingRequest {
    pub evaluation_date: Option<Date>,
    pub curve_ids: Vec<String>,
    pub vol_surfaces: Vec<VolSurfaceRequest>,
    pub models: Vec<ModelRequest>,
}

/// The assembled pricing registry for one request.
#[derive(Debug, Clone)]
pub struct PricingRegistry {
    evaluation_date: Date,
    curve_ids: Vec<String>,
    vol_surfaces: HashMap<String, VolSurfaceMeta>,
    models: HashMap<String, ModelSpec>,
}

impl PricingRegistry {
    #[must_use]
    pub fn evaluation_date(&self) -> Date {
        self.evaluation_date
    }

    #[must_use]
    pub fn curve_ids(&self) -> &[String] {
        &self.curve_ids
    }

    #[must_use]
    pub fn vol_surface(&self, id: &str) -> Option<&VolSurfaceMeta> {
        self.vol_surfaces.get(id)
    }

    #[must_use]
    pub fn model(&self, id: &str) -> Option<&ModelSpec> {
        self.models.get(id)
    }

    /// Every model's vol requirement against the metadata of the vol
    /// surface it names.
    ///
    /// # Errors
    ///
    /// [`CurveCacheError::UnknownPricingEntry`] if a model names a vol
    /// surface that was not registered; [`CurveCacheError::ModelVolIncompatible`]
    /// for the three rules in the module doc.
    pub fn check_compatibility(&self) -> CurveCacheResult<()> {
        for model in self.models.values() {
            let vol = self.vol_surfaces.get(&model.vol_surface_id).ok_or_else(|| {
                CurveCacheError::UnknownPricingEntry {
                    kind: "vol surface",
                    id: model.vol_surface_id.clone(),
                }
            })?;
            check_one(model, vol)?;
        }
        Ok(())
    }
}

fn check_one(model: &ModelSpec, vol: &VolSurfaceMeta) -> CurveCacheResult<()> {
    let incompatible = |reason: &str| CurveCacheError::ModelVolIncompatible {
        model_id: model.id.clone(),
        vol_id: model.vol_surface_id.clone(),
        reason: reason.to_string(),
    };
    match model.kind {
        ModelKind::Bachelier if vol.family != VolFamily::Normal => {
            Err(incompatible("Bachelier requires Normal vols"))
        }
        ModelKind::Black if vol.displacement != 0.0 => {
            Err(incompatible("Black requires displacement = 0"))
        }
        ModelKind::ShiftedBlack if vol.displacement <= 0.0 => {
            Err(incompatible("Shifted-Black requires displacement > 0"))
        }
        _ => Ok(()),
    }
}

/// Validates and assembles a decoded pricing request.
///
/// # Errors
///
/// [`CurveCacheError::MissingField`] if the evaluation date is absent or
/// `curve_ids` is empty; [`CurveCacheError::DuplicateId`] for a repeated
/// vol surface or model id; propagates [`PricingRegistry::check_compatibility`].
pub fn assemble(request: &PricingRequest) -> CurveCacheResult<PricingRegistry> {
    let evaluation_date = request
        .evaluation_date
        .ok_or_else(|| CurveCacheError::missing_field("pricing.evaluation_date"))?;
    if request.curve_ids.is_empty() {
        return Err(CurveCacheError::missing_field("pricing.curves"));
    }

    let mut vol_surfaces = HashMap::with_capacity(request.vol_surfaces.len());
    for surface in &request.vol_surfaces {
        if vol_surfaces.contains_key(&surface.id) {
            return Err(CurveCacheError::DuplicateId {
                registry: "vol_surfaces".into(),
                id: surface.id.clone(),
            });
        }
        let (family, displacement) = surface.payload.family_and_displacement();
        vol_surfaces.insert(surface.id.clone(), VolSurfaceMeta { family, displacement });
    }

    let mut models = HashMap::with_capacity(request.models.len());
    for model in &request.models {
        if models.contains_key(&model.id) {
            return Err(CurveCacheError::DuplicateId {
                registry: "models".into(),
                id: model.id.clone(),
            });
        }
        models.insert(
            model.id.clone(),
            ModelSpec {
                id: model.id.clone(),
                kind: model.kind,
                vol_surface_id: model.vol_surface_id.clone(),
                payload: Arc::new(model.payload.clone()),
            },
        );
    }

    let registry = PricingRegistry {
        evaluation_date,
        curve_ids: request.curve_ids.clone(),
        vol_surfaces,
        models,
    };
    registry.check_compatibility()?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface(id: &str, family: VolFamily, displacement: f64) -> VolSurfaceRequest {
        VolSurfaceRequest {
            id: id.into(),
            payload: VolSurfacePayload::Black {
                family,
                displacement,
                raw: serde_json::json!({}),
            },
        }
    }

    fn model(id: &str, kind: ModelKind, vol_surface_id: &str) -> ModelRequest {
        ModelRequest {
            id: id.into(),
            kind,
            vol_surface_id: vol_surface_id.into(),
            payload: serde_json::json!({}),
        }
    }

    fn base_request() -> PricingRequest {
        PricingRequest {
            evaluation_date: Some(Date::from_ymd(2024, 1, 2).unwrap()),
            curve_ids: vec!["usd.ois".into()],
            vol_surfaces: Vec::new(),
            models: Vec::new(),
        }
    }

    #[test]
    fn missing_evaluation_date_rejected() {
        let mut request = base_request();
        request.evaluation_date = None;
        assert!(matches!(
            assemble(&request).unwrap_err(),
            CurveCacheError::MissingField { .. }
        ));
    }

    #[test]
    fn empty_curve_list_rejected() {
        let mut request = base_request();
        request.curve_ids.clear();
        assert!(matches!(
            assemble(&request).unwrap_err(),
            CurveCacheError::MissingField { .. }
        ));
    }

    #[test]
    fn bachelier_with_shifted_lognormal_vols_fails() {
        let mut request = base_request();
        request.vol_surfaces.push(surface("vs1", VolFamily::ShiftedLognormal, 0.01));
        request.models.push(model("m1", ModelKind::Bachelier, "vs1"));
        assert!(matches!(
            assemble(&request).unwrap_err(),
            CurveCacheError::ModelVolIncompatible { .. }
        ));
    }

    #[test]
    fn bachelier_with_normal_vols_succeeds() {
        let mut request = base_request();
        request.vol_surfaces.push(surface("vs1", VolFamily::Normal, 0.0));
        request.models.push(model("m1", ModelKind::Bachelier, "vs1"));
        assert!(assemble(&request).is_ok());
    }

    #[test]
    fn black_requires_zero_displacement() {
        let mut request = base_request();
        request.vol_surfaces.push(surface("vs1", VolFamily::ShiftedLognormal, 0.02));
        request.models.push(model("m1", ModelKind::Black, "vs1"));
        assert!(matches!(
            assemble(&request).unwrap_err(),
            CurveCacheError::ModelVolIncompatible { .. }
        ));
    }

    #[test]
    fn shifted_black_requires_positive_displacement() {
        let mut request = base_request();
        request.vol_surfaces.push(surface("vs1", VolFamily::ShiftedLognormal, 0.0));
        request.models.push(model("m1", ModelKind::ShiftedBlack, "vs1"));
        assert!(matches!(
            assemble(&request).unwrap_err(),
            CurveCacheError::ModelVolIncompatible { .. }
        ));
    }

    #[test]
    fn model_referencing_unknown_vol_surface_errors() {
        let mut request = base_request();
        request.models.push(model("m1", ModelKind::Black, "missing"));
        assert!(matches!(
            assemble(&request).unwrap_err(),
            CurveCacheError::UnknownPricingEntry { .. }
        ));
    }

    #[test]
    fn duplicate_vol_surface_id_rejected() {
        let mut request = base_request();
        request.vol_surfaces.push(surface("vs1", VolFamily::Normal, 0.0));
        request.vol_surfaces.push(surface("vs1", VolFamily::Normal, 0.0));
        assert!(matches!(
            assemble(&request).unwrap_err(),
            CurveCacheError::DuplicateId { .. }
        ));
    }
}
