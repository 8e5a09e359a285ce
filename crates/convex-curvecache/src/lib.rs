//! # Convex Curve Cache
//!
//! Dependency-ordered multi-curve bootstrap and content-addressed curve
//! cache for the Convex fixed-income pricing engine.
//!
//! This crate sits behind the engine's "bootstrap curves" endpoint: given
//! a batch of curve specs naming calibration helpers, quotes, and
//! index/curve dependencies on other curves in the same batch, it
//! resolves a build order, serves already-solved curves from a
//! content-addressed cache, bootstraps the rest, and evaluates
//! caller-requested grids of discount/zero/forward measures against the
//! result. It provides:
//!
//! - **Registries**: [`quotes`], [`indices`] — identity-keyed market data
//!   and index definitions shared across a request's curves.
//! - **Spec model**: [`spec`] — the declarative [`spec::CurveSpec`] /
//!   [`spec::CalibrationPoint`] request shape.
//! - **Dependency resolution**: [`resolver`] — topological build order
//!   over curve-to-curve dependencies, with cycle detection.
//! - **Numerical adapter**: [`numlib`], [`helpers`] — turns resolved
//!   points into `convex-curves` instruments and runs the bootstrap.
//! - **Cache**: [`cache_key`], [`serializer`], [`cache`] — content
//!   addressing, pillar serialization, and single-flight build
//!   coordination.
//! - **Orchestration**: [`handle`], [`orchestrator`] — late-bound curve
//!   handles and the per-request build loop.
//! - **Query surface**: [`grid`], [`pricing_registry`] — grid/measure
//!   evaluation and the pricing-section assembler.
//! - **Process concerns**: [`config`], [`dateparse`], [`error`].
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use convex_curvecache::prelude::*;
//!
//! let mut quotes = QuoteRegistry::new();
//! quotes.upsert("usd.sofr.on", 0.0525, QuoteKind::CurveRate)?;
//!
//! let indices = IndexRegistry::new();
//! let mut curves = CurveRegistry::new();
//! let cache = CurveCacheStore::new(CacheConfig::from_env().cache_capacity);
//!
//! let report = orchestrator::run(
//!     evaluation_date,
//!     &specs,
//!     &quotes,
//!     &indices,
//!     &mut curves,
//!     &cache,
//! ).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cache;
pub mod cache_key;
pub mod config;
pub mod dateparse;
pub mod error;
pub mod grid;
pub mod handle;
pub mod helpers;
pub mod indices;
pub mod numlib;
pub mod orchestrator;
pub mod pricing_registry;
pub mod quotes;
pub mod resolver;
pub mod serializer;
pub mod spec;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::cache::{CacheStats, CurveCacheStore};
    pub use crate::cache_key::CacheKey;
    pub use crate::config::CacheConfig;
    pub use crate::error::{CurveCacheError, CurveCacheResult};
    pub use crate::grid::{GridResult, GridSpec, Measure};
    pub use crate::handle::{CurveHandle, CurveRegistry};
    pub use crate::indices::IndexRegistry;
    pub use crate::orchestrator::{self, CurveOutcome, OrchestrationReport};
    pub use crate::pricing_registry::{self, PricingRegistry, PricingRequest};
    pub use crate::quotes::{QuoteKind, QuoteRegistry};
    pub use crate::spec::{CalibrationPoint, CurveSpec, CurveTrait};
}
