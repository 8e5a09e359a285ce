//! Request-facing date parsing.
//!
//! [`convex_core::types::Date::parse`] only accepts the ISO separator
//! (`%Y-%m-%d`). Request payloads for this component also accept `/` as
//! a separator, so this module normalizes before delegating.

use convex_core::types::Date;

use crate::error::{CurveCacheError, CurveCacheResult};

/// Parses a date string accepting either `-` or `/` as the
/// year/month/day separator.
///
/// # Errors
///
/// [`CurveCacheError::MalformedDate`] if `s` parses under neither
/// separator.
pub fn parse(s: &str) -> CurveCacheResult<Date> {
    let normalized = s.replace('/', "-");
    Date::parse(&normalized).map_err(|_| CurveCacheError::malformed_date(s))
}
