//! Day count conventions for fixed income calculations.
//!
//! Day count conventions determine how accrued interest is calculated
//! by specifying how to count days between two dates and the year basis.
//!
//! # Supported Conventions
//!
//! ## ACT Family (Actual numerator)
//!
//! - [`Act360`]: Actual/360 - Money market convention
//! - [`Act365Fixed`]: Actual/365 Fixed - UK Gilts, AUD/NZD
//! - [`Act365Leap`]: Actual/365 Leap - Adjusts basis for leap years
//! - [`ActActIsda`]: Actual/Actual ISDA - Year-based split
//! - [`ActActIcma`]: Actual/Actual ICMA - Period-based (government bonds)
//! - [`ActActAfb`]: Actual/Actual AFB - French convention
//!
//! ## 30/360 Family (Assumes 30-day months, 360-day years)
//!
//! - [`Thirty360US`]: 30/360 US - US corporate bonds (with Feb EOM rules)
//! - [`Thirty360E`]: 30E/360 - Eurobond convention
//! - [`Thirty360EIsda`]: 30E/360 ISDA - ISDA swap convention
//! - [`Thirty360German`]: 30/360 German - German market convention
//!
//! # Usage
//!
//! ```rust
//! use convex_core::daycounts::{DayCount, Act360, Thirty360US};
//! use convex_core::types::Date;
//!
//! let dc = Thirty360US;
//! let start = Date::from_ymd(2025, 1, 15).unwrap();
//! let end = Date::from_ymd(2025, 7, 15).unwrap();
//!
//! let days = dc.day_count(start, end);
//! let year_fraction = dc.year_fraction(start, end);
//! ```
//!
//! # Bloomberg Compatibility
//!
//! All implementations are designed to match Bloomberg YAS exactly:
//! - 30/360 US includes February end-of-month rules
//! - ACT/ACT ICMA uses period-based calculation
//! - All conventions handle leap years correctly

mod act360;
mod act365;
mod actact;
mod thirty360;

pub use act360::Act360;
pub use act365::{Act365, Act365Fixed, Act365Leap};
pub use actact::{ActActAfb, ActActIcma, ActActIsda};
pub use thirty360::{Thirty360, Thirty360E, Thirty360EIsda, Thirty360German, Thirty360US};

use crate::types::Date;
use rust_decimal::Decimal;

/// Trait for day count conventions.
///
/// Implementations provide the year fraction calculation between two dates
/// according to specific market conventions.
///
/// # Implementation Notes
///
/// - `year_fraction` returns the fraction of a year between dates
/// - `day_count` returns the number of days according to the convention
/// - Implementations must be thread-safe (`Send + Sync`)
pub trait DayCount: Send + Sync {
    /// Returns the name of the day count convention.
    ///
    /// This should match Bloomberg's convention naming (e.g., "ACT/360", "30/360 US").
    fn name(&self) -> &'static str;

    /// Calculates the year fraction between two dates.
    ///
    /// # Arguments
    ///
    /// * `start` - Start date (exclusive for accrual)
    /// * `end` - End date (inclusive for accrual)
    ///
    /// # Returns
    ///
    /// The fraction of a year between the two dates. Can be negative if end < start.
    fn year_fraction(&self, start: Date, end: Date) -> Decimal;

    /// Calculates the day count between two dates.
    ///
    /// Returns the number of days according to the convention.
    /// For ACT conventions, this is actual calendar days.
    /// For 30/360 conventions, this uses the 30-day month assumption.
    fn day_count(&self, start: Date, end: Date) -> i64;
}

/// Enumeration of all supported day count conventions.
///
/// This enum provides a convenient way to select conventions at runtime
/// and convert to boxed trait objects.
///
/// # Example
///
/// ```rust
/// use convex_core::daycounts::{DayCountConvention, DayCount};
/// use convex_core::types::Date;
///
/// let convention = DayCountConvention::Thirty360US;
/// let dc = convention.to_day_count();
///
/// let start = Date::from_ymd(2025, 1, 1).unwrap();
/// let end = Date::from_ymd(2025, 7, 1).unwrap();
/// let yf = dc.year_fraction(start, end);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayCountConvention {
    // =========================================================================
    // ACT Family
    // =========================================================================
    /// Actual/360 - Money market instruments, FRNs
    Act360,

    /// Actual/365 Fixed - UK Gilts, AUD/NZD markets
    Act365Fixed,

    /// Actual/365 Leap - Adjusts denominator for leap years
    Act365Leap,

    /// Actual/Actual ISDA - Year-based calculation for swaps
    ActActIsda,

    /// Actual/Actual ICMA - Period-based calculation for bonds
    /// Uses semi-annual frequency by default
    ActActIcma,

    /// Actual/Actual AFB - French convention
    ActActAfb,

    // =========================================================================
    // 30/360 Family
    // =========================================================================
    /// 30/360 US (Bond Basis) - US corporate, agency, municipal bonds
    /// Includes Bloomberg-exact February end-of-month rules
    Thirty360US,

    /// 30E/360 (Eurobond Basis) - Eurobonds, European corporates
    Thirty360E,

    /// 30E/360 ISDA - ISDA swap convention with EOM handling
    Thirty360EIsda,

    /// 30/360 German - German market convention
    Thirty360German,
}

impl DayCountConvention {
    /// Creates a boxed day count implementation.
    ///
    /// # Returns
    ///
    /// A boxed trait object that can be used for day count calculations.
    #[must_use]
    pub fn to_day_count(&self) -> Box<dyn DayCount> {
        match self {
            // ACT Family
            DayCountConvention::Act360 => Box::new(Act360),
            DayCountConvention::Act365Fixed => Box::new(Act365Fixed),
            DayCountConvention::Act365Leap => Box::new(Act365Leap),
            DayCountConvention::ActActIsda => Box::new(ActActIsda),
            DayCountConvention::ActActIcma => Box::new(ActActIcma::default()),
            DayCountConvention::ActActAfb => Box::new(ActActAfb),

            // 30/360 Family
            DayCountConvention::Thirty360US => Box::new(Thirty360US),
            DayCountConvention::Thirty360E => Box::new(Thirty360E),
            DayCountConvention::Thirty360EIsda => Box::new(Thirty360EIsda::default()),
            DayCountConvention::Thirty360German => Box::new(Thirty360German),
        }
    }

    /// Returns the name of the convention as used by Bloomberg.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            DayCountConvention::Act360 => "ACT/360",
            DayCountConvention::Act365Fixed => "ACT/365F",
            DayCountConvention::Act365Leap => "ACT/365L",
            DayCountConvention::ActActIsda => "ACT/ACT ISDA",
            DayCountConvention::ActActIcma => "ACT/ACT ICMA",
            DayCountConvention::ActActAfb => "ACT/ACT AFB",
            DayCountConvention::Thirty360US => "30/360 US",
            DayCountConvention::Thirty360E => "30E/360",
            DayCountConvention::Thirty360EIsda => "30E/360 ISDA",
            DayCountConvention::Thirty360German => "30/360 German",
        }
    }

    /// Returns all available day count conventions.
    #[must_use]
    pub fn all() -> &'static [DayCountConvention] {
        &[
            DayCountConvention::Act360,
            DayCountConvention::Act365Fixed,
            DayCountConvention::Act365Leap,
            DayCountConvention::ActActIsda,
            DayCountConvention::ActActIcma,
            DayCountConvention::ActActAfb,
            DayCountConvention::Thirty360US,
            DayCountConvention::Thirty360E,
            DayCountConvention::Thirty360EIsda,
            DayCountConvention::Thirty360German,
        ]
    }

    /// Returns the year basis (denominator) for simple interest calculations.
    ///
    /// This is the assumed number of days per year used when converting
    /// day counts to year fractions in simple interest scenarios.
    ///
    /// # Returns
    ///
    /// - 360 for ACT/360 and all 30/360 variants
    /// - 365 for ACT/365 variants and ACT/ACT variants (approximation)
    #[must_use]
    pub const fn basis(&self) -> u32 {
        match self {
            // 360-day basis conventions
            DayCountConvention::Act360
            | DayCountConvention::Thirty360US
            | DayCountConvention::Thirty360E
            | DayCountConvention::Thirty360EIsda
            | DayCountConvention::Thirty360German => 360,

            // 365-day basis conventions
            DayCountConvention::Act365Fixed
            | DayCountConvention::Act365Leap
            | DayCountConvention::ActActIsda
            | DayCountConvention::ActActIcma
            | DayCountConvention::ActActAfb => 365,
        }
    }
}

impl std::fmt::Display for DayCountConvention {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl std::str::FromStr for DayCountConvention {
    type Err = DayCountParseError;

    /// Parses a day count convention from a string.
    ///
    /// Supports multiple formats:
    /// - Bloomberg-style: "ACT/360", "30/360 US", "ACT/ACT ICMA"
    /// - Rust enum-style: "Act360", "Thirty360US", "ActActIcma"
    /// - Common aliases: "BOND", "ACTUAL/360", "EUROBOND"
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Normalize to uppercase for matching
        let normalized = s.to_uppercase();
        let normalized = normalized.trim();

        match normalized {
            // ACT/360
            "ACT/360" | "ACTUAL/360" | "ACT360" => Ok(DayCountConvention::Act360),

            // ACT/365 Fixed
            "ACT/365" | "ACT/365F" | "ACT/365 FIXED" | "ACTUAL/365" | "ACTUAL/365 FIXED"
            | "ACT365FIXED" | "ACT365" => Ok(DayCountConvention::Act365Fixed),

            // ACT/365 Leap
            "ACT/365L" | "ACT/365 LEAP" | "ACTUAL/365 LEAP" | "ACT365LEAP" => {
                Ok(DayCountConvention::Act365Leap)
            }

            // ACT/ACT ISDA
            "ACT/ACT" | "ACT/ACT ISDA" | "ACTUAL/ACTUAL" | "ACTUAL/ACTUAL ISDA" | "ACTACTISDA"
            | "ACTACT" => Ok(DayCountConvention::ActActIsda),

            // ACT/ACT ICMA
            "ACT/ACT ICMA" | "ACTUAL/ACTUAL ICMA" | "ACTACTICMA" | "ISMA" => {
                Ok(DayCountConvention::ActActIcma)
            }

            // ACT/ACT AFB
            "ACT/ACT AFB" | "ACTUAL/ACTUAL AFB" | "ACTACTAFB" | "AFB" => {
                Ok(DayCountConvention::ActActAfb)
            }

            // 30/360 US
            "30/360" | "30/360 US" | "30U/360" | "BOND" | "THIRTY360US" | "30/360US" => {
                Ok(DayCountConvention::Thirty360US)
            }

            // 30E/360
            "30E/360" | "30/360 ICMA" | "EUROBOND" | "THIRTY360E" | "30E360" => {
                Ok(DayCountConvention::Thirty360E)
            }

            // 30E/360 ISDA
            "30E/360 ISDA" | "THIRTY360EISDA" | "30E/360ISDA" => {
                Ok(DayCountConvention::Thirty360EIsda)
            }

            // 30/360 German
            "30/360 GERMAN" | "30E/360 GERMAN" | "GERMAN" | "THIRTY360GERMAN" => {
                Ok(DayCountConvention::Thirty360German)
            }

            _ => Err(DayCountParseError(s.to_string())),
        }
    }
}

/// Error type for parsing day count conventions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayCountParseError(pub String);

impl std::fmt::Display for DayCountParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown day count convention: '{}'", self.0)
    }
}

impl std::error::Error for DayCountParseError {}
