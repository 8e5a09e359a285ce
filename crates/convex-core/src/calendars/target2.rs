//! TARGET2 calendar for Eurozone payments and securities settlement.
//!
//! TARGET2 (Trans-European Automated Real-time Gross Settlement Express Transfer)
//! is the real-time gross settlement system owned and operated by the Eurosystem.

use super::bitmap::{HolidayBitmap, HolidayCalendarBuilder, WeekendType, MAX_YEAR, MIN_YEAR};
use super::Calendar;
use crate::types::Date;
use std::sync::OnceLock;

/// Static TARGET2 calendar instance.
static TARGET2_CALENDAR: OnceLock<Target2Calendar> = OnceLock::new();

/// TARGET2 holiday calendar for Eurozone markets.
///
/// ## Holidays
///
/// - New Year's Day (January 1)
/// - Good Friday
/// - Easter Monday
/// - Labour Day (May 1)
/// - Christmas Day (December 25)
/// - Boxing Day (December 26)
///
/// Note: TARGET2 does NOT observe:
/// - National holidays of individual countries
/// - Any weekend observations (holidays on weekends are simply lost)
#[derive(Debug, Clone)]
pub struct Target2Calendar {
    bitmap: HolidayBitmap,
}

impl Target2Calendar {
    /// Create a new TARGET2 calendar.
    pub fn new() -> Self {
        Self {
            bitmap: build_target2_holidays(),
        }
    }

    /// Get the global TARGET2 calendar instance.
    pub fn global() -> &'static Target2Calendar {
        TARGET2_CALENDAR.get_or_init(Target2Calendar::new)
    }
}

impl Default for Target2Calendar {
    fn default() -> Self {
        Self::new()
    }
}

impl Calendar for Target2Calendar {
    fn name(&self) -> &'static str {
        "TARGET2"
    }

    fn is_business_day(&self, date: Date) -> bool {
        self.bitmap.is_business_day(date.as_naive_date())
    }
}

/// Build the TARGET2 holiday bitmap.
fn build_target2_holidays() -> HolidayBitmap {
    HolidayCalendarBuilder::new("TARGET2")
        .weekend(WeekendType::SaturdaySunday)
        .year_range(MIN_YEAR, MAX_YEAR)
        // New Year's Day (January 1) - NO weekend observation
        .add_fixed_holiday(1, 1, false)
        // Good Friday (Friday before Easter)
        .add_easter_holiday(-2)
        // Easter Monday (Monday after Easter)
        .add_easter_holiday(1)
        // Labour Day (May 1) - NO weekend observation
        .add_fixed_holiday(5, 1, false)
        // Christmas Day (December 25) - NO weekend observation
        .add_fixed_holiday(12, 25, false)
        // Boxing Day (December 26) - NO weekend observation
        .add_fixed_holiday(12, 26, false)
        .build()
}
