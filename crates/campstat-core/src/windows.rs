//! Report windows and their bucket boundaries
//!
//! Every report covers one [`Window`]. A window is cut into buckets by an
//! ascending list of boundary timestamps which [`BoundaryGenerator`] derives
//! from a single "now". Calendar arithmetic (midnights, Mondays, month
//! starts) happens on naive wall-clock times in the configured zone; each
//! boundary is resolved to an instant only at the very end.
//!
//! # Examples
//!
//! ```
//! use campstat_core::windows::{BoundaryGenerator, Window};
//! use chrono::TimeZone;
//! use chrono_tz::Tz;
//!
//! let now = Tz::UTC.with_ymd_and_hms(2024, 3, 13, 10, 30, 0).unwrap();
//! let generator = BoundaryGenerator::new(now);
//!
//! let week = generator.boundaries(Window::Week).unwrap();
//! assert_eq!(week.len(), 22);
//! ```

use crate::error::{CampstatError, Result};
use crate::types::EpochMillis;
use chrono::{
    DateTime, Datelike, Duration, LocalResult, Months, NaiveDate, NaiveDateTime, NaiveTime,
    Offset, TimeZone,
};
use chrono_tz::Tz;
use std::fmt;
use tracing::debug;

/// Spacing of the `week` window
const WEEK_STEP_HOURS: i64 = 8;

/// Most calendar years that get a monthly report
pub const MAX_YEARS: u32 = 1000;

/// A time window with its own report file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Window {
    /// Last week in 8 hour steps
    Week,
    /// Last 30 days in daily steps
    ThirtyDays,
    /// Last 12 weeks in weekly steps
    TwelveWeeks,
    /// Last 24 weeks in weekly steps
    TwentyFourWeeks,
    /// Last 12 months in monthly steps
    TwelveMonths,
    /// One calendar year in monthly steps
    Monthly(i32),
}

impl Window {
    /// Windows that do not depend on a year
    pub const FIXED: [Window; 5] = [
        Window::Week,
        Window::ThirtyDays,
        Window::TwelveWeeks,
        Window::TwentyFourWeeks,
        Window::TwelveMonths,
    ];

    /// The fixed windows followed by one monthly window for each of the
    /// last `years` years, oldest first, ending with `current_year`.
    /// `years` is capped at [`MAX_YEARS`].
    ///
    /// ```
    /// use campstat_core::windows::Window;
    ///
    /// let windows = Window::default_set(2024, 3);
    /// assert_eq!(windows.len(), 8);
    /// assert_eq!(windows[5], Window::Monthly(2022));
    /// assert_eq!(windows[7], Window::Monthly(2024));
    /// ```
    pub fn default_set(current_year: i32, years: u32) -> Vec<Window> {
        let span = i32::try_from(years.min(MAX_YEARS)).unwrap_or_default();
        let first_year = current_year.saturating_sub(span).saturating_add(1);
        Self::FIXED
            .into_iter()
            .chain((first_year..=current_year).map(Window::Monthly))
            .collect()
    }

    /// Name of the window, also used as the report file stem
    pub fn key(&self) -> String {
        match self {
            Window::Week => "week".to_string(),
            Window::ThirtyDays => "30_days".to_string(),
            Window::TwelveWeeks => "12_weeks".to_string(),
            Window::TwentyFourWeeks => "24_weeks".to_string(),
            Window::TwelveMonths => "12_months".to_string(),
            Window::Monthly(year) => format!("{year}_monthly"),
        }
    }

    /// Number of boundaries the window is cut into
    pub fn boundary_count(&self) -> usize {
        match self {
            Window::Week => 22,
            Window::ThirtyDays => 31,
            Window::TwelveWeeks => 13,
            Window::TwentyFourWeeks => 25,
            Window::TwelveMonths | Window::Monthly(_) => 13,
        }
    }
}

impl fmt::Display for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}

/// Shift a date by a signed number of months, keeping the day of month
///
/// ```
/// use campstat_core::windows::shift_months;
/// use chrono::NaiveDate;
///
/// let jan = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
/// assert_eq!(shift_months(jan, -1), NaiveDate::from_ymd_opt(2023, 12, 1));
/// ```
pub fn shift_months(date: NaiveDate, delta: i32) -> Option<NaiveDate> {
    let months = Months::new(delta.unsigned_abs());
    if delta >= 0 {
        date.checked_add_months(months)
    } else {
        date.checked_sub_months(months)
    }
}

/// Produces boundary timestamps for every [`Window`] from one anchor time
#[derive(Debug, Clone)]
pub struct BoundaryGenerator {
    now: NaiveDateTime,
    tz: Tz,
}

impl BoundaryGenerator {
    /// Anchor all windows on `now`, read as wall-clock time in its zone
    pub fn new(now: DateTime<Tz>) -> Self {
        Self {
            now: now.naive_local(),
            tz: now.timezone(),
        }
    }

    /// Ascending, deduplicated boundaries of `window` in epoch milliseconds
    pub fn boundaries(&self, window: Window) -> Result<Vec<EpochMillis>> {
        let count = window.boundary_count();
        let local = match window {
            Window::Week => self.eight_hourly(count),
            Window::ThirtyDays => self.daily(count),
            Window::TwelveWeeks | Window::TwentyFourWeeks => self.weekly(count),
            Window::TwelveMonths => {
                let this_month = self.today().with_day(1).ok_or_else(|| {
                    CampstatError::InvalidDate(format!("first day of month of {}", self.today()))
                })?;
                monthly(this_month, count)?
            }
            Window::Monthly(year) => {
                let december = NaiveDate::from_ymd_opt(year, 12, 1).ok_or_else(|| {
                    CampstatError::InvalidDate(format!("December of year {year}"))
                })?;
                monthly(december, count)?
            }
        };

        let mut boundaries = local
            .into_iter()
            .map(|naive| self.resolve(naive))
            .collect::<Result<Vec<_>>>()?;
        boundaries.sort();
        boundaries.dedup();

        debug!("Window {} has {} boundaries", window, boundaries.len());
        Ok(boundaries)
    }

    fn today(&self) -> NaiveDate {
        self.now.date()
    }

    fn midnight(date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN)
    }

    /// First `midnight + 8h*k` not before now, then backwards in 8h steps
    fn eight_hourly(&self, count: usize) -> Vec<NaiveDateTime> {
        let step = Duration::hours(WEEK_STEP_HOURS);
        let mut last = Self::midnight(self.today());
        while last < self.now {
            last += step;
        }

        (0..count as i32).map(|i| last - step * i).collect()
    }

    /// Tomorrow's midnight, then backwards one day at a time
    fn daily(&self, count: usize) -> Vec<NaiveDateTime> {
        let last = Self::midnight(self.today()) + Duration::days(1);
        (0..count as i64).map(|i| last - Duration::days(i)).collect()
    }

    /// Next Monday's midnight, then backwards one week at a time
    fn weekly(&self, count: usize) -> Vec<NaiveDateTime> {
        let today = self.today();
        let monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
        let last = Self::midnight(monday + Duration::weeks(1));
        (0..count as i64).map(|i| last - Duration::weeks(i)).collect()
    }

    /// Map a local wall-clock time to an instant
    ///
    /// Ambiguous times take the earlier instant. Times inside a gap are read
    /// with the offset in force a day earlier, which moves them forward by
    /// the length of the gap.
    fn resolve(&self, local: NaiveDateTime) -> Result<EpochMillis> {
        let resolved = match self.tz.from_local_datetime(&local) {
            LocalResult::Single(dt) => Some(dt),
            LocalResult::Ambiguous(earliest, _) => Some(earliest),
            LocalResult::None => self
                .tz
                .from_local_datetime(&(local - Duration::days(1)))
                .earliest()
                .map(|before| {
                    let offset = before.offset().fix().local_minus_utc();
                    self.tz
                        .from_utc_datetime(&(local - Duration::seconds(i64::from(offset))))
                }),
        };

        resolved
            .map(|dt| EpochMillis::from_datetime(&dt))
            .ok_or_else(|| {
                CampstatError::InvalidDate(format!("{local} does not exist in {}", self.tz.name()))
            })
    }
}

/// The month after `anchor`, then backwards one month at a time
fn monthly(anchor: NaiveDate, count: usize) -> Result<Vec<NaiveDateTime>> {
    let mut current = shift_months(anchor, 1)
        .ok_or_else(|| CampstatError::InvalidDate(format!("month after {anchor}")))?;

    let mut points = Vec::with_capacity(count);
    for _ in 0..count {
        points.push(current.and_time(NaiveTime::MIN));
        current = shift_months(current, -1)
            .ok_or_else(|| CampstatError::InvalidDate(format!("month before {current}")))?;
    }

    Ok(points)
}
