use chrono::{Datelike, Duration, NaiveDate};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Full English name for a 1-based month number.
pub fn month_name(month: u32) -> Option<&'static str> {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
}

/// Weekday index with Sunday = 0, matching the stored `daysOfWeek` encoding.
pub fn weekday_index(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_sunday()
}

pub fn first_of_month(year: i32, month: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, 1)
}

pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Step `months` calendar months forward from (year, month), returning the
/// resulting (year, month) pair.
pub fn shift_month(year: i32, month: u32, months: u32) -> Option<(i32, u32)> {
    let zero_based = i64::from(year) * 12 + i64::from(month) - 1 + i64::from(months);
    let year = i32::try_from(zero_based.div_euclid(12)).ok()?;
    let month = u32::try_from(zero_based.rem_euclid(12)).ok()? + 1;
    Some((year, month))
}

/// Add calendar months keeping the day of month, rolling forward when the
/// target month is too short: Jan 31 + 1 month lands on Mar 2 (or Mar 3 in
/// a common year), Feb 29 + 12 months lands on Mar 1.
pub fn add_months_rolling(date: NaiveDate, months: u32) -> Option<NaiveDate> {
    let (year, month) = shift_month(date.year(), date.month(), months)?;
    let start = first_of_month(year, month)?;
    add_days(start, i64::from(date.day()) - 1)
}

pub fn add_years_rolling(date: NaiveDate, years: u32) -> Option<NaiveDate> {
    add_months_rolling(date, years.checked_mul(12)?)
}
