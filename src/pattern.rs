use crate::calendar::month_name;
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::interop;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const WEEKDAY_ABBREVIATIONS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Quarterly,
    BiAnnual,
    Seasonal,
    Annual,
}

impl Frequency {
    pub const ALL: [Frequency; 7] = [
        Frequency::Daily,
        Frequency::Weekly,
        Frequency::Monthly,
        Frequency::Quarterly,
        Frequency::BiAnnual,
        Frequency::Seasonal,
        Frequency::Annual,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
            Frequency::Monthly => "monthly",
            Frequency::Quarterly => "quarterly",
            Frequency::BiAnnual => "bi-annual",
            Frequency::Seasonal => "seasonal",
            Frequency::Annual => "annual",
        }
    }

    /// Frequencies the 3-month planning board always picks up, regardless of
    /// the task's category.
    pub fn is_maintenance(&self) -> bool {
        matches!(
            self,
            Frequency::Quarterly | Frequency::BiAnnual | Frequency::Seasonal | Frequency::Annual
        )
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Frequency {
    type Err = RecurrenceError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        Frequency::ALL
            .into_iter()
            .find(|freq| freq.as_str() == normalized)
            .ok_or_else(|| RecurrenceError::invalid(format!("unknown frequency '{value}'")))
    }
}

fn default_interval() -> i64 {
    1
}

fn is_default_interval(interval: &i64) -> bool {
    *interval == 1
}

/// How a task repeats. Mirrors the stored JSON record: only the fields that
/// matter for `frequency` are consulted, the rest are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurrencePattern {
    pub frequency: Frequency,
    /// Step count for `daily`, `weekly` (without weekdays) and `monthly`.
    #[serde(default = "default_interval", skip_serializing_if = "is_default_interval")]
    pub interval: i64,
    /// Weekday indices, 0 = Sunday. Only used by `weekly`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days_of_week: Option<Vec<u32>>,
    /// Month numbers 1-12. Only used by `bi-annual` and `seasonal`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seasonal_months: Option<Vec<u32>>,
    /// Month number 1-12. Only used by `annual`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub specific_month: Option<u32>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "interop::optional_date"
    )]
    pub end_date: Option<NaiveDate>,
}

/// The validated advance step a pattern reduces to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceRule {
    Days(u32),
    Weeks(u32),
    /// Indexed by weekday, Sunday first. At least one entry is set.
    Weekdays([bool; 7]),
    Months(u32),
    /// Sorted, deduplicated, non-empty month numbers.
    MonthSet(Vec<u32>),
    FixedMonth(u32),
    Years(u32),
}

impl RecurrencePattern {
    pub fn new(frequency: Frequency) -> Self {
        Self {
            frequency,
            interval: 1,
            days_of_week: None,
            seasonal_months: None,
            specific_month: None,
            end_date: None,
        }
    }

    pub fn every(self, interval: i64) -> Self {
        Self { interval, ..self }
    }

    pub fn on_weekdays<I: IntoIterator<Item = u32>>(self, days: I) -> Self {
        Self {
            days_of_week: Some(days.into_iter().collect()),
            ..self
        }
    }

    pub fn in_months<I: IntoIterator<Item = u32>>(self, months: I) -> Self {
        Self {
            seasonal_months: Some(months.into_iter().collect()),
            ..self
        }
    }

    pub fn in_month(self, month: u32) -> Self {
        Self {
            specific_month: Some(month),
            ..self
        }
    }

    pub fn until(self, end_date: NaiveDate) -> Self {
        Self {
            end_date: Some(end_date),
            ..self
        }
    }

    /// Reduce the pattern to the rule the calculator steps with.
    pub fn rule(&self) -> RecurrenceResult<AdvanceRule> {
        match self.frequency {
            Frequency::Daily => Ok(AdvanceRule::Days(self.step()?)),
            Frequency::Weekly => match &self.days_of_week {
                Some(days) => Ok(AdvanceRule::Weekdays(weekday_mask(days)?)),
                None => Ok(AdvanceRule::Weeks(self.step()?)),
            },
            Frequency::Monthly => Ok(AdvanceRule::Months(self.step()?)),
            Frequency::Quarterly => Ok(AdvanceRule::Months(3)),
            Frequency::BiAnnual | Frequency::Seasonal => match &self.seasonal_months {
                Some(months) => Ok(AdvanceRule::MonthSet(month_set(months)?)),
                None => Ok(AdvanceRule::Years(1)),
            },
            Frequency::Annual => match self.specific_month {
                Some(month) => Ok(AdvanceRule::FixedMonth(check_month(month, "specificMonth")?)),
                None => Ok(AdvanceRule::Years(1)),
            },
        }
    }

    pub fn validate(&self) -> RecurrenceResult<()> {
        self.rule().map(|_| ())
    }

    fn step(&self) -> RecurrenceResult<u32> {
        if self.interval < 1 {
            return Err(RecurrenceError::invalid(format!(
                "{} recurrence requires interval >= 1 (got {})",
                self.frequency, self.interval
            )));
        }
        u32::try_from(self.interval).map_err(|_| {
            RecurrenceError::invalid(format!("interval {} is too large", self.interval))
        })
    }
}

fn weekday_mask(days: &[u32]) -> RecurrenceResult<[bool; 7]> {
    if days.is_empty() {
        return Err(RecurrenceError::invalid(
            "weekly recurrence with daysOfWeek needs at least one weekday",
        ));
    }
    let mut mask = [false; 7];
    for &day in days {
        let slot = mask.get_mut(day as usize).ok_or_else(|| {
            RecurrenceError::invalid(format!("daysOfWeek entry {day} is outside 0-6"))
        })?;
        *slot = true;
    }
    Ok(mask)
}

fn month_set(months: &[u32]) -> RecurrenceResult<Vec<u32>> {
    if months.is_empty() {
        return Err(RecurrenceError::invalid(
            "seasonalMonths needs at least one month",
        ));
    }
    let mut sorted = months
        .iter()
        .map(|&month| check_month(month, "seasonalMonths"))
        .collect::<RecurrenceResult<Vec<_>>>()?;
    sorted.sort_unstable();
    sorted.dedup();
    Ok(sorted)
}

fn check_month(month: u32, field: &str) -> RecurrenceResult<u32> {
    if (1..=12).contains(&month) {
        Ok(month)
    } else {
        Err(RecurrenceError::invalid(format!(
            "{field} entry {month} is outside 1-12"
        )))
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Ok(rule) = self.rule() else {
            return write!(f, "{} (invalid)", self.frequency);
        };
        match rule {
            AdvanceRule::Days(1) => write!(f, "daily")?,
            AdvanceRule::Days(n) => write!(f, "every {n} days")?,
            AdvanceRule::Weeks(1) => write!(f, "weekly")?,
            AdvanceRule::Weeks(n) => write!(f, "every {n} weeks")?,
            AdvanceRule::Weekdays(mask) => {
                let days = WEEKDAY_ABBREVIATIONS
                    .iter()
                    .zip(mask)
                    .filter(|(_, set)| *set)
                    .map(|(name, _)| *name)
                    .collect::<Vec<_>>();
                write!(f, "weekly on {}", days.join(", "))?
            }
            AdvanceRule::Months(1) => write!(f, "monthly")?,
            AdvanceRule::Months(n) if self.frequency == Frequency::Quarterly => {
                write!(f, "quarterly (every {n} months)")?
            }
            AdvanceRule::Months(n) => write!(f, "every {n} months")?,
            AdvanceRule::MonthSet(months) => {
                let names = months
                    .iter()
                    .filter_map(|&month| month_name(month))
                    .collect::<Vec<_>>();
                write!(f, "{} in {}", self.frequency, names.join(", "))?
            }
            AdvanceRule::FixedMonth(month) => {
                write!(f, "annual in {}", month_name(month).unwrap_or("?"))?
            }
            AdvanceRule::Years(_) => write!(f, "{} (yearly)", self.frequency)?,
        }
        if let Some(end) = self.end_date {
            write!(f, " until {end}")?;
        }
        Ok(())
    }
}
