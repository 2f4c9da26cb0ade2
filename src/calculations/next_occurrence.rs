use crate::calendar::{add_days, add_months_rolling, add_years_rolling, first_of_month, weekday_index};
use crate::error::{RecurrenceError, RecurrenceResult};
use crate::pattern::{AdvanceRule, RecurrencePattern};
use crate::task::Task;
use chrono::{Datelike, NaiveDate};

pub const DEFAULT_ITERATION_CAP: usize = 10_000;

impl AdvanceRule {
    /// One step of the recurrence. Every rule moves strictly forward.
    pub fn advance(&self, cursor: NaiveDate) -> Option<NaiveDate> {
        match self {
            AdvanceRule::Days(n) => add_days(cursor, i64::from(*n)),
            AdvanceRule::Weeks(n) => add_days(cursor, 7 * i64::from(*n)),
            AdvanceRule::Weekdays(mask) => next_listed_weekday(mask, cursor),
            AdvanceRule::Months(n) => add_months_rolling(cursor, *n),
            AdvanceRule::MonthSet(months) => next_listed_month(months, cursor),
            AdvanceRule::FixedMonth(month) => next_fixed_month(*month, cursor),
            AdvanceRule::Years(n) => add_years_rolling(cursor, *n),
        }
    }

    fn fixed_step_days(&self) -> Option<i64> {
        match self {
            AdvanceRule::Days(n) => Some(i64::from(*n)),
            AdvanceRule::Weeks(n) => Some(7 * i64::from(*n)),
            _ => None,
        }
    }
}

fn next_listed_weekday(mask: &[bool; 7], cursor: NaiveDate) -> Option<NaiveDate> {
    for offset in 1..=7 {
        let candidate = add_days(cursor, offset)?;
        if mask[weekday_index(candidate) as usize] {
            return Some(candidate);
        }
    }
    add_days(cursor, 7)
}

// Strictly after the cursor's month: a listed month equal to the current one
// is skipped until next year, whatever the day of month.
fn next_listed_month(months: &[u32], cursor: NaiveDate) -> Option<NaiveDate> {
    match months.iter().find(|&&month| month > cursor.month()) {
        Some(&month) => first_of_month(cursor.year(), month),
        None => first_of_month(cursor.year().checked_add(1)?, *months.first()?),
    }
}

fn next_fixed_month(month: u32, cursor: NaiveDate) -> Option<NaiveDate> {
    if month > cursor.month() {
        first_of_month(cursor.year(), month)
    } else {
        first_of_month(cursor.year().checked_add(1)?, month)
    }
}

/// Pure next-occurrence calculator. The only state it carries is the bound
/// on advance steps, so one instance can be shared freely.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calculator {
    iteration_cap: usize,
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            iteration_cap: DEFAULT_ITERATION_CAP,
        }
    }

    pub fn with_iteration_cap(iteration_cap: usize) -> Self {
        Self { iteration_cap }
    }

    pub fn iteration_cap(&self) -> usize {
        self.iteration_cap
    }

    /// Smallest occurrence strictly after `as_of`, walking from `anchor`.
    ///
    /// The anchor itself counts as the first occurrence, so an anchor later
    /// than `as_of` is returned unchanged. This holds for month-anchored
    /// rules too: `annual in June` anchored on Jan 15 yields Jan 15, and only
    /// later occurrences snap to the 1st of a listed month. `Ok(None)` means
    /// the recurrence has finished: the next occurrence lies past `end_date`.
    pub fn next_occurrence(
        &self,
        pattern: &RecurrencePattern,
        anchor: NaiveDate,
        as_of: NaiveDate,
    ) -> RecurrenceResult<Option<NaiveDate>> {
        let rule = pattern.rule()?;
        let next = self.first_after(&rule, anchor, as_of)?;
        Ok(within_end(pattern, next))
    }

    /// Lenient form for views: any failure is logged and reported as "no next
    /// occurrence".
    pub fn next_occurrence_or_none(
        &self,
        pattern: &RecurrencePattern,
        anchor: NaiveDate,
        as_of: NaiveDate,
    ) -> Option<NaiveDate> {
        match self.next_occurrence(pattern, anchor, as_of) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(
                    error = %err,
                    frequency = %pattern.frequency,
                    %anchor,
                    "treating recurrence as having no next occurrence"
                );
                None
            }
        }
    }

    /// Next occurrence of a recurring task; `None` for one-off tasks and for
    /// patterns that fail to evaluate.
    pub fn next_for_task(&self, task: &Task, as_of: NaiveDate) -> Option<NaiveDate> {
        let pattern = task.recurring.as_ref()?;
        match self.next_occurrence(pattern, task.due_date, as_of) {
            Ok(next) => next,
            Err(err) => {
                tracing::warn!(
                    task_id = %task.id,
                    error = %err,
                    "task recurrence skipped"
                );
                None
            }
        }
    }

    /// Successive occurrences after `as_of`. Each item is what
    /// `next_occurrence` returns when queried with the previous item as
    /// `as_of`. Ends at the end date or on the first failure.
    pub fn occurrences<'a>(
        &self,
        pattern: &'a RecurrencePattern,
        anchor: NaiveDate,
        as_of: NaiveDate,
    ) -> Occurrences<'a> {
        let state = match pattern.rule() {
            Ok(rule) => OccurrenceState::Pending { rule, anchor, as_of },
            Err(err) => {
                tracing::warn!(error = %err, "recurrence preview stopped");
                OccurrenceState::Done
            }
        };
        Occurrences {
            calculator: *self,
            pattern,
            state,
        }
    }

    fn first_after(
        &self,
        rule: &AdvanceRule,
        anchor: NaiveDate,
        as_of: NaiveDate,
    ) -> RecurrenceResult<NaiveDate> {
        let mut cursor = fast_forward(rule, anchor, as_of)?;
        let mut steps = 0usize;
        while cursor <= as_of {
            if steps >= self.iteration_cap {
                tracing::warn!(cap = self.iteration_cap, %anchor, %as_of, "iteration cap reached");
                return Err(RecurrenceError::IterationCapExceeded {
                    cap: self.iteration_cap,
                });
            }
            cursor = rule.advance(cursor).ok_or(RecurrenceError::OutOfRange)?;
            steps += 1;
        }
        Ok(cursor)
    }
}

// Fixed-length steps jump straight to the first step past `as_of`; the date
// reached is the one repeated stepping would produce.
fn fast_forward(
    rule: &AdvanceRule,
    anchor: NaiveDate,
    as_of: NaiveDate,
) -> RecurrenceResult<NaiveDate> {
    let Some(step) = rule.fixed_step_days() else {
        return Ok(anchor);
    };
    if anchor > as_of {
        return Ok(anchor);
    }
    let elapsed = (as_of - anchor).num_days();
    let steps = elapsed / step + 1;
    steps
        .checked_mul(step)
        .and_then(|days| add_days(anchor, days))
        .ok_or(RecurrenceError::OutOfRange)
}

fn within_end(pattern: &RecurrencePattern, next: NaiveDate) -> Option<NaiveDate> {
    match pattern.end_date {
        Some(end) if next > end => None,
        _ => Some(next),
    }
}

/// Default-calculator shorthand for [`Calculator::next_occurrence`].
pub fn next_occurrence(
    pattern: &RecurrencePattern,
    anchor: NaiveDate,
    as_of: NaiveDate,
) -> RecurrenceResult<Option<NaiveDate>> {
    Calculator::new().next_occurrence(pattern, anchor, as_of)
}

enum OccurrenceState {
    Pending {
        rule: AdvanceRule,
        anchor: NaiveDate,
        as_of: NaiveDate,
    },
    Stepping {
        rule: AdvanceRule,
        cursor: NaiveDate,
    },
    Done,
}

pub struct Occurrences<'a> {
    calculator: Calculator,
    pattern: &'a RecurrencePattern,
    state: OccurrenceState,
}

impl Iterator for Occurrences<'_> {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let (rule, candidate) = match std::mem::replace(&mut self.state, OccurrenceState::Done) {
            OccurrenceState::Pending {
                rule,
                anchor,
                as_of,
            } => {
                let candidate = self.calculator.first_after(&rule, anchor, as_of);
                (rule, candidate)
            }
            OccurrenceState::Stepping { rule, cursor } => {
                let candidate = rule.advance(cursor).ok_or(RecurrenceError::OutOfRange);
                (rule, candidate)
            }
            OccurrenceState::Done => return None,
        };

        match candidate {
            Ok(date) => {
                let next = within_end(self.pattern, date)?;
                self.state = OccurrenceState::Stepping { rule, cursor: next };
                Some(next)
            }
            Err(err) => {
                tracing::warn!(error = %err, "recurrence preview stopped");
                None
            }
        }
    }
}
