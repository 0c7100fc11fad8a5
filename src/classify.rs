//! Record classification for a single subject, category and period.
//!
//! Every record that is relevant to the period is counted once, either as
//! completed (finished inside the window) or pending. Completed records are
//! then split into on-time and delayed.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::elapsed_working_days;
use crate::error::{Error, Result};
use crate::model::{ClassificationResult, PeriodRange, Percent, Record};

/// Working days a ticket may take before it counts as delayed.
pub const DEFAULT_TICKET_MAX_WORKING_DAYS: i64 = 3;

/// Which records are relevant to a period.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InclusionRule {
    /// Created on or before the period end and not completed before the
    /// period start. Completed only when finished inside the period.
    #[default]
    Alive,

    /// Planned or completed inside the period. Completed whenever a
    /// completion date exists.
    Scheduled,
}

impl FromStr for InclusionRule {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "alive" => Ok(InclusionRule::Alive),
            "scheduled" => Ok(InclusionRule::Scheduled),
            other => Err(Error::InvalidArgument(format!("unknown inclusion rule: {other}"))),
        }
    }
}

/// How a completed record is judged on time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Timeliness {
    /// Completed on or before the planned date. No planned date is delayed.
    Deadline,

    /// Completed within `max_days` working days after creation.
    WorkingDays { max_days: i64 },
}

/// Denominator of the delay percentage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DelayDenominator {
    /// Delayed share of completed work.
    #[default]
    Completed,

    /// Delayed share of all counted work.
    Total,
}

impl FromStr for DelayDenominator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "completed" => Ok(DelayDenominator::Completed),
            "total" => Ok(DelayDenominator::Total),
            other => Err(Error::InvalidArgument(format!("unknown delay denominator: {other}"))),
        }
    }
}

/// Full classification rule for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub inclusion: InclusionRule,
    pub timeliness: Timeliness,
    pub delay_denominator: DelayDenominator,
}

impl CategoryRule {
    /// Deadline-judged rule used for delegations and checklist items.
    pub fn deadline() -> Self {
        Self {
            inclusion: InclusionRule::Alive,
            timeliness: Timeliness::Deadline,
            delay_denominator: DelayDenominator::Completed,
        }
    }

    /// Working-day rule used for help and support tickets.
    pub fn working_days(max_days: i64) -> Self {
        Self {
            inclusion: InclusionRule::Alive,
            timeliness: Timeliness::WorkingDays { max_days },
            delay_denominator: DelayDenominator::Completed,
        }
    }

    pub fn with_inclusion(mut self, inclusion: InclusionRule) -> Self {
        self.inclusion = inclusion;
        self
    }

    pub fn with_delay_denominator(mut self, denominator: DelayDenominator) -> Self {
        self.delay_denominator = denominator;
        self
    }
}

/// Where a counted record ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Pending,
    OnTime,
    Delayed,
}

/// Classify `records` against `period`.
///
/// Callers pass records already restricted to one subject and category.
/// Records that are not relevant to the period, including those whose
/// creation date could not be parsed, are left out of every count.
pub fn classify<'a, I>(records: I, period: &PeriodRange, rule: &CategoryRule) -> ClassificationResult
where
    I: IntoIterator<Item = &'a Record>,
{
    let mut result = ClassificationResult::default();

    for record in records {
        let Some(outcome) = classify_one(record, period, rule) else {
            continue;
        };

        result.total += 1;
        match outcome {
            Outcome::Pending => result.pending += 1,
            Outcome::OnTime => {
                result.completed += 1;
                result.on_time += 1;
            }
            Outcome::Delayed => {
                result.completed += 1;
                result.delayed += 1;
            }
        }
    }

    let delay_base = match rule.delay_denominator {
        DelayDenominator::Completed => result.completed,
        DelayDenominator::Total => result.total,
    };
    result.pending_percent = Percent::of(result.pending, result.total);
    result.delay_percent = Percent::of(result.delayed, delay_base);

    result
}

fn classify_one(record: &Record, period: &PeriodRange, rule: &CategoryRule) -> Option<Outcome> {
    match rule.inclusion {
        InclusionRule::Alive => {
            let Some(created) = record.created_at else {
                debug!(id = %record.id, category = %record.category, "Skipping record without a creation date");
                return None;
            };

            let alive = created <= period.end && record.completed_at.is_none_or(|done| done >= period.start);
            if !alive {
                return None;
            }

            match record.completed_at {
                Some(done) if period.contains(done) => Some(judge(record, done, rule.timeliness)),
                _ => Some(Outcome::Pending),
            }
        }
        InclusionRule::Scheduled => {
            let in_period = |date: Option<NaiveDate>| date.is_some_and(|d| period.contains(d));
            if !in_period(record.planned_at) && !in_period(record.completed_at) {
                return None;
            }

            match record.completed_at {
                Some(done) => Some(judge(record, done, rule.timeliness)),
                None => Some(Outcome::Pending),
            }
        }
    }
}

fn judge(record: &Record, done: NaiveDate, timeliness: Timeliness) -> Outcome {
    let on_time = match timeliness {
        Timeliness::Deadline => record.planned_at.is_some_and(|deadline| done <= deadline),
        Timeliness::WorkingDays { max_days } => record
            .created_at
            .is_some_and(|created| elapsed_working_days(created, done) <= max_days),
    };

    if on_time { Outcome::OnTime } else { Outcome::Delayed }
}
