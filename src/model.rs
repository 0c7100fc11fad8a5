//! Data models for Taskboard.
//!
//! Records are the calculator's only input. They are produced by the sheet
//! codec (or any other data-access layer) and never mutated by the
//! analytics code, which only derives counts from them.

use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize, Serializer};

use crate::dates::ist_date;

/// The kind of work a record represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// An assigned task with a deadline.
    Delegation,
    /// A recurring task with a planned date.
    Checklist,
    /// A ticket raised by one employee for another.
    HelpTicket,
    /// A ticket raised for the support (MIS) team.
    SupportTicket,
}

impl Category {
    /// Every category, in dashboard order.
    pub const ALL: [Category; 4] = [
        Category::Delegation,
        Category::Checklist,
        Category::HelpTicket,
        Category::SupportTicket,
    ];

    /// Get a human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Category::Delegation => "delegation",
            Category::Checklist => "checklist",
            Category::HelpTicket => "help ticket",
            Category::SupportTicket => "support ticket",
        }
    }

    /// Tickets are judged by elapsed working days and have a creator view.
    pub fn is_ticket(&self) -> bool {
        matches!(self, Category::HelpTicket | Category::SupportTicket)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single delegation, checklist item or ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    /// Row identifier (task or ticket id).
    pub id: String,

    pub category: Category,

    /// Owner of the work: the delegate, checklist owner or ticket assignee.
    pub subject: String,

    /// Ticket creator. `None` for delegations and checklist items.
    pub created_by: Option<String>,

    /// Free-form status cell ("Pending", "Done", "Shifted", ...).
    pub status: Option<String>,

    /// `None` when the creation cell was empty or failed to parse.
    pub created_at: Option<NaiveDate>,

    /// Deadline (delegation) or planned date (checklist). Timeliness is
    /// always judged against this original date.
    pub planned_at: Option<NaiveDate>,

    pub completed_at: Option<NaiveDate>,

    /// Revised deadlines (first and second revision) of a shifted
    /// delegation.
    pub revised_deadlines: [Option<NaiveDate>; 2],

    /// How many times the deadline was shifted.
    pub revision_count: u32,

    /// Completion approval of a delegation ("Approved").
    pub approval: Option<String>,
}

impl Record {
    /// Create an open record with only the identifying fields set.
    pub fn new(category: Category, id: &str, subject: &str) -> Self {
        Self {
            id: id.to_string(),
            category,
            subject: subject.to_string(),
            created_by: None,
            status: None,
            created_at: None,
            planned_at: None,
            completed_at: None,
            revised_deadlines: [None, None],
            revision_count: 0,
            approval: None,
        }
    }

    /// Set the creation date.
    pub fn created(mut self, date: NaiveDate) -> Self {
        self.created_at = Some(date);
        self
    }

    /// Set the deadline / planned date.
    pub fn planned(mut self, date: NaiveDate) -> Self {
        self.planned_at = Some(date);
        self
    }

    /// Set the completion date.
    pub fn completed(mut self, date: NaiveDate) -> Self {
        self.completed_at = Some(date);
        self
    }

    /// Set the ticket creator.
    pub fn created_by(mut self, name: &str) -> Self {
        self.created_by = Some(name.to_string());
        self
    }

    /// Apply a status change.
    ///
    /// "Done" and "Completed" stamp the completion date with the calendar
    /// date of `now` in India Standard Time; any other status clears it.
    /// A finished delegation is also marked approved.
    pub fn set_status(&mut self, status: &str, now: DateTime<Utc>) {
        let done = status.eq_ignore_ascii_case("done") || status.eq_ignore_ascii_case("completed");
        self.completed_at = done.then(|| ist_date(now));
        self.status = Some(status.to_string());
        if done && self.category == Category::Delegation {
            self.approval = Some("Approved".to_string());
        }
    }

    /// Record a revised deadline and mark the record as shifted.
    ///
    /// The original deadline in `planned_at` is kept. The revision goes to
    /// the first free revision slot; once both are taken the second one is
    /// overwritten.
    pub fn shift_deadline(&mut self, deadline: NaiveDate) {
        let slot = if self.revised_deadlines[0].is_none() { 0 } else { 1 };
        self.revised_deadlines[slot] = Some(deadline);
        self.revision_count += 1;
        self.status = Some("Shifted".to_string());
    }

    /// Whether this record belongs to `name` (trimmed, case-insensitive).
    pub fn is_owned_by(&self, name: &str) -> bool {
        same_name(&self.subject, name)
    }

    /// Whether this record was raised by `name` (trimmed, case-insensitive).
    pub fn is_created_by(&self, name: &str) -> bool {
        self.created_by
            .as_deref()
            .is_some_and(|creator| same_name(creator, name))
    }
}

/// Compare two employee names the way the sheets are matched: trimmed and
/// case-insensitive.
pub fn same_name(a: &str, b: &str) -> bool {
    a.trim().to_lowercase() == b.trim().to_lowercase()
}

/// An employee whose work is reported on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subject {
    pub name: String,
    pub department: Option<String>,
}

impl Subject {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            department: None,
        }
    }
}

/// A resolved reporting window.
///
/// Both ends are inclusive: `start` from 00:00:00.000 and `end` through
/// 23:59:59.999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl PeriodRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// First instant of the window.
    pub fn starts_at(&self) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN)
    }

    /// Last instant of the window, at millisecond precision.
    pub fn ends_at(&self) -> NaiveDateTime {
        (self.end + Duration::days(1)).and_time(NaiveTime::MIN) - Duration::milliseconds(1)
    }

    /// Whether `date` falls inside the window.
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Number of calendar days covered, counting both ends.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }
}

/// A percentage rounded to two decimals.
///
/// Serialized as a string with exactly two decimals ("0.00", "33.33") to
/// match what dashboard consumers already parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, PartialOrd)]
pub struct Percent(f64);

impl Percent {
    /// `part / total * 100`, or 0.00 when `total` is zero.
    pub fn of(part: u64, total: u64) -> Self {
        if total == 0 {
            return Percent(0.0);
        }
        Percent::from_value(part as f64 / total as f64 * 100.0)
    }

    /// Round an arbitrary value to two decimals.
    pub fn from_value(value: f64) -> Self {
        Percent((value * 100.0).round() / 100.0)
    }

    pub fn value(&self) -> f64 {
        self.0
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

impl Serialize for Percent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Counts for one subject, one category and one period.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClassificationResult {
    #[serde(rename = "totalWork")]
    pub total: u64,

    #[serde(rename = "completedWork")]
    pub completed: u64,

    #[serde(rename = "pendingWork")]
    pub pending: u64,

    #[serde(rename = "onTimeWork")]
    pub on_time: u64,

    #[serde(rename = "delayedWork")]
    pub delayed: u64,

    #[serde(rename = "pendingPercent")]
    pub pending_percent: Percent,

    #[serde(rename = "delayPercent")]
    pub delay_percent: Percent,
}

/// Combined score for one subject across all categories.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateScore {
    pub total_work: u64,
    pub total_completed: u64,
    pub total_pending: u64,
    pub total_on_time: u64,

    /// Pending share of all work.
    pub pending_percent: Percent,

    /// Unweighted mean of the per-category delay percents.
    pub delay_percent: Percent,

    /// Weighted blend of `pending_percent` and `delay_percent`.
    pub overall_score: Percent,
}

/// Ticket results seen from both sides.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TicketBreakdown {
    /// Tickets assigned to the subject. This view feeds the overall score.
    pub assigned: ClassificationResult,

    /// Tickets the subject raised for others.
    pub created: ClassificationResult,
}

/// Dashboard row for one subject.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDashboard {
    pub name: String,
    pub delegation: ClassificationResult,
    pub checklist: ClassificationResult,
    pub help_ticket: TicketBreakdown,
    pub support_ticket: TicketBreakdown,
    pub overall: AggregateScore,
}

/// Response for the all-employee dashboard.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub week_start: NaiveDate,
    pub week_end: NaiveDate,
    pub data: Vec<SubjectDashboard>,
}

impl DashboardResponse {
    /// The period the dashboard was computed for.
    pub fn period(&self) -> PeriodRange {
        PeriodRange::new(self.week_start, self.week_end)
    }
}

/// Caller-supplied dashboard parameters.
///
/// `month` and `week` are required; they stay optional here so that a
/// missing value can be reported as an invalid argument rather than a
/// deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardQuery {
    /// Month number, 1-12.
    pub month: Option<String>,

    /// Week of the month ("1", "2", ...) or "all".
    pub week: Option<String>,

    /// Restrict the dashboard to one employee ("all" means everyone).
    pub selected_name: Option<String>,

    /// Reference year; defaults to the current year.
    pub year: Option<i32>,
}
