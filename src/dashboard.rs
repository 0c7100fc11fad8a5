//! Per-employee performance dashboard.
//!
//! For each employee the dashboard classifies delegations, checklist items
//! and both ticket categories for one period, then folds the four results
//! into an overall score.
//!
//! # Usage
//!
//! ```ignore
//! let config = DashboardConfig::from_env();
//! let dashboard = build_dashboard(&repo, &query, &config).await?;
//! ```

use std::env;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::aggregation::{ScoreWeights, aggregate};
use crate::classify::{
    CategoryRule, DEFAULT_TICKET_MAX_WORKING_DAYS, DelayDenominator, InclusionRule, classify,
};
use crate::error::Result;
use crate::model::{
    Category, ClassificationResult, DashboardQuery, DashboardResponse, PeriodRange, Record,
    Subject, SubjectDashboard, TicketBreakdown, same_name,
};
use crate::period::{PeriodSelector, WeekAnchor};
use crate::repository::RecordRepository;

/// Dashboard configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// Weights of the overall score.
    pub weights: ScoreWeights,

    /// Working days a ticket may take before it counts as delayed.
    pub ticket_max_working_days: i64,

    /// Denominator of every category's delay percentage.
    pub delay_denominator: DelayDenominator,

    /// Which Monday starts week 1 of a month.
    pub week_anchor: WeekAnchor,

    /// Inclusion rule for checklist items.
    pub checklist_inclusion: InclusionRule,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            ticket_max_working_days: DEFAULT_TICKET_MAX_WORKING_DAYS,
            delay_denominator: DelayDenominator::default(),
            week_anchor: WeekAnchor::default(),
            checklist_inclusion: InclusionRule::default(),
        }
    }
}

impl DashboardConfig {
    /// Load configuration from `TASKBOARD_*` environment variables.
    ///
    /// Unset variables keep their defaults; unparsable ones are logged and
    /// ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Self {
            weights: ScoreWeights {
                pending: setting(&lookup, "TASKBOARD_PENDING_WEIGHT", defaults.weights.pending),
                delay: setting(&lookup, "TASKBOARD_DELAY_WEIGHT", defaults.weights.delay),
            },
            ticket_max_working_days: setting(
                &lookup,
                "TASKBOARD_TICKET_MAX_WORKING_DAYS",
                defaults.ticket_max_working_days,
            ),
            delay_denominator: setting(
                &lookup,
                "TASKBOARD_DELAY_DENOMINATOR",
                defaults.delay_denominator,
            ),
            week_anchor: setting(&lookup, "TASKBOARD_WEEK_ANCHOR", defaults.week_anchor),
            checklist_inclusion: setting(
                &lookup,
                "TASKBOARD_CHECKLIST_INCLUSION",
                defaults.checklist_inclusion,
            ),
        }
    }

    /// Classification rule for `category` under this configuration.
    pub fn rule_for(&self, category: Category) -> CategoryRule {
        let rule = match category {
            ticket if ticket.is_ticket() => CategoryRule::working_days(self.ticket_max_working_days),
            Category::Checklist => CategoryRule::deadline().with_inclusion(self.checklist_inclusion),
            _ => CategoryRule::deadline(),
        };
        rule.with_delay_denominator(self.delay_denominator)
    }
}

fn setting<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "Ignoring unparsable setting");
            default
        }
    }
}

/// Pick the subjects a dashboard covers.
///
/// No selection, an empty one or "all" keeps everyone; otherwise only the
/// subject whose name matches (trimmed, case-insensitive) is kept.
pub fn resolve_subjects<'a>(subjects: &'a [Subject], selected_name: Option<&str>) -> Vec<&'a Subject> {
    let selected = selected_name
        .map(str::trim)
        .filter(|name| !name.is_empty() && !name.eq_ignore_ascii_case("all"));

    subjects
        .iter()
        .filter(|subject| !subject.name.trim().is_empty())
        .filter(|subject| selected.is_none_or(|name| same_name(&subject.name, name)))
        .collect()
}

/// Compute the dashboard for already-fetched records.
///
/// `records` may mix categories and owners; each subject's share is picked
/// out here. Pure and synchronous.
pub fn compute_dashboard(
    records: &[Record],
    subjects: &[&Subject],
    period: PeriodRange,
    config: &DashboardConfig,
) -> DashboardResponse {
    let data = subjects
        .iter()
        .map(|subject| subject_dashboard(records, &subject.name, &period, config))
        .collect();

    DashboardResponse {
        week_start: period.start,
        week_end: period.end,
        data,
    }
}

fn subject_dashboard(
    records: &[Record],
    name: &str,
    period: &PeriodRange,
    config: &DashboardConfig,
) -> SubjectDashboard {
    let assigned = |category: Category| -> ClassificationResult {
        let owned = records
            .iter()
            .filter(|r| r.category == category && r.is_owned_by(name));
        classify(owned, period, &config.rule_for(category))
    };
    let raised = |category: Category| -> ClassificationResult {
        let created = records
            .iter()
            .filter(|r| r.category == category && r.is_created_by(name));
        classify(created, period, &config.rule_for(category))
    };

    let delegation = assigned(Category::Delegation);
    let checklist = assigned(Category::Checklist);
    let help_ticket = TicketBreakdown {
        assigned: assigned(Category::HelpTicket),
        created: raised(Category::HelpTicket),
    };
    let support_ticket = TicketBreakdown {
        assigned: assigned(Category::SupportTicket),
        created: raised(Category::SupportTicket),
    };

    let overall = aggregate(
        &[
            &delegation,
            &checklist,
            &help_ticket.assigned,
            &support_ticket.assigned,
        ],
        config.weights,
    );

    SubjectDashboard {
        name: name.trim().to_string(),
        delegation,
        checklist,
        help_ticket,
        support_ticket,
        overall,
    }
}

/// Build the dashboard for a caller query.
///
/// Fails with an invalid-argument error when month or week is missing,
/// before anything is fetched. Repository failures are passed through.
#[instrument(skip(repo, config))]
pub async fn build_dashboard<R: RecordRepository>(
    repo: &R,
    query: &DashboardQuery,
    config: &DashboardConfig,
) -> Result<DashboardResponse> {
    let selector =
        PeriodSelector::from_parts(query.month.as_deref(), query.week.as_deref(), query.year)?;
    let period = selector.resolve(config.week_anchor)?;

    let all_subjects = repo.list_subjects().await?;
    let subjects = resolve_subjects(&all_subjects, query.selected_name.as_deref());

    let mut records = Vec::new();
    for category in Category::ALL {
        records.extend(repo.fetch_records(category, None).await?);
    }

    let response = compute_dashboard(&records, &subjects, period, config);

    info!(
        start = %period.start,
        end = %period.end,
        subjects = response.data.len(),
        records = records.len(),
        "Dashboard computed"
    );

    Ok(response)
}
