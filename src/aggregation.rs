//! Aggregation of per-category results into one score per subject.
//!
//! The overall score is a ranking heuristic: a weighted blend of how much
//! work is still pending and how much of the finished work was late. Lower
//! is better.

use serde::{Deserialize, Serialize};

use crate::model::{AggregateScore, ClassificationResult, Percent};

/// Default weight of the pending percentage in the overall score.
pub const DEFAULT_PENDING_WEIGHT: f64 = 0.8;

/// Default weight of the delay percentage in the overall score.
pub const DEFAULT_DELAY_WEIGHT: f64 = 0.2;

/// Weights of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreWeights {
    pub pending: f64,
    pub delay: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            pending: DEFAULT_PENDING_WEIGHT,
            delay: DEFAULT_DELAY_WEIGHT,
        }
    }
}

/// Combine one subject's category results.
///
/// Counts are summed and the pending percentage is taken over the sums.
/// The delay percentage is the plain mean of the category delay
/// percentages, so a category with little work weighs as much as a busy
/// one.
pub fn aggregate(results: &[&ClassificationResult], weights: ScoreWeights) -> AggregateScore {
    let total_work: u64 = results.iter().map(|r| r.total).sum();
    let total_completed: u64 = results.iter().map(|r| r.completed).sum();
    let total_pending: u64 = results.iter().map(|r| r.pending).sum();
    let total_on_time: u64 = results.iter().map(|r| r.on_time).sum();

    let pending_percent = Percent::of(total_pending, total_work);
    let mean_delay = if results.is_empty() {
        0.0
    } else {
        results.iter().map(|r| r.delay_percent.value()).sum::<f64>() / results.len() as f64
    };

    let overall = weights.pending * pending_percent.value() + weights.delay * mean_delay;

    AggregateScore {
        total_work,
        total_completed,
        total_pending,
        total_on_time,
        pending_percent,
        delay_percent: Percent::from_value(mean_delay),
        overall_score: Percent::from_value(overall),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(total: u64, pending: u64, delayed: u64) -> ClassificationResult {
        let completed = total - pending;
        ClassificationResult {
            total,
            completed,
            pending,
            on_time: completed - delayed,
            delayed,
            pending_percent: Percent::of(pending, total),
            delay_percent: Percent::of(delayed, completed),
        }
    }

    #[test]
    fn test_sums_counts() {
        let a = result(10, 1, 3);
        let b = result(10, 2, 0);
        let score = aggregate(&[&a, &b], ScoreWeights::default());

        assert_eq!(score.total_work, 20);
        assert_eq!(score.total_pending, 3);
        assert_eq!(score.total_completed, 17);
        assert_eq!(score.total_on_time, 14);
        assert_eq!(score.pending_percent.to_string(), "15.00");
    }

    fn with_delay(result: ClassificationResult, delay: f64) -> ClassificationResult {
        ClassificationResult {
            delay_percent: Percent::from_value(delay),
            ..result
        }
    }

    #[test]
    fn test_delay_is_unweighted_mean_and_score_is_blend() {
        // Pending 10%, 20%, 30%, 40% with the same 25% delay everywhere.
        let delegation = with_delay(result(10, 1, 0), 25.0);
        let checklist = with_delay(result(10, 2, 0), 25.0);
        let help = with_delay(result(10, 3, 0), 25.0);
        let support = with_delay(result(10, 4, 0), 25.0);

        let score = aggregate(&[&delegation, &checklist, &help, &support], ScoreWeights::default());

        assert_eq!(score.total_pending, 10);
        assert_eq!(score.pending_percent.to_string(), "25.00");
        assert_eq!(score.delay_percent.to_string(), "25.00");
        // 0.8 * 25 + 0.2 * 25
        assert_eq!(score.overall_score.to_string(), "25.00");
    }

    #[test]
    fn test_mean_of_differing_delays() {
        let a = with_delay(result(4, 0, 0), 10.0);
        let b = with_delay(result(4, 1, 1), 33.33);
        let c = ClassificationResult::default();
        let d = ClassificationResult::default();

        let score = aggregate(&[&a, &b, &c, &d], ScoreWeights::default());

        // (10 + 33.33 + 0 + 0) / 4 = 10.8325
        assert_eq!(score.delay_percent.to_string(), "10.83");
        // pending 1/8 = 12.5; 0.8 * 12.5 + 0.2 * 10.8325 = 12.1665
        assert_eq!(score.pending_percent.to_string(), "12.50");
        assert_eq!(score.overall_score.to_string(), "12.17");
    }

    #[test]
    fn test_custom_weights() {
        let a = result(4, 2, 1);
        let weights = ScoreWeights {
            pending: 0.5,
            delay: 0.5,
        };

        let score = aggregate(&[&a], weights);

        // pending 50%, delay 1/2 = 50%
        assert_eq!(score.overall_score.to_string(), "50.00");
    }

    #[test]
    fn test_no_results() {
        let score = aggregate(&[], ScoreWeights::default());
        assert_eq!(score, AggregateScore::default());
        assert_eq!(score.overall_score.to_string(), "0.00");
    }
}
