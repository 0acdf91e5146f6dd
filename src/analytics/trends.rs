use chrono::NaiveDate;
use serde::Serialize;

use crate::database::models::test::{Test, TestStatus};

#[derive(Debug, Clone, Serialize)]
pub struct TrendPoint {
    pub date: NaiveDate,
    pub score: f64,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerformanceTrends {
    pub score_trend: Vec<TrendPoint>,
    pub average_score: f64,
    pub average_accuracy: f64,
    pub total_tests: usize,
    pub improvement: f64,
}

/// Trend series over a user's attempted tests, in creation order. A test
/// logged without a score or accuracy contributes 0 for that value.
/// Improvement is last score minus first score, 0 with fewer than two
/// attempts.
pub fn performance_trends(tests: &[Test]) -> PerformanceTrends {
    let mut attempted: Vec<&Test> = tests
        .iter()
        .filter(|t| t.status == TestStatus::Attempted)
        .collect();
    attempted.sort_by_key(|t| t.created_at);

    let score_trend: Vec<TrendPoint> = attempted
        .iter()
        .map(|t| TrendPoint {
            date: t.created_at.date_naive(),
            score: t.score.unwrap_or(0.0),
            accuracy: t.accuracy.unwrap_or(0.0),
        })
        .collect();

    let total = attempted.len();
    let average_score = if total > 0 {
        attempted.iter().map(|t| t.score.unwrap_or(0.0)).sum::<f64>() / total as f64
    } else {
        0.0
    };
    let average_accuracy = if total > 0 {
        attempted.iter().map(|t| t.accuracy.unwrap_or(0.0)).sum::<f64>() / total as f64
    } else {
        0.0
    };

    let improvement = match (attempted.first(), attempted.last()) {
        (Some(first), Some(last)) if total >= 2 => {
            last.score.unwrap_or(0.0) - first.score.unwrap_or(0.0)
        }
        _ => 0.0,
    };

    PerformanceTrends {
        score_trend,
        average_score,
        average_accuracy,
        total_tests: total,
        improvement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::test::TestType;
    use chrono::{Duration, Utc};
    use uuid::Uuid;

    fn attempt(score: f64, accuracy: f64, minutes_ago: i64) -> Test {
        Test {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Mock 1".to_string(),
            test_type: TestType::FullLength,
            status: TestStatus::Attempted,
            score: Some(score),
            accuracy: Some(accuracy),
            created_at: Utc::now() - Duration::minutes(minutes_ago),
            updated_at: Utc::now(),
        }
    }

    fn unattempted() -> Test {
        Test {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            name: "Mock 2".to_string(),
            test_type: TestType::SubjectTest,
            status: TestStatus::NotAttempted,
            score: None,
            accuracy: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn empty_input_yields_zeroed_trends() {
        let trends = performance_trends(&[]);
        assert!(trends.score_trend.is_empty());
        assert_eq!(trends.average_score, 0.0);
        assert_eq!(trends.average_accuracy, 0.0);
        assert_eq!(trends.total_tests, 0);
        assert_eq!(trends.improvement, 0.0);
    }

    #[test]
    fn single_attempt_has_zero_improvement() {
        let trends = performance_trends(&[attempt(65.0, 80.0, 0)]);
        assert_eq!(trends.total_tests, 1);
        assert_eq!(trends.improvement, 0.0);
        assert_eq!(trends.average_score, 65.0);
    }

    #[test]
    fn improvement_is_last_minus_first_in_creation_order() {
        // Passed out of order on purpose; creation time decides.
        let tests = vec![
            attempt(72.0, 81.0, 20),
            attempt(78.0, 85.0, 10),
            attempt(65.0, 70.0, 30),
        ];
        let trends = performance_trends(&tests);
        assert_eq!(trends.total_tests, 3);
        assert_eq!(trends.improvement, 13.0);
        assert_eq!(trends.score_trend[0].score, 65.0);
        assert_eq!(trends.score_trend[2].score, 78.0);
    }

    #[test]
    fn unattempted_tests_are_excluded() {
        let tests = vec![attempt(60.0, 75.0, 10), unattempted()];
        let trends = performance_trends(&tests);
        assert_eq!(trends.total_tests, 1);
        assert_eq!(trends.average_score, 60.0);
    }

    #[test]
    fn missing_scores_count_as_zero() {
        let mut t = attempt(0.0, 0.0, 10);
        t.score = None;
        t.accuracy = None;
        let trends = performance_trends(&[t]);
        assert_eq!(trends.average_score, 0.0);
        assert_eq!(trends.score_trend[0].score, 0.0);
    }
}
