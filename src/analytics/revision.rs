use chrono::{Duration, Utc};
use serde::Serialize;

/// A topic flagged as weak, with the shape a real analyzer over Task/Test
/// history must eventually produce.
#[derive(Debug, Clone, Serialize)]
pub struct WeakTopic {
    pub topic: String,
    pub subject: String,
    pub accuracy: i32,
    pub attempts: i32,
    pub trend: &'static str,
    pub last_studied: &'static str,
    pub recommended_actions: Vec<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevisionRecommendation {
    pub topic: String,
    pub priority: &'static str,
    pub study_time: &'static str,
    pub resources: Vec<&'static str>,
    pub deadline: String,
}

/// Placeholder data standing in for a real analysis of test results.
/// The interface contract (shape and field meanings) is the part that
/// matters; the records are representative fixtures.
pub fn weak_topics() -> Vec<WeakTopic> {
    vec![
        WeakTopic {
            topic: "Digital Electronics".to_string(),
            subject: "Electronics".to_string(),
            accuracy: 45,
            attempts: 12,
            trend: "declining",
            last_studied: "2024-01-15",
            recommended_actions: vec![
                "Review fundamentals",
                "Practice more problems",
                "Watch video tutorials",
            ],
        },
        WeakTopic {
            topic: "Control Systems".to_string(),
            subject: "Control Engineering".to_string(),
            accuracy: 38,
            attempts: 8,
            trend: "stable",
            last_studied: "2024-01-10",
            recommended_actions: vec![
                "Focus on theory",
                "Solve previous year questions",
                "Join study group",
            ],
        },
        WeakTopic {
            topic: "Signals and Systems".to_string(),
            subject: "Communication".to_string(),
            accuracy: 52,
            attempts: 15,
            trend: "improving",
            last_studied: "2024-01-20",
            recommended_actions: vec![
                "Continue current study plan",
                "Take practice tests",
                "Review weak areas",
            ],
        },
    ]
}

/// Derive a revision plan from the weak-topic list: the lower the accuracy,
/// the higher the priority, the more daily study time, and the tighter the
/// deadline.
pub fn revision_recommendations() -> Vec<RevisionRecommendation> {
    weak_topics()
        .into_iter()
        .map(|topic| {
            let priority = if topic.accuracy < 40 {
                "high"
            } else if topic.accuracy < 60 {
                "medium"
            } else {
                "low"
            };
            let study_time = if topic.accuracy < 40 {
                "2-3 hours daily"
            } else {
                "1-2 hours daily"
            };
            let days = if topic.accuracy < 40 { 3 } else { 7 };
            let deadline = (Utc::now() + Duration::days(days)).format("%Y-%m-%d").to_string();

            RevisionRecommendation {
                topic: topic.topic,
                priority,
                study_time,
                resources: vec![
                    "Textbook chapters",
                    "Video lectures",
                    "Practice problems",
                    "Previous year questions",
                ],
                deadline,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recommendations_cover_every_weak_topic() {
        let topics = weak_topics();
        let recs = revision_recommendations();
        assert_eq!(topics.len(), recs.len());
        for (topic, rec) in topics.iter().zip(&recs) {
            assert_eq!(topic.topic, rec.topic);
        }
    }

    #[test]
    fn priority_tracks_accuracy_thresholds() {
        let recs = revision_recommendations();
        // Fixtures: 45 -> medium, 38 -> high, 52 -> medium
        assert_eq!(recs[0].priority, "medium");
        assert_eq!(recs[1].priority, "high");
        assert_eq!(recs[2].priority, "medium");
        assert_eq!(recs[1].study_time, "2-3 hours daily");
    }

    #[test]
    fn deadlines_are_iso_dates() {
        for rec in revision_recommendations() {
            assert_eq!(rec.deadline.len(), 10);
            assert!(rec.deadline.chars().filter(|c| *c == '-').count() == 2);
        }
    }
}
