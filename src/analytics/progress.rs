use crate::database::models::task::{Task, TaskStatus};

/// Completed-task share as a percentage. A user with no tasks has made no
/// progress, not undefined progress. Unweighted: subject weightage does not
/// factor in.
pub fn overall_progress(tasks: &[Task]) -> f64 {
    if tasks.is_empty() {
        return 0.0;
    }
    let completed = tasks.iter().filter(|t| t.status == TaskStatus::Completed).count();
    completed as f64 / tasks.len() as f64 * 100.0
}
