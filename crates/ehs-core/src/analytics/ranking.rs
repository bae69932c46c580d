use super::score::rounded_mean;
use super::views::{ProjectSafetyScore, SafetyLeaderboard};

/// Orders rows by score (highest first) and numbers them.
///
/// Missing scores sort as zero but keep `rank: None`. Equal scores get
/// consecutive ranks in their incoming order.
pub fn rank(mut scores: Vec<ProjectSafetyScore>) -> SafetyLeaderboard {
    scores.sort_by(|a, b| b.score.unwrap_or(0).cmp(&a.score.unwrap_or(0)));

    for (index, entry) in scores.iter_mut().enumerate() {
        entry.rank = entry.score.map(|_| index + 1);
    }

    SafetyLeaderboard {
        overall_average: overall_average(&scores),
        projects: scores,
    }
}

/// Rounded mean of the scored rows; 0 when nothing has a score.
pub fn overall_average(scores: &[ProjectSafetyScore]) -> u8 {
    rounded_mean(
        scores
            .iter()
            .filter_map(|entry| entry.score)
            .map(i64::from),
    )
    .map(|average| average.clamp(0, 100) as u8)
    .unwrap_or(0)
}
