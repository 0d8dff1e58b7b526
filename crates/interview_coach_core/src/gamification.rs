//! crates/interview_coach_core/src/gamification.rs
//!
//! Streak counting, score runs, and badge eligibility derived from a user's
//! interview history.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{InterviewRecord, StreakState, User};

/// Elapsed time at or above which a new interview extends the streak.
pub const STREAK_INCREMENT_HOURS: i64 = 24;
/// Elapsed time above which the streak is considered broken.
pub const STREAK_BREAK_HOURS: i64 = 24;

/// `(min_score, run_length)` pairs for the run badges.
pub const SCORE_RUNS: [(u8, usize); 4] = [(5, 5), (6, 10), (7, 20), (8, 50)];

impl StreakState {
    /// Applies one completed interview at `now`.
    ///
    /// Both thresholds are one day, so the increment branch only fires when
    /// exactly one day has elapsed.
    pub fn advance(self, now: DateTime<Utc>) -> StreakState {
        let streak_count = match self.last_interview_time {
            None => 1,
            Some(last) => {
                let delta = now - last;
                if delta > Duration::hours(STREAK_BREAK_HOURS) {
                    1
                } else if delta >= Duration::hours(STREAK_INCREMENT_HOURS) {
                    self.streak_count + 1
                } else {
                    self.streak_count
                }
            }
        };

        StreakState {
            streak_count,
            longest_streak: self.longest_streak.max(streak_count),
            last_interview_time: Some(now),
        }
    }
}

/// Length of the longest contiguous run of scores that are all `>= min_score`.
pub fn longest_run(scores: &[u8], min_score: u8) -> usize {
    let mut longest = 0;
    let mut current = 0;
    for &score in scores {
        if score >= min_score {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

pub fn has_run(scores: &[u8], min_score: u8, run_length: usize) -> bool {
    longest_run(scores, min_score) >= run_length
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub name: String,
    pub icon: &'static str,
    pub earned: bool,
}

/// Aggregate figures shown on the career dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CareerSummary {
    pub total_interviews: usize,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub highest_score: u8,
    pub badges: Vec<Badge>,
}

/// Builds the dashboard summary. `history` must be ordered oldest first.
pub fn summarize(user: &User, history: &[InterviewRecord]) -> CareerSummary {
    let scores: Vec<u8> = history.iter().map(|record| record.score).collect();
    let total_interviews = history.len();
    let current_streak = user.streak_count;
    let highest_score = scores.iter().copied().max().unwrap_or(0);

    let mut badges = Vec::with_capacity(16);
    for (threshold, name, icon) in [
        (1, "First Interview", "🥇"),
        (5, "5 Interviews", "🥈"),
        (20, "20 Interviews", "🥉"),
        (100, "100 Interviews", "🏆"),
    ] {
        badges.push(badge(name, icon, total_interviews >= threshold));
    }
    for (threshold, icon) in [(1, "🔥"), (5, "🔥🔥"), (20, "🔥🔥🔥"), (100, "🔥🔥🔥🔥")] {
        let name = format!("{threshold}-Day Streak");
        badges.push(badge(&name, icon, current_streak >= threshold));
    }
    for (threshold, name, icon) in [
        (5, "First 5+ Score", "⭐"),
        (7, "First 7+ Score", "🌟"),
        (9, "First 9+ Score", "✨"),
        (10, "Perfect Score", "💯"),
    ] {
        badges.push(badge(name, icon, highest_score >= threshold));
    }
    for ((min_score, run_length), icon) in SCORE_RUNS.into_iter().zip(["🏁", "🏅", "🎖️", "🏆"]) {
        let name = format!("Run of {run_length}×≥{min_score}");
        badges.push(badge(&name, icon, has_run(&scores, min_score, run_length)));
    }

    CareerSummary {
        total_interviews,
        current_streak,
        longest_streak: user.longest_streak,
        highest_score,
        badges,
    }
}

fn badge(name: &str, icon: &'static str, earned: bool) -> Badge {
    Badge {
        name: name.to_string(),
        icon,
        earned,
    }
}
