//! crates/interview_coach_core/src/scoring.rs
//!
//! Parses the scoring model's free-text reply into a numeric score and breakdown.
//!
//! The reply is expected to contain a line `Score: N`. Anything else (a missing
//! line, a non-integer, a value outside 1-10) yields a score of 0 with
//! `parsed == false`; parsing never fails.

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// The outcome of parsing a scoring reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreReport {
    /// 1-10 when parsed, otherwise 0.
    pub score: u8,
    pub parsed: bool,
    /// Every line of the reply except the score line, in original order.
    pub breakdown: String,
}

pub fn parse_score(reply: &str) -> ScoreReport {
    let lines: Vec<&str> = reply.lines().collect();
    let score_index = lines
        .iter()
        .position(|line| line.to_lowercase().starts_with("score:"));

    let score = score_index.and_then(|index| score_value(lines[index]));

    let breakdown = lines
        .iter()
        .enumerate()
        .filter(|(index, _)| Some(*index) != score_index)
        .map(|(_, line)| *line)
        .collect::<Vec<_>>()
        .join("\n");

    ScoreReport {
        score: score.unwrap_or(0),
        parsed: score.is_some(),
        breakdown,
    }
}

fn score_value(line: &str) -> Option<u8> {
    let (_, value) = line.split_once(':')?;
    let value: i64 = value.trim().parse().ok()?;
    u8::try_from(value)
        .ok()
        .filter(|score| (MIN_SCORE..=MAX_SCORE).contains(score))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_well_formed_reply() {
        let report = parse_score("Score: 7\nBreakdown:\n- Clarity: good");
        assert_eq!(report.score, 7);
        assert!(report.parsed);
        assert_eq!(report.breakdown, "Breakdown:\n- Clarity: good");
    }

    #[test]
    fn test_missing_score_line_defaults_to_zero() {
        let reply = "Breakdown:\n- Clarity: vague\n- Professionalism: fine";
        let report = parse_score(reply);
        assert_eq!(report.score, 0);
        assert!(!report.parsed);
        assert_eq!(report.breakdown, reply);
    }

    #[test]
    fn test_non_numeric_score_defaults_to_zero() {
        let report = parse_score("score: not-a-number");
        assert_eq!(report.score, 0);
        assert!(!report.parsed);
        assert_eq!(report.breakdown, "");
    }

    #[test]
    fn test_score_prefix_is_case_insensitive_and_value_is_trimmed() {
        let report = parse_score("SCORE:   9  \n- Clarity: crisp");
        assert_eq!(report.score, 9);
        assert!(report.parsed);
        assert_eq!(report.breakdown, "- Clarity: crisp");
    }

    #[test]
    fn test_out_of_range_scores_are_not_accepted() {
        for reply in ["Score: 11", "Score: 0", "Score: -3", "Score: 300"] {
            let report = parse_score(reply);
            assert_eq!(report.score, 0, "{reply}");
            assert!(!report.parsed, "{reply}");
        }
    }

    #[test]
    fn test_fractional_or_decorated_scores_fall_back() {
        for reply in ["Score: 7/10", "Score: 7.5", "Score: **8**"] {
            assert_eq!(parse_score(reply).score, 0, "{reply}");
        }
    }

    #[test]
    fn test_indented_or_bold_score_line_is_not_the_score_line() {
        let reply = "**Score: 8**\nBreakdown:";
        let report = parse_score(reply);
        assert!(!report.parsed);
        assert_eq!(report.breakdown, reply);
    }

    #[test]
    fn test_only_the_first_score_line_is_removed() {
        let report = parse_score("Breakdown:\nScore: 6\n- Clarity: ok\nScore: 2");
        assert_eq!(report.score, 6);
        assert_eq!(report.breakdown, "Breakdown:\n- Clarity: ok\nScore: 2");
    }

    #[test]
    fn test_unparseable_first_score_line_wins_over_later_ones() {
        let report = parse_score("Score: high\nScore: 8");
        assert_eq!(report.score, 0);
        assert_eq!(report.breakdown, "Score: 8");
    }

    #[test]
    fn test_empty_reply() {
        let report = parse_score("");
        assert_eq!(report.score, 0);
        assert!(!report.parsed);
        assert_eq!(report.breakdown, "");
    }
}
