/// Maximum score for a correctly answered exercise.
const FULL_SCORE: i32 = 20;

pub struct Graded {
    pub correct: bool,
    pub score: i32,
}

/// Grades an answer against the stored solution. Matching ignores case
/// and whitespace; a wrong answer loses one point per full minute
/// spent, floored at zero.
pub fn grade(answer: &str, solution: &str, time_spent: i32) -> Graded {
    if normalize(answer) == normalize(solution) {
        Graded {
            correct: true,
            score: FULL_SCORE,
        }
    } else {
        Graded {
            correct: false,
            score: (FULL_SCORE - time_spent.max(0) / 60).max(0),
        }
    }
}

fn normalize(s: &str) -> String {
    s.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_ignores_case_and_whitespace() {
        let graded = grade("  La  Seine ", "la seine", 30);
        assert!(graded.correct);
        assert_eq!(graded.score, 20);
    }

    #[test]
    fn wrong_answer_loses_a_point_per_minute() {
        let graded = grade("la loire", "la seine", 90);
        assert!(!graded.correct);
        assert_eq!(graded.score, 19);
    }

    #[test]
    fn wrong_answer_under_a_minute_keeps_full_penalty_base() {
        assert_eq!(grade("x", "y", 59).score, 20 - 0);
        assert!(!grade("x", "y", 59).correct);
    }

    #[test]
    fn score_never_goes_negative() {
        assert_eq!(grade("x", "y", 60 * 60).score, 0);
    }

    #[test]
    fn negative_time_is_treated_as_zero() {
        assert_eq!(grade("x", "y", -5).score, 20);
    }
}
