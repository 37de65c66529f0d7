use std::collections::HashSet;

use serde::Serialize;

use crate::quiz::{Question, UserAnswers};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, utoipa::ToSchema)]
pub struct Score {
    pub score: i32,
    pub percentage: f64,
}

/// Exact set equality: every correct option picked and nothing else.
pub fn is_correct<S: AsRef<str>, C: AsRef<str>>(selected: &[S], correct: &[C]) -> bool {
    let selected: HashSet<&str> = selected.iter().map(AsRef::as_ref).collect();
    let correct: HashSet<&str> = correct.iter().map(AsRef::as_ref).collect();
    selected == correct
}

pub fn aggregate(correct_count: i32, total_questions: i32) -> Score {
    let percentage = if total_questions > 0 {
        f64::from(correct_count) / f64::from(total_questions) * 100.0
    } else {
        0.0
    };

    Score {
        score: correct_count,
        percentage,
    }
}

/// Counts questions whose selection matches their answers. Unanswered counts as wrong.
pub fn grade(questions: &[Question], answers: &UserAnswers) -> i32 {
    questions
        .iter()
        .enumerate()
        .filter(|(idx, q)| {
            u32::try_from(*idx)
                .ok()
                .and_then(|idx| answers.get(idx))
                .is_some_and(|sel| is_correct(sel.options(), q.answers.as_slice()))
        })
        .count() as i32
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::quiz::Selection;

    #[test]
    fn is_correct_requires_exact_set() {
        assert!(is_correct(&["A"], &["A"]));
        assert!(!is_correct(&["A"], &["A", "B"]));
        assert!(!is_correct(&["A", "B", "C"], &["A", "B"]));
        assert!(!is_correct::<&str, &str>(&[], &["A"]));
    }

    #[test]
    fn is_correct_ignores_order_and_repeats() {
        assert!(is_correct(&["B", "A"], &["A", "B"]));
        assert!(is_correct(&["A", "B"], &["B", "A"]));
        assert!(is_correct(&["A", "A"], &["A"]));
    }

    #[test]
    fn partial_selection_on_multi_answer_is_wrong() {
        // options ["A", "B"], both correct
        assert!(!is_correct(&["A"], &["A", "B"]));
        assert!(is_correct(&["A", "B"], &["A", "B"]));
    }

    #[test]
    fn aggregate_handles_zero_total() {
        assert_eq!(aggregate(0, 0), Score { score: 0, percentage: 0.0 });
    }

    #[test]
    fn aggregate_four_of_five() {
        let s = aggregate(4, 5);
        assert_eq!(s.score, 4);
        assert!((s.percentage - 80.0).abs() < f64::EPSILON);
    }

    #[test]
    fn grade_counts_matching_selections() {
        let q = |answers: &[&str]| Question {
            question: "q".into(),
            options: vec!["A".into(), "B".into(), "C".into()],
            answers: answers.iter().map(|a| a.to_string()).collect(),
            explanation: "x".into(),
        };
        let questions = vec![q(&["A"]), q(&["B", "C"]), q(&["C"])];
        let answers = UserAnswers::new()
            .with(0, Selection::new(["A"]))
            .with(1, Selection::new(["C", "B"]));

        // third question unanswered
        assert_eq!(grade(&questions, &answers), 2);
        assert_eq!(grade(&questions, &UserAnswers::new()), 0);
    }
}
