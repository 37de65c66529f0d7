mod quiz_attempt;
pub(crate) use quiz_attempt::QuizAttemptRow;
pub use quiz_attempt::{AttemptStatus, Difficulty, QuizAttempt, QuizAttemptCreate};
