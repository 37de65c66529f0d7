//! Quiz domain: question contract, answer snapshots, grading, the attempt
//! lifecycle and dashboard views. Everything here takes a [`ModelManager`]
//! explicitly and never touches HTTP types.
//!
//! [`ModelManager`]: crate::model::ModelManager

mod error;
pub use error::{QuizError, QuizResult};

pub mod question;
pub use question::Question;

mod snapshot;
pub use snapshot::{Selection, UserAnswers};

pub mod scoring;

pub mod source;
pub use source::{GenerationRequest, HttpQuestionSource, QuestionSource, SourceError};

pub mod attempts;

pub mod stats;
