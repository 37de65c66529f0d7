mod questions;
pub use questions::GenerateQuestionsResponse;

mod quizzes;
pub use quizzes::{
    CompleteQuizRequest, ResumeResponse, SaveProgressRequest, SavedResponse, StartQuizRequest,
};

mod dashboard;
pub use dashboard::PaginationQuery;
