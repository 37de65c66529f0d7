use serde::{Deserialize, Serialize};

use crate::{model::entity::Difficulty, quiz::Question};

#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct GenerateQuestionsResponse {
    pub topic: String,
    pub difficulty: Difficulty,
    /// May be shorter than requested when the source produced unusable items.
    pub questions: Vec<Question>,
}
