use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub struct AuthModifier;

impl Modify for AuthModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(schema) = openapi.components.as_mut() {
            schema.add_security_scheme(
                "cookie",
                SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                    "SID",
                    "JWT token for current user",
                ))),
            );
            schema.add_security_scheme(
                "bearer",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::routes::questions::generate_questions_handler,
        crate::web::routes::quizzes::quiz_start_handler,
        crate::web::routes::quizzes::quiz_progress_handler,
        crate::web::routes::quizzes::quiz_resume_handler,
        crate::web::routes::quizzes::quiz_complete_handler,
        crate::web::routes::quizzes::quiz_details_handler,
        crate::web::routes::quizzes::quiz_delete_handler,
        crate::web::routes::dashboard::dashboard_stats_handler,
        crate::web::routes::dashboard::dashboard_history_handler,
        crate::web::routes::dashboard::dashboard_ongoing_handler,
        crate::web::routes::dashboard::dashboard_performance_handler,
    ),
    modifiers(&AuthModifier),
    tags(
        (name = "questions", description = "Question generation"),
        (name = "quizzes", description = "Quiz attempt lifecycle"),
        (name = "dashboard", description = "Read-only views over attempts"),
    )
)]
pub struct ApiDoc;
