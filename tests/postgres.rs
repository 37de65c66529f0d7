//! Same lifecycle against a real database. Needs `TEST_DATABASE_ADMIN_URL`
//! (or a local postgres/postgres superuser), so it only runs with `--ignored`.

mod common;
use axum::http::StatusCode;
use serde_json::json;
use uuid::Uuid;

use crate::common::{
    Action, Caller, Flow, quick_result_action, setup_pg_server, setup_test_db, start_action,
};

#[tokio::test]
#[ignore = "needs a postgres server"]
async fn route_postgres_lifecycle_test() {
    let db = setup_test_db().await;
    let mut server = setup_pg_server(&db);
    let owner = Uuid::new_v4();

    let ctx = Flow::new(owner)
        .step(start_action("Rust").with_save_as("started"))
        .step(
            Action::new("save", "POST", "/api/v1/quizzes/progress").with_dyn_body(|ctx| {
                json!({
                    "quiz_id": ctx.id_of("started"),
                    "current_question_index": 2,
                    "user_answers": {"0": "A", "1": ["B", "C"]},
                    "time_taken": 20,
                })
            }),
        )
        .step(
            Action::new("stranger_resume", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/quizzes/{}/resume", ctx.id_of("started")))
                .as_caller(Caller::Bearer(Uuid::new_v4()))
                .with_expect(StatusCode::NOT_FOUND),
        )
        .step(
            Action::new("complete", "POST", "/api/v1/quizzes/complete")
                .with_dyn_body(|ctx| {
                    json!({
                        "quiz_id": ctx.id_of("started"),
                        "total_questions": 2,
                        "time_taken": 30,
                    })
                })
                .assert_body(|body| {
                    assert_eq!(body["correct_count"], 2);
                    assert_eq!(body["percentage"], 100.0);
                })
                .with_save_as("completed"),
        )
        .step(
            Action::new("details", "GET", "")
                .with_dyn_path(|ctx| format!("/api/v1/quizzes/{}", ctx.id_of("started")))
                .with_save_as("details"),
        )
        .step(
            Action::new("complete_twice", "POST", "/api/v1/quizzes/complete")
                .with_dyn_body(|ctx| {
                    json!({
                        "quiz_id": ctx.id_of("started"),
                        "total_questions": 2,
                        "correct_answers": 0,
                    })
                })
                .with_expect(StatusCode::CONFLICT),
        )
        .step(quick_result_action("Go", 1, 4, 15))
        .step(start_action("Draft"))
        .step(
            Action::new("stats", "GET", "/api/v1/dashboard/stats").assert_body(|body| {
                assert_eq!(body["total_quizzes"], 2);
                assert_eq!(body["ongoing_quizzes"], 1);
                assert_eq!(body["average_score"], 62.5);
                assert_eq!(body["best_score"], 100.0);
                assert_eq!(body["lowest_score"], 25.0);
                assert_eq!(body["total_time_spent"], 45);
                assert_eq!(body["accuracy"], 50.0);
            }),
        )
        .step(
            Action::new("history", "GET", "/api/v1/dashboard/history")
                .with_param("limit", "1")
                .assert_body(|body| {
                    assert_eq!(body["total"], 2);
                    assert_eq!(body["items"][0]["topic"], "Go");
                }),
        )
        .step(
            Action::new("delete", "DELETE", "")
                .with_dyn_path(|ctx| format!("/api/v1/quizzes/{}", ctx.id_of("started"))),
        )
        .run(&mut server)
        .await;

    // the completion response carries what was stored, not the in-memory clock
    assert!(ctx.get("completed")["completed_at"].is_string());
    assert_eq!(
        ctx.get("completed")["completed_at"],
        ctx.get("details")["completed_at"]
    );
}
