//! Progress tracking over the HTTP surface.

mod common;

use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::json;
use uuid::Uuid;

use common::{FakeRepos, send, test_router};

fn mark_payload(user_id: Uuid, subject_id: Uuid, question_id: Uuid) -> serde_json::Value {
    json!({
        "userId": user_id,
        "subjectId": subject_id,
        "questionId": question_id,
    })
}

#[tokio::test]
async fn summary_exposes_the_expected_payload_shape() {
    let repos = Arc::new(FakeRepos::default());
    let subject = repos.seed_subject("Databases");
    let subtopic = repos.seed_subtopic(subject.id, "Transactions");
    let questions: Vec<_> = (0..10)
        .map(|i| repos.seed_question(&subtopic, &format!("Q{i}")))
        .collect();
    let user_id = Uuid::new_v4();
    let router = test_router(repos);

    for question in questions.iter().take(3) {
        let (status, _) = send(
            &router,
            Method::POST,
            "/progress/mark",
            Some(mark_payload(user_id, subject.id, question.id)),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (status, summary) = send(
        &router,
        Method::GET,
        &format!("/progress/{user_id}/{}", subject.id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["completedQ"], 3);
    assert_eq!(summary["totalQ"], 10);
    assert_eq!(summary["progress"], 30.0);
    assert_eq!(
        summary["completed_questions"]
            .as_array()
            .expect("completed ids")
            .len(),
        3
    );
}

#[tokio::test]
async fn marking_twice_counts_once() {
    let repos = Arc::new(FakeRepos::default());
    let subject = repos.seed_subject("Networking");
    let subtopic = repos.seed_subtopic(subject.id, "TCP");
    let question = repos.seed_question(&subtopic, "Describe the handshake");
    let user_id = Uuid::new_v4();
    let router = test_router(repos.clone());

    for _ in 0..2 {
        let (status, _) = send(
            &router,
            Method::POST,
            "/progress/mark",
            Some(mark_payload(user_id, subject.id, question.id)),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);
    }

    let (_, summary) = send(
        &router,
        Method::GET,
        &format!("/progress/{user_id}/{}", subject.id),
        None,
    )
    .await;
    assert_eq!(summary["completedQ"], 1);
    assert_eq!(repos.progress_record_count(), 1);
}

#[tokio::test]
async fn concurrent_marks_converge_on_one_record() {
    let repos = Arc::new(FakeRepos::default());
    let subject = repos.seed_subject("Concurrency");
    let subtopic = repos.seed_subtopic(subject.id, "Locks");
    let question = repos.seed_question(&subtopic, "What is a data race?");
    let user_id = Uuid::new_v4();
    let router = test_router(repos.clone());

    let mut tasks = tokio::task::JoinSet::new();
    for _ in 0..8 {
        let router = router.clone();
        let payload = mark_payload(user_id, subject.id, question.id);
        tasks.spawn(async move {
            let (status, _) = send(&router, Method::POST, "/progress/mark", Some(payload)).await;
            status
        });
    }
    while let Some(status) = tasks.join_next().await {
        assert_eq!(status.expect("task"), StatusCode::NO_CONTENT);
    }

    assert_eq!(repos.progress_record_count(), 1);

    let (_, summary) = send(
        &router,
        Method::GET,
        &format!("/progress/{user_id}/{}", subject.id),
        None,
    )
    .await;
    assert_eq!(summary["completedQ"], 1);
}

#[tokio::test]
async fn unmarking_an_unread_question_is_a_successful_noop() {
    let repos = Arc::new(FakeRepos::default());
    let subject = repos.seed_subject("Rust");
    let subtopic = repos.seed_subtopic(subject.id, "Traits");
    let question = repos.seed_question(&subtopic, "What is a trait object?");
    let user_id = Uuid::new_v4();
    let router = test_router(repos.clone());

    let (status, body) = send(
        &router,
        Method::POST,
        "/progress/unmark",
        Some(mark_payload(user_id, subject.id, question.id)),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 0);
    // The no-op must not create a record.
    assert_eq!(repos.progress_record_count(), 0);
}

#[tokio::test]
async fn mark_then_unmark_is_reversible() {
    let repos = Arc::new(FakeRepos::default());
    let subject = repos.seed_subject("Operating Systems");
    let subtopic = repos.seed_subtopic(subject.id, "Memory");
    let question = repos.seed_question(&subtopic, "What is paging?");
    let user_id = Uuid::new_v4();
    let router = test_router(repos);

    let payload = mark_payload(user_id, subject.id, question.id);
    let (status, _) = send(&router, Method::POST, "/progress/mark", Some(payload.clone())).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&router, Method::POST, "/progress/unmark", Some(payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updated"], 1);

    let (_, summary) = send(
        &router,
        Method::GET,
        &format!("/progress/{user_id}/{}", subject.id),
        None,
    )
    .await;
    assert_eq!(summary["completedQ"], 0);
    assert_eq!(summary["totalQ"], 1);
    assert_eq!(summary["progress"], 0.0);
}

#[tokio::test]
async fn empty_subject_reports_zero_progress() {
    let repos = Arc::new(FakeRepos::default());
    let subject = repos.seed_subject("Fresh Subject");
    let router = test_router(repos);

    let (status, summary) = send(
        &router,
        Method::GET,
        &format!("/progress/{}/{}", Uuid::new_v4(), subject.id),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["totalQ"], 0);
    assert_eq!(summary["progress"], 0.0);
}
