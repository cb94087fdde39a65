mod common;

use axum::{
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use project_planner::{
    api::TaskStatus,
    forms::InviteList,
    kanban::{persist_drop, Board, DropSettlement, DropTarget},
    projects::{create_with_invitations, ProjectForm},
};
use serde_json::json;

fn server_tasks() -> serde_json::Value {
    json!({ "tasks": [
        { "id": 1, "title": "Wireframes", "status": "To Do", "project_id": 7 },
        { "id": 2, "title": "API", "status": "In Progress", "project_id": 7 },
        { "id": 3, "title": "Deploy", "status": "Done", "project_id": 7 }
    ]})
}

async fn loaded_board(h: &common::Harness) -> Board {
    Board::new(h.api.project_tasks(7).await.unwrap())
}

#[tokio::test]
async fn drop_persists_exactly_one_status_write() {
    let routes = Router::new()
        .route("/tasks/project/:id", get(|| async { Json(server_tasks()) }))
        .route("/tasks/:id", put(|| async { Json(json!({ "message": "Task updated" })) }));
    let h = common::harness(routes).await;
    let mut board = loaded_board(&h).await;

    board.drag_start(1);
    board.drag_over(DropTarget::Task(2));
    board.drag_over(DropTarget::Column(TaskStatus::Done));
    let change = board.drag_end(DropTarget::Column(TaskStatus::Done)).unwrap();

    let settlement = persist_drop(&h.api, 7, change).await;
    assert!(matches!(settlement, DropSettlement::Persisted(_)));
    board.settle(settlement);

    let writes = h.recorder.matching("PUT", "/tasks/1");
    assert_eq!(writes.len(), 1);
    assert_eq!(writes[0].body, json!({ "status": "Done" }));
    assert_eq!(board.status_of(1), Some(TaskStatus::Done));
    assert!(!board.is_pending(1));
}

#[tokio::test]
async fn failed_write_reloads_the_server_state() {
    let routes = Router::new()
        .route("/tasks/project/:id", get(|| async { Json(server_tasks()) }))
        .route(
            "/tasks/:id",
            put(|| async { (StatusCode::INTERNAL_SERVER_ERROR, Json(json!({ "error": "db down" }))) }),
        );
    let h = common::harness(routes).await;
    let mut board = loaded_board(&h).await;
    let before = board.tasks();

    board.drag_start(1);
    board.drag_over(DropTarget::Task(3));
    let change = board.drag_end(DropTarget::Task(3)).unwrap();
    assert_eq!(board.status_of(1), Some(TaskStatus::Done));

    let settlement = persist_drop(&h.api, 7, change).await;
    assert!(matches!(settlement, DropSettlement::Reloaded(_)));
    board.settle(settlement);

    assert_eq!(board.tasks(), before);
    assert_eq!(h.recorder.matching("GET", "/tasks/project/7").len(), 2);
}

#[tokio::test]
async fn drop_on_nothing_sends_nothing() {
    let routes = Router::new().route("/tasks/project/:id", get(|| async { Json(server_tasks()) }));
    let h = common::harness(routes).await;
    let mut board = loaded_board(&h).await;

    board.drag_start(2);
    board.drag_over(DropTarget::Column(TaskStatus::ToDo));
    assert_eq!(board.drag_end(DropTarget::None), None);

    assert_eq!(board.status_of(2), Some(TaskStatus::InProgress));
    assert!(h.recorder.matching("PUT", "/tasks/2").is_empty());
}

#[tokio::test]
async fn project_is_created_even_when_every_invite_fails() {
    let routes = Router::new()
        .route(
            "/projects",
            post(|| async {
                (StatusCode::CREATED, Json(json!({ "id": 21, "name": "Planner", "owner_id": 4 })))
            }),
        )
        .route(
            "/members/projects/:id/invite",
            post(|| async { (StatusCode::NOT_FOUND, Json(json!({ "message": "User not found" }))) }),
        );
    let h = common::harness(routes).await;

    let form = ProjectForm {
        name: "Planner".into(),
        class_id: "2".into(),
        cohort_id: "5".into(),
        ..Default::default()
    };
    let mut invites = InviteList::default();
    invites.add("ada@example.com").unwrap();
    invites.add("lin@example.com").unwrap();

    let created = create_with_invitations(&h.api, &form, &invites).await.unwrap();

    assert_eq!(created.project.id, 21);
    assert_eq!(created.failed_invitations().count(), 2);

    let sent = h.recorder.matching("POST", "/members/projects/21/invite");
    assert_eq!(sent.len(), 2);
    let mut emails: Vec<_> = sent.iter().map(|seen| seen.body["email"].clone()).collect();
    emails.sort_by_key(|email| email.to_string());
    assert_eq!(emails, vec![json!("ada@example.com"), json!("lin@example.com")]);
    assert!(sent.iter().all(|seen| seen.body["role"] == "collaborator"));
}

#[tokio::test]
async fn invalid_form_never_reaches_the_server() {
    let h = common::harness(Router::new()).await;

    let form = ProjectForm { name: "Planner".into(), ..Default::default() };
    let err = create_with_invitations(&h.api, &form, &InviteList::default())
        .await
        .unwrap_err();

    assert_eq!(err.user_message(), "Please select a class");
    assert!(h.recorder.all().is_empty());
}
