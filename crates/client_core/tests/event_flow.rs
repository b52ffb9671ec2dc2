use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use client_core::{
    ActionOutcome, EventApi, EventCardController, EventFormController, EventListController,
    HttpEventApi, ListHandle, ListStatus, ListView, NotificationDispatcher,
};
use serde_json::{json, Value};
use shared::domain::{Category, CategoryFilter, Event, EventId};
use tokio::{net::TcpListener, sync::Mutex};

#[derive(Default)]
struct Backend {
    events: Vec<Value>,
    next_id: u64,
}

type Shared = Arc<Mutex<Backend>>;

async fn list_events(State(backend): State<Shared>) -> Json<Value> {
    let backend = backend.lock().await;
    Json(json!({ "success": true, "message": "Events fetched", "data": backend.events }))
}

async fn create_event(State(backend): State<Shared>, Json(body): Json<Value>) -> Json<Value> {
    let mut backend = backend.lock().await;
    backend.next_id += 1;
    let title = body["title"].as_str().unwrap_or_default();
    let category = if title.to_ascii_lowercase().contains("standup") {
        "Work"
    } else {
        "Other"
    };
    let created = json!({
        "id": format!("evt-{}", backend.next_id),
        "title": title,
        "category": category,
        "date": body["date"],
        "time": body["time"],
        "notes": body.get("notes").cloned().unwrap_or(Value::Null),
        "archived": false
    });
    backend.events.push(created.clone());
    Json(json!({ "success": true, "message": "Event created", "data": created }))
}

async fn archive_event(
    State(backend): State<Shared>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let mut backend = backend.lock().await;
    match backend.events.iter_mut().find(|event| event["id"] == id.as_str()) {
        Some(event) => {
            event["archived"] = Value::Bool(true);
            let updated = event.clone();
            (
                StatusCode::OK,
                Json(json!({ "success": true, "message": "Event archived", "data": updated })),
            )
        }
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Event not found", "data": null })),
        ),
    }
}

async fn delete_event(
    State(backend): State<Shared>,
    Path(id): Path<String>,
) -> (StatusCode, Json<Value>) {
    let mut backend = backend.lock().await;
    let before = backend.events.len();
    backend.events.retain(|event| event["id"] != id.as_str());
    if backend.events.len() == before {
        return (
            StatusCode::NOT_FOUND,
            Json(json!({ "success": false, "message": "Event not found" })),
        );
    }
    (
        StatusCode::OK,
        Json(json!({ "success": true, "message": "Event deleted", "data": null })),
    )
}

async fn spawn_backend(seed: Vec<Value>) -> String {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let backend: Shared = Arc::new(Mutex::new(Backend {
        next_id: seed.len() as u64,
        events: seed,
    }));
    let app = Router::new()
        .route("/api/events", get(list_events).post(create_event))
        .route("/api/events/:id", put(archive_event).delete(delete_event))
        .with_state(backend);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}/api")
}

fn seeded(id: &str, title: &str, category: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "category": category,
        "date": "2024-03-01",
        "time": "18:30",
        "archived": false
    })
}

fn card_for(
    event: Event,
    api: &Arc<dyn EventApi>,
    list: &Arc<EventListController>,
    notifications: &NotificationDispatcher,
) -> EventCardController {
    EventCardController::new(
        event,
        Arc::clone(api),
        Arc::clone(list) as Arc<dyn ListHandle>,
        notifications.clone(),
    )
}

#[tokio::test]
async fn create_archive_delete_round_trip_against_service() {
    let base_url = spawn_backend(Vec::new()).await;
    let api: Arc<dyn EventApi> = Arc::new(HttpEventApi::new(base_url));
    let notifications = NotificationDispatcher::new();
    let list = EventListController::new(Arc::clone(&api));

    list.mount().await;
    assert_eq!(
        list.view().await,
        ListView::Empty(client_core::EmptyState::NoEvents)
    );

    let mut form = EventFormController::new(Arc::clone(&api), notifications.clone());
    form.set_title("Standup");
    form.set_date("2024-01-10");
    form.set_time("09:00");
    let created = form.submit().await.expect("create");
    assert!(form.draft().is_empty());
    assert_eq!(created.category, Category::Work);

    list.refresh().await;
    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.status, ListStatus::Ready);
    assert_eq!(snapshot.events, vec![created.clone()]);

    let card = card_for(created.clone(), &api, &list, &notifications);
    assert_eq!(card.archive().await, ActionOutcome::Completed);
    let archived = list.find(&created.id).await.expect("still listed");
    assert!(archived.archived);

    let card = card_for(archived, &api, &list, &notifications);
    assert_eq!(card.archive().await, ActionOutcome::NotOffered);
    assert_eq!(card.delete(&|_: &Event| true).await, ActionOutcome::Completed);
    assert_eq!(
        list.view().await,
        ListView::Empty(client_core::EmptyState::NoEvents)
    );

    let messages: Vec<_> = notifications
        .active()
        .into_iter()
        .map(|notification| notification.message)
        .collect();
    assert_eq!(
        messages,
        vec![
            "Event created successfully",
            "Event archived successfully",
            "Event deleted successfully"
        ]
    );
}

#[tokio::test]
async fn archiving_a_vanished_event_reports_service_message() {
    let base_url = spawn_backend(vec![
        seeded("1", "Dinner", "Personal"),
        seeded("2", "Planning", "Work"),
        seeded("3", "Laundry", "Other"),
    ])
    .await;
    let api: Arc<dyn EventApi> = Arc::new(HttpEventApi::new(base_url));
    let notifications = NotificationDispatcher::new();
    let list = EventListController::new(Arc::clone(&api));
    list.mount().await;

    list.set_filter(CategoryFilter::Only(Category::Work)).await;
    let ListView::Events(work) = list.view().await else {
        panic!("expected events");
    };
    assert_eq!(work.len(), 1);

    let mut ghost = work[0].clone();
    ghost.id = EventId::new("404");
    let card = card_for(ghost, &api, &list, &notifications);
    assert_eq!(
        card.archive().await,
        ActionOutcome::Failed("Event not found".into())
    );
    assert_eq!(card.inline_error().as_deref(), Some("Event not found"));

    let snapshot = list.snapshot().await;
    assert_eq!(snapshot.status, ListStatus::Failed("Event not found".into()));
    assert_eq!(snapshot.events.len(), 3);

    list.set_filter(CategoryFilter::All).await;
    list.refresh().await;
    let ListView::Events(all) = list.view().await else {
        panic!("expected events");
    };
    let titles: Vec<_> = all.iter().map(|event| event.title.as_str()).collect();
    assert_eq!(titles, vec!["Dinner", "Planning", "Laundry"]);
}

#[tokio::test]
async fn declined_delete_leaves_service_untouched() {
    let base_url = spawn_backend(vec![seeded("1", "Dinner", "Personal")]).await;
    let api: Arc<dyn EventApi> = Arc::new(HttpEventApi::new(base_url));
    let notifications = NotificationDispatcher::new();
    let list = EventListController::new(Arc::clone(&api));
    list.mount().await;

    let event = list.find(&EventId::new("1")).await.expect("seeded");
    let card = card_for(event, &api, &list, &notifications);
    assert_eq!(card.delete(&|_: &Event| false).await, ActionOutcome::Cancelled);

    list.refresh().await;
    assert_eq!(list.snapshot().await.events.len(), 1);
    assert!(notifications.active().is_empty());
}
