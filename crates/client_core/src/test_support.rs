//! Scripted `EventApi` used by the controller unit tests.

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicBool, Ordering},
        Mutex,
    },
};

use async_trait::async_trait;
use shared::domain::{Category, Event, EventId, NewEvent};
use tokio::sync::{oneshot, Notify};

use crate::{
    api::EventApi,
    error::{ApiClientError, Operation},
};

pub(crate) fn event(id: &str, category: Category) -> Event {
    Event {
        id: EventId::new(id),
        title: format!("event {id}"),
        category,
        date: chrono::NaiveDate::from_ymd_opt(2024, 1, 10).expect("date"),
        time: chrono::NaiveTime::from_hms_opt(9, 0, 0).expect("time"),
        notes: None,
        archived: false,
    }
}

pub(crate) fn remote(operation: Operation, message: &str) -> ApiClientError {
    ApiClientError::Remote {
        operation,
        message: message.to_string(),
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    list_results: Mutex<VecDeque<Result<Vec<Event>, ApiClientError>>>,
    create_results: Mutex<VecDeque<Result<Event, ApiClientError>>>,
    archive_results: Mutex<VecDeque<Result<Event, ApiClientError>>>,
    delete_results: Mutex<VecDeque<Result<(), ApiClientError>>>,
    calls: Mutex<Vec<String>>,
    created: Mutex<Vec<NewEvent>>,
    hold_mutations: AtomicBool,
    release: Notify,
    hold_lists: AtomicBool,
    list_gates: Mutex<Vec<Option<oneshot::Sender<()>>>>,
}

impl FakeApi {
    pub(crate) fn push_list(&self, result: Result<Vec<Event>, ApiClientError>) {
        self.list_results.lock().expect("lock").push_back(result);
    }

    pub(crate) fn push_create(&self, result: Result<Event, ApiClientError>) {
        self.create_results.lock().expect("lock").push_back(result);
    }

    pub(crate) fn push_archive(&self, result: Result<Event, ApiClientError>) {
        self.archive_results.lock().expect("lock").push_back(result);
    }

    pub(crate) fn push_delete(&self, result: Result<(), ApiClientError>) {
        self.delete_results.lock().expect("lock").push_back(result);
    }

    /// Makes archive/delete wait for `release_mutation` before answering.
    pub(crate) fn hold_mutations(&self) {
        self.hold_mutations.store(true, Ordering::SeqCst);
    }

    pub(crate) fn release_mutation(&self) {
        self.release.notify_one();
    }

    /// Makes every later `list` call wait until `release_list` is called
    /// with its position among the held calls.
    pub(crate) fn hold_lists(&self) {
        self.hold_lists.store(true, Ordering::SeqCst);
    }

    pub(crate) fn release_list(&self, held_call: usize) {
        let gate = self
            .list_gates
            .lock()
            .expect("lock")
            .get_mut(held_call)
            .and_then(Option::take)
            .expect("held list call");
        let _ = gate.send(());
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("lock").clone()
    }

    pub(crate) fn created(&self) -> Vec<NewEvent> {
        self.created.lock().expect("lock").clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().expect("lock").push(call);
    }

    async fn maybe_hold(&self) {
        if self.hold_mutations.load(Ordering::SeqCst) {
            self.release.notified().await;
        }
    }
}

#[async_trait]
impl EventApi for FakeApi {
    async fn list(&self) -> Result<Vec<Event>, ApiClientError> {
        self.record("list".into());
        let next = self.list_results.lock().expect("lock").pop_front();
        if self.hold_lists.load(Ordering::SeqCst) {
            let (gate, released) = oneshot::channel();
            self.list_gates.lock().expect("lock").push(Some(gate));
            let _ = released.await;
        }
        next.unwrap_or_else(|| Ok(Vec::new()))
    }

    async fn create(&self, draft: &NewEvent) -> Result<Event, ApiClientError> {
        self.record(format!("create {}", draft.title));
        self.created.lock().expect("lock").push(draft.clone());
        let next = self.create_results.lock().expect("lock").pop_front();
        next.unwrap_or_else(|| Err(remote(Operation::Create, "no scripted response")))
    }

    async fn archive(&self, id: &EventId) -> Result<Event, ApiClientError> {
        self.record(format!("archive {id}"));
        self.maybe_hold().await;
        let next = self.archive_results.lock().expect("lock").pop_front();
        next.unwrap_or_else(|| Err(remote(Operation::Archive, "no scripted response")))
    }

    async fn delete(&self, id: &EventId) -> Result<(), ApiClientError> {
        self.record(format!("delete {id}"));
        self.maybe_hold().await;
        let next = self.delete_results.lock().expect("lock").pop_front();
        next.unwrap_or_else(|| Err(remote(Operation::Delete, "no scripted response")))
    }
}
