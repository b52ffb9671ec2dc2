use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use async_trait::async_trait;
use shared::domain::{filter_events, CategoryFilter, Event, EventId};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::{api::EventApi, error::INVALID_EVENT_DATA};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ListStatus {
    #[default]
    Loading,
    Ready,
    Failed(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyState {
    NoEvents,
    NoMatches(CategoryFilter),
}

impl EmptyState {
    pub fn title(self) -> &'static str {
        match self {
            EmptyState::NoEvents => "No events yet",
            EmptyState::NoMatches(_) => "No events found",
        }
    }

    pub fn message(self) -> String {
        match self {
            EmptyState::NoEvents => {
                "Start organizing your schedule by creating your first event.".to_string()
            }
            EmptyState::NoMatches(filter) => format!(
                "No events found for \"{filter}\" category. Try selecting a different category."
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Loading,
    Failed { message: String },
    Empty(EmptyState),
    Events(Vec<Event>),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListSnapshot {
    pub status: ListStatus,
    pub events: Vec<Event>,
    pub filter: CategoryFilter,
}

impl ListSnapshot {
    pub fn visible(&self) -> Vec<Event> {
        filter_events(&self.events, self.filter)
    }

    pub fn empty_state(&self) -> Option<EmptyState> {
        if self.events.is_empty() {
            Some(EmptyState::NoEvents)
        } else if !self.events.iter().any(|event| self.filter.matches(event)) {
            Some(EmptyState::NoMatches(self.filter))
        } else {
            None
        }
    }

    pub fn counts(&self) -> Vec<(CategoryFilter, usize)> {
        CategoryFilter::CHOICES
            .iter()
            .map(|filter| {
                let count = self.events.iter().filter(|event| filter.matches(event)).count();
                (*filter, count)
            })
            .collect()
    }

    pub fn view(&self) -> ListView {
        match &self.status {
            ListStatus::Loading => ListView::Loading,
            ListStatus::Failed(message) => ListView::Failed {
                message: message.clone(),
            },
            ListStatus::Ready => match self.empty_state() {
                Some(empty) => ListView::Empty(empty),
                None => ListView::Events(self.visible()),
            },
        }
    }
}

#[async_trait]
pub trait ListHandle: Send + Sync {
    async fn refresh(&self);
    async fn report_error(&self, message: String);
}

pub struct EventListController {
    api: Arc<dyn EventApi>,
    state: RwLock<ListSnapshot>,
    mounted: AtomicBool,
}

impl EventListController {
    pub fn new(api: Arc<dyn EventApi>) -> Arc<Self> {
        Arc::new(Self {
            api,
            state: RwLock::new(ListSnapshot::default()),
            mounted: AtomicBool::new(true),
        })
    }

    pub fn api(&self) -> Arc<dyn EventApi> {
        Arc::clone(&self.api)
    }

    pub async fn mount(&self) {
        self.refresh().await;
    }

    /// Stops applying results, including those of fetches already in flight.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::SeqCst)
    }

    /// The last response to arrive wins.
    pub async fn refresh(&self) {
        if !self.is_mounted() {
            debug!("skipping refresh on unmounted event list");
            return;
        }
        self.state.write().await.status = ListStatus::Loading;

        let result = self.api.list().await;
        if !self.is_mounted() {
            debug!("event list unmounted during fetch; dropping result");
            return;
        }

        let mut state = self.state.write().await;
        match result {
            Ok(events) => {
                info!(count = events.len(), "event list refreshed");
                state.events = events;
                state.status = ListStatus::Ready;
            }
            Err(err) if err.is_malformed() => {
                warn!(error = ?err, "event list payload was malformed");
                state.status = ListStatus::Failed(INVALID_EVENT_DATA.to_string());
            }
            Err(err) => {
                warn!(error = ?err, "event list fetch failed");
                state.status = ListStatus::Failed(err.user_message());
            }
        }
    }

    pub async fn report_error(&self, message: impl Into<String>) {
        if !self.is_mounted() {
            return;
        }
        let message = message.into();
        debug!(%message, "child action reported an error");
        self.state.write().await.status = ListStatus::Failed(message);
    }

    pub async fn set_filter(&self, filter: CategoryFilter) {
        self.state.write().await.filter = filter;
    }

    pub async fn snapshot(&self) -> ListSnapshot {
        self.state.read().await.clone()
    }

    pub async fn view(&self) -> ListView {
        self.state.read().await.view()
    }

    pub async fn find(&self, id: &EventId) -> Option<Event> {
        self.state
            .read()
            .await
            .events
            .iter()
            .find(|event| &event.id == id)
            .cloned()
    }
}

#[async_trait]
impl ListHandle for EventListController {
    async fn refresh(&self) {
        EventListController::refresh(self).await;
    }

    async fn report_error(&self, message: String) {
        EventListController::report_error(self, message).await;
    }
}

#[cfg(test)]
#[path = "tests/list_tests.rs"]
mod tests;
