use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc, Mutex, PoisonError,
};

use shared::domain::Event;
use tracing::{info, warn};

use crate::{
    api::EventApi, error::ApiClientError, list::ListHandle,
    notifications::NotificationDispatcher,
};

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this event?";

pub trait ConfirmDelete: Send + Sync {
    fn confirm_delete(&self, event: &Event) -> bool;
}

impl<F> ConfirmDelete for F
where
    F: Fn(&Event) -> bool + Send + Sync,
{
    fn confirm_delete(&self, event: &Event) -> bool {
        self(event)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
    Completed,
    Failed(String),
    Busy,
    NotOffered,
    Cancelled,
}

pub struct EventCardController {
    event: Event,
    api: Arc<dyn EventApi>,
    list: Arc<dyn ListHandle>,
    notifications: NotificationDispatcher,
    busy: AtomicBool,
    inline_error: Mutex<Option<String>>,
    mounted: AtomicBool,
}

struct BusyGuard<'a>(&'a AtomicBool);

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl EventCardController {
    pub fn new(
        event: Event,
        api: Arc<dyn EventApi>,
        list: Arc<dyn ListHandle>,
        notifications: NotificationDispatcher,
    ) -> Self {
        Self {
            event,
            api,
            list,
            notifications,
            busy: AtomicBool::new(false),
            inline_error: Mutex::new(None),
            mounted: AtomicBool::new(true),
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::SeqCst)
    }

    pub fn can_archive(&self) -> bool {
        !self.event.archived && !self.is_busy()
    }

    pub fn can_delete(&self) -> bool {
        !self.is_busy()
    }

    pub fn inline_error(&self) -> Option<String> {
        self.inline_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn clear_error(&self) {
        self.set_inline_error(None);
    }

    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::SeqCst);
    }

    pub async fn archive(&self) -> ActionOutcome {
        if self.event.archived {
            return ActionOutcome::NotOffered;
        }
        let Some(_busy) = self.try_begin() else {
            return ActionOutcome::Busy;
        };
        self.clear_error();

        match self.api.archive(&self.event.id).await {
            Ok(updated) => {
                info!(id = %updated.id, "event archived");
                self.notifications.success("Event archived successfully");
                self.list.refresh().await;
                ActionOutcome::Completed
            }
            Err(err) => self.fail("archive", err).await,
        }
    }

    pub async fn delete(&self, confirm: &dyn ConfirmDelete) -> ActionOutcome {
        if self.is_busy() {
            return ActionOutcome::Busy;
        }
        if !confirm.confirm_delete(&self.event) {
            return ActionOutcome::Cancelled;
        }
        let Some(_busy) = self.try_begin() else {
            return ActionOutcome::Busy;
        };
        self.clear_error();

        match self.api.delete(&self.event.id).await {
            Ok(()) => {
                info!(id = %self.event.id, "event deleted");
                self.notifications.success("Event deleted successfully");
                self.list.refresh().await;
                ActionOutcome::Completed
            }
            Err(err) => self.fail("delete", err).await,
        }
    }

    fn try_begin(&self) -> Option<BusyGuard<'_>> {
        self.busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .ok()
            .map(|_| BusyGuard(&self.busy))
    }

    async fn fail(&self, action: &'static str, err: ApiClientError) -> ActionOutcome {
        let message = err.user_message();
        warn!(id = %self.event.id, action, error = ?err, "event action failed");

        if self.mounted.load(Ordering::SeqCst) {
            self.set_inline_error(Some(message.clone()));
        }
        self.list.report_error(message.clone()).await;
        self.notifications.error(message.clone());
        ActionOutcome::Failed(message)
    }

    fn set_inline_error(&self, message: Option<String>) {
        *self
            .inline_error
            .lock()
            .unwrap_or_else(PoisonError::into_inner) = message;
    }
}

#[cfg(test)]
#[path = "tests/card_tests.rs"]
mod tests;
