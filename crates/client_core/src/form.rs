use std::sync::Arc;

use shared::domain::{Event, NewEvent, DATE_FORMAT, TIME_FORMAT};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    api::EventApi,
    error::{ApiClientError, Operation},
    notifications::NotificationDispatcher,
};

const CREATE_FAILED: &str = "Failed to create event.";

fn submit_message(err: &ApiClientError) -> String {
    match err {
        ApiClientError::Remote { message, .. }
            if message.as_str() != Operation::Create.fallback_message() =>
        {
            format!("{CREATE_FAILED} {message}")
        }
        _ => CREATE_FAILED.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all required fields.")]
    MissingFields { missing: Vec<&'static str> },
    #[error("Date must use the YYYY-MM-DD format.")]
    InvalidDate,
    #[error("Time must use the 24-hour HH:mm format.")]
    InvalidTime,
    #[error("{0}")]
    Submit(String),
}

impl FormError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            FormError::MissingFields { .. } | FormError::InvalidDate | FormError::InvalidTime
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub title: String,
    pub date: String,
    pub time: String,
    pub notes: String,
}

impl EventDraft {
    pub fn is_empty(&self) -> bool {
        *self == EventDraft::default()
    }

    pub fn validate(&self) -> Result<NewEvent, FormError> {
        let title = self.title.trim();
        let date = self.date.trim();
        let time = self.time.trim();

        let missing: Vec<&'static str> = [("title", title), ("date", date), ("time", time)]
            .into_iter()
            .filter(|(_, value)| value.is_empty())
            .map(|(field, _)| field)
            .collect();
        if !missing.is_empty() {
            return Err(FormError::MissingFields { missing });
        }

        let date = chrono::NaiveDate::parse_from_str(date, DATE_FORMAT)
            .map_err(|_| FormError::InvalidDate)?;
        let time = chrono::NaiveTime::parse_from_str(time, TIME_FORMAT)
            .map_err(|_| FormError::InvalidTime)?;
        let notes = Some(self.notes.trim())
            .filter(|notes| !notes.is_empty())
            .map(str::to_string);

        Ok(NewEvent {
            title: title.to_string(),
            date,
            time,
            notes,
        })
    }
}

pub struct EventFormController {
    api: Arc<dyn EventApi>,
    notifications: NotificationDispatcher,
    draft: EventDraft,
}

impl EventFormController {
    pub fn new(api: Arc<dyn EventApi>, notifications: NotificationDispatcher) -> Self {
        Self {
            api,
            notifications,
            draft: EventDraft::default(),
        }
    }

    pub fn draft(&self) -> &EventDraft {
        &self.draft
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_date(&mut self, date: impl Into<String>) {
        self.draft.date = date.into();
    }

    pub fn set_time(&mut self, time: impl Into<String>) {
        self.draft.time = time.into();
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.draft.notes = notes.into();
    }

    pub async fn submit(&mut self) -> Result<Event, FormError> {
        let new_event = self.draft.validate()?;

        match self.api.create(&new_event).await {
            Ok(created) => {
                info!(id = %created.id, title = %created.title, "event created");
                self.draft = EventDraft::default();
                self.notifications.success("Event created successfully");
                Ok(created)
            }
            Err(err) => {
                warn!(error = ?err, "event creation failed");
                let message = submit_message(&err);
                self.notifications.error(message.clone());
                Err(FormError::Submit(message))
            }
        }
    }
}
