//! Client-side core for the event manager: service client, controllers and
//! the notification registry. Rendering lives in the applications.

pub mod api;
pub mod card;
pub mod error;
pub mod form;
pub mod list;
pub mod notifications;

#[cfg(test)]
mod test_support;

pub use api::{EventApi, HttpEventApi};
pub use card::{ActionOutcome, ConfirmDelete, EventCardController, DELETE_PROMPT};
pub use error::{ApiClientError, Operation};
pub use form::{EventDraft, EventFormController, FormError};
pub use list::{EmptyState, EventListController, ListHandle, ListSnapshot, ListStatus, ListView};
pub use notifications::{
    Notification, NotificationChange, NotificationDispatcher, NotificationId, Severity,
};
