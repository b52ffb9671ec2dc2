use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde_json::Value;
use shared::{
    domain::{Event, EventId, NewEvent},
    protocol::Envelope,
};
use tracing::{debug, warn};
use url::Url;

use crate::error::{ApiClientError, Operation};

#[async_trait]
pub trait EventApi: Send + Sync {
    async fn list(&self) -> Result<Vec<Event>, ApiClientError>;
    async fn create(&self, draft: &NewEvent) -> Result<Event, ApiClientError>;
    async fn archive(&self, id: &EventId) -> Result<Event, ApiClientError>;
    async fn delete(&self, id: &EventId) -> Result<(), ApiClientError>;
}

pub struct HttpEventApi {
    http: Client,
    base_url: String,
}

impl HttpEventApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(http: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { http, base_url }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn events_url(&self) -> String {
        format!("{}/events", self.base_url)
    }

    fn event_url(&self, operation: Operation, id: &EventId) -> Result<Url, ApiClientError> {
        let mut url =
            Url::parse(&self.base_url).map_err(|err| ApiClientError::transport(operation, err))?;
        url.path_segments_mut()
            .map_err(|()| {
                ApiClientError::transport(
                    operation,
                    format!("base url '{}' cannot carry a path", self.base_url),
                )
            })?
            .pop_if_empty()
            .push("events")
            .push(id.as_str());
        Ok(url)
    }

    /// Sends `request` and unwraps the envelope. The body is decoded whatever
    /// the HTTP status, since the service reports failures inside it.
    async fn exchange(
        &self,
        operation: Operation,
        request: RequestBuilder,
    ) -> Result<Option<Value>, ApiClientError> {
        let res = request.send().await.map_err(|err| {
            warn!(operation = operation.name(), error = %err, "event api request failed");
            ApiClientError::transport(operation, err)
        })?;
        let status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|err| ApiClientError::transport(operation, err))?;

        let envelope: Envelope<Value> = serde_json::from_slice(&body).map_err(|err| {
            warn!(
                operation = operation.name(),
                status = status.as_u16(),
                error = %err,
                "event api returned a non-envelope body"
            );
            ApiClientError::transport(
                operation,
                format!("HTTP {status}: response is not an event service envelope ({err})"),
            )
        })?;

        if !envelope.success {
            let message = envelope.message_or(operation.fallback_message()).to_string();
            warn!(
                operation = operation.name(),
                status = status.as_u16(),
                %message,
                "event service reported failure"
            );
            return Err(ApiClientError::Remote { operation, message });
        }

        debug!(operation = operation.name(), status = status.as_u16(), "event api call succeeded");
        Ok(envelope.data)
    }
}

fn decode_data<T: DeserializeOwned>(
    operation: Operation,
    data: Option<Value>,
) -> Result<T, ApiClientError> {
    let data = data.ok_or_else(|| ApiClientError::malformed(operation, "missing data"))?;
    serde_json::from_value(data).map_err(|err| ApiClientError::malformed(operation, err.to_string()))
}

#[async_trait]
impl EventApi for HttpEventApi {
    async fn list(&self) -> Result<Vec<Event>, ApiClientError> {
        let url = self.events_url();
        debug!(%url, "fetching events");
        let data = self.exchange(Operation::List, self.http.get(url)).await?;
        match data {
            Some(Value::Array(items)) => decode_data(Operation::List, Some(Value::Array(items))),
            Some(other) => Err(ApiClientError::malformed(
                Operation::List,
                format!("expected an array of events, got {other}"),
            )),
            None => Err(ApiClientError::malformed(Operation::List, "missing data")),
        }
    }

    async fn create(&self, draft: &NewEvent) -> Result<Event, ApiClientError> {
        let url = self.events_url();
        debug!(%url, title = %draft.title, "creating event");
        let data = self
            .exchange(Operation::Create, self.http.post(url).json(draft))
            .await?;
        decode_data(Operation::Create, data)
    }

    async fn archive(&self, id: &EventId) -> Result<Event, ApiClientError> {
        let url = self.event_url(Operation::Archive, id)?;
        debug!(%url, "archiving event");
        let data = self.exchange(Operation::Archive, self.http.put(url)).await?;
        decode_data(Operation::Archive, data)
    }

    async fn delete(&self, id: &EventId) -> Result<(), ApiClientError> {
        let url = self.event_url(Operation::Delete, id)?;
        debug!(%url, "deleting event");
        self.exchange(Operation::Delete, self.http.delete(url)).await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/api_tests.rs"]
mod tests;
