use std::fmt;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DATE_FORMAT: &str = "%Y-%m-%d";
pub const TIME_FORMAT: &str = "%H:%M";

/// Service-assigned event identity. The backend hands these out as either
/// strings or integers, so both decode into the same opaque text form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct EventId(pub String);

impl EventId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for EventId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum RawId {
            Text(String),
            Number(i64),
        }

        match RawId::deserialize(deserializer)? {
            RawId::Text(text) => Ok(Self(text)),
            RawId::Number(number) => Ok(Self(number.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Work,
    Personal,
    Other,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Work, Category::Personal, Category::Other];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Work => "Work",
            Category::Personal => "Personal",
            Category::Other => "Other",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projection applied to the event collection before display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(Category),
}

impl CategoryFilter {
    pub const CHOICES: [CategoryFilter; 4] = [
        CategoryFilter::All,
        CategoryFilter::Only(Category::Work),
        CategoryFilter::Only(Category::Personal),
        CategoryFilter::Only(Category::Other),
    ];

    pub fn matches(self, event: &Event) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(category) => event.category == category,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CategoryFilter::All => "all",
            CategoryFilter::Only(category) => category.as_str(),
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CategoryFilter {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "all" => Ok(CategoryFilter::All),
            "work" => Ok(CategoryFilter::Only(Category::Work)),
            "personal" => Ok(CategoryFilter::Only(Category::Personal)),
            "other" => Ok(CategoryFilter::Only(Category::Other)),
            other => Err(format!(
                "unknown category '{other}', expected one of: all, work, personal, other"
            )),
        }
    }
}

/// Returns the events matching `filter`, keeping their original relative order.
pub fn filter_events(events: &[Event], filter: CategoryFilter) -> Vec<Event> {
    events
        .iter()
        .filter(|event| filter.matches(event))
        .cloned()
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    #[serde(alias = "_id")]
    pub id: EventId,
    pub title: String,
    pub category: Category,
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
    #[serde(with = "wire_time")]
    pub time: NaiveTime,
    #[serde(
        default,
        deserialize_with = "non_empty_notes",
        skip_serializing_if = "Option::is_none"
    )]
    pub notes: Option<String>,
    #[serde(default)]
    pub archived: bool,
}

impl Event {
    pub fn starts_at(&self) -> NaiveDateTime {
        self.date.and_time(self.time)
    }

    /// Active events scheduled after `now`; archived events are never upcoming.
    pub fn is_upcoming(&self, now: NaiveDateTime) -> bool {
        !self.archived && self.starts_at() > now
    }
}

/// Draft payload for `POST /events`. The service assigns id, category and
/// archived state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewEvent {
    pub title: String,
    #[serde(with = "wire_date")]
    pub date: NaiveDate,
    #[serde(with = "wire_time")]
    pub time: NaiveTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

fn non_empty_notes<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    let notes = Option::<String>::deserialize(deserializer)?;
    Ok(notes.filter(|text| !text.trim().is_empty()))
}

mod wire_date {
    use super::*;

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format(DATE_FORMAT))
    }

    // Accepts plain dates and full ISO-8601 timestamps; only the date part is kept.
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        let date_part = raw.split_once('T').map_or(raw.as_str(), |(date, _)| date);
        NaiveDate::parse_from_str(date_part, DATE_FORMAT)
            .map_err(|err| serde::de::Error::custom(format!("invalid date '{raw}': {err}")))
    }
}

mod wire_time {
    use super::*;

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&time.format(TIME_FORMAT))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, TIME_FORMAT)
            .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
            .map_err(|err| serde::de::Error::custom(format!("invalid time '{raw}': {err}")))
    }
}
