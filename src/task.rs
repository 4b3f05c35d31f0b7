//! Grocery item model
//!
//! A list entry is stored as a row in the `tasks` table. The status is a
//! closed two-value enum at this layer and plain text at the storage
//! boundary, so it is parsed (and rejected when unknown) on every read.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Category selector sentinel meaning "no category restriction".
///
/// Never stored; prepended to the category list by callers.
pub const ALL_CATEGORIES: &str = "All";

/// Purchase state of an item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    #[default]
    Planned,
    Purchased,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 2] = [TaskStatus::Planned, TaskStatus::Purchased];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Planned => "planned",
            TaskStatus::Purchased => "purchased",
        }
    }

    /// The other state. These are the only two transitions.
    pub fn toggled(self) -> Self {
        match self {
            TaskStatus::Planned => TaskStatus::Purchased,
            TaskStatus::Purchased => TaskStatus::Planned,
        }
    }

    /// Status implied by a checkbox value.
    pub fn from_checked(checked: bool) -> Self {
        if checked {
            TaskStatus::Purchased
        } else {
            TaskStatus::Planned
        }
    }

    pub fn is_purchased(self) -> bool {
        self == TaskStatus::Purchased
    }

    /// Exact match against the stored column value; no trimming or case folding.
    pub fn from_stored(value: &str) -> Result<Self> {
        match value {
            "planned" => Ok(TaskStatus::Planned),
            "purchased" => Ok(TaskStatus::Purchased),
            _ => Err(Error::InvalidStatus(value.to_string())),
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "planned" => Ok(TaskStatus::Planned),
            "purchased" => Ok(TaskStatus::Purchased),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// A persisted list entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub item: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub category: Option<String>,
}

/// Values for a row that does not exist yet.
///
/// `created_at` is taken when the value is constructed, not when it is
/// inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub item: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
    pub created_by: Option<String>,
    pub category: Option<String>,
}

impl NewTask {
    pub fn new(item: impl Into<String>) -> Self {
        Self {
            item: item.into(),
            description: None,
            status: TaskStatus::default(),
            created_at: Utc::now(),
            created_by: None,
            category: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    pub fn with_created_by(mut self, created_by: impl Into<String>) -> Self {
        self.created_by = Some(created_by.into());
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Trim text fields and drop blank optionals.
    pub fn normalized(self) -> Self {
        Self {
            item: self.item.trim().to_string(),
            description: self.description.as_deref().and_then(non_empty),
            status: self.status,
            created_at: self.created_at,
            created_by: self.created_by.as_deref().and_then(non_empty),
            category: self.category.as_deref().and_then(non_empty),
        }
    }

    /// Constraints the add form enforces before anything reaches storage.
    pub fn validate(&self) -> Result<()> {
        if self.item.trim().is_empty() {
            return Err(Error::validation("item", "is required"));
        }
        if self.created_by.as_deref().and_then(non_empty).is_none() {
            return Err(Error::validation("created_by", "is required"));
        }
        let Some(category) = self.category.as_deref().and_then(non_empty) else {
            return Err(Error::validation("category", "is required"));
        };
        if category == ALL_CATEGORIES {
            return Err(Error::validation(
                "category",
                format!("'{ALL_CATEGORIES}' is reserved for the filter"),
            ));
        }
        Ok(())
    }
}

/// Category part of a list query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    /// Interpret a selector value; the `All` sentinel and blanks mean no filter.
    pub fn from_selection(value: &str) -> Self {
        let trimmed = value.trim();
        if trimmed.is_empty() || trimmed == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(trimmed.to_string())
        }
    }

    pub fn label(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }

    pub fn category(&self) -> Option<&str> {
        match self {
            CategoryFilter::All => None,
            CategoryFilter::Only(category) => Some(category),
        }
    }
}

/// Search text plus category selection
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub search: String,
    pub category: CategoryFilter,
}

impl TaskFilter {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.search.is_empty() && self.category == CategoryFilter::All
    }
}

/// Prepend the `All` sentinel to a stored category list.
pub fn category_options(categories: Vec<String>) -> Vec<String> {
    let mut options = Vec::with_capacity(categories.len() + 1);
    options.push(ALL_CATEGORIES.to_string());
    options.extend(categories);
    options
}

pub fn format_timestamp(value: DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Parse a stored `created_at`.
///
/// Accepts RFC 3339 and SQLite's `YYYY-MM-DD HH:MM:SS[.f]` text, the latter
/// read as local time.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Some(parsed.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f"))
        .ok()?;
    let local = Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| Utc.from_utc_datetime(&naive));
    Some(local)
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete(item: &str) -> NewTask {
        NewTask::new(item)
            .with_created_by("sam")
            .with_category("Dairy")
    }

    #[test]
    fn new_task_defaults_to_planned() {
        assert_eq!(NewTask::new("Milk").status, TaskStatus::Planned);
    }

    #[test]
    fn created_at_is_taken_per_construction() {
        let first = NewTask::new("Milk");
        std::thread::sleep(std::time::Duration::from_millis(5));
        let second = NewTask::new("Eggs");
        assert!(second.created_at > first.created_at);
    }

    #[test]
    fn toggling_twice_restores_status() {
        for status in TaskStatus::ALL {
            assert_ne!(status.toggled(), status);
            assert_eq!(status.toggled().toggled(), status);
        }
    }

    #[test]
    fn stored_status_must_match_exactly() {
        assert_eq!(TaskStatus::from_stored("planned").unwrap(), TaskStatus::Planned);
        assert_eq!(TaskStatus::from_stored("purchased").unwrap(), TaskStatus::Purchased);
        for raw in ["Planned", " purchased", "PURCHASED", ""] {
            assert!(matches!(
                TaskStatus::from_stored(raw),
                Err(Error::InvalidStatus(value)) if value == raw
            ));
        }
        assert_eq!(" Purchased ".parse::<TaskStatus>().unwrap(), TaskStatus::Purchased);
    }

    #[test]
    fn checkbox_maps_to_status() {
        assert_eq!(TaskStatus::from_checked(true), TaskStatus::Purchased);
        assert_eq!(TaskStatus::from_checked(false), TaskStatus::Planned);
    }

    #[test]
    fn status_parses_known_values_only() {
        assert_eq!("planned".parse::<TaskStatus>().unwrap(), TaskStatus::Planned);
        assert_eq!(
            " Purchased ".parse::<TaskStatus>().unwrap(),
            TaskStatus::Purchased
        );
        let err = "done".parse::<TaskStatus>().expect_err("unknown status");
        assert!(matches!(err, Error::InvalidStatus(value) if value == "done"));
    }

    #[test]
    fn status_serializes_lowercase() {
        let json = serde_json::to_string(&TaskStatus::Purchased).unwrap();
        assert_eq!(json, "\"purchased\"");
    }

    #[test]
    fn validate_requires_item_author_and_category() {
        assert!(complete("Milk").validate().is_ok());

        let err = complete("   ").validate().expect_err("blank item");
        assert!(matches!(err, Error::Validation { field: "item", .. }));

        let mut missing_author = complete("Milk");
        missing_author.created_by = Some("  ".to_string());
        let err = missing_author.validate().expect_err("blank author");
        assert!(matches!(err, Error::Validation { field: "created_by", .. }));

        let mut missing_category = complete("Milk");
        missing_category.category = None;
        let err = missing_category.validate().expect_err("no category");
        assert!(matches!(err, Error::Validation { field: "category", .. }));
    }

    #[test]
    fn validate_rejects_all_sentinel_as_category() {
        let err = NewTask::new("Milk")
            .with_created_by("sam")
            .with_category("All")
            .validate()
            .expect_err("sentinel");
        assert!(matches!(err, Error::Validation { field: "category", .. }));
    }

    #[test]
    fn normalized_trims_and_drops_blanks() {
        let task = NewTask::new("  Milk ")
            .with_description("   ")
            .with_created_by(" sam ")
            .with_category("Dairy")
            .normalized();
        assert_eq!(task.item, "Milk");
        assert_eq!(task.description, None);
        assert_eq!(task.created_by.as_deref(), Some("sam"));
    }

    #[test]
    fn category_filter_treats_sentinel_as_all() {
        assert_eq!(CategoryFilter::from_selection("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::from_selection(""), CategoryFilter::All);
        assert_eq!(
            CategoryFilter::from_selection("Produce"),
            CategoryFilter::Only("Produce".to_string())
        );
        assert_eq!(CategoryFilter::All.category(), None);
    }

    #[test]
    fn category_options_prepend_all() {
        let options = category_options(vec!["Dairy".to_string(), "Produce".to_string()]);
        assert_eq!(options, vec!["All", "Dairy", "Produce"]);
    }

    #[test]
    fn parse_timestamp_accepts_rfc3339_and_sqlite_text() {
        let now = Utc::now();
        let stored = format_timestamp(now);
        let parsed = parse_timestamp(&stored).expect("rfc3339");
        assert_eq!(parsed.timestamp_micros(), now.timestamp_micros());

        assert!(parse_timestamp("2024-03-01 09:30:00.123456").is_some());
        assert!(parse_timestamp("2024-03-01 09:30:00").is_some());
        assert!(parse_timestamp("yesterday").is_none());
    }
}
