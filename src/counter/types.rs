//! Counter domain types and error definitions.

use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Store attribute holding the view count.
pub const VIEWS_FIELD: &str = "views";
/// Store attribute holding the download count.
pub const DOWNLOADS_FIELD: &str = "downloads";
/// Attribute older deployments wrote views under.
pub const LEGACY_VIEWS_FIELD: &str = "count";

/// The kind of event being counted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    View,
    Download,
}

impl Action {
    /// Anything that is not exactly `"download"` counts as a view.
    pub fn parse(raw: &str) -> Self {
        match raw {
            "download" => Action::Download,
            _ => Action::View,
        }
    }

    /// Store attribute this action increments.
    pub fn field(self) -> &'static str {
        match self {
            Action::View => VIEWS_FIELD,
            Action::Download => DOWNLOADS_FIELD,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Action::View => "view",
            Action::Download => "download",
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Action {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Ok(Action::parse(&raw))
    }
}

/// Body of `POST /visitor`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisitorRequest {
    #[serde(default)]
    pub action: Action,
}

/// Full counter aggregate as returned to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CounterState {
    pub views: u64,
    pub downloads: u64,
}

/// Raw attributes of one stored record, as the store returns them.
pub type StoredItem = HashMap<String, i64>;

impl CounterState {
    /// Build the aggregate from a stored record.
    ///
    /// Missing attributes read as zero; `views` falls back to the legacy
    /// `count` attribute.
    pub fn from_item(item: &StoredItem) -> Result<Self, StoreError> {
        let views = item
            .get(VIEWS_FIELD)
            .or_else(|| item.get(LEGACY_VIEWS_FIELD))
            .copied()
            .unwrap_or(0);
        let downloads = item.get(DOWNLOADS_FIELD).copied().unwrap_or(0);

        Ok(Self {
            views: non_negative(VIEWS_FIELD, views)?,
            downloads: non_negative(DOWNLOADS_FIELD, downloads)?,
        })
    }

    pub fn get(&self, action: Action) -> u64 {
        match action {
            Action::View => self.views,
            Action::Download => self.downloads,
        }
    }
}

fn non_negative(field: &str, value: i64) -> Result<u64, StoreError> {
    u64::try_from(value).map_err(|_| StoreError::Malformed(format!("{field} is negative ({value})")))
}

/// Errors reported by a counter store.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// Store could not be reached.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Store rejected the call because of load.
    #[error("store throttled the request")]
    Throttled,

    /// Store answered with data that is not a counter record.
    #[error("malformed store response: {0}")]
    Malformed(String),
}

/// Errors from a counter increment.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CounterError {
    /// The atomic add itself failed; nothing was applied.
    #[error("increment not applied: {0}")]
    Apply(StoreError),

    /// The add was applied but reading the aggregate back failed.
    #[error("increment applied but state could not be read: {0}")]
    ReadBack(StoreError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_parsing_defaults_to_view() {
        assert_eq!(Action::parse("download"), Action::Download);
        assert_eq!(Action::parse("view"), Action::View);
        assert_eq!(Action::parse("DOWNLOAD"), Action::View);
        assert_eq!(Action::parse(""), Action::View);
    }

    #[test]
    fn test_request_body_variants() {
        let req: VisitorRequest = serde_json::from_str("{}").unwrap();
        assert_eq!(req.action, Action::View);

        let req: VisitorRequest = serde_json::from_str(r#"{"action":"download"}"#).unwrap();
        assert_eq!(req.action, Action::Download);

        let req: VisitorRequest = serde_json::from_str(r#"{"action":"share"}"#).unwrap();
        assert_eq!(req.action, Action::View);

        assert!(serde_json::from_str::<VisitorRequest>(r#"{"action":5}"#).is_err());
    }

    #[test]
    fn test_state_from_item() {
        let item: StoredItem = [("downloads".to_string(), 4)].into_iter().collect();
        assert_eq!(CounterState::from_item(&item).unwrap(), CounterState { views: 0, downloads: 4 });

        let legacy: StoredItem = [("count".to_string(), 12)].into_iter().collect();
        assert_eq!(CounterState::from_item(&legacy).unwrap().views, 12);

        let both: StoredItem = [("count".to_string(), 12), ("views".to_string(), 3)].into_iter().collect();
        assert_eq!(CounterState::from_item(&both).unwrap().views, 3);
    }

    #[test]
    fn test_negative_value_is_malformed() {
        let item: StoredItem = [("views".to_string(), -1)].into_iter().collect();
        assert!(matches!(CounterState::from_item(&item), Err(StoreError::Malformed(_))));
    }
}
