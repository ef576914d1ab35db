//! Market app (catalog entry) type definitions

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Functional category of an app; drives the derived tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AppMode {
    Chat,
    Completion,
    Workflow,
    AgentChat,
    AdvancedChat,
    AnalyticsChat,
    MultiAgentChat,
    Channel,
}

impl AppMode {
    /// All modes the catalog backend knows about
    pub const ALL: [Self; 8] = [
        Self::Chat,
        Self::Completion,
        Self::Workflow,
        Self::AgentChat,
        Self::AdvancedChat,
        Self::AnalyticsChat,
        Self::MultiAgentChat,
        Self::Channel,
    ];

    /// Wire value (`agent-chat`, ...)
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Chat => "chat",
            Self::Completion => "completion",
            Self::Workflow => "workflow",
            Self::AgentChat => "agent-chat",
            Self::AdvancedChat => "advanced-chat",
            Self::AnalyticsChat => "analytics-chat",
            Self::MultiAgentChat => "multi-agent-chat",
            Self::Channel => "channel",
        }
    }

    /// The immutable first tag of every entry with this mode.
    #[must_use]
    pub fn derived_tag(self) -> String {
        format!("#{}", self.as_str())
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s)
            .ok_or_else(|| CoreError::ValidationError(format!("Unknown app mode: '{s}'")))
    }
}

/// Catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketApp {
    /// Entry ID
    pub id: String,
    /// Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub mode: AppMode,
    /// Tags; index 0 is the derived mode tag
    #[serde(rename = "hashcode", default)]
    pub tags: Vec<String>,
    /// Actor that published the entry
    pub creator: String,
    /// Priority flag, listed first
    #[serde(with = "crate::utils::int_flag", default)]
    pub important: bool,
    #[serde(with = "crate::utils::datetime")]
    pub updated_at: DateTime<Utc>,
}

impl MarketApp {
    #[must_use]
    pub fn derived_tag(&self) -> String {
        self.mode.derived_tag()
    }

    /// Tags as shown on a card: the stored first tag is always replaced by the
    /// freshly derived one.
    #[must_use]
    pub fn display_tags(&self) -> Vec<String> {
        let mut tags = Vec::with_capacity(self.tags.len().max(1));
        tags.push(self.derived_tag());
        tags.extend(self.tags.iter().skip(1).cloned());
        tags
    }
}

/// Workspace app a new catalog entry is published from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceApp {
    pub id: String,
    pub name: String,
    pub mode: AppMode,
}

/// Create (publish) request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMarketAppRequest {
    /// Source workspace app ID
    pub app_id: String,
    pub name: String,
    pub description: String,
    pub mode: AppMode,
    #[serde(rename = "hashcode")]
    pub tags: Vec<String>,
    #[serde(with = "crate::utils::int_flag")]
    pub important: bool,
}

/// Update request (partial; absent fields are left untouched)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateMarketAppRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "hashcode", skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(
        with = "crate::utils::int_flag::option",
        skip_serializing_if = "Option::is_none",
        default
    )]
    pub important: Option<bool>,
}

impl UpdateMarketAppRequest {
    /// Apply the update to an existing entry and stamp `updated_at`
    pub fn apply_to(&self, app: &mut MarketApp) {
        if let Some(ref name) = self.name {
            app.name.clone_from(name);
        }
        if let Some(ref description) = self.description {
            app.description.clone_from(description);
        }
        if let Some(ref tags) = self.tags {
            app.tags.clone_from(tags);
        }
        if let Some(important) = self.important {
            app.important = important;
        }
        app.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MarketApp {
        MarketApp {
            id: "m1".to_string(),
            name: "Budget bot".to_string(),
            description: String::new(),
            mode: AppMode::AgentChat,
            tags: vec!["#agent".to_string(), "finance".to_string()],
            creator: "u1".to_string(),
            important: false,
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn derived_tag_uses_wire_name() {
        assert_eq!(AppMode::Chat.derived_tag(), "#chat");
        assert_eq!(AppMode::AnalyticsChat.derived_tag(), "#analytics-chat");
    }

    #[test]
    fn mode_parses_from_wire_name() {
        assert_eq!("advanced-chat".parse::<AppMode>().unwrap(), AppMode::AdvancedChat);
        assert!("all".parse::<AppMode>().is_err());
    }

    #[test]
    fn display_tags_regenerate_first_tag() {
        assert_eq!(sample().display_tags(), vec!["#agent-chat", "finance"]);

        let mut untagged = sample();
        untagged.tags.clear();
        assert_eq!(untagged.display_tags(), vec!["#agent-chat"]);
    }

    #[test]
    fn decodes_backend_json() {
        let json = r##"{
            "id": "m9",
            "name": "Helper",
            "description": "",
            "mode": "chat",
            "hashcode": ["#chat", "hr"],
            "creator": "u7",
            "important": 1,
            "updated_at": "2024-03-02 10:00:00"
        }"##;
        let app: MarketApp = serde_json::from_str(json).unwrap();
        assert!(app.important);
        assert_eq!(app.tags, vec!["#chat", "hr"]);
    }

    #[test]
    fn partial_update_keeps_untouched_fields() {
        let mut app = sample();
        let before = app.updated_at;
        UpdateMarketAppRequest {
            important: Some(true),
            ..Default::default()
        }
        .apply_to(&mut app);

        assert!(app.important);
        assert_eq!(app.name, "Budget bot");
        assert_eq!(app.tags.len(), 2);
        assert!(app.updated_at >= before);
    }

    #[test]
    fn update_payload_omits_absent_fields() {
        let update = UpdateMarketAppRequest {
            name: Some("x".to_string()),
            important: Some(false),
            ..Default::default()
        };
        let json = serde_json::to_value(&update).unwrap();
        assert_eq!(json, serde_json::json!({"name": "x", "important": 0}));
    }
}
