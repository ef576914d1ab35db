//! List filter types

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::market_app::AppMode;
use crate::error::CoreError;

/// Category tab; `All` is the sentinel that disables the mode filter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Category {
    #[default]
    All,
    Mode(AppMode),
}

impl Category {
    /// Tabs offered by the catalog screen, in display order
    pub const TAB_OPTIONS: [Self; 5] = [
        Self::All,
        Self::Mode(AppMode::Chat),
        Self::Mode(AppMode::AgentChat),
        Self::Mode(AppMode::AdvancedChat),
        Self::Mode(AppMode::AnalyticsChat),
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Mode(mode) => mode.as_str(),
        }
    }

    /// Mode filter to send, `None` for `All`
    #[must_use]
    pub fn mode(self) -> Option<AppMode> {
        match self {
            Self::All => None,
            Self::Mode(mode) => Some(mode),
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "all" {
            return Ok(Self::All);
        }
        s.parse().map(Self::Mode)
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Active category plus trimmed search text
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterState {
    pub category: Category,
    pub search_text: String,
}

impl FilterState {
    /// Build a filter, trimming the raw search input
    #[must_use]
    pub fn new(category: Category, search_text: &str) -> Self {
        Self {
            category,
            search_text: search_text.trim().to_string(),
        }
    }

    /// Search text as sent to the catalog: every `#` removed, trimmed, `None` when empty
    #[must_use]
    pub fn query_text(&self) -> Option<String> {
        let cleaned = self.search_text.replace('#', "");
        let cleaned = cleaned.trim();
        (!cleaned.is_empty()).then(|| cleaned.to_string())
    }
}
