use serde::{Deserialize, Serialize};

/// Interface language supplied by the host application.
///
/// Also selects which segment of a bilingual notification message is shown.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Fa,
}

impl Language {
    /// Text direction implied by the language.
    pub fn direction(self) -> TextDirection {
        match self {
            Language::En => TextDirection::Ltr,
            Language::Fa => TextDirection::Rtl,
        }
    }
}

/// Layout direction for the dropdown panel.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct BellConfig {
    /// Interface language for message selection and relative-time labels.
    pub language: Language,
    /// Milliseconds between unread-count polls.
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,
    /// Maximum number of notifications requested when the dropdown opens.
    #[serde(default = "default_list_limit")]
    pub list_limit: u32,
}

impl Default for BellConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            poll_interval_ms: default_poll_interval_ms(),
            list_limit: default_list_limit(),
        }
    }
}

// Default value helpers for serde
const fn default_poll_interval_ms() -> u64 {
    30_000
}

const fn default_list_limit() -> u32 {
    10
}
