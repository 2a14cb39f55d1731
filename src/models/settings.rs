use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    System,
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &str {
        match self {
            Theme::System => "system",
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "light" => Theme::Light,
            "dark" => Theme::Dark,
            _ => Theme::System,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FontSize {
    Small,
    Medium,
    Large,
}

impl FontSize {
    pub fn as_str(&self) -> &str {
        match self {
            FontSize::Small => "small",
            FontSize::Medium => "medium",
            FontSize::Large => "large",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "small" => FontSize::Small,
            "large" => FontSize::Large,
            _ => FontSize::Medium,
        }
    }
}

/// App settings, stored as a single row
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Settings {
    pub notification_time: NaiveTime,
    pub theme: Theme,
    pub font_size: FontSize,
    pub onboarding_complete: bool,
    /// Date of day number 1
    pub start_date: NaiveDate,
}

impl Settings {
    pub fn default_notification_time() -> NaiveTime {
        NaiveTime::from_hms_opt(9, 0, 0).unwrap_or(NaiveTime::MIN)
    }

    /// Defaults for a first run starting on `start_date`
    pub fn defaults(start_date: NaiveDate) -> Self {
        Self {
            notification_time: Self::default_notification_time(),
            theme: Theme::System,
            font_size: FontSize::Medium,
            onboarding_complete: false,
            start_date,
        }
    }
}
