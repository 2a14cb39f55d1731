use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Which collection a [`SelectionCache`] belongs to
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SelectionKind {
    Photo,
    Quote,
}

impl SelectionKind {
    pub fn as_str(&self) -> &str {
        match self {
            SelectionKind::Photo => "photo",
            SelectionKind::Quote => "quote",
        }
    }
}

/// Remembers which item was picked on which calendar day
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectionCache {
    pub date: Option<NaiveDate>,
    pub selected_id: Option<i64>,
}

impl SelectionCache {
    pub fn new(date: NaiveDate, selected_id: i64) -> Self {
        Self {
            date: Some(date),
            selected_id: Some(selected_id),
        }
    }

    /// Cached id if the cache was written on `today`
    pub fn id_for(&self, today: NaiveDate) -> Option<i64> {
        match self.date {
            Some(date) if date == today => self.selected_id,
            _ => None,
        }
    }

    /// `YYYY-MM-DD` form of the cached date
    pub fn date_string(&self) -> Option<String> {
        self.date.map(|d| d.format("%Y-%m-%d").to_string())
    }
}

/// Anything the daily selector can pick from
pub trait Selectable {
    fn selection_id(&self) -> i64;
}

impl Selectable for crate::models::PhotoRecord {
    fn selection_id(&self) -> i64 {
        self.id
    }
}

impl Selectable for crate::models::QuoteRecord {
    fn selection_id(&self) -> i64 {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_for_only_matches_same_day() {
        let day = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let cache = SelectionCache::new(day, 7);
        assert_eq!(cache.id_for(day), Some(7));
        assert_eq!(cache.id_for(day.succ_opt().unwrap()), None);
        assert_eq!(SelectionCache::default().id_for(day), None);
        assert_eq!(cache.date_string().as_deref(), Some("2025-06-01"));
    }
}
