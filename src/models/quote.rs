use crate::error::AppError;
use chrono::{DateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

pub const UNKNOWN_AUTHOR: &str = "Unknown";

pub const QUOTE_COLUMNS: &str = "id, text, author, category, day_number, created_at, is_custom";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum QuoteCategory {
    Hope,
    Love,
    Remembrance,
    Strength,
}

impl QuoteCategory {
    pub fn as_str(&self) -> &str {
        match self {
            QuoteCategory::Hope => "hope",
            QuoteCategory::Love => "love",
            QuoteCategory::Remembrance => "remembrance",
            QuoteCategory::Strength => "strength",
        }
    }

    pub fn from_str(s: &str) -> Self {
        match s {
            "love" => QuoteCategory::Love,
            "remembrance" => QuoteCategory::Remembrance,
            "strength" => QuoteCategory::Strength,
            _ => QuoteCategory::Hope,
        }
    }

    /// Seeding order; day `n` uses `all()[(n - 1) % 4]`
    pub fn all() -> &'static [QuoteCategory] {
        static ALL: [QuoteCategory; 4] = [
            QuoteCategory::Hope,
            QuoteCategory::Love,
            QuoteCategory::Remembrance,
            QuoteCategory::Strength,
        ];
        &ALL
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct QuoteRecord {
    pub id: i64,
    pub text: String,
    pub author: String,
    pub category: QuoteCategory,
    pub day_number: i64,
    pub created_at: DateTime<Utc>,
    pub is_custom: bool,
}

impl QuoteRecord {
    /// Creates a quote; a missing or blank author is stored as "Unknown"
    pub fn new(text: String, author: Option<String>, category: QuoteCategory, day_number: i64) -> Self {
        let author = author
            .map(|a| a.trim().to_string())
            .filter(|a| !a.is_empty())
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string());

        Self {
            id: 0,
            text,
            author,
            category,
            day_number,
            created_at: Utc::now(),
            is_custom: false,
        }
    }

    /// Creates a user-authored quote
    pub fn custom(text: String, author: Option<String>, category: QuoteCategory) -> Self {
        Self {
            is_custom: true,
            ..Self::new(text, author, category, 0)
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.text.trim().is_empty() {
            return Err(AppError::Validation("Quote text must not be empty".to_string()));
        }

        if self.text.chars().count() > 500 {
            return Err(AppError::Validation(
                "Quote text must not exceed 500 characters".to_string(),
            ));
        }

        Ok(())
    }
}

impl<'r> TryFrom<&Row<'r>> for QuoteRecord {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'r>) -> Result<Self, Self::Error> {
        let category_str: String = row.get(3)?;

        Ok(QuoteRecord {
            id: row.get(0)?,
            text: row.get(1)?,
            author: row.get(2)?,
            category: QuoteCategory::from_str(&category_str),
            day_number: row.get(4)?,
            created_at: row.get(5)?,
            is_custom: row.get(6)?,
        })
    }
}
