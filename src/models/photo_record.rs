use crate::error::AppError;
use chrono::{DateTime, NaiveDate, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Column list matching [`PhotoRecord`]'s `TryFrom<&Row>` order
pub const PHOTO_COLUMNS: &str =
    "id, uuid, day_number, assigned_date, relative_path, viewed, favorite, created_at, note";

/// One imported photo and its place in the daily sequence
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PhotoRecord {
    /// Stable identifier, ascending in insertion order (0 until stored)
    pub id: i64,
    pub uuid: Uuid,
    /// Sequence position assigned at import (starting at 1)
    pub day_number: i64,
    pub assigned_date: NaiveDate,
    /// File name under the photo directory
    pub relative_path: Option<String>,
    pub viewed: bool,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
    pub note: Option<String>,
}

impl PhotoRecord {
    pub fn new(uuid: Uuid, day_number: i64, assigned_date: NaiveDate, relative_path: String) -> Self {
        Self {
            id: 0,
            uuid,
            day_number,
            assigned_date,
            relative_path: Some(relative_path),
            viewed: false,
            favorite: false,
            created_at: Utc::now(),
            note: None,
        }
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.day_number < 1 {
            return Err(AppError::Validation(
                "Day number must start at 1".to_string(),
            ));
        }

        if let Some(note) = &self.note {
            if note.chars().count() > 2000 {
                return Err(AppError::Validation(
                    "Note must not exceed 2000 characters".to_string(),
                ));
            }
        }

        Ok(())
    }
}

impl<'r> TryFrom<&Row<'r>> for PhotoRecord {
    type Error = rusqlite::Error;

    fn try_from(row: &Row<'r>) -> Result<Self, Self::Error> {
        let uuid_str: String = row.get(1)?;

        Ok(PhotoRecord {
            id: row.get(0)?,
            uuid: Uuid::parse_str(&uuid_str).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
            })?,
            day_number: row.get(2)?,
            assigned_date: row.get(3)?,
            relative_path: row.get(4)?,
            viewed: row.get(5)?,
            favorite: row.get(6)?,
            created_at: row.get(7)?,
            note: row.get(8)?,
        })
    }
}
