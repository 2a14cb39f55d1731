//! Deterministic "item of the day" selection.
//!
//! Photos use the epoch day modulo the collection size and stick to the
//! chosen id for the rest of the calendar day. Quotes use a day-of-year hash
//! without a daily cache; `QuoteSelection::Sticky` switches them to the
//! photo policy.

use crate::database::ItemStore;
use crate::error::AppError;
use crate::models::{Selectable, SelectionCache, SelectionKind};
use chrono::{Datelike, NaiveDate, NaiveTime};
use rusqlite::{params, OptionalExtension};

const SECONDS_PER_DAY: i64 = 86_400;

/// Days since 1970-01-01 of `today` at midnight UTC
pub fn days_since_epoch(today: NaiveDate) -> i64 {
    let midnight = today.and_time(NaiveTime::MIN).and_utc();
    midnight.timestamp().div_euclid(SECONDS_PER_DAY)
}

/// Picks today's item, reusing the cached id while it is from today and still present.
///
/// `items` must be sorted ascending by identifier.
pub fn select_for_today<'a, T: Selectable>(
    items: &'a [T],
    today: NaiveDate,
    cache: &SelectionCache,
) -> Result<(&'a T, SelectionCache), AppError> {
    if items.is_empty() {
        return Err(AppError::EmptyCollection("items".to_string()));
    }

    if let Some(cached_id) = cache.id_for(today) {
        if let Some(item) = items.iter().find(|i| i.selection_id() == cached_id) {
            return Ok((item, cache.clone()));
        }
        log::debug!("Cached selection {} no longer present, reselecting", cached_id);
    }

    let index = days_since_epoch(today).rem_euclid(items.len() as i64) as usize;
    let item = &items[index];
    Ok((item, SelectionCache::new(today, item.selection_id())))
}

/// Index of today's quote: `(day_of_year + (year - 2023)) * 73 + 37` modulo the count
pub fn quote_index(day_of_year: u32, year: i32, quote_count: usize) -> Option<usize> {
    if quote_count == 0 {
        return None;
    }
    let hash = (day_of_year as i64 + (year as i64 - 2023)) * 73 + 37;
    Some(hash.rem_euclid(quote_count as i64) as usize)
}

pub fn select_quote_for_day<T>(quotes: &[T], today: NaiveDate) -> Result<&T, AppError> {
    quote_index(today.ordinal(), today.year(), quotes.len())
        .map(|index| &quotes[index])
        .ok_or_else(|| AppError::EmptyCollection("quotes".to_string()))
}

/// Loads the persisted cache for `kind`; missing rows yield an empty cache
pub fn load_selection_cache(
    store: &ItemStore,
    kind: SelectionKind,
) -> Result<SelectionCache, AppError> {
    let cache = store
        .conn()
        .query_row(
            "SELECT selected_date, selected_id FROM selection_cache WHERE kind = ?1",
            [kind.as_str()],
            |row| {
                Ok(SelectionCache {
                    date: row.get(0)?,
                    selected_id: row.get(1)?,
                })
            },
        )
        .optional()?;

    Ok(cache.unwrap_or_default())
}

pub fn store_selection_cache(
    store: &ItemStore,
    kind: SelectionKind,
    cache: &SelectionCache,
) -> Result<(), AppError> {
    store.begin_write()?;
    store.conn().execute(
        "INSERT INTO selection_cache (kind, selected_date, selected_id) VALUES (?1, ?2, ?3)
         ON CONFLICT(kind) DO UPDATE SET
            selected_date = excluded.selected_date,
            selected_id = excluded.selected_id",
        params![kind.as_str(), cache.date, cache.selected_id],
    )?;
    store.save()?;
    Ok(())
}
