use crate::database::ItemStore;
use crate::error::AppError;
use crate::models::quote::QUOTE_COLUMNS;
use crate::models::{QuoteCategory, QuoteRecord};
use crate::services::quote_catalog::{self, SEED_QUOTE_COUNT};
use rusqlite::params;

pub(crate) fn insert_quote(store: &ItemStore, quote: &QuoteRecord) -> Result<i64, AppError> {
    quote.validate()?;
    store.begin_write()?;

    store.conn().execute(
        "INSERT INTO quotes (text, author, category, day_number, is_custom, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            &quote.text,
            &quote.author,
            quote.category.as_str(),
            quote.day_number,
            quote.is_custom,
            quote.created_at,
        ],
    )?;

    Ok(store.conn().last_insert_rowid())
}

/// Seeds the built-in quotes when fewer than 365 are stored.
///
/// Non-custom quotes are replaced by the full seed set, custom quotes are kept.
/// Returns the number of inserted quotes (0 when the store was left untouched).
pub fn seed_quotes_if_needed(store: &ItemStore) -> Result<usize, AppError> {
    let existing = count_quotes(store)?;
    if existing >= SEED_QUOTE_COUNT {
        log::debug!("{} quotes stored, skipping seed", existing);
        return Ok(0);
    }

    let seeds = quote_catalog::seed_quotes();
    let replace = || -> Result<usize, AppError> {
        store.begin_write()?;
        let removed = store
            .conn()
            .execute("DELETE FROM quotes WHERE is_custom = 0", [])?;
        for quote in &seeds {
            insert_quote(store, quote)?;
        }
        store.save()?;
        Ok(removed)
    };

    let removed = match replace() {
        Ok(removed) => removed,
        Err(e) => {
            log::error!("Quote seeding failed, discarding partial seed: {}", e);
            store.reset()?;
            return Err(e);
        }
    };

    log::info!(
        "Seeded {} quotes (replaced {} built-in, kept {} custom)",
        seeds.len(),
        removed,
        existing as usize - removed
    );
    Ok(seeds.len())
}

/// All quotes, ascending by id
pub fn list_quotes(store: &ItemStore) -> Result<Vec<QuoteRecord>, AppError> {
    let mut stmt = store
        .conn()
        .prepare(&format!("SELECT {} FROM quotes ORDER BY id ASC", QUOTE_COLUMNS))?;

    let quotes = stmt
        .query_map([], |row| QuoteRecord::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(quotes)
}

pub fn count_quotes(store: &ItemStore) -> Result<i64, AppError> {
    let count = store
        .conn()
        .query_row("SELECT COUNT(*) FROM quotes", [], |row| row.get(0))?;
    Ok(count)
}

/// Adds a user-authored quote and saves it
pub fn add_custom_quote(
    store: &ItemStore,
    text: String,
    author: Option<String>,
    category: QuoteCategory,
) -> Result<i64, AppError> {
    let mut quote = QuoteRecord::custom(text.trim().to_string(), author, category);
    quote.day_number = store.conn().query_row(
        "SELECT COALESCE(MAX(day_number), 0) + 1 FROM quotes",
        [],
        |row| row.get(0),
    )?;

    let id = insert_quote(store, &quote)?;
    store.save()?;
    Ok(id)
}

pub fn delete_quote(store: &ItemStore, id: i64) -> Result<(), AppError> {
    let exists: bool = store.conn().query_row(
        "SELECT EXISTS(SELECT 1 FROM quotes WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    if !exists {
        return Err(AppError::NotFound(format!("Quote {}", id)));
    }

    store.begin_write()?;
    store.conn().execute("DELETE FROM quotes WHERE id = ?1", [id])?;
    store.save()?;
    Ok(())
}
