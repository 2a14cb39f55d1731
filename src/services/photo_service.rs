use crate::database::ItemStore;
use crate::error::AppError;
use crate::models::photo_record::PHOTO_COLUMNS;
use crate::models::PhotoRecord;
use photo_gallery::PhotoGalleryService;
use rusqlite::{params, params_from_iter, OptionalExtension};

/// Inserts a photo record (pending until the store is saved)
pub fn create_photo(store: &ItemStore, photo: &PhotoRecord) -> Result<i64, AppError> {
    photo.validate()?;
    store.begin_write()?;

    store.conn().execute(
        "INSERT INTO photos (uuid, day_number, assigned_date, relative_path, viewed, favorite, note, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            photo.uuid.to_string(),
            photo.day_number,
            photo.assigned_date,
            &photo.relative_path,
            photo.viewed,
            photo.favorite,
            &photo.note,
            photo.created_at,
        ],
    )?;

    Ok(store.conn().last_insert_rowid())
}

/// All photos sorted ascending by their stable identifier
pub fn list_photos(store: &ItemStore) -> Result<Vec<PhotoRecord>, AppError> {
    let mut stmt = store
        .conn()
        .prepare(&format!("SELECT {} FROM photos ORDER BY id ASC", PHOTO_COLUMNS))?;

    let photos = stmt
        .query_map([], |row| PhotoRecord::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(photos)
}

pub fn list_favorites(store: &ItemStore) -> Result<Vec<PhotoRecord>, AppError> {
    let mut stmt = store.conn().prepare(&format!(
        "SELECT {} FROM photos WHERE favorite = 1 ORDER BY id ASC",
        PHOTO_COLUMNS
    ))?;

    let photos = stmt
        .query_map([], |row| PhotoRecord::try_from(row))?
        .collect::<Result<Vec<_>, _>>()?;

    Ok(photos)
}

pub fn get_photo(store: &ItemStore, id: i64) -> Result<PhotoRecord, AppError> {
    store
        .conn()
        .query_row(
            &format!("SELECT {} FROM photos WHERE id = ?1", PHOTO_COLUMNS),
            [id],
            |row| PhotoRecord::try_from(row),
        )
        .optional()?
        .ok_or_else(|| AppError::NotFound(format!("Photo {}", id)))
}

pub fn count_photos(store: &ItemStore) -> Result<i64, AppError> {
    let count = store
        .conn()
        .query_row("SELECT COUNT(*) FROM photos", [], |row| row.get(0))?;
    Ok(count)
}

fn record_exists(store: &ItemStore, id: i64) -> Result<bool, AppError> {
    let exists = store.conn().query_row(
        "SELECT EXISTS(SELECT 1 FROM photos WHERE id = ?1)",
        [id],
        |row| row.get(0),
    )?;
    Ok(exists)
}

/// Updates one column of an existing photo; a missing photo leaves the store untouched
fn update_one(store: &ItemStore, id: i64, sql: &str, value: &dyn rusqlite::ToSql) -> Result<(), AppError> {
    if !record_exists(store, id)? {
        return Err(AppError::NotFound(format!("Photo {}", id)));
    }
    store.begin_write()?;
    store.conn().execute(sql, params![value, id])?;
    Ok(())
}

pub fn mark_viewed(store: &ItemStore, id: i64) -> Result<(), AppError> {
    update_one(store, id, "UPDATE photos SET viewed = ?1 WHERE id = ?2", &true)
}

/// Flips the favorite flag and returns the new value
pub fn toggle_favorite(store: &ItemStore, id: i64) -> Result<bool, AppError> {
    let photo = get_photo(store, id)?;
    let favorite = !photo.favorite;
    update_one(store, id, "UPDATE photos SET favorite = ?1 WHERE id = ?2", &favorite)?;
    Ok(favorite)
}

/// Replaces the note; blank text clears it
pub fn update_note(store: &ItemStore, id: i64, note: Option<String>) -> Result<(), AppError> {
    let note = note.filter(|n| !n.trim().is_empty());
    if let Some(n) = &note {
        if n.chars().count() > 2000 {
            return Err(AppError::Validation(
                "Note must not exceed 2000 characters".to_string(),
            ));
        }
    }
    update_one(store, id, "UPDATE photos SET note = ?1 WHERE id = ?2", &note)
}

/// Deletes several records in one statement (pending until saved)
pub fn delete_photos(store: &ItemStore, ids: &[i64]) -> Result<usize, AppError> {
    if ids.is_empty() {
        return Ok(0);
    }
    store.begin_write()?;

    let placeholders = vec!["?"; ids.len()].join(", ");
    let rows = store.conn().execute(
        &format!("DELETE FROM photos WHERE id IN ({})", placeholders),
        params_from_iter(ids.iter()),
    )?;

    Ok(rows)
}

/// Deletes a photo record together with its file
pub fn delete_photo(
    store: &ItemStore,
    gallery: &PhotoGalleryService,
    id: i64,
) -> Result<(), AppError> {
    let photo = get_photo(store, id)?;
    delete_photos(store, &[id])?;
    store.save()?;

    if let Some(path) = &photo.relative_path {
        if let Err(e) = gallery.delete_photo_file(path) {
            log::warn!("Photo {} deleted but file {} remained: {}", id, path, e);
        }
    }

    Ok(())
}
