//! Backup archives: `backup.json` plus the photo files under `photos/`.

use crate::database::ItemStore;
use crate::error::AppError;
use crate::models::{PhotoRecord, QuoteRecord, Settings};
use crate::services::{photo_service, quote_service, settings_service};
use chrono::Utc;
use photo_gallery::PhotoGalleryService;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::{Read, Write};
use std::path::Path;

pub const BACKUP_FORMAT_VERSION: u32 = 1;
const BACKUP_JSON: &str = "backup.json";
const PHOTOS_PREFIX: &str = "photos/";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupMetadata {
    pub format_version: u32,
    pub exported_at: String,
    pub app_version: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackupPayload {
    pub metadata: BackupMetadata,
    pub photos: Vec<PhotoRecord>,
    /// Only user-authored quotes; built-in ones are seeded on start
    pub custom_quotes: Vec<QuoteRecord>,
    pub settings: Option<Settings>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportSummary {
    pub photos: usize,
    pub files: usize,
    pub custom_quotes: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RestoreSummary {
    pub photos: usize,
    pub files: usize,
    pub custom_quotes: usize,
    pub settings: bool,
}

/// Writes a backup archive to `path`, replacing an existing file
pub fn export_backup(
    store: &ItemStore,
    gallery: &PhotoGalleryService,
    path: &Path,
) -> Result<ExportSummary, AppError> {
    let photos = photo_service::list_photos(store)?;
    let custom_quotes: Vec<QuoteRecord> = quote_service::list_quotes(store)?
        .into_iter()
        .filter(|q| q.is_custom)
        .collect();

    let payload = BackupPayload {
        metadata: BackupMetadata {
            format_version: BACKUP_FORMAT_VERSION,
            exported_at: Utc::now().to_rfc3339(),
            app_version: env!("CARGO_PKG_VERSION").to_string(),
        },
        photos,
        custom_quotes,
        settings: settings_service::load_settings(store)?,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let file = fs::File::create(path)?;

    let mut zip = zip::ZipWriter::new(file);
    let options: zip::write::FileOptions<'_, ()> =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    zip.start_file(BACKUP_JSON, options)?;
    zip.write_all(&serde_json::to_vec_pretty(&payload)?)?;

    // JPEGs are already compressed
    let stored: zip::write::FileOptions<'_, ()> =
        zip::write::FileOptions::default().compression_method(zip::CompressionMethod::Stored);

    let mut files = 0;
    for photo in &payload.photos {
        let Some(rel_path) = photo.relative_path.as_deref() else {
            continue;
        };
        match gallery.read_photo(rel_path) {
            Ok(bytes) => {
                zip.start_file(format!("{}{}", PHOTOS_PREFIX, rel_path), stored)?;
                zip.write_all(&bytes)?;
                files += 1;
            }
            Err(e) => log::warn!("Photo {} left out of backup: {}", rel_path, e),
        }
    }

    zip.finish()?;

    let summary = ExportSummary {
        photos: payload.photos.len(),
        files,
        custom_quotes: payload.custom_quotes.len(),
    };
    log::info!("Backup written to {}: {:?}", path.display(), summary);
    Ok(summary)
}

/// Restores a backup archive without touching existing data.
///
/// Photo files are written only where missing, records only for uuids not yet
/// stored, custom quotes only when no custom quote has the same text. Settings
/// from the archive replace the current ones.
pub fn restore_backup(
    store: &ItemStore,
    gallery: &PhotoGalleryService,
    path: &Path,
) -> Result<RestoreSummary, AppError> {
    let file = fs::File::open(path)?;
    let mut archive = zip::ZipArchive::new(file)?;

    let payload: BackupPayload = {
        let mut entry = archive
            .by_name(BACKUP_JSON)
            .map_err(|_| AppError::Backup(format!("{} is missing {}", path.display(), BACKUP_JSON)))?;
        let mut raw = String::new();
        entry.read_to_string(&mut raw)?;
        serde_json::from_str(&raw)?
    };

    if payload.metadata.format_version > BACKUP_FORMAT_VERSION {
        return Err(AppError::Backup(format!(
            "Unsupported backup format {}",
            payload.metadata.format_version
        )));
    }

    let mut summary = RestoreSummary::default();

    for i in 0..archive.len() {
        let mut entry = archive.by_index(i)?;
        if entry.is_dir() {
            continue;
        }
        let Some(rel_path) = entry.name().strip_prefix(PHOTOS_PREFIX).map(|s| s.to_string()) else {
            continue;
        };
        if gallery.photo_exists(&rel_path) {
            continue;
        }

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes)?;
        match gallery.write_photo(&rel_path, &bytes) {
            Ok(()) => summary.files += 1,
            Err(e) => log::warn!("Skipped backup entry {}: {}", rel_path, e),
        }
    }

    let restore_records = || -> Result<(usize, usize), AppError> {
        let known_uuids: HashSet<_> = photo_service::list_photos(store)?
            .into_iter()
            .map(|p| p.uuid)
            .collect();
        let mut photos = 0;
        for photo in payload.photos.iter().filter(|p| !known_uuids.contains(&p.uuid)) {
            photo_service::create_photo(store, photo)?;
            photos += 1;
        }

        let known_texts: HashSet<String> = quote_service::list_quotes(store)?
            .into_iter()
            .filter(|q| q.is_custom)
            .map(|q| q.text)
            .collect();
        let mut quotes = 0;
        for quote in payload.custom_quotes.iter().filter(|q| !known_texts.contains(&q.text)) {
            quote_service::insert_quote(store, quote)?;
            quotes += 1;
        }

        store.save()?;
        Ok((photos, quotes))
    };

    match restore_records() {
        Ok((photos, quotes)) => {
            summary.photos = photos;
            summary.custom_quotes = quotes;
        }
        Err(e) => {
            log::error!("Restoring records from {} failed: {}", path.display(), e);
            store.reset()?;
            return Err(e);
        }
    }

    if let Some(settings) = &payload.settings {
        settings_service::save_settings(store, settings)?;
        summary.settings = true;
    }

    log::info!("Backup restored from {}: {:?}", path.display(), summary);
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{QuoteCategory, Theme};
    use crate::services::import_service;
    use crate::test_support::{gallery_in, jpeg_bytes};
    use chrono::NaiveDate;
    use photo_gallery::ImageSource;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn populated(dir: &Path) -> (ItemStore, PhotoGalleryService) {
        let store = ItemStore::open_in_memory().unwrap();
        let gallery = gallery_in(dir);
        let images = vec![
            ImageSource::Bytes(jpeg_bytes(120, 120)),
            ImageSource::Bytes(jpeg_bytes(160, 120)),
        ];
        import_service::import_all(&store, &gallery, &images, day(2025, 1, 1), |_, _| {});
        quote_service::add_custom_quote(&store, "Always near".to_string(), None, QuoteCategory::Love)
            .unwrap();
        settings_service::set_theme(&store, day(2025, 1, 1), Theme::Dark).unwrap();
        (store, gallery)
    }

    #[test]
    fn test_export_then_restore_into_empty_install() {
        let source_dir = tempfile::tempdir().unwrap();
        let (store, gallery) = populated(source_dir.path());
        let archive = source_dir.path().join("exports").join("backup.zip");

        let exported = export_backup(&store, &gallery, &archive).unwrap();
        assert_eq!(
            exported,
            ExportSummary { photos: 2, files: 2, custom_quotes: 1 }
        );

        let target_dir = tempfile::tempdir().unwrap();
        let target_store = ItemStore::open_in_memory().unwrap();
        let target_gallery = gallery_in(target_dir.path());

        let restored = restore_backup(&target_store, &target_gallery, &archive).unwrap();
        assert_eq!(restored.photos, 2);
        assert_eq!(restored.files, 2);
        assert_eq!(restored.custom_quotes, 1);
        assert!(restored.settings);

        let photos = photo_service::list_photos(&target_store).unwrap();
        assert_eq!(photos.iter().map(|p| p.day_number).collect::<Vec<_>>(), vec![1, 2]);
        for photo in &photos {
            assert!(target_gallery.is_decodable(photo.relative_path.as_deref().unwrap()));
        }
        let settings = settings_service::load_settings(&target_store).unwrap().unwrap();
        assert_eq!(settings.theme, Theme::Dark);
    }

    #[test]
    fn test_restore_twice_adds_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let (store, gallery) = populated(dir.path());
        let archive = dir.path().join("backup.zip");
        export_backup(&store, &gallery, &archive).unwrap();

        let again = restore_backup(&store, &gallery, &archive).unwrap();
        assert_eq!(again.photos, 0);
        assert_eq!(again.files, 0);
        assert_eq!(again.custom_quotes, 0);
        assert_eq!(photo_service::count_photos(&store).unwrap(), 2);
    }

    #[test]
    fn test_archive_without_backup_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("foreign.zip");
        {
            let mut zip = zip::ZipWriter::new(fs::File::create(&archive).unwrap());
            let options: zip::write::FileOptions<'_, ()> = zip::write::FileOptions::default();
            zip.start_file("readme.txt", options).unwrap();
            zip.write_all(b"hello").unwrap();
            zip.finish().unwrap();
        }

        let store = ItemStore::open_in_memory().unwrap();
        let gallery = gallery_in(dir.path());
        assert!(matches!(
            restore_backup(&store, &gallery, &archive),
            Err(AppError::Backup(_))
        ));
    }
}
