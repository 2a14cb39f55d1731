use crate::database::ItemStore;
use crate::error::AppError;
use crate::models::PhotoRecord;
use crate::services::photo_service;
use photo_gallery::PhotoGalleryService;
use std::collections::HashSet;

/// Records split by [`verify_and_repair`]
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    pub kept: Vec<PhotoRecord>,
    pub removed: Vec<PhotoRecord>,
}

/// Result of a full integrity pass over store and photo directory
#[derive(Debug, Clone, PartialEq)]
pub struct IntegrityReport {
    pub checked: usize,
    pub removed: Vec<PhotoRecord>,
    /// Photo files no record points to
    pub orphan_files: Vec<String>,
    pub orphan_files_removed: usize,
    /// Photo collection reloaded from the store after the repair
    pub photos: Vec<PhotoRecord>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.removed.is_empty() && self.orphan_files.is_empty()
    }
}

/// Splits records into those backed by a readable file and those to remove.
///
/// A record is removed when it has no path, its file is missing, or the file
/// does not decode; undecodable files are deleted. Delete failures are logged
/// and do not stop the pass.
pub fn verify_and_repair<E: std::fmt::Display>(
    records: Vec<PhotoRecord>,
    file_exists: impl Fn(&str) -> bool,
    is_decodable: impl Fn(&str) -> bool,
    mut delete_file: impl FnMut(&str) -> Result<(), E>,
) -> RepairOutcome {
    let mut outcome = RepairOutcome {
        kept: Vec::with_capacity(records.len()),
        removed: Vec::new(),
    };

    for record in records {
        let path = match record.relative_path.as_deref() {
            Some(path) if !path.is_empty() => path,
            _ => {
                log::warn!("Photo {} (day {}) has no file path", record.id, record.day_number);
                outcome.removed.push(record);
                continue;
            }
        };

        if !file_exists(path) {
            log::warn!("Photo {} is missing its file {}", record.id, path);
            outcome.removed.push(record);
            continue;
        }

        if !is_decodable(path) {
            log::warn!("Photo {} has an unreadable file {}, deleting it", record.id, path);
            if let Err(e) = delete_file(path) {
                log::error!("Could not delete corrupted file {}: {}", path, e);
            }
            outcome.removed.push(record);
            continue;
        }

        outcome.kept.push(record);
    }

    outcome
}

/// Reconciles photo records with the files on disk.
///
/// Removed records are deleted in one batch and saved; the collection is then
/// reloaded. Running it again without file changes removes nothing.
pub fn run_integrity_check(
    store: &ItemStore,
    gallery: &PhotoGalleryService,
    remove_orphan_files: bool,
) -> Result<IntegrityReport, AppError> {
    let records = photo_service::list_photos(store)?;
    let checked = records.len();

    let outcome = verify_and_repair(
        records,
        |path| gallery.photo_exists(path),
        |path| gallery.is_decodable(path),
        |path| gallery.delete_photo_file(path),
    );

    if !outcome.removed.is_empty() {
        let ids: Vec<i64> = outcome.removed.iter().map(|p| p.id).collect();
        let batch = photo_service::delete_photos(store, &ids).and_then(|_| store.save());
        if let Err(e) = batch {
            log::error!("Integrity repair failed to delete {} records: {}", ids.len(), e);
            store.reset()?;
            return Err(e);
        }
        log::info!("Integrity check removed {} of {} photo records", ids.len(), checked);
    }

    let photos = photo_service::list_photos(store)?;
    // The repair above is already committed; a failed sweep must not hide it.
    let (orphan_files, orphan_files_removed) =
        match sweep_orphan_files(gallery, &photos, remove_orphan_files) {
            Ok(found) => found,
            Err(e) => {
                log::warn!(
                    "Orphan file sweep in {} failed: {}",
                    gallery.storage_dir().display(),
                    e
                );
                (Vec::new(), 0)
            }
        };

    Ok(IntegrityReport {
        checked,
        removed: outcome.removed,
        orphan_files,
        orphan_files_removed,
        photos,
    })
}

fn sweep_orphan_files(
    gallery: &PhotoGalleryService,
    photos: &[PhotoRecord],
    remove: bool,
) -> Result<(Vec<String>, usize), AppError> {
    let referenced: HashSet<&str> = photos
        .iter()
        .filter_map(|p| p.relative_path.as_deref())
        .collect();

    let orphans: Vec<String> = gallery
        .list_photo_files()?
        .into_iter()
        .filter(|name| name.ends_with(".jpg") && !referenced.contains(name.as_str()))
        .collect();

    if orphans.is_empty() {
        return Ok((orphans, 0));
    }

    log::info!("Found {} photo files without a record", orphans.len());
    if !remove {
        return Ok((orphans, 0));
    }

    let mut removed = 0;
    for name in &orphans {
        match gallery.delete_photo_file(name) {
            Ok(()) => removed += 1,
            Err(e) => log::warn!("Could not delete orphaned file {}: {}", name, e),
        }
    }
    Ok((orphans, removed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gallery_in, jpeg_bytes, photo_with_path};
    use std::cell::RefCell;

    #[test]
    fn test_verify_and_repair_classifies_records() {
        let records = vec![
            photo_with_path(1, Some("good.jpg")),
            photo_with_path(2, None),
            photo_with_path(3, Some("missing.jpg")),
            photo_with_path(4, Some("corrupt.jpg")),
        ];
        let deleted = RefCell::new(Vec::new());

        let outcome = verify_and_repair(
            records,
            |path| path != "missing.jpg",
            |path| path == "good.jpg",
            |path| -> Result<(), String> {
                deleted.borrow_mut().push(path.to_string());
                Ok(())
            },
        );

        assert_eq!(outcome.kept.len(), 1);
        assert_eq!(outcome.kept[0].day_number, 1);
        let removed_days: Vec<i64> = outcome.removed.iter().map(|p| p.day_number).collect();
        assert_eq!(removed_days, vec![2, 3, 4]);
        // Only the undecodable file is deleted
        assert_eq!(deleted.into_inner(), vec!["corrupt.jpg".to_string()]);
    }

    #[test]
    fn test_delete_failures_do_not_abort() {
        let records = vec![
            photo_with_path(1, Some("a.jpg")),
            photo_with_path(2, Some("b.jpg")),
            photo_with_path(3, Some("c.jpg")),
        ];

        let outcome = verify_and_repair(
            records,
            |_| true,
            |path| path == "c.jpg",
            |_| -> Result<(), String> { Err("read-only filesystem".to_string()) },
        );

        assert_eq!(outcome.removed.len(), 2);
        assert_eq!(outcome.kept.len(), 1);
    }

    #[test]
    fn test_run_integrity_check_repairs_store() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = gallery_in(tmp.path());
        let store = ItemStore::open_in_memory().unwrap();

        gallery.write_photo("good.jpg", &jpeg_bytes(120, 120)).unwrap();
        gallery.write_photo("corrupt.jpg", b"garbage").unwrap();

        for (day, path) in [(1, Some("good.jpg")), (2, Some("missing.jpg")), (3, Some("corrupt.jpg")), (4, None)] {
            photo_service::create_photo(&store, &photo_with_path(day, path)).unwrap();
        }
        store.save().unwrap();

        let report = run_integrity_check(&store, &gallery, false).unwrap();
        assert_eq!(report.checked, 4);
        assert_eq!(report.removed.len(), 3);
        assert_eq!(report.photos.len(), 1);
        assert_eq!(report.photos[0].relative_path.as_deref(), Some("good.jpg"));
        assert!(!gallery.photo_exists("corrupt.jpg"));
        assert!(!store.has_pending_changes());
        assert_eq!(photo_service::count_photos(&store).unwrap(), 1);
    }

    #[test]
    fn test_second_run_is_a_no_op() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = gallery_in(tmp.path());
        let store = ItemStore::open_in_memory().unwrap();

        gallery.write_photo("good.jpg", &jpeg_bytes(120, 120)).unwrap();
        photo_service::create_photo(&store, &photo_with_path(1, Some("good.jpg"))).unwrap();
        photo_service::create_photo(&store, &photo_with_path(2, Some("gone.jpg"))).unwrap();
        store.save().unwrap();

        let first = run_integrity_check(&store, &gallery, false).unwrap();
        assert_eq!(first.removed.len(), 1);

        let second = run_integrity_check(&store, &gallery, false).unwrap();
        assert!(second.removed.is_empty());
        assert!(second.is_clean());
        assert_eq!(second.photos, first.photos);
    }

    #[test]
    fn test_orphan_files_reported_and_optionally_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = gallery_in(tmp.path());
        let store = ItemStore::open_in_memory().unwrap();

        gallery.write_photo("kept.jpg", &jpeg_bytes(120, 120)).unwrap();
        gallery.write_photo("stray.jpg", &jpeg_bytes(120, 120)).unwrap();
        gallery.write_photo("notes.txt", b"not a photo").unwrap();
        photo_service::create_photo(&store, &photo_with_path(1, Some("kept.jpg"))).unwrap();
        store.save().unwrap();

        let report = run_integrity_check(&store, &gallery, false).unwrap();
        assert_eq!(report.orphan_files, vec!["stray.jpg".to_string()]);
        assert_eq!(report.orphan_files_removed, 0);
        assert!(gallery.photo_exists("stray.jpg"));

        let report = run_integrity_check(&store, &gallery, true).unwrap();
        assert_eq!(report.orphan_files_removed, 1);
        assert!(!gallery.photo_exists("stray.jpg"));
        assert!(gallery.photo_exists("kept.jpg"));
        assert!(gallery.photo_exists("notes.txt"));
    }

    #[test]
    fn test_unreadable_photo_dir_still_reports_repair() {
        let tmp = tempfile::tempdir().unwrap();
        // A plain file where the photo directory should be
        std::fs::write(tmp.path().join("photos"), b"").unwrap();
        let gallery = gallery_in(tmp.path());
        let store = ItemStore::open_in_memory().unwrap();

        photo_service::create_photo(&store, &photo_with_path(1, Some("a.jpg"))).unwrap();
        store.save().unwrap();

        let report = run_integrity_check(&store, &gallery, true).unwrap();
        assert_eq!(report.removed.len(), 1);
        assert!(report.orphan_files.is_empty());
        assert_eq!(report.orphan_files_removed, 0);
        assert!(report.photos.is_empty());
        assert_eq!(photo_service::count_photos(&store).unwrap(), 0);
        assert!(!store.has_pending_changes());
    }
}
