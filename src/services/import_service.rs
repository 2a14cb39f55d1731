use crate::database::ItemStore;
use crate::error::AppError;
use crate::models::PhotoRecord;
use crate::services::photo_service;
use chrono::{Days, NaiveDate};
use photo_gallery::{ImageSource, PhotoGalleryService};

/// One image that could not be imported
#[derive(Debug, Clone, PartialEq)]
pub struct ImportFailure {
    /// Position in the input list (0-based)
    pub index: usize,
    /// Day number the image would have received; it is not reused
    pub day_number: i64,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImportSummary {
    pub imported: Vec<PhotoRecord>,
    pub failures: Vec<ImportFailure>,
}

impl ImportSummary {
    pub fn success_count(&self) -> usize {
        self.imported.len()
    }

    /// An import succeeds when at least one image made it
    pub fn succeeded(&self) -> bool {
        !self.imported.is_empty()
    }
}

/// Imports `images` one by one as photos for consecutive days.
///
/// Image `i` gets day number `i + 1` and the date `start_date + i` days. A
/// failing image is rolled back on its own (store reset, file removed) and
/// its day number stays unused. `progress` is called after every image and a
/// last time with `1.0`.
pub fn import_all(
    store: &ItemStore,
    gallery: &PhotoGalleryService,
    images: &[ImageSource],
    start_date: NaiveDate,
    mut progress: impl FnMut(f32, &str),
) -> ImportSummary {
    let total = images.len();
    let mut summary = ImportSummary::default();
    log::info!("Importing {} images starting {}", total, start_date);

    for (index, source) in images.iter().enumerate() {
        let day_number = index as i64 + 1;

        let message = match import_one(store, gallery, source, day_number, start_date) {
            Ok(record) => {
                log::debug!("Imported {} as day {}", record.uuid, day_number);
                summary.imported.push(record);
                format!("Imported photo {} of {}", index + 1, total)
            }
            Err(e) => {
                log::warn!("Import of image {} (day {}) failed: {}", index + 1, day_number, e);
                summary.failures.push(ImportFailure {
                    index,
                    day_number,
                    reason: e.to_string(),
                });
                format!("Skipped photo {} of {}", index + 1, total)
            }
        };

        progress((index + 1) as f32 / total as f32, &message);
    }

    let done = format!("Imported {} of {} photos", summary.success_count(), total);
    log::info!("{}", done);
    progress(1.0, &done);
    summary
}

fn import_one(
    store: &ItemStore,
    gallery: &PhotoGalleryService,
    source: &ImageSource,
    day_number: i64,
    start_date: NaiveDate,
) -> Result<PhotoRecord, AppError> {
    let assigned_date = start_date
        .checked_add_days(Days::new((day_number - 1) as u64))
        .ok_or_else(|| AppError::Validation(format!("Day {} is out of the calendar range", day_number)))?;

    let stored = gallery.store_image(source)?;
    let mut record = PhotoRecord::new(stored.uuid, day_number, assigned_date, stored.file_name);

    let saved = photo_service::create_photo(store, &record).and_then(|id| {
        store.save()?;
        Ok(id)
    });

    match saved {
        Ok(id) => {
            record.id = id;
            Ok(record)
        }
        Err(e) => {
            if let Err(reset) = store.reset() {
                log::error!("Could not discard failed import of day {}: {}", day_number, reset);
            }
            if let Some(path) = &record.relative_path {
                if let Err(cleanup) = gallery.delete_photo_file(path) {
                    log::warn!("Could not remove file {} of failed import: {}", path, cleanup);
                }
            }
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{gallery_in, jpeg_bytes};
    use std::collections::HashSet;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_failed_image_skips_its_day_number() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = gallery_in(tmp.path());
        let store = ItemStore::open_in_memory().unwrap();

        let images = vec![
            ImageSource::Bytes(jpeg_bytes(200, 150)),
            ImageSource::Bytes(jpeg_bytes(50, 50)),
            ImageSource::Bytes(jpeg_bytes(150, 200)),
        ];

        let summary = import_all(&store, &gallery, &images, day(2025, 3, 1), |_, _| {});

        assert_eq!(summary.success_count(), 2);
        assert!(summary.succeeded());
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].index, 1);
        assert_eq!(summary.failures[0].day_number, 2);

        let photos = photo_service::list_photos(&store).unwrap();
        let days: Vec<i64> = photos.iter().map(|p| p.day_number).collect();
        assert_eq!(days, vec![1, 3]);
        assert_eq!(photos[0].assigned_date, day(2025, 3, 1));
        assert_eq!(photos[1].assigned_date, day(2025, 3, 3));

        // No file left behind for the rejected image
        assert_eq!(gallery.list_photo_files().unwrap().len(), 2);
        for photo in &photos {
            let path = photo.relative_path.as_deref().unwrap();
            assert_eq!(path, format!("{}.jpg", photo.uuid));
            assert!(gallery.is_decodable(path));
        }
    }

    #[test]
    fn test_progress_reported_per_image_and_at_end() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = gallery_in(tmp.path());
        let store = ItemStore::open_in_memory().unwrap();

        let images = vec![
            ImageSource::Bytes(jpeg_bytes(120, 120)),
            ImageSource::Bytes(b"not an image".to_vec()),
        ];

        let mut calls = Vec::new();
        import_all(&store, &gallery, &images, day(2025, 1, 1), |fraction, message| {
            calls.push((fraction, message.to_string()));
        });

        let fractions: Vec<f32> = calls.iter().map(|(f, _)| *f).collect();
        assert_eq!(fractions, vec![0.5, 1.0, 1.0]);
        assert_eq!(calls[2].1, "Imported 1 of 2 photos");
    }

    #[test]
    fn test_all_failures_is_not_success() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = gallery_in(tmp.path());
        let store = ItemStore::open_in_memory().unwrap();

        let images = vec![ImageSource::Path(tmp.path().join("does-not-exist.jpg"))];
        let summary = import_all(&store, &gallery, &images, day(2025, 1, 1), |_, _| {});

        assert!(!summary.succeeded());
        assert_eq!(photo_service::count_photos(&store).unwrap(), 0);
        assert!(!store.has_pending_changes());
    }

    #[test]
    fn test_empty_input_reports_completion() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = gallery_in(tmp.path());
        let store = ItemStore::open_in_memory().unwrap();

        let mut calls = Vec::new();
        let summary = import_all(&store, &gallery, &[], day(2025, 1, 1), |f, _| calls.push(f));
        assert!(!summary.succeeded());
        assert_eq!(calls, vec![1.0]);
    }

    #[test]
    fn test_reimport_into_fresh_store_restarts_numbering() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = gallery_in(tmp.path());
        let images = vec![
            ImageSource::Bytes(jpeg_bytes(120, 120)),
            ImageSource::Bytes(jpeg_bytes(130, 110)),
        ];

        let first_store = ItemStore::open_in_memory().unwrap();
        let first = import_all(&first_store, &gallery, &images, day(2025, 1, 1), |_, _| {});
        drop(first_store);

        let second_store = ItemStore::open_in_memory().unwrap();
        let second = import_all(&second_store, &gallery, &images, day(2025, 1, 1), |_, _| {});

        let days: Vec<i64> = second.imported.iter().map(|p| p.day_number).collect();
        assert_eq!(days, vec![1, 2]);

        let names: HashSet<String> = first
            .imported
            .iter()
            .chain(second.imported.iter())
            .filter_map(|p| p.relative_path.clone())
            .collect();
        assert_eq!(names.len(), 4);
        assert_eq!(gallery.list_photo_files().unwrap().len(), 4);
    }

    #[test]
    fn test_large_image_is_downscaled() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = gallery_in(tmp.path());
        let store = ItemStore::open_in_memory().unwrap();

        let images = vec![ImageSource::Bytes(jpeg_bytes(3000, 1500))];
        let summary = import_all(&store, &gallery, &images, day(2025, 1, 1), |_, _| {});
        assert_eq!(summary.success_count(), 1);

        let path = summary.imported[0].relative_path.as_deref().unwrap();
        let img = gallery.load_image(path).unwrap();
        assert_eq!((img.width(), img.height()), (2048, 1024));
    }

    #[test]
    fn test_record_failure_rolls_back_only_that_image() {
        let tmp = tempfile::tempdir().unwrap();
        let gallery = gallery_in(tmp.path());
        let store = ItemStore::open_in_memory().unwrap();
        store
            .conn()
            .execute_batch(
                "CREATE TRIGGER reject_day_two BEFORE INSERT ON photos
                 WHEN NEW.day_number = 2
                 BEGIN SELECT RAISE(ABORT, 'rejected'); END;",
            )
            .unwrap();

        let images = vec![
            ImageSource::Bytes(jpeg_bytes(200, 150)),
            ImageSource::Bytes(jpeg_bytes(150, 200)),
            ImageSource::Bytes(jpeg_bytes(180, 180)),
        ];
        let summary = import_all(&store, &gallery, &images, day(2025, 1, 1), |_, _| {});

        assert_eq!(summary.success_count(), 2);
        assert_eq!(summary.failures.len(), 1);
        assert_eq!(summary.failures[0].day_number, 2);

        let days: Vec<i64> = photo_service::list_photos(&store)
            .unwrap()
            .iter()
            .map(|p| p.day_number)
            .collect();
        assert_eq!(days, vec![1, 3]);
        // The file written for day 2 was removed again
        assert_eq!(gallery.list_photo_files().unwrap().len(), 2);
        assert!(!store.has_pending_changes());
    }
}
