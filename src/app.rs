//! Composition root: owns the item store, photo storage, event bus and
//! configuration and hands them to the services.
//!
//! Facade methods log failures with their operation and return `Option`,
//! `bool` or empty collections; only [`App::start`] propagates errors.

use crate::config::{AppConfig, QuoteSelection};
use crate::database::ItemStore;
use crate::error::AppError;
use crate::events::{AppEvent, EventBus};
use crate::models::{PhotoRecord, QuoteCategory, QuoteRecord, SelectionKind, Settings};
use crate::services::backup_service::{self, ExportSummary, RestoreSummary};
use crate::services::{
    import_service, integrity_service, notification_service, photo_service, quote_service,
    selection_service, settings_service,
};
use crate::services::{ImportSummary, IntegrityReport, NotificationCenter};
use chrono::NaiveDate;
use photo_gallery::{ImageSource, PhotoGalleryService};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

pub struct App {
    store: Arc<Mutex<ItemStore>>,
    gallery: Arc<PhotoGalleryService>,
    events: EventBus,
    config: AppConfig,
}

/// Logs a failed operation; empty collections are expected and only noted
fn logged<T>(operation: &str, result: Result<T, AppError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(AppError::EmptyCollection(what)) => {
            log::debug!("{}: no {} yet", operation, what);
            None
        }
        Err(e) => {
            log::error!("{} failed: {}", operation, e);
            None
        }
    }
}

fn lock(store: &Mutex<ItemStore>) -> MutexGuard<'_, ItemStore> {
    store.lock().unwrap_or_else(|poisoned| {
        log::warn!("Item store lock was poisoned, continuing");
        poisoned.into_inner()
    })
}

impl App {
    /// Opens the configured store and photo directory, seeds quotes and settings
    pub fn start(config: AppConfig, today: NaiveDate) -> Result<Self, AppError> {
        let store = ItemStore::open(&config.database_path())?;
        Self::with_store(config, store, today)
    }

    /// Starts on an already opened store (in-memory previews and tests)
    pub fn with_store(config: AppConfig, store: ItemStore, today: NaiveDate) -> Result<Self, AppError> {
        let gallery = PhotoGalleryService::new(config.gallery_config());
        gallery
            .ensure_storage_dir()
            .map_err(|e| AppError::StoreInit(format!("Photo directory unavailable: {}", e)))?;

        logged("Seeding quotes", quote_service::seed_quotes_if_needed(&store));
        settings_service::load_or_create_settings(&store, today)
            .map_err(|e| AppError::StoreInit(format!("Settings unavailable: {}", e)))?;

        if config.quote_selection == QuoteSelection::DayHash {
            log::info!("Daily quote uses the day-of-year hash, daily photo the sticky epoch-day selection");
        }

        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            gallery: Arc::new(gallery),
            events: EventBus::default(),
            config,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn gallery(&self) -> &PhotoGalleryService {
        &self.gallery
    }

    fn store(&self) -> MutexGuard<'_, ItemStore> {
        lock(&self.store)
    }

    // ---- Today -----------------------------------------------------------

    /// Today's photo, marked as viewed. `None` when the gallery is empty.
    pub fn today_photo(&self, today: NaiveDate) -> Option<PhotoRecord> {
        let store = self.store();
        logged("Selecting today's photo", Self::select_photo(&store, today))
    }

    fn select_photo(store: &ItemStore, today: NaiveDate) -> Result<PhotoRecord, AppError> {
        let photos = photo_service::list_photos(store)?;
        let cache = selection_service::load_selection_cache(store, SelectionKind::Photo)?;
        let (photo, new_cache) = selection_service::select_for_today(&photos, today, &cache)?;
        let mut photo = photo.clone();

        if new_cache != cache {
            selection_service::store_selection_cache(store, SelectionKind::Photo, &new_cache)?;
        }
        if !photo.viewed {
            photo_service::mark_viewed(store, photo.id)?;
            store.save()?;
            photo.viewed = true;
        }
        Ok(photo)
    }

    pub fn today_quote(&self, today: NaiveDate) -> Option<QuoteRecord> {
        let store = self.store();
        let result = quote_service::list_quotes(&store).and_then(|quotes| match self.config.quote_selection {
            QuoteSelection::DayHash => selection_service::select_quote_for_day(&quotes, today).cloned(),
            QuoteSelection::Sticky => {
                let cache = selection_service::load_selection_cache(&store, SelectionKind::Quote)?;
                let (quote, new_cache) = selection_service::select_for_today(&quotes, today, &cache)?;
                if new_cache != cache {
                    selection_service::store_selection_cache(&store, SelectionKind::Quote, &new_cache)?;
                }
                Ok(quote.clone())
            }
        });
        logged("Selecting today's quote", result)
    }

    // ---- Photos ----------------------------------------------------------

    pub fn photos(&self) -> Vec<PhotoRecord> {
        logged("Loading photos", photo_service::list_photos(&self.store())).unwrap_or_default()
    }

    pub fn favorites(&self) -> Vec<PhotoRecord> {
        logged("Loading favorites", photo_service::list_favorites(&self.store())).unwrap_or_default()
    }

    pub fn photo(&self, id: i64) -> Option<PhotoRecord> {
        logged("Loading photo", photo_service::get_photo(&self.store(), id))
    }

    /// New favorite state of the photo
    pub fn toggle_favorite(&self, id: i64) -> Option<bool> {
        let store = self.store();
        let result = photo_service::toggle_favorite(&store, id).and_then(|favorite| {
            store.save()?;
            Ok(favorite)
        });
        if result.is_err() {
            logged("Discarding favorite change", store.reset());
        }
        logged("Toggling favorite", result)
    }

    pub fn update_note(&self, id: i64, note: Option<String>) -> bool {
        let store = self.store();
        let result = photo_service::update_note(&store, id, note).and_then(|_| store.save());
        if result.is_err() {
            logged("Discarding note change", store.reset());
        }
        logged("Updating note", result).is_some()
    }

    pub fn delete_photo(&self, id: i64) -> bool {
        let store = self.store();
        let deleted = logged("Deleting photo", photo_service::delete_photo(&store, &self.gallery, id)).is_some();
        if deleted {
            let count = photo_service::count_photos(&store).unwrap_or_default() as usize;
            self.events.publish(AppEvent::PhotosChanged { count });
        }
        deleted
    }

    /// Imports `images` on a blocking worker, reporting progress over the event bus
    pub async fn import(&self, images: Vec<ImageSource>, today: NaiveDate) -> ImportSummary {
        let store = Arc::clone(&self.store);
        let gallery = Arc::clone(&self.gallery);
        let events = self.events.clone();

        let task = tokio::task::spawn_blocking(move || {
            let store = lock(&store);
            let start_date = settings_service::load_or_create_settings(&store, today)
                .map(|s| s.start_date)
                .unwrap_or(today);
            let summary = import_service::import_all(&store, &gallery, &images, start_date, |fraction, message| {
                events.publish(AppEvent::ImportProgress {
                    fraction,
                    message: message.to_string(),
                });
            });
            let count = photo_service::count_photos(&store).unwrap_or_default() as usize;
            (summary, count)
        });

        match task.await {
            Ok((summary, count)) => {
                self.events.publish(AppEvent::ImportFinished {
                    success_count: summary.success_count(),
                    failed: summary.failures.len(),
                });
                if summary.succeeded() {
                    self.events.publish(AppEvent::PhotosChanged { count });
                }
                summary
            }
            Err(e) => {
                log::error!("Import task failed: {}", e);
                ImportSummary::default()
            }
        }
    }

    /// Runs the storage integrity check after the configured delay.
    ///
    /// Meant to be called once after a cold start.
    pub fn spawn_integrity_check(&self) -> JoinHandle<Option<IntegrityReport>> {
        let store = Arc::clone(&self.store);
        let gallery = Arc::clone(&self.gallery);
        let events = self.events.clone();
        let delay = Duration::from_millis(self.config.integrity_check_delay_ms);
        let remove_orphans = self.config.remove_orphan_files;

        tokio::spawn(async move {
            tokio::time::sleep(delay).await;

            let task = tokio::task::spawn_blocking(move || {
                let store = lock(&store);
                integrity_service::run_integrity_check(&store, &gallery, remove_orphans)
            });

            let report = match task.await {
                Ok(result) => logged("Storage integrity check", result)?,
                Err(e) => {
                    log::error!("Integrity task failed: {}", e);
                    return None;
                }
            };

            events.publish(AppEvent::IntegrityChecked {
                removed: report.removed.len(),
            });
            if !report.removed.is_empty() {
                events.publish(AppEvent::PhotosChanged {
                    count: report.photos.len(),
                });
            }
            Some(report)
        })
    }

    // ---- Quotes ----------------------------------------------------------

    pub fn quotes(&self) -> Vec<QuoteRecord> {
        logged("Loading quotes", quote_service::list_quotes(&self.store())).unwrap_or_default()
    }

    pub fn add_custom_quote(&self, text: String, author: Option<String>, category: QuoteCategory) -> Option<i64> {
        logged(
            "Adding quote",
            quote_service::add_custom_quote(&self.store(), text, author, category),
        )
    }

    pub fn delete_quote(&self, id: i64) -> bool {
        logged("Deleting quote", quote_service::delete_quote(&self.store(), id)).is_some()
    }

    // ---- Settings & reminders --------------------------------------------

    pub fn settings(&self, today: NaiveDate) -> Option<Settings> {
        logged(
            "Loading settings",
            settings_service::load_or_create_settings(&self.store(), today),
        )
    }

    pub fn save_settings(&self, settings: &Settings) -> bool {
        logged("Saving settings", settings_service::save_settings(&self.store(), settings)).is_some()
    }

    /// Schedules the daily reminder at the stored notification time
    pub fn schedule_reminder(&self, center: &dyn NotificationCenter, today: NaiveDate) -> bool {
        let Some(settings) = self.settings(today) else {
            return false;
        };
        logged(
            "Scheduling reminder",
            notification_service::schedule_daily_reminder(center, &settings),
        )
        .is_some()
    }

    pub fn handle_notification_tap(&self) {
        notification_service::handle_notification_tap(&self.events);
    }

    // ---- Backup ----------------------------------------------------------

    pub fn export_backup(&self, path: &Path) -> Option<ExportSummary> {
        logged(
            "Exporting backup",
            backup_service::export_backup(&self.store(), &self.gallery, path),
        )
    }

    pub fn restore_backup(&self, path: &Path) -> Option<RestoreSummary> {
        let restored = logged(
            "Restoring backup",
            backup_service::restore_backup(&self.store(), &self.gallery, path),
        );
        if let Some(summary) = &restored {
            if summary.photos > 0 {
                self.events.publish(AppEvent::PhotosChanged {
                    count: self.photos().len(),
                });
            }
        }
        restored
    }
}
