use crate::database::ItemStore;
use crate::error::AppError;
use crate::models::{FontSize, Settings, Theme};
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, OptionalExtension};

/// The stored settings row, if any
pub fn load_settings(store: &ItemStore) -> Result<Option<Settings>, AppError> {
    let settings = store
        .conn()
        .query_row(
            "SELECT notification_time, theme, font_size, onboarding_complete, start_date
             FROM settings WHERE id = 1",
            [],
            |row| {
                let theme: String = row.get(1)?;
                let font_size: String = row.get(2)?;
                Ok(Settings {
                    notification_time: row.get(0)?,
                    theme: Theme::from_str(&theme),
                    font_size: FontSize::from_str(&font_size),
                    onboarding_complete: row.get(3)?,
                    start_date: row.get(4)?,
                })
            },
        )
        .optional()?;

    Ok(settings)
}

/// Loads the settings row, creating it with defaults on first run
pub fn load_or_create_settings(store: &ItemStore, today: NaiveDate) -> Result<Settings, AppError> {
    if let Some(settings) = load_settings(store)? {
        return Ok(settings);
    }

    let settings = Settings::defaults(today);
    save_settings(store, &settings)?;
    log::info!("Created default settings (start date {})", today);
    Ok(settings)
}

/// Writes the whole settings row (last write wins)
pub fn save_settings(store: &ItemStore, settings: &Settings) -> Result<(), AppError> {
    store.begin_write()?;
    store.conn().execute(
        "INSERT INTO settings (id, notification_time, theme, font_size, onboarding_complete, start_date)
         VALUES (1, ?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(id) DO UPDATE SET
            notification_time = excluded.notification_time,
            theme = excluded.theme,
            font_size = excluded.font_size,
            onboarding_complete = excluded.onboarding_complete,
            start_date = excluded.start_date",
        params![
            settings.notification_time,
            settings.theme.as_str(),
            settings.font_size.as_str(),
            settings.onboarding_complete,
            settings.start_date,
        ],
    )?;
    store.save()?;
    Ok(())
}

fn update_settings(
    store: &ItemStore,
    today: NaiveDate,
    apply: impl FnOnce(&mut Settings),
) -> Result<Settings, AppError> {
    let mut settings = load_or_create_settings(store, today)?;
    apply(&mut settings);
    save_settings(store, &settings)?;
    Ok(settings)
}

pub fn set_notification_time(
    store: &ItemStore,
    today: NaiveDate,
    time: NaiveTime,
) -> Result<Settings, AppError> {
    update_settings(store, today, |s| s.notification_time = time)
}

pub fn set_theme(store: &ItemStore, today: NaiveDate, theme: Theme) -> Result<Settings, AppError> {
    update_settings(store, today, |s| s.theme = theme)
}

pub fn set_font_size(
    store: &ItemStore,
    today: NaiveDate,
    font_size: FontSize,
) -> Result<Settings, AppError> {
    update_settings(store, today, |s| s.font_size = font_size)
}

pub fn set_onboarding_complete(
    store: &ItemStore,
    today: NaiveDate,
    complete: bool,
) -> Result<Settings, AppError> {
    update_settings(store, today, |s| s.onboarding_complete = complete)
}

pub fn set_start_date(
    store: &ItemStore,
    today: NaiveDate,
    start_date: NaiveDate,
) -> Result<Settings, AppError> {
    update_settings(store, today, |s| s.start_date = start_date)
}
