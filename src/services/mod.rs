pub mod backup_service;
pub mod import_service;
pub mod integrity_service;
pub mod notification_service;
pub mod photo_service;
pub mod quote_catalog;
pub mod quote_service;
pub mod selection_service;
pub mod settings_service;

pub use import_service::{import_all, ImportSummary};
pub use integrity_service::{run_integrity_check, verify_and_repair, IntegrityReport};
pub use notification_service::{
    handle_notification_tap, schedule_daily_reminder, AuthorizationStatus, LocalNotificationCenter,
    NotificationCenter, ReminderRequest,
};
pub use selection_service::{select_for_today, select_quote_for_day};
