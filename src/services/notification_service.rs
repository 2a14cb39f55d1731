//! Daily reminder scheduling through the platform notification center.

use crate::error::AppError;
use crate::events::{AppEvent, EventBus};
use crate::models::Settings;
use chrono::Timelike;
use std::sync::{Mutex, MutexGuard};

pub const DAILY_REMINDER_ID: &str = "daily-memento-reminder";
pub const REMINDER_TITLE: &str = "Your daily memory";
pub const REMINDER_BODY: &str = "A new photo and quote are waiting for you today.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorizationStatus {
    NotDetermined,
    Denied,
    Authorized,
    /// Quiet delivery granted without asking
    Provisional,
}

impl AuthorizationStatus {
    pub fn allows_delivery(&self) -> bool {
        matches!(self, AuthorizationStatus::Authorized | AuthorizationStatus::Provisional)
    }
}

/// A repeating reminder at a fixed local time of day
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReminderRequest {
    pub identifier: String,
    pub hour: u32,
    pub minute: u32,
    pub title: String,
    pub body: String,
    pub repeats: bool,
}

impl ReminderRequest {
    pub fn daily(settings: &Settings) -> Self {
        Self {
            identifier: DAILY_REMINDER_ID.to_string(),
            hour: settings.notification_time.hour(),
            minute: settings.notification_time.minute(),
            title: REMINDER_TITLE.to_string(),
            body: REMINDER_BODY.to_string(),
            repeats: true,
        }
    }
}

/// Platform notification service
pub trait NotificationCenter: Send + Sync {
    fn authorization_status(&self) -> AuthorizationStatus;
    /// Asks the user for permission; `Ok(true)` when granted
    fn request_authorization(&self) -> Result<bool, AppError>;
    fn schedule_daily(&self, request: ReminderRequest) -> Result<(), AppError>;
    fn cancel_all_pending(&self);
    fn pending(&self) -> Vec<ReminderRequest>;
}

/// Replaces any pending reminder with one at the configured time.
///
/// Authorization is requested when it was never asked for; a refusal or an
/// earlier denial yields `PermissionDenied`.
pub fn schedule_daily_reminder(
    center: &dyn NotificationCenter,
    settings: &Settings,
) -> Result<ReminderRequest, AppError> {
    match center.authorization_status() {
        AuthorizationStatus::NotDetermined => {
            if !center.request_authorization()? {
                log::info!("Notification permission was not granted");
                return Err(AppError::PermissionDenied("notifications".to_string()));
            }
        }
        AuthorizationStatus::Denied => {
            return Err(AppError::PermissionDenied("notifications".to_string()));
        }
        AuthorizationStatus::Authorized | AuthorizationStatus::Provisional => {}
    }

    center.cancel_all_pending();
    let request = ReminderRequest::daily(settings);
    center.schedule_daily(request.clone())?;
    log::info!("Daily reminder scheduled for {:02}:{:02}", request.hour, request.minute);
    Ok(request)
}

pub fn cancel_reminders(center: &dyn NotificationCenter) {
    center.cancel_all_pending();
    log::info!("Pending reminders cancelled");
}

/// A tap on the delivered reminder opens today's memory
pub fn handle_notification_tap(events: &EventBus) {
    log::debug!("Reminder tapped");
    events.publish(AppEvent::SwitchToHome);
    events.publish(AppEvent::RefreshToday);
}

/// In-process notification center that only logs deliveries.
///
/// Used on desktop, where there is no system notification service.
pub struct LocalNotificationCenter {
    status: Mutex<AuthorizationStatus>,
    grant_on_request: bool,
    pending: Mutex<Vec<ReminderRequest>>,
}

impl Default for LocalNotificationCenter {
    fn default() -> Self {
        Self::new(AuthorizationStatus::NotDetermined, true)
    }
}

impl LocalNotificationCenter {
    pub fn new(status: AuthorizationStatus, grant_on_request: bool) -> Self {
        Self {
            status: Mutex::new(status),
            grant_on_request,
            pending: Mutex::new(Vec::new()),
        }
    }

    fn pending_lock(&self) -> MutexGuard<'_, Vec<ReminderRequest>> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn status_lock(&self) -> MutexGuard<'_, AuthorizationStatus> {
        self.status.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl NotificationCenter for LocalNotificationCenter {
    fn authorization_status(&self) -> AuthorizationStatus {
        *self.status_lock()
    }

    fn request_authorization(&self) -> Result<bool, AppError> {
        let mut status = self.status_lock();
        if *status == AuthorizationStatus::NotDetermined {
            *status = if self.grant_on_request {
                AuthorizationStatus::Authorized
            } else {
                AuthorizationStatus::Denied
            };
        }
        Ok(status.allows_delivery())
    }

    fn schedule_daily(&self, request: ReminderRequest) -> Result<(), AppError> {
        if !self.authorization_status().allows_delivery() {
            return Err(AppError::PermissionDenied("notifications".to_string()));
        }
        log::debug!(
            "Local reminder '{}' at {:02}:{:02}",
            request.identifier,
            request.hour,
            request.minute
        );
        let mut pending = self.pending_lock();
        pending.retain(|r| r.identifier != request.identifier);
        pending.push(request);
        Ok(())
    }

    fn cancel_all_pending(&self) {
        self.pending_lock().clear();
    }

    fn pending(&self) -> Vec<ReminderRequest> {
        self.pending_lock().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveTime};

    fn settings_at(hour: u32, minute: u32) -> Settings {
        let mut settings = Settings::defaults(NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
        settings.notification_time = NaiveTime::from_hms_opt(hour, minute, 0).unwrap();
        settings
    }

    #[test]
    fn test_requests_authorization_then_schedules() {
        let center = LocalNotificationCenter::default();
        let request = schedule_daily_reminder(&center, &settings_at(20, 15)).unwrap();

        assert_eq!(center.authorization_status(), AuthorizationStatus::Authorized);
        assert_eq!((request.hour, request.minute), (20, 15));
        assert!(request.repeats);
        assert_eq!(center.pending(), vec![request]);
    }

    #[test]
    fn test_rescheduling_replaces_pending() {
        let center = LocalNotificationCenter::new(AuthorizationStatus::Authorized, true);
        schedule_daily_reminder(&center, &settings_at(9, 0)).unwrap();
        schedule_daily_reminder(&center, &settings_at(7, 30)).unwrap();

        let pending = center.pending();
        assert_eq!(pending.len(), 1);
        assert_eq!((pending[0].hour, pending[0].minute), (7, 30));
    }

    #[test]
    fn test_denied_permission() {
        let refused = LocalNotificationCenter::new(AuthorizationStatus::NotDetermined, false);
        let result = schedule_daily_reminder(&refused, &settings_at(9, 0));
        assert!(matches!(result, Err(AppError::PermissionDenied(_))));
        assert!(refused.pending().is_empty());

        let denied = LocalNotificationCenter::new(AuthorizationStatus::Denied, true);
        assert!(matches!(
            schedule_daily_reminder(&denied, &settings_at(9, 0)),
            Err(AppError::PermissionDenied(_))
        ));
        // A denial is not asked again
        assert_eq!(denied.authorization_status(), AuthorizationStatus::Denied);
    }

    #[test]
    fn test_cancel_reminders() {
        let center = LocalNotificationCenter::new(AuthorizationStatus::Provisional, true);
        schedule_daily_reminder(&center, &settings_at(9, 0)).unwrap();
        cancel_reminders(&center);
        assert!(center.pending().is_empty());
    }

    #[tokio::test]
    async fn test_tap_switches_home_and_refreshes() {
        let events = EventBus::default();
        let mut rx = events.subscribe();

        handle_notification_tap(&events);

        assert_eq!(rx.recv().await.unwrap(), AppEvent::SwitchToHome);
        assert_eq!(rx.recv().await.unwrap(), AppEvent::RefreshToday);
    }
}
