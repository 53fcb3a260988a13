//! Notifier test utilities

use std::sync::Mutex;

use chromium_update_notifier::check::notifier::{Notifier, UpdateNotification};
use chromium_update_notifier::version::types::Indicator;

/// Notifier that remembers everything it was asked to show
#[derive(Default)]
pub struct RecordingNotifier {
    notifications: Mutex<Vec<UpdateNotification>>,
    indicators: Mutex<Vec<Indicator>>,
}

impl RecordingNotifier {
    pub fn notifications(&self) -> Vec<UpdateNotification> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn indicators(&self) -> Vec<Indicator> {
        self.indicators.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify_update(&self, notification: &UpdateNotification) {
        self.notifications.lock().unwrap().push(notification.clone());
    }

    fn set_indicator(&self, indicator: Indicator) {
        self.indicators.lock().unwrap().push(indicator);
    }
}
