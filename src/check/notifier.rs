//! User-facing notification and badge output

use tracing::{info, warn};

#[cfg(test)]
use mockall::automock;

use crate::version::types::Indicator;

/// Identifier of the update notification, one per product
pub const NOTIFICATION_ID: &str = "ungoogled-chromium-update";

/// Notification raised when a newer release is published
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateNotification {
    pub current_version: String,
    pub latest_version: String,
    /// Release page opened when the notification is acted on
    pub page_url: String,
}

impl UpdateNotification {
    pub fn title(&self) -> &'static str {
        "A new version of Ungoogled Chromium is available"
    }

    pub fn message(&self) -> String {
        format!(
            "Your version: {}\nLatest: {}\nOpen {} to download",
            self.current_version, self.latest_version, self.page_url
        )
    }
}

/// Output side of a check cycle
#[cfg_attr(test, automock)]
pub trait Notifier: Send + Sync {
    /// Show the update notification
    fn notify_update(&self, notification: &UpdateNotification);

    /// Update the badge
    fn set_indicator(&self, indicator: Indicator);
}

/// Notifier that writes to the terminal and the log
#[derive(Debug, Default)]
pub struct ConsoleNotifier;

impl Notifier for ConsoleNotifier {
    fn notify_update(&self, notification: &UpdateNotification) {
        info!(
            id = NOTIFICATION_ID,
            current = %notification.current_version,
            latest = %notification.latest_version,
            url = %notification.page_url,
            "Update available"
        );
        println!("{}\n{}", notification.title(), notification.message());
    }

    fn set_indicator(&self, indicator: Indicator) {
        info!(badge = indicator.badge(), color = indicator.color(), "Indicator set");
    }
}

/// Open a release page in the default browser
pub fn open_page(url: &str) -> std::io::Result<()> {
    info!("Opening {}", url);
    open::that(url).inspect_err(|e| warn!("Failed to open {}: {}", url, e))
}
