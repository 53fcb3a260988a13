//! Persisted update state

use std::fmt;
use std::str::FromStr;

use crate::config::{Architecture, DEFAULT_CURRENT_VERSION, UpdatePeriod};
use crate::version::comparator::is_update_available;

/// Badge shown for the outcome of the last check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Indicator {
    /// A newer release is available ("NEW", red)
    New,
    /// The recorded version is current ("✓", green)
    UpToDate,
    /// The last check failed ("!", orange)
    Warning,
}

impl Indicator {
    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::New => "new",
            Indicator::UpToDate => "up_to_date",
            Indicator::Warning => "warning",
        }
    }

    /// Badge text
    pub fn badge(&self) -> &'static str {
        match self {
            Indicator::New => "NEW",
            Indicator::UpToDate => "✓",
            Indicator::Warning => "!",
        }
    }

    /// Badge background colour
    pub fn color(&self) -> &'static str {
        match self {
            Indicator::New => "#FF0000",
            Indicator::UpToDate => "#4CAF50",
            Indicator::Warning => "#FFA500",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.badge())
    }
}

impl FromStr for Indicator {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Indicator::New),
            "up_to_date" => Ok(Indicator::UpToDate),
            "warning" => Ok(Indicator::Warning),
            _ => Err(()),
        }
    }
}

/// Everything the checker persists between runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateRecord {
    /// Version the user says is installed
    pub current_version: String,
    pub architecture: Architecture,
    pub update_period: UpdatePeriod,
    /// Newest version seen on the release page by the last successful check
    pub latest_version: Option<String>,
    /// Release page the latest version was found on
    pub page_url: Option<String>,
    pub last_checked: Option<String>,
    /// Message of the last failed check, cleared by a successful one
    pub error: Option<String>,
    pub indicator: Option<Indicator>,
}

impl Default for UpdateRecord {
    fn default() -> Self {
        Self {
            current_version: DEFAULT_CURRENT_VERSION.to_string(),
            architecture: Architecture::default(),
            update_period: UpdatePeriod::default(),
            latest_version: None,
            page_url: None,
            last_checked: None,
            error: None,
            indicator: None,
        }
    }
}

impl UpdateRecord {
    /// "NEW" or "OK" for the recorded versions, nothing until a version is known
    pub fn update_badge(&self) -> Option<&'static str> {
        let latest = self.latest_version.as_deref()?;
        if self.current_version.is_empty() {
            return None;
        }

        if is_update_available(&self.current_version, latest) {
            Some("NEW")
        } else {
            Some("OK")
        }
    }

    /// Apply a patch in memory, mirroring what the store does on disk
    pub fn apply(&mut self, patch: RecordPatch) {
        if let Some(v) = patch.current_version {
            self.current_version = v;
        }
        if let Some(v) = patch.architecture {
            self.architecture = v;
        }
        if let Some(v) = patch.update_period {
            self.update_period = v;
        }
        if let Some(v) = patch.latest_version {
            self.latest_version = Some(v);
        }
        if let Some(v) = patch.page_url {
            self.page_url = Some(v);
        }
        if let Some(v) = patch.last_checked {
            self.last_checked = Some(v);
        }
        if let Some(v) = patch.error {
            self.error = v;
        }
        if let Some(v) = patch.indicator {
            self.indicator = Some(v);
        }
    }
}

/// Partial update of an [`UpdateRecord`]; `None` fields are left untouched.
///
/// `error` is doubly optional so a patch can clear it (`Some(None)`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub current_version: Option<String>,
    pub architecture: Option<Architecture>,
    pub update_period: Option<UpdatePeriod>,
    pub latest_version: Option<String>,
    pub page_url: Option<String>,
    pub last_checked: Option<String>,
    pub error: Option<Option<String>>,
    pub indicator: Option<Indicator>,
}

impl RecordPatch {
    /// Result of a check that found a version
    pub fn checked(
        latest_version: &str,
        page_url: &str,
        last_checked: String,
        indicator: Indicator,
    ) -> Self {
        Self {
            latest_version: Some(latest_version.to_string()),
            page_url: Some(page_url.to_string()),
            last_checked: Some(last_checked),
            error: Some(None),
            indicator: Some(indicator),
            ..Default::default()
        }
    }

    /// Result of a check that failed; the last known latest version is kept
    pub fn failed(message: String, last_checked: String) -> Self {
        Self {
            last_checked: Some(last_checked),
            error: Some(Some(message)),
            indicator: Some(Indicator::Warning),
            ..Default::default()
        }
    }

    /// User settings save
    pub fn settings(
        current_version: String,
        architecture: Architecture,
        update_period: UpdatePeriod,
    ) -> Self {
        Self {
            current_version: Some(current_version),
            architecture: Some(architecture),
            update_period: Some(update_period),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_record_has_baseline_values() {
        let record = UpdateRecord::default();

        assert_eq!(record.current_version, "0.0.0.0");
        assert_eq!(record.architecture, Architecture::X64);
        assert_eq!(record.update_period, UpdatePeriod::Days(7));
        assert_eq!(record.latest_version, None);
        assert_eq!(record.error, None);
    }

    #[test]
    fn failed_patch_keeps_latest_version_and_sets_error() {
        let mut record = UpdateRecord::default();
        record.apply(RecordPatch::checked(
            "136.0.7103.92",
            "https://example.test/",
            "2026-01-01 10:00:00".to_string(),
            Indicator::UpToDate,
        ));

        record.apply(RecordPatch::failed(
            "HTTP error! status: 500".to_string(),
            "2026-01-02 10:00:00".to_string(),
        ));

        assert_eq!(record.latest_version.as_deref(), Some("136.0.7103.92"));
        assert_eq!(record.page_url.as_deref(), Some("https://example.test/"));
        assert_eq!(record.error.as_deref(), Some("HTTP error! status: 500"));
        assert_eq!(record.last_checked.as_deref(), Some("2026-01-02 10:00:00"));
        assert_eq!(record.indicator, Some(Indicator::Warning));
    }

    #[test]
    fn checked_patch_clears_previous_error() {
        let mut record = UpdateRecord {
            error: Some("boom".to_string()),
            ..Default::default()
        };

        record.apply(RecordPatch::checked(
            "136.0.7103.92",
            "https://example.test/",
            "now".to_string(),
            Indicator::New,
        ));

        assert_eq!(record.error, None);
        assert_eq!(record.indicator, Some(Indicator::New));
    }

    #[test]
    fn update_badge_uses_shared_comparison() {
        let mut record = UpdateRecord {
            current_version: "130.0.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(record.update_badge(), None);

        record.latest_version = Some("136.0.7103.92".to_string());
        assert_eq!(record.update_badge(), Some("NEW"));

        record.current_version = "140.0.0.0".to_string();
        assert_eq!(record.update_badge(), Some("OK"));
    }

    #[test]
    fn indicator_round_trips_through_store_representation() {
        for indicator in [Indicator::New, Indicator::UpToDate, Indicator::Warning] {
            assert_eq!(indicator.as_str().parse::<Indicator>(), Ok(indicator));
        }
    }
}
