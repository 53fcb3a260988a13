//! Validated save of user settings

use tracing::info;

use crate::config::{Architecture, UpdatePeriod};
use crate::version::error::SettingsError;
use crate::version::types::RecordPatch;

/// Raw settings as entered by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub current_version: String,
    pub architecture: String,
    pub update_period: String,
}

impl SettingsForm {
    /// Validate every field, producing the patch to persist.
    ///
    /// Nothing is returned for partial input: either all fields are valid or
    /// the first problem is reported.
    pub fn validate(&self) -> Result<RecordPatch, SettingsError> {
        let update_period: UpdatePeriod = self.update_period.parse()?;

        let current_version = self.current_version.trim();
        if current_version.is_empty() {
            return Err(SettingsError::EmptyVersion);
        }

        let architecture: Architecture = self.architecture.trim().parse()?;

        info!(
            "Settings validated: version {}, architecture {}, period {}",
            current_version, architecture, update_period
        );

        Ok(RecordPatch::settings(
            current_version.to_string(),
            architecture,
            update_period,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn form(version: &str, arch: &str, period: &str) -> SettingsForm {
        SettingsForm {
            current_version: version.to_string(),
            architecture: arch.to_string(),
            update_period: period.to_string(),
        }
    }

    #[test]
    fn validate_accepts_custom_period() {
        let patch = form(" 136.0.7103.92 ", "arm", "14").validate().unwrap();

        assert_eq!(
            patch,
            RecordPatch::settings(
                "136.0.7103.92".to_string(),
                Architecture::Arm,
                UpdatePeriod::Days(14)
            )
        );
    }

    #[test]
    fn validate_accepts_never() {
        let patch = form("130.0.0.0", "x64", "never").validate().unwrap();
        assert_eq!(patch.update_period, Some(UpdatePeriod::Never));
    }

    #[rstest]
    #[case(form("", "x64", "7"), SettingsError::EmptyVersion)]
    #[case(form("   ", "x64", "7"), SettingsError::EmptyVersion)]
    #[case(form("130.0.0.0", "x64", "0"), SettingsError::PeriodOutOfRange("0".to_string()))]
    #[case(form("130.0.0.0", "x64", "400"), SettingsError::PeriodOutOfRange("400".to_string()))]
    #[case(form("", "x64", "400"), SettingsError::PeriodOutOfRange("400".to_string()))] // period checked first
    #[case(form("130.0.0.0", "ppc", "7"), SettingsError::UnknownArchitecture("ppc".to_string()))]
    fn validate_rejects_invalid_input(#[case] input: SettingsForm, #[case] expected: SettingsError) {
        assert_eq!(input.validate(), Err(expected));
    }
}
