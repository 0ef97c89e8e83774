use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::reports::MAX_LOOKBACK_MONTHS;

/// Label statistics and export settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReportsConfig {
    /// Months before the reference month shown in the super admin report.
    #[serde(default = "default_three")]
    pub platform_lookback_months: u32,

    /// Months before the reference month shown in the company admin report.
    #[serde(default = "default_two")]
    pub company_lookback_months: u32,

    /// Months before the reference month shown in the manufacturer admin report.
    #[serde(default = "default_three")]
    pub manufacturer_lookback_months: u32,

    /// Default number of days covered by the label statistics CSV exports.
    #[serde(default = "default_export_days")]
    pub export_days: u32,

    /// Days with fewer labels than this are left out of the statistics CSVs.
    #[serde(default = "default_two_u64")]
    pub csv_min_daily_count: u64,

    /// Calendar months covered by the daily label count endpoint.
    #[serde(default = "default_four")]
    pub label_count_lookback_months: u32,
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            platform_lookback_months: default_three(),
            company_lookback_months: default_two(),
            manufacturer_lookback_months: default_three(),
            export_days: default_export_days(),
            csv_min_daily_count: default_two_u64(),
            label_count_lookback_months: default_four(),
        }
    }
}

impl ReportsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("platform_lookback_months", self.platform_lookback_months),
            ("company_lookback_months", self.company_lookback_months),
            ("manufacturer_lookback_months", self.manufacturer_lookback_months),
        ] {
            if value > MAX_LOOKBACK_MONTHS {
                return Err(ConfigError::Validation(format!(
                    "reports.{} must be at most {}",
                    name, MAX_LOOKBACK_MONTHS
                )));
            }
        }
        if self.export_days == 0 {
            return Err(ConfigError::Validation(
                "reports.export_days must be greater than zero".into(),
            ));
        }
        if self.csv_min_daily_count == 0 {
            return Err(ConfigError::Validation(
                "reports.csv_min_daily_count must be greater than zero".into(),
            ));
        }
        Ok(())
    }
}

fn default_two() -> u32 {
    2
}

fn default_three() -> u32 {
    3
}

fn default_four() -> u32 {
    4
}

fn default_two_u64() -> u64 {
    2
}

fn default_export_days() -> u32 {
    120
}
