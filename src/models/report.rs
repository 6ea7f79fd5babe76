//! Report payloads: summary counters, alert frequency and weight trends.

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::alert::{Alert, RawAlert};
use super::wire::{lenient_f64_series, lenient_list, lenient_string_series, lenient_u64};

const DEFAULT_MONTHS: [&str; 6] = ["Jan", "Feb", "Mar", "Apr", "May", "Jun"];
const DEFAULT_TIMES: [&str; 6] = ["6AM", "9AM", "12PM", "3PM", "6PM", "9PM"];

/// Summary counters for a date range
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSummary {
    pub critical_alerts: u64,
    pub warning_alerts: u64,
    pub normal_vehicles: u64,
    pub overload_alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawReportSummary {
    #[serde(deserialize_with = "lenient_u64")]
    pub critical_alerts: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub warning_alerts: Option<u64>,
    #[serde(deserialize_with = "lenient_u64")]
    pub normal_vehicles: Option<u64>,
    #[serde(deserialize_with = "lenient_list")]
    pub overload_alerts: Option<Vec<Value>>,
}

impl From<RawReportSummary> for ReportSummary {
    fn from(raw: RawReportSummary) -> Self {
        let overload_alerts = raw
            .overload_alerts
            .unwrap_or_default()
            .into_iter()
            .filter_map(|item| match serde_json::from_value::<RawAlert>(item) {
                Ok(alert) => Some(Alert::from(alert)),
                Err(e) => {
                    warn!("Skipping malformed overload alert in report summary: {}", e);
                    None
                }
            })
            .collect();

        Self {
            critical_alerts: raw.critical_alerts.unwrap_or(0),
            warning_alerts: raw.warning_alerts.unwrap_or(0),
            normal_vehicles: raw.normal_vehicles.unwrap_or(0),
            overload_alerts,
        }
    }
}

/// Per-month alert counts
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertFrequency {
    pub months: Vec<String>,
    pub critical: Vec<f64>,
    pub warning: Vec<f64>,
}

impl Default for AlertFrequency {
    fn default() -> Self {
        Self {
            months: DEFAULT_MONTHS.iter().map(|m| m.to_string()).collect(),
            critical: vec![0.0; DEFAULT_MONTHS.len()],
            warning: vec![0.0; DEFAULT_MONTHS.len()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawAlertFrequency {
    #[serde(deserialize_with = "lenient_string_series")]
    pub months: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_f64_series")]
    pub critical: Option<Vec<f64>>,
    #[serde(deserialize_with = "lenient_f64_series")]
    pub warning: Option<Vec<f64>>,
}

impl From<RawAlertFrequency> for AlertFrequency {
    fn from(raw: RawAlertFrequency) -> Self {
        let defaults = Self::default();
        let months = raw.months.filter(|m| !m.is_empty()).unwrap_or(defaults.months);
        let len = months.len();
        Self {
            critical: fit_series(raw.critical, len),
            warning: fit_series(raw.warning, len),
            months,
        }
    }
}

impl AlertFrequency {
    pub fn total_critical(&self) -> f64 {
        self.critical.iter().sum()
    }

    pub fn total_warning(&self) -> f64 {
        self.warning.iter().sum()
    }
}

/// Average weight per time bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightTrend {
    pub times: Vec<String>,
    pub average_weights: Vec<f64>,
}

impl Default for WeightTrend {
    fn default() -> Self {
        Self {
            times: DEFAULT_TIMES.iter().map(|t| t.to_string()).collect(),
            average_weights: vec![0.0; DEFAULT_TIMES.len()],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RawWeightTrend {
    #[serde(deserialize_with = "lenient_string_series")]
    pub times: Option<Vec<String>>,
    #[serde(deserialize_with = "lenient_f64_series")]
    pub average_weights: Option<Vec<f64>>,
}

impl From<RawWeightTrend> for WeightTrend {
    fn from(raw: RawWeightTrend) -> Self {
        let times = raw
            .times
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| Self::default().times);
        let len = times.len();
        Self {
            average_weights: fit_series(raw.average_weights, len),
            times,
        }
    }
}

impl WeightTrend {
    /// Highest average weight, or 0 for an empty series
    pub fn peak(&self) -> f64 {
        self.average_weights.iter().copied().fold(0.0, f64::max)
    }
}

/// Pad with zeros or truncate so a series lines up with its labels
fn fit_series(series: Option<Vec<f64>>, len: usize) -> Vec<f64> {
    let mut series = series.unwrap_or_default();
    series.resize(len, 0.0);
    series
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn frequency_series_follow_labels() {
        let raw: RawAlertFrequency =
            serde_json::from_value(json!({"months": ["Jul", "Aug"], "critical": [3], "warning": ["1", 2, 9]}))
                .unwrap();
        let freq = AlertFrequency::from(raw);
        assert_eq!(freq.months, vec!["Jul", "Aug"]);
        assert_eq!(freq.critical, vec![3.0, 0.0]);
        assert_eq!(freq.warning, vec![1.0, 2.0]);
    }

    #[test]
    fn empty_trend_uses_default_buckets() {
        let trend = WeightTrend::from(RawWeightTrend::default());
        assert_eq!(trend.times.len(), 6);
        assert_eq!(trend.times[0], "6AM");
        assert_eq!(trend.peak(), 0.0);
    }
}
