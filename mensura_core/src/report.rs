//! The four trend views, computed together for one render.

use crate::forecast::{self, Forecast};
use crate::trend;
use crate::{MeasureSeries, MeasurementRecord, WeeklyMean};
use serde::{Deserialize, Serialize};

/// Parameters of the derived views
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct TrendSettings {
    pub rolling_window_days: u32,
    pub forecast_horizon_days: u32,
}

impl Default for TrendSettings {
    fn default() -> Self {
        Self {
            rolling_window_days: trend::DEFAULT_ROLLING_WINDOW_DAYS,
            forecast_horizon_days: forecast::DEFAULT_HORIZON_DAYS,
        }
    }
}

/// Forecast slot of a report; a failed forecast leaves the other views intact
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ForecastView {
    Available(Forecast),
    Omitted { reason: String },
}

impl ForecastView {
    pub fn as_forecast(&self) -> Option<&Forecast> {
        match self {
            ForecastView::Available(forecast) => Some(forecast),
            ForecastView::Omitted { .. } => None,
        }
    }
}

/// Everything the presentation layer charts
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TrendReport {
    pub settings: TrendSettings,
    pub record_count: usize,
    pub latest: Option<MeasurementRecord>,
    /// Weight of the last record minus weight of the first
    pub weight_change: Option<f64>,
    pub raw: MeasureSeries,
    pub weekly: Vec<WeeklyMean>,
    pub rolling: MeasureSeries,
    pub forecast: ForecastView,
}

impl TrendReport {
    /// Derive every view from the full, date-ordered log
    pub fn build(records: &[MeasurementRecord], settings: &TrendSettings) -> Self {
        let forecast = match forecast::forecast_weight(records, settings.forecast_horizon_days) {
            Ok(forecast) => ForecastView::Available(forecast),
            Err(e) => {
                tracing::info!("Forecast omitted: {}", e);
                ForecastView::Omitted {
                    reason: e.to_string(),
                }
            }
        };

        let weight_change = match (records.first(), records.last()) {
            (Some(first), Some(last)) if records.len() > 1 => Some(last.weight - first.weight),
            _ => None,
        };

        Self {
            settings: *settings,
            record_count: records.len(),
            latest: records.last().cloned(),
            weight_change,
            raw: trend::raw_series(records),
            weekly: trend::weekly_mean(records),
            rolling: trend::rolling_mean(records, settings.rolling_window_days),
            forecast,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.record_count == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn record(id: u64, day: u32, weight: f64) -> MeasurementRecord {
        MeasurementRecord {
            id,
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            weight,
            waist: 90.0,
            chest: 100.0,
        }
    }

    #[test]
    fn test_empty_log_yields_empty_views() {
        let report = TrendReport::build(&[], &TrendSettings::default());

        assert!(report.is_empty());
        assert!(report.raw.is_empty());
        assert!(report.weekly.is_empty());
        assert!(report.rolling.is_empty());
        assert!(report.latest.is_none());
        assert!(matches!(report.forecast, ForecastView::Omitted { .. }));
    }

    #[test]
    fn test_single_record_omits_only_forecast() {
        let report = TrendReport::build(&[record(1, 1, 80.0)], &TrendSettings::default());

        assert_eq!(report.raw.len(), 1);
        assert_eq!(report.weekly.len(), 1);
        assert_eq!(report.rolling.len(), 1);
        assert!(report.weight_change.is_none());
        match &report.forecast {
            ForecastView::Omitted { reason } => assert!(reason.contains("Insufficient data")),
            other => panic!("expected omitted forecast, got {:?}", other),
        }
    }

    #[test]
    fn test_full_report() {
        let records = vec![record(1, 1, 80.0), record(2, 8, 79.0), record(3, 15, 78.0)];
        let settings = TrendSettings {
            rolling_window_days: 7,
            forecast_horizon_days: 14,
        };
        let report = TrendReport::build(&records, &settings);

        assert_eq!(report.record_count, 3);
        assert_eq!(report.weight_change, Some(-2.0));
        assert_eq!(report.latest.as_ref().map(|r| r.id), Some(3));
        let forecast = report.forecast.as_forecast().expect("forecast available");
        assert_eq!(forecast.predicted().count(), 14);
    }

    #[test]
    fn test_out_of_range_horizon_omits_only_forecast() {
        let records = vec![record(1, 1, 80.0), record(2, 8, 79.0)];
        let settings = TrendSettings {
            rolling_window_days: u32::MAX,
            forecast_horizon_days: u32::MAX,
        };
        let report = TrendReport::build(&records, &settings);

        assert_eq!(report.raw.len(), 2);
        assert_eq!(report.weekly.len(), 2);
        assert_eq!(report.rolling.weight[1].value, 79.5);
        match &report.forecast {
            ForecastView::Omitted { reason } => assert!(reason.contains("out of range")),
            other => panic!("expected omitted forecast, got {:?}", other),
        }
    }

    #[test]
    fn test_report_serializes_forecast_status() {
        let report = TrendReport::build(&[record(1, 1, 80.0)], &TrendSettings::default());
        let json = serde_json::to_value(&report).unwrap();

        assert_eq!(json["forecast"]["status"], "omitted");
        assert_eq!(json["raw"]["weight"][0]["date"], "2024-01-01");
    }
}
